use defmt::info;
use embassy_executor::task;
use embassy_futures::select::{Either, select};
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::Output;
use embassy_time::{Duration, Ticker};

use weld_core::handlers::SteadyMonitor;
use weld_core::indicator::BlinkSlot;

/// Steady-state input edges and the motor LED blink ticker
///
/// The ticker lives in a [`BlinkSlot`] that follows the monitor's blink
/// timer after every edge.
#[task]
pub async fn steady_task(
    mut input: ExtiInput<'static>,
    mut monitor: SteadyMonitor<'static, Output<'static>>,
    blink_period: Duration,
) {
    info!("Starting steady-state task");

    let mut blink = BlinkSlot::new(monitor.blink_timer(), || Ticker::every(blink_period));

    loop {
        let event = match blink.ticker() {
            Some(ticker) => select(input.wait_for_any_edge(), ticker.next()).await,
            None => Either::First(input.wait_for_any_edge().await),
        };

        match event {
            Either::First(()) => {
                if input.is_high() {
                    monitor.on_rising_edge();
                } else {
                    monitor.on_falling_edge();
                }
                blink.follow(monitor.blink_timer(), || Ticker::every(blink_period));
            }
            Either::Second(()) => monitor.on_blink_tick(),
        }
    }
}
