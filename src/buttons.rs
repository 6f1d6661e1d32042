use defmt::info;
use embassy_executor::task;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::Output;
use embassy_time::Timer;

use weld_core::handlers::{MotorButton, WeldButton};

#[task]
pub async fn motor_button_task(
    mut input: ExtiInput<'static>,
    mut button: MotorButton<'static, Output<'static>>,
    debounce_ms: u64,
) {
    info!("Starting motor button task");
    loop {
        input.wait_for_rising_edge().await;
        button.on_rising_edge();
        settle(&mut input, debounce_ms).await;
    }
}

#[task]
pub async fn weld_button_task(
    mut input: ExtiInput<'static>,
    mut button: WeldButton<'static>,
    debounce_ms: u64,
) {
    info!("Starting weld button task");
    loop {
        input.wait_for_rising_edge().await;
        button.on_rising_edge();
        settle(&mut input, debounce_ms).await;
    }
}

/// Ignore contact bounce around a press and its release
async fn settle(input: &mut ExtiInput<'static>, debounce_ms: u64) {
    if debounce_ms == 0 {
        return;
    }

    Timer::after_millis(debounce_ms).await;
    input.wait_for_low().await;
    Timer::after_millis(debounce_ms).await;
}
