use defmt::{info, trace, warn};
use embassy_executor::task;
use embassy_stm32::i2c::I2c;
use embassy_stm32::mode::Async;
use embassy_stm32::usart::UartTx;
use embassy_time::{Delay, Duration, Ticker};

use weld_core::lcd::Lcd2004;
use weld_core::report::StatusReporter;
use weld_core::telemetry::TelemetryCell;

use crate::STATUS_REQUEST;

pub type StatusLcd = Lcd2004<I2c<'static, Async>, Delay>;
pub type SerialMonitor = UartTx<'static, Async>;

/// Periodic status request
#[task]
pub async fn status_tick_task(period: Duration) {
    info!("Starting status ticker");
    let mut ticker = Ticker::every(period);
    loop {
        ticker.next().await;
        STATUS_REQUEST.signal(());
    }
}

#[task]
pub async fn status_task(
    mut reporter: StatusReporter<'static, TelemetryCell, StatusLcd, SerialMonitor>,
) {
    info!("Starting status reporter");
    loop {
        match reporter.wait_and_report(&STATUS_REQUEST).await {
            Ok(report) => trace!("Status: {}", report),
            Err(e) => warn!("Status report failed: {}", e),
        }
    }
}
