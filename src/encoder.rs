use defmt::{info, trace};
use embassy_executor::task;
use embassy_stm32::peripherals::TIM1;
use embassy_stm32::timer::qei::Qei;
use embassy_time::{Duration, Ticker};

use weld_core::config::RigConfig;
use weld_core::telemetry::{SpeedEstimator, tracking_error};

use crate::{SIGNALS, TELEMETRY};

/// Sample the encoder counter and publish speed and tracking error
#[task]
pub async fn encoder_task(qei: Qei<'static, TIM1>, config: RigConfig) {
    info!(
        "Starting encoder task, {} counts/rev every {} ms",
        config.encoder.counts_per_rev, config.encoder.sample_ms
    );

    let mut estimator = SpeedEstimator::new(config.encoder);
    let mut ticker = Ticker::every(Duration::from_millis(config.encoder.sample_ms));

    loop {
        ticker.next().await;

        if let Some(rpm) = estimator.sample(qei.count()) {
            let tracking = tracking_error(SIGNALS.speed_reference(), rpm, config.rated_rpm);
            trace!("Speed: {} rpm, error: {}", rpm, tracking.error_rpm);
            TELEMETRY.record_speed(rpm, tracking);
        }
    }
}
