use defmt::{info, trace};
use embassy_executor::task;
use embassy_stm32::Peri;
use embassy_stm32::adc::{Adc, SampleTime};
use embassy_stm32::peripherals::{ADC1, PA4};
use embassy_time::Timer;

use weld_core::analog::adc_to_fraction;
use weld_core::config::RigConfig;
use weld_core::state::SpeedReference;

/// Sample the speed knob into the shared speed reference
#[task]
pub async fn potentiometer(
    knob_pin: Peri<'static, PA4>,
    knob_adc: Peri<'static, ADC1>,
    mut speed: SpeedReference<'static>,
    config: RigConfig,
) {
    info!("Starting potentiometer task");

    let mut adc = Adc::new(knob_adc);
    let mut pin = knob_pin;

    // Wiper spans ground to VDDA
    adc.set_sample_time(SampleTime::CYCLES13_5);

    loop {
        let measured = adc.read(&mut pin).await;
        let fraction = adc_to_fraction(measured, config.adc_full_scale);
        trace!("Knob: {} -> {}", measured, fraction);

        speed.set(fraction);

        Timer::after_millis(config.speed_ref_sample_ms).await;
    }
}
