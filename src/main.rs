//! Welding rig firmware for the STM32F103 "Blue Pill"
//!
//! | Signal               | Pin       | Peripheral      |
//! |----------------------|-----------|-----------------|
//! | Motor button         | PB8       | EXTI8           |
//! | Weld button          | PA11      | EXTI11          |
//! | Steady-state input   | PB5       | EXTI5           |
//! | Steady-state reset   | PB12      |                 |
//! | Steady indicator     | PB13      |                 |
//! | Solenoid LED         | PB14      |                 |
//! | Motor LED            | PB15      |                 |
//! | Solenoid (L298N ENB) | PB9       |                 |
//! | Motor ENA            | PA6       | TIM3 CH1        |
//! | Motor IN1 / IN2      | PB0 / PB1 |                 |
//! | Encoder A / B        | PA8 / PA9 | TIM1 encoder    |
//! | Potentiometer        | PA4       | ADC1            |
//! | Serial monitor TX    | PA2       | USART2, DMA1_CH7|
//! | LCD SCL / SDA        | PB10/PB11 | I2C2, DMA1_CH4/5|

#![no_std]
#![no_main]

mod buttons;
mod encoder;
mod motor;
mod potentiometer;
mod status;
mod steady;

use defmt::{info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_futures::yield_now;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Level, Output, OutputType, Pull, Speed};
use embassy_stm32::peripherals::*;
use embassy_stm32::time::{Hertz, khz};
use embassy_stm32::timer::low_level::CountingMode;
use embassy_stm32::timer::qei::{Qei, QeiPin};
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm};
use embassy_stm32::usart::{self, UartTx};
use embassy_stm32::{adc, bind_interrupts, i2c};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use embassy_time::{Delay, Duration};

use weld_core::config::RigConfig;
use weld_core::controller::FixedDuty;
use weld_core::handlers::{MotorButton, SteadyMonitor, WeldButton};
use weld_core::lcd::Lcd2004;
use weld_core::report::StatusReporter;
use weld_core::supervisor::{Supervisor, SupervisorPins};
use weld_core::telemetry::TelemetryCell;
use weld_core::SignalState;

use crate::motor::HBridge;

#[cfg(not(feature = "defmt"))]
use panic_halt as _;

#[cfg(feature = "defmt")]
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    ADC1_2 => adc::InterruptHandler<ADC1>;
    I2C2_EV => i2c::EventInterruptHandler<I2C2>;
    I2C2_ER => i2c::ErrorInterruptHandler<I2C2>;
});

/// Flags shared by the edge handlers, the supervisor and the reporter
pub static SIGNALS: SignalState = SignalState::new();

/// Encoder speed and commanded duty
pub static TELEMETRY: TelemetryCell = TelemetryCell::new();

/// Raised by the status ticker, consumed by the status reporter
pub static STATUS_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_stm32::init(Default::default());
    info!("Initiating");

    let (config, rejected) = RigConfig::default().or_default();
    if let Some(e) = rejected {
        warn!("Invalid rig configuration ({}), using defaults", e);
    }

    let writers = unwrap!(SIGNALS.take_writers());

    // Status output
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = config.serial_baud;
    let serial = unwrap!(UartTx::new(p.USART2, p.PA2, p.DMA1_CH7, uart_config));

    #[allow(unused_mut)]
    let mut lcd_bus = i2c::I2c::new(
        p.I2C2,
        p.PB10,
        p.PB11,
        Irqs,
        p.DMA1_CH4,
        p.DMA1_CH5,
        Hertz(100_000),
        Default::default(),
    );

    #[cfg(feature = "i2c-scan")]
    {
        info!("I2C scanner start scanning");
        for address in weld_core::bus::scan(&mut lcd_bus).await {
            info!("Valid address: {=u8:#x}", address);
        }
    }

    let mut lcd = Lcd2004::new(lcd_bus, Delay, config.lcd_address);
    if let Err(e) = lcd.init().await {
        warn!("LCD init failed: {}", e);
    }

    // Edge handlers
    let steady_reset = Output::new(p.PB12, Level::High, Speed::Low);
    let motor_led = Output::new(p.PB15, Level::Low, Speed::Low);

    let motor_input = ExtiInput::new(p.PB8, p.EXTI8, Pull::Down);
    let weld_input = ExtiInput::new(p.PA11, p.EXTI11, Pull::Down);
    let steady_input = ExtiInput::new(p.PB5, p.EXTI5, Pull::Down);

    let motor_button = MotorButton::new(writers.motor, steady_reset);
    let weld_button = WeldButton::new(writers.weld);
    let steady_monitor = SteadyMonitor::new(writers.steady, motor_led);

    // Motor
    let pwm = SimplePwm::new(
        p.TIM3,
        Some(PwmPin::new_ch1(p.PA6, OutputType::PushPull)),
        None,
        None,
        None,
        khz(20),
        CountingMode::EdgeAlignedUp,
    );
    let in1 = Output::new(p.PB0, Level::Low, Speed::Low);
    let in2 = Output::new(p.PB1, Level::Low, Speed::Low);
    let motor = HBridge::new(pwm, in1, in2);

    let qei = Qei::new(p.TIM1, QeiPin::new_ch1(p.PA8), QeiPin::new_ch2(p.PA9));

    let reporter = StatusReporter::new(&SIGNALS, &TELEMETRY, lcd, serial);

    spawner
        .spawn(buttons::motor_button_task(
            motor_input,
            motor_button,
            config.button_debounce_ms,
        ))
        .unwrap();
    spawner
        .spawn(buttons::weld_button_task(
            weld_input,
            weld_button,
            config.button_debounce_ms,
        ))
        .unwrap();
    spawner
        .spawn(steady::steady_task(
            steady_input,
            steady_monitor,
            Duration::from_millis(config.blink_period_ms),
        ))
        .unwrap();
    spawner
        .spawn(status::status_tick_task(Duration::from_millis(
            config.status_period_ms,
        )))
        .unwrap();
    spawner.spawn(status::status_task(reporter)).unwrap();
    spawner
        .spawn(potentiometer::potentiometer(
            p.PA4,
            p.ADC1,
            writers.speed,
            config,
        ))
        .unwrap();
    spawner
        .spawn(encoder::encoder_task(qei, config))
        .unwrap();

    // Supervisor outputs
    let pins = SupervisorPins {
        solenoid: Output::new(p.PB9, Level::Low, Speed::Low),
        solenoid_led: Output::new(p.PB14, Level::Low, Speed::Low),
        steady_indicator: Output::new(p.PB13, Level::Low, Speed::Low),
    };
    let mut supervisor = Supervisor::new(
        &SIGNALS,
        &TELEMETRY,
        motor,
        FixedDuty::new(config.run_duty),
        pins,
        config.rated_rpm,
    );

    info!("Ready");

    loop {
        supervisor.step();
        // Let the edge and status tasks run, then re-evaluate at once
        yield_now().await;
    }
}
