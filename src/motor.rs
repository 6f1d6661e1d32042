//! L298N motor channel
//!
//! | ENA | IN1 | IN2 | Motor   |
//! |-----|-----|-----|---------|
//! | PWM | 1   | 0   | Forward |
//! | 0   | 0   | 0   | Coast   |

use defmt::debug;
use embassy_stm32::gpio::Output;
use embassy_stm32::peripherals::TIM3;
use embassy_stm32::timer::simple_pwm::SimplePwm;

use weld_core::traits::MotorActuator;

const DUTY_STEPS: u16 = 1000;

#[derive(PartialEq, Clone, Copy, defmt::Format)]
pub enum MotorStatus {
    Off,
    Running,
}

pub struct HBridge {
    pwm: SimplePwm<'static, TIM3>,
    in1: Output<'static>,
    in2: Output<'static>,
    status: MotorStatus,
}

impl HBridge {
    pub fn new(mut pwm: SimplePwm<'static, TIM3>, in1: Output<'static>, in2: Output<'static>) -> Self {
        pwm.ch1().enable();

        let mut motor = Self {
            pwm,
            in1,
            in2,
            status: MotorStatus::Running,
        };
        motor.stop();
        motor
    }

    fn set_status(&mut self, status: MotorStatus) {
        if self.status != status {
            debug!("Motor {}", status);
            self.status = status;
        }
    }
}

impl MotorActuator for HBridge {
    fn run(&mut self, duty: f32) {
        let steps = (duty.clamp(0.0, 1.0) * DUTY_STEPS as f32) as u16;

        self.in1.set_high();
        self.in2.set_low();
        self.pwm.ch1().set_duty_cycle_fraction(steps, DUTY_STEPS);
        self.set_status(MotorStatus::Running);
    }

    fn stop(&mut self) {
        self.pwm.ch1().set_duty_cycle_fully_off();
        self.in1.set_low();
        self.in2.set_low();
        self.set_status(MotorStatus::Off);
    }
}
