//! Duty controllers
//!
//! The supervisor asks a [`Controller`] for the duty to apply while the motor
//! is requested. A real control law plugs in here without touching the
//! supervisor.

/// Setpoint in, duty out
pub trait Controller {
    /// Duty fraction for the given normalized setpoint and measured speed
    ///
    /// Both inputs are fractions of rated speed. The supervisor passes the
    /// result through [`limit_duty`].
    fn duty(&mut self, setpoint: f32, measured: f32) -> f32;
}

/// Clamp a duty into [0, 1]; a non-finite duty becomes 0
pub fn limit_duty(duty: f32) -> f32 {
    if duty.is_finite() {
        duty.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Open-loop controller that always commands the same duty
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedDuty {
    duty: f32,
}

impl FixedDuty {
    pub fn new(duty: f32) -> Self {
        Self {
            duty: limit_duty(duty),
        }
    }
}

impl Controller for FixedDuty {
    fn duty(&mut self, _setpoint: f32, _measured: f32) -> f32 {
        self.duty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_duty_ignores_inputs() {
        let mut controller = FixedDuty::new(0.7);
        assert_eq!(controller.duty(0.0, 0.0), 0.7);
        assert_eq!(controller.duty(1.0, 0.3), 0.7);
    }

    #[test]
    fn test_fixed_duty_clamped() {
        let mut controller = FixedDuty::new(1.5);
        assert_eq!(controller.duty(0.5, 0.5), 1.0);
    }

    #[test]
    fn test_fixed_duty_not_a_number() {
        let mut controller = FixedDuty::new(f32::NAN);
        assert_eq!(controller.duty(0.5, 0.5), 0.0);
    }

    #[test]
    fn test_limit_duty() {
        assert_eq!(limit_duty(-0.2), 0.0);
        assert_eq!(limit_duty(0.4), 0.4);
        assert_eq!(limit_duty(3.0), 1.0);
        assert_eq!(limit_duty(f32::NAN), 0.0);
        assert_eq!(limit_duty(f32::INFINITY), 0.0);
    }
}
