//! Collaborator interfaces
//!
//! These traits are the boundary between the coordination core and the
//! hardware-facing parts of the firmware.

use crate::report::StatusReport;

/// Motor power stage
///
/// Both commands are infallible at this layer; driver faults are the
/// driver's business.
pub trait MotorActuator {
    /// Run forward at a duty fraction in [0, 1]
    fn run(&mut self, duty: f32);

    /// Remove drive and let the motor coast
    fn stop(&mut self);
}

/// Read-only view of the motor's measured state
pub trait MotorTelemetry {
    /// Shaft speed in rpm
    fn speed(&self) -> f32;

    /// Duty currently applied to the motor
    fn compensation(&self) -> f32;

    /// Setpoint minus measured speed, in rpm
    fn error(&self) -> f32;

    /// Error normalized to rated speed, in [-1, 1]
    fn adjusted_error(&self) -> f32;
}

/// Slow status output (LCD)
///
/// Only the status reporter calls this.
#[allow(async_fn_in_trait)]
pub trait StatusDisplay {
    type Error;

    async fn print_status(&mut self, report: &StatusReport) -> Result<(), Self::Error>;
}
