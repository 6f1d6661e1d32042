//! Supervisor step
//!
//! The supervisor turns the current signal flags into motor and solenoid
//! outputs. The firmware calls [`Supervisor::step`] on every pass of its main
//! loop, so a flag changed by an edge handler takes effect on the next pass.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;

use crate::controller::{Controller, limit_duty};
use crate::pins::drive;
use crate::state::SignalState;
use crate::telemetry::TelemetryCell;
use crate::traits::{MotorActuator, MotorTelemetry};

/// Command issued to the motor on a step
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorCommand {
    Stop,
    Run(f32),
}

/// Outputs driven directly by the supervisor
pub struct SupervisorPins<P> {
    pub solenoid: P,
    pub solenoid_led: P,
    /// Mirrors `motor_steady` while the motor is requested
    pub steady_indicator: P,
}

pub struct Supervisor<'a, A, C, P> {
    signals: &'a SignalState,
    telemetry: &'a TelemetryCell,
    actuator: A,
    controller: C,
    pins: SupervisorPins<P>,
    rated_rpm: f32,
}

impl<'a, A, C, P> Supervisor<'a, A, C, P>
where
    A: MotorActuator,
    C: Controller,
    P: OutputPin<Error = Infallible>,
{
    pub fn new(
        signals: &'a SignalState,
        telemetry: &'a TelemetryCell,
        actuator: A,
        controller: C,
        pins: SupervisorPins<P>,
        rated_rpm: f32,
    ) -> Self {
        Self {
            signals,
            telemetry,
            actuator,
            controller,
            pins,
            rated_rpm,
        }
    }

    /// One pass: motor command, steady indicator, solenoid
    pub fn step(&mut self) -> MotorCommand {
        let snapshot = self.signals.snapshot();

        let command = if !snapshot.motor_requested {
            self.actuator.stop();
            self.telemetry.record_compensation(0.0);
            MotorCommand::Stop
        } else {
            let measured = if self.rated_rpm > 0.0 {
                self.telemetry.speed() / self.rated_rpm
            } else {
                0.0
            };
            let duty = limit_duty(self.controller.duty(snapshot.speed_reference, measured));

            self.actuator.run(duty);
            self.telemetry.record_compensation(duty);
            drive(&mut self.pins.steady_indicator, snapshot.motor_steady);
            MotorCommand::Run(duty)
        };

        drive(&mut self.pins.solenoid, snapshot.weld_active);
        drive(&mut self.pins.solenoid_led, snapshot.weld_active);

        command
    }
}
