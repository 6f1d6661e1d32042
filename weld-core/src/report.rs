//! Status reporting
//!
//! The reporter sleeps until the status ticker signals it, then captures the
//! signal flags and motor telemetry and writes them to the display and the
//! serial monitor. All slow output happens here, never in the edge handlers
//! or the supervisor.

use core::fmt;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embedded_io_async::Write;
use heapless::String;

use crate::state::{SignalState, Snapshot};
use crate::traits::{MotorTelemetry, StatusDisplay};

/// Capacity of one serial status block
pub const SERIAL_BUFFER: usize = 256;

/// Errors that can occur while reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportError {
    /// Status text did not fit the buffer
    Format,
    /// Serial write failed
    Serial,
    /// Display update failed
    Display,
}

/// Reporter state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReporterState {
    /// Suspended until the next status request
    #[default]
    Waiting,
    /// Writing a report
    Reporting,
}

/// Everything shown on one status update
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    pub signals: Snapshot,
    pub speed: f32,
    pub compensation: f32,
    pub error: f32,
    pub adjusted_error: f32,
}

impl StatusReport {
    pub fn capture<T: MotorTelemetry>(signals: &SignalState, telemetry: &T) -> Self {
        Self {
            signals: signals.snapshot(),
            speed: telemetry.speed(),
            compensation: telemetry.compensation(),
            error: telemetry.error(),
            adjusted_error: telemetry.adjusted_error(),
        }
    }

    /// Serial monitor text, one field per line
    ///
    /// The solenoid always mirrors `weld_active`, so both lines carry the
    /// same value.
    pub fn write_serial<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        let s = &self.signals;
        writeln!(out, "motor_requested: {}", u8::from(s.motor_requested))?;
        writeln!(out, " motor_steady: {}", u8::from(s.motor_steady))?;
        writeln!(out, " weld_active: {}", u8::from(s.weld_active))?;
        writeln!(out, " solenoid: {}", u8::from(s.weld_active))?;
        writeln!(out, " speed_ref: {:.3}", s.speed_reference)?;
        writeln!(out, "compensation: {:.3}", self.compensation)?;
        writeln!(out, " speed: {:.2}", self.speed)?;
        writeln!(out, " error: {:.2}", self.error)?;
        writeln!(out, " adj_error: {:.4}", self.adjusted_error)
    }
}

pub struct StatusReporter<'a, T, D, W> {
    signals: &'a SignalState,
    telemetry: &'a T,
    display: D,
    serial: W,
    state: ReporterState,
    text: String<SERIAL_BUFFER>,
}

impl<'a, T, D, W> StatusReporter<'a, T, D, W>
where
    T: MotorTelemetry,
    D: StatusDisplay,
    W: Write,
{
    pub fn new(signals: &'a SignalState, telemetry: &'a T, display: D, serial: W) -> Self {
        Self {
            signals,
            telemetry,
            display,
            serial,
            state: ReporterState::Waiting,
            text: String::new(),
        }
    }

    pub fn state(&self) -> ReporterState {
        self.state
    }

    /// Wait for a status request, then report once
    pub async fn wait_and_report<M: RawMutex>(
        &mut self,
        request: &Signal<M, ()>,
    ) -> Result<StatusReport, ReportError> {
        self.state = ReporterState::Waiting;
        request.wait().await;
        self.report().await
    }

    /// Capture and write one report
    ///
    /// The serial block is still written when the display fails; the first
    /// error is returned.
    pub async fn report(&mut self) -> Result<StatusReport, ReportError> {
        self.state = ReporterState::Reporting;
        let report = StatusReport::capture(self.signals, self.telemetry);

        let display = self
            .display
            .print_status(&report)
            .await
            .map_err(|_| ReportError::Display);
        let serial = self.write_serial(&report).await;

        self.state = ReporterState::Waiting;
        display.and(serial).map(|()| report)
    }

    async fn write_serial(&mut self, report: &StatusReport) -> Result<(), ReportError> {
        self.text.clear();
        report
            .write_serial(&mut self.text)
            .map_err(|_| ReportError::Format)?;
        self.serial
            .write_all(self.text.as_bytes())
            .await
            .map_err(|_| ReportError::Serial)
    }
}
