//! Motor telemetry
//!
//! The encoder task turns counter samples into a speed with
//! [`SpeedEstimator`] and publishes it into a [`TelemetryCell`] together with
//! the tracking error. The supervisor publishes the duty it commands. The
//! status reporter reads all of it through [`MotorTelemetry`].

use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::EncoderConfig;
use crate::traits::MotorTelemetry;

/// Latest telemetry values, each an `f32` in an atomic word
///
/// Speed, error and adjusted error are written by the encoder task only;
/// compensation by the supervisor only.
pub struct TelemetryCell {
    speed: AtomicU32,
    compensation: AtomicU32,
    error: AtomicU32,
    adjusted_error: AtomicU32,
}

impl Default for TelemetryCell {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryCell {
    pub const fn new() -> Self {
        Self {
            speed: AtomicU32::new(0),
            compensation: AtomicU32::new(0),
            error: AtomicU32::new(0),
            adjusted_error: AtomicU32::new(0),
        }
    }

    /// Publish a speed sample and its tracking error
    pub fn record_speed(&self, speed_rpm: f32, tracking: TrackingError) {
        store(&self.speed, speed_rpm);
        store(&self.error, tracking.error_rpm);
        store(&self.adjusted_error, tracking.adjusted);
    }

    /// Publish the duty applied to the motor
    pub fn record_compensation(&self, duty: f32) {
        store(&self.compensation, duty);
    }
}

impl MotorTelemetry for TelemetryCell {
    fn speed(&self) -> f32 {
        load(&self.speed)
    }

    fn compensation(&self) -> f32 {
        load(&self.compensation)
    }

    fn error(&self) -> f32 {
        load(&self.error)
    }

    fn adjusted_error(&self) -> f32 {
        load(&self.adjusted_error)
    }
}

fn store(cell: &AtomicU32, value: f32) {
    cell.store(value.to_bits(), Ordering::Relaxed);
}

fn load(cell: &AtomicU32) -> f32 {
    f32::from_bits(cell.load(Ordering::Relaxed))
}

/// Difference between the requested and the measured speed
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrackingError {
    /// Setpoint minus speed, in rpm
    pub error_rpm: f32,
    /// Error as a fraction of rated speed, clamped to [-1, 1]
    pub adjusted: f32,
}

/// Tracking error of a measured speed against a normalized reference
pub fn tracking_error(reference: f32, speed_rpm: f32, rated_rpm: f32) -> TrackingError {
    let setpoint_rpm = reference * rated_rpm;
    let error_rpm = setpoint_rpm - speed_rpm;
    let adjusted = if rated_rpm > 0.0 {
        (error_rpm / rated_rpm).clamp(-1.0, 1.0)
    } else {
        0.0
    };

    TrackingError {
        error_rpm,
        adjusted,
    }
}

/// Speed from a free-running 16-bit encoder counter
#[derive(Debug, Clone)]
pub struct SpeedEstimator {
    counts_per_rev: u32,
    sample_ms: u64,
    last_count: Option<u16>,
}

impl SpeedEstimator {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            counts_per_rev: config.counts_per_rev,
            sample_ms: config.sample_ms,
            last_count: None,
        }
    }

    /// Feed one counter sample taken one period after the previous one
    ///
    /// Returns the speed in rpm, or `None` for the very first sample. The
    /// counter may wrap between samples as long as the motor moves less
    /// than half the counter range per period.
    pub fn sample(&mut self, count: u16) -> Option<f32> {
        let last = self.last_count.replace(count)?;
        if self.counts_per_rev == 0 || self.sample_ms == 0 {
            return Some(0.0);
        }

        let delta = count.wrapping_sub(last) as i16;
        let revs = delta as f32 / self.counts_per_rev as f32;
        let minutes = self.sample_ms as f32 / 60_000.0;
        Some(revs / minutes)
    }
}
