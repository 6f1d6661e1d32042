//! Motor LED states
//!
//! The motor LED is a projection of the signal flags: solid when the motor is
//! steady, blinking while it is requested but not yet steady, off otherwise.

use crate::state::Snapshot;

/// What the motor LED should be showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedMode {
    Off,
    Solid,
    Blinking,
}

impl LedMode {
    pub fn project(snapshot: &Snapshot) -> Self {
        if snapshot.motor_steady {
            LedMode::Solid
        } else if snapshot.motor_requested {
            LedMode::Blinking
        } else {
            LedMode::Off
        }
    }
}

/// The blink ticker, as a resource that is either attached or not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkTimer {
    /// Ticking every blink period
    #[default]
    Armed,
    /// Detached while the motor is steady
    Disarmed,
}

impl BlinkTimer {
    pub fn is_armed(self) -> bool {
        self == BlinkTimer::Armed
    }
}

/// Holder for the blink ticker itself
///
/// Holds at most one ticker, present exactly while the timer is armed.
#[derive(Debug)]
pub struct BlinkSlot<T> {
    ticker: Option<T>,
}

impl<T> BlinkSlot<T> {
    pub fn new(timer: BlinkTimer, start: impl FnOnce() -> T) -> Self {
        Self {
            ticker: timer.is_armed().then(start),
        }
    }

    /// Match the slot to the timer after an input edge
    ///
    /// An armed timer always gets a fresh ticker in place of the old one, so
    /// an edge restarts the blink period.
    pub fn follow(&mut self, timer: BlinkTimer, start: impl FnOnce() -> T) {
        self.ticker = timer.is_armed().then(start);
    }

    pub fn ticker(&mut self) -> Option<&mut T> {
        self.ticker.as_mut()
    }
}
