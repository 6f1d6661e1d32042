//! Shared signal state
//!
//! [`SignalState`] is the one record every context of the firmware looks at:
//! the edge handlers, the blink ticker, the supervisor and the status
//! reporter. Each field is a single atomic word, so a read never observes a
//! torn value and no lock is needed.
//!
//! Writes go through handles obtained once from [`SignalState::take_writers`].
//! There is exactly one handle per field and none of them is `Clone`, so the
//! set of places that can change a flag is fixed by ownership.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

// Single core, and no field is derived from another under a lock, so every
// access only needs to be atomic, not ordered.
const LOAD: Ordering = Ordering::Relaxed;
const STORE: Ordering = Ordering::Relaxed;

/// Process-wide signal flags
pub struct SignalState {
    motor_requested: AtomicBool,
    motor_steady: AtomicBool,
    weld_active: AtomicBool,
    /// `f32` bits of the speed reference in [0, 1]
    speed_reference: AtomicU32,
    writers_taken: AtomicBool,
}

/// Point-in-time copy of all signal fields
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    pub motor_requested: bool,
    pub motor_steady: bool,
    pub weld_active: bool,
    pub speed_reference: f32,
}

impl Default for SignalState {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalState {
    /// All flags false, speed reference zero
    pub const fn new() -> Self {
        Self {
            motor_requested: AtomicBool::new(false),
            motor_steady: AtomicBool::new(false),
            weld_active: AtomicBool::new(false),
            // 0.0f32 has an all-zero bit pattern
            speed_reference: AtomicU32::new(0),
            writers_taken: AtomicBool::new(false),
        }
    }

    pub fn motor_requested(&self) -> bool {
        self.motor_requested.load(LOAD)
    }

    pub fn motor_steady(&self) -> bool {
        self.motor_steady.load(LOAD)
    }

    pub fn weld_active(&self) -> bool {
        self.weld_active.load(LOAD)
    }

    pub fn speed_reference(&self) -> f32 {
        f32::from_bits(self.speed_reference.load(LOAD))
    }

    /// Read every field once
    ///
    /// Fields are read one after another, so an edge handler may run in
    /// between. Each value is still one that was actually written.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            motor_requested: self.motor_requested(),
            motor_steady: self.motor_steady(),
            weld_active: self.weld_active(),
            speed_reference: self.speed_reference(),
        }
    }

    /// Hand out the write handles
    ///
    /// Returns `None` on every call after the first.
    pub fn take_writers(&self) -> Option<Writers<'_>> {
        if self.writers_taken.swap(true, Ordering::AcqRel) {
            return None;
        }

        Some(Writers {
            motor: MotorRequest { signals: self },
            weld: WeldLatch { signals: self },
            steady: SteadyFlag { signals: self },
            speed: SpeedReference { signals: self },
        })
    }
}

/// The full set of write handles, one per field
pub struct Writers<'a> {
    pub motor: MotorRequest<'a>,
    pub weld: WeldLatch<'a>,
    pub steady: SteadyFlag<'a>,
    pub speed: SpeedReference<'a>,
}

/// Sole writer of `motor_requested`
pub struct MotorRequest<'a> {
    signals: &'a SignalState,
}

impl<'a> MotorRequest<'a> {
    /// Flip the motor request and return the new value
    pub fn toggle(&mut self) -> bool {
        !self.signals.motor_requested.fetch_xor(true, Ordering::AcqRel)
    }

    pub fn signals(&self) -> &'a SignalState {
        self.signals
    }
}

/// Sole writer of `weld_active`
pub struct WeldLatch<'a> {
    signals: &'a SignalState,
}

impl<'a> WeldLatch<'a> {
    pub fn set(&mut self, active: bool) {
        self.signals.weld_active.store(active, STORE);
    }

    pub fn is_active(&self) -> bool {
        self.signals.weld_active()
    }

    pub fn signals(&self) -> &'a SignalState {
        self.signals
    }
}

/// Sole writer of `motor_steady`
pub struct SteadyFlag<'a> {
    signals: &'a SignalState,
}

impl<'a> SteadyFlag<'a> {
    pub fn set(&mut self, steady: bool) {
        self.signals.motor_steady.store(steady, STORE);
    }

    pub fn signals(&self) -> &'a SignalState {
        self.signals
    }
}

/// Sole writer of `speed_reference`
pub struct SpeedReference<'a> {
    signals: &'a SignalState,
}

impl SpeedReference<'_> {
    /// Store a new reference, clamped to [0, 1]
    ///
    /// A NaN sample is stored as zero.
    pub fn set(&mut self, fraction: f32) {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.signals
            .speed_reference
            .store(fraction.to_bits(), STORE);
    }
}
