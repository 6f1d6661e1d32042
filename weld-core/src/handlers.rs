//! Edge handlers
//!
//! One handler per physical input. Each owns the write handle for the flag it
//! is responsible for and the outputs it drives, so its write set is exactly
//! its fields. Handlers run to completion in bounded time: no I/O, no
//! logging, no waiting.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;

use crate::indicator::{BlinkTimer, LedMode};
use crate::pins::drive;
use crate::state::{MotorRequest, SteadyFlag, WeldLatch};

/// Motor start/stop button
///
/// Writes `motor_requested` and pulses the steady-state reset line.
pub struct MotorButton<'a, P> {
    request: MotorRequest<'a>,
    steady_reset: P,
}

impl<'a, P> MotorButton<'a, P>
where
    P: OutputPin<Error = Infallible>,
{
    /// Reset line idles high
    pub fn new(request: MotorRequest<'a>, mut steady_reset: P) -> Self {
        drive(&mut steady_reset, true);
        Self {
            request,
            steady_reset,
        }
    }

    /// Toggle the motor request and re-arm the steady-state detector
    ///
    /// Returns the new request value.
    pub fn on_rising_edge(&mut self) -> bool {
        let requested = self.request.toggle();
        drive(&mut self.steady_reset, false);
        drive(&mut self.steady_reset, true);
        requested
    }
}

/// Weld start button
///
/// Writes `weld_active`; reads `motor_requested` and `motor_steady`.
pub struct WeldButton<'a> {
    latch: WeldLatch<'a>,
}

impl<'a> WeldButton<'a> {
    pub fn new(latch: WeldLatch<'a>) -> Self {
        Self { latch }
    }

    /// Start a weld if the motor is requested and steady and no weld is
    /// running; otherwise force the weld off
    ///
    /// Returns the new weld state.
    pub fn on_rising_edge(&mut self) -> bool {
        let signals = self.latch.signals();
        let fire = signals.motor_requested() && signals.motor_steady() && !self.latch.is_active();
        self.latch.set(fire);
        fire
    }
}

/// Steady-state trigger and the motor LED blink ticker
///
/// Writes `motor_steady`, drives the motor LED and owns the blink ticker
/// state. The caller keeps its timer in line with [`Self::blink_timer`].
pub struct SteadyMonitor<'a, L> {
    steady: SteadyFlag<'a>,
    led: L,
    lit: bool,
    blink: BlinkTimer,
}

impl<'a, L> SteadyMonitor<'a, L>
where
    L: OutputPin<Error = Infallible>,
{
    /// LED off, blink ticker armed
    pub fn new(steady: SteadyFlag<'a>, mut led: L) -> Self {
        drive(&mut led, false);
        Self {
            steady,
            led,
            lit: false,
            blink: BlinkTimer::Armed,
        }
    }

    pub fn blink_timer(&self) -> BlinkTimer {
        self.blink
    }

    pub fn led_lit(&self) -> bool {
        self.lit
    }

    /// Motor reached steady state: stop blinking, LED solid
    pub fn on_rising_edge(&mut self) {
        self.blink = BlinkTimer::Disarmed;
        self.set_led(true);
        self.steady.set(true);
    }

    /// Motor left steady state: arm the blink ticker
    ///
    /// Arming an armed ticker keeps a single ticker; the caller restarts its
    /// period.
    pub fn on_falling_edge(&mut self) {
        self.blink = BlinkTimer::Armed;
    }

    /// One blink period elapsed
    ///
    /// Ticks that arrive while disarmed are ignored.
    pub fn on_blink_tick(&mut self) {
        if !self.blink.is_armed() {
            return;
        }

        self.steady.set(false);
        match LedMode::project(&self.steady.signals().snapshot()) {
            LedMode::Blinking => self.set_led(!self.lit),
            LedMode::Solid => self.set_led(true),
            LedMode::Off => self.set_led(false),
        }
    }

    fn set_led(&mut self, lit: bool) {
        self.lit = lit;
        drive(&mut self.led, lit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::BlinkSlot;
    use crate::pins::mock::MockPin;
    use crate::state::SignalState;

    #[test]
    fn test_motor_button_toggles_and_pulses() {
        let signals = SignalState::new();
        let writers = signals.take_writers().unwrap();
        let reset = MockPin::default();
        let mut button = MotorButton::new(writers.motor, reset.clone());
        assert_eq!(reset.history(), vec![true]);
        reset.clear();

        assert!(button.on_rising_edge());
        assert!(signals.motor_requested());
        assert_eq!(reset.history(), vec![false, true]);
    }

    #[test]
    fn test_double_press_restores_request() {
        let signals = SignalState::new();
        let writers = signals.take_writers().unwrap();
        let reset = MockPin::default();
        let mut button = MotorButton::new(writers.motor, reset.clone());
        reset.clear();

        button.on_rising_edge();
        button.on_rising_edge();

        assert!(!signals.motor_requested());
        // Two pulses, each low then high
        assert_eq!(reset.history(), vec![false, true, false, true]);
    }

    #[test]
    fn test_weld_refused_without_motor() {
        let signals = SignalState::new();
        let writers = signals.take_writers().unwrap();
        let mut weld = WeldButton::new(writers.weld);

        assert!(!weld.on_rising_edge());
        assert!(!signals.weld_active());
    }

    #[test]
    fn test_weld_refused_while_unsteady() {
        let signals = SignalState::new();
        let mut writers = signals.take_writers().unwrap();
        writers.motor.toggle();
        let mut weld = WeldButton::new(writers.weld);

        assert!(!weld.on_rising_edge());
        assert!(!signals.weld_active());
    }

    #[test]
    fn test_weld_single_shot_toggle() {
        let signals = SignalState::new();
        let mut writers = signals.take_writers().unwrap();
        writers.motor.toggle();
        writers.steady.set(true);
        let mut weld = WeldButton::new(writers.weld);

        assert!(weld.on_rising_edge());
        assert!(signals.weld_active());

        // Same guards, second press stops the weld
        assert!(!weld.on_rising_edge());
        assert!(!signals.weld_active());
    }

    #[test]
    fn test_weld_forced_off_when_guard_fails() {
        let signals = SignalState::new();
        let mut writers = signals.take_writers().unwrap();
        writers.motor.toggle();
        writers.steady.set(true);
        let mut weld = WeldButton::new(writers.weld);
        weld.on_rising_edge();

        writers.steady.set(false);
        assert!(!weld.on_rising_edge());
        assert!(!signals.weld_active());
    }

    #[test]
    fn test_steady_rise_disarms_and_lights() {
        let signals = SignalState::new();
        let writers = signals.take_writers().unwrap();
        let led = MockPin::default();
        let mut monitor = SteadyMonitor::new(writers.steady, led.clone());
        assert!(monitor.blink_timer().is_armed());
        assert!(!led.is_high());

        monitor.on_rising_edge();

        assert_eq!(monitor.blink_timer(), BlinkTimer::Disarmed);
        assert!(led.is_high());
        assert!(signals.motor_steady());
    }

    #[test]
    fn test_blink_tick_clears_steady_and_toggles() {
        let signals = SignalState::new();
        let mut writers = signals.take_writers().unwrap();
        writers.motor.toggle();
        let led = MockPin::default();
        let mut monitor = SteadyMonitor::new(writers.steady, led.clone());
        monitor.on_rising_edge();
        monitor.on_falling_edge();

        // Still steady until the first tick
        assert!(signals.motor_steady());

        monitor.on_blink_tick();
        assert!(!signals.motor_steady());
        assert!(!led.is_high());

        monitor.on_blink_tick();
        assert!(led.is_high());

        monitor.on_blink_tick();
        assert!(!led.is_high());
    }

    #[test]
    fn test_blink_tick_forces_led_off_without_request() {
        let signals = SignalState::new();
        let writers = signals.take_writers().unwrap();
        let led = MockPin::default();
        let mut monitor = SteadyMonitor::new(writers.steady, led.clone());
        monitor.on_rising_edge();
        monitor.on_falling_edge();

        for _ in 0..3 {
            monitor.on_blink_tick();
            assert!(!led.is_high());
        }
        assert!(!signals.motor_steady());
    }

    #[test]
    fn test_stale_tick_ignored_when_disarmed() {
        let signals = SignalState::new();
        let mut writers = signals.take_writers().unwrap();
        writers.motor.toggle();
        let led = MockPin::default();
        let mut monitor = SteadyMonitor::new(writers.steady, led.clone());
        monitor.on_rising_edge();

        monitor.on_blink_tick();

        assert!(signals.motor_steady());
        assert!(led.is_high());
    }

    #[test]
    fn test_blink_ticker_follows_steady_edges() {
        let signals = SignalState::new();
        let mut writers = signals.take_writers().unwrap();
        writers.motor.toggle();
        let mut monitor = SteadyMonitor::new(writers.steady, MockPin::default());

        let mut started = 0;
        let mut start = || {
            started += 1;
            started
        };
        let mut blink = BlinkSlot::new(monitor.blink_timer(), &mut start);
        assert_eq!(blink.ticker().copied(), Some(1));

        // Falling edge while armed: the one ticker is replaced
        monitor.on_falling_edge();
        blink.follow(monitor.blink_timer(), &mut start);
        assert_eq!(blink.ticker().copied(), Some(2));

        monitor.on_rising_edge();
        blink.follow(monitor.blink_timer(), &mut start);
        assert_eq!(blink.ticker(), None);

        monitor.on_falling_edge();
        blink.follow(monitor.blink_timer(), &mut start);
        assert_eq!(blink.ticker().copied(), Some(3));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone, Copy)]
        enum Input {
            MotorEdge,
            WeldEdge,
            SteadyRise,
            SteadyFall,
            BlinkTick,
        }

        fn input() -> impl Strategy<Value = Input> {
            prop_oneof![
                Just(Input::MotorEdge),
                Just(Input::WeldEdge),
                Just(Input::SteadyRise),
                Just(Input::SteadyFall),
                Just(Input::BlinkTick),
            ]
        }

        proptest! {
            #[test]
            fn weld_only_starts_when_guarded(inputs in proptest::collection::vec(input(), 0..64)) {
                let signals = SignalState::new();
                let writers = signals.take_writers().unwrap();
                let mut motor = MotorButton::new(writers.motor, MockPin::default());
                let mut weld = WeldButton::new(writers.weld);
                let mut steady = SteadyMonitor::new(writers.steady, MockPin::default());

                for input in inputs {
                    let before = signals.snapshot();
                    match input {
                        Input::MotorEdge => { motor.on_rising_edge(); }
                        Input::WeldEdge => { weld.on_rising_edge(); }
                        Input::SteadyRise => steady.on_rising_edge(),
                        Input::SteadyFall => steady.on_falling_edge(),
                        Input::BlinkTick => steady.on_blink_tick(),
                    }
                    let after = signals.snapshot();

                    if after.weld_active && !before.weld_active {
                        prop_assert!(matches!(input, Input::WeldEdge));
                        prop_assert!(before.motor_requested && before.motor_steady);
                    }
                }
            }

            #[test]
            fn double_motor_edge_is_identity(
                prefix in proptest::collection::vec(any::<bool>(), 0..16)
            ) {
                let signals = SignalState::new();
                let writers = signals.take_writers().unwrap();
                let reset = MockPin::default();
                let mut motor = MotorButton::new(writers.motor, reset.clone());
                for press in prefix {
                    if press {
                        motor.on_rising_edge();
                    }
                }

                let original = signals.motor_requested();
                reset.clear();
                motor.on_rising_edge();
                motor.on_rising_edge();

                prop_assert_eq!(signals.motor_requested(), original);
                prop_assert_eq!(reset.history(), vec![false, true, false, true]);
            }

            #[test]
            fn led_follows_projection(inputs in proptest::collection::vec(input(), 1..64)) {
                let signals = SignalState::new();
                let writers = signals.take_writers().unwrap();
                let led = MockPin::default();
                let mut motor = MotorButton::new(writers.motor, MockPin::default());
                let mut steady = SteadyMonitor::new(writers.steady, led.clone());

                for input in inputs {
                    match input {
                        Input::MotorEdge => { motor.on_rising_edge(); }
                        Input::WeldEdge => {}
                        Input::SteadyRise => steady.on_rising_edge(),
                        Input::SteadyFall => steady.on_falling_edge(),
                        Input::BlinkTick => steady.on_blink_tick(),
                    }

                    // Solid whenever steady
                    if LedMode::project(&signals.snapshot()) == LedMode::Solid {
                        prop_assert!(led.is_high());
                    }
                }

                // Once the ticker has fired, the LED settles on the
                // projection of the flags
                steady.on_falling_edge();
                steady.on_blink_tick();
                let snapshot = signals.snapshot();
                match LedMode::project(&snapshot) {
                    LedMode::Off => prop_assert!(!led.is_high()),
                    LedMode::Blinking => {
                        let phase = led.is_high();
                        steady.on_blink_tick();
                        prop_assert_eq!(led.is_high(), !phase);
                    }
                    LedMode::Solid => prop_assert!(false, "steady after a blink tick"),
                }
            }
        }
    }
}
