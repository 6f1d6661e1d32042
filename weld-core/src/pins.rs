use core::convert::Infallible;

use embedded_hal::digital::{OutputPin, PinState};

/// Drive an output whose writes cannot fail
pub(crate) fn drive<P>(pin: &mut P, high: bool)
where
    P: OutputPin<Error = Infallible>,
{
    pin.set_state(PinState::from(high))
        .unwrap_or_else(|never| match never {});
}
