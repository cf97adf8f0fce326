mod digital_in;
mod digital_out;
mod pulse_timer;
pub mod simulated;

use std::ops::Not;

pub use{
    digital_in::*,
    digital_out::*,
    pulse_timer::*,
};

/// Logic level of a digital line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    fn from(value: bool) -> Self {
        if value { Level::High } else { Level::Low }
    }
}

impl From<Level> for bool {
    fn from(value: Level) -> Self {
        value == Level::High
    }
}

/// A board able to hand out pins by number, together with the timing primitives
/// needed to drive them.
///
/// Each pin can only be taken once until it is released. Rejections are reported as the error of the
/// requested pin kind so callers can tell which side of the wiring failed.
pub trait GpioPlatform {
    type Output: DigitalOutput;
    type Input: DigitalInput;
    type Timer: PulseTimer<Input = Self::Input>;

    /// Configures the pin with number `pin_num` as an output with no pull resistor.
    ///
    /// # Errors
    ///
    /// - `DigitalOutError::InvalidPeripheral`: If the pin does not exist or has already been taken.
    /// - `DigitalOutError::CannotSetPinAsOutput`: If the pin cannot drive an output.
    fn set_pin_as_digital_out(&mut self, pin_num: usize) -> Result<Self::Output, DigitalOutError>;

    /// Configures the pin with number `pin_num` as an input with no pull resistor.
    ///
    /// # Errors
    ///
    /// - `DigitalInError::InvalidPeripheral`: If the pin does not exist or has already been taken.
    /// - `DigitalInError::CannotSetPinAsInput`: If the pin cannot be read.
    /// - `DigitalInError::CannotSetPullForPin`: If the pull resistor cannot be disabled.
    fn set_pin_as_digital_in(&mut self, pin_num: usize) -> Result<Self::Input, DigitalInError>;

    /// Returns a timer able to delay and to measure pulses on this platform inputs.
    fn get_pulse_timer(&mut self) -> Self::Timer;

    /// Gives back the pin with number `pin_num` so it can be configured again. The
    /// handle obtained for it must already be dropped. A pin whose configuration fails
    /// is given back by the platform itself.
    fn release_pin(&mut self, pin_num: usize);
}
