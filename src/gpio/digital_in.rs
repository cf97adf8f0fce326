use thiserror::Error;

use crate::microcontroller_src::peripherals::PeripheralError;

use super::Level;

/// Enums the different errors possible when working with the digital in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DigitalInError {
    #[error("the pin cannot be set as an input")]
    CannotSetPinAsInput,
    #[error("the pull of the pin cannot be changed")]
    CannotSetPullForPin,
    #[error("invalid peripheral: {0}")]
    InvalidPeripheral(PeripheralError),
    #[error("the pin level could not be read")]
    InvalidPin,
}

/// A digital input line, configured as input with no pull resistor.
///
/// Platforms hand these out through [super::GpioPlatform::set_pin_as_digital_in]
pub trait DigitalInput {
    /// Gets the current level of the pin.
    fn get_level(&self) -> Level;
}

impl From<PeripheralError> for DigitalInError {
    fn from(value: PeripheralError) -> Self {
        DigitalInError::InvalidPeripheral(value)
    }
}
