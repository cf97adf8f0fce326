use thiserror::Error;

use crate::microcontroller_src::peripherals::PeripheralError;

use super::Level;

/// Enums the different errors possible when working with the digital out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DigitalOutError {
    #[error("the pin cannot be set as an output")]
    CannotSetPinAsOutput,
    #[error("the pin level could not be written")]
    InvalidPin,
    #[error("invalid peripheral: {0}")]
    InvalidPeripheral(PeripheralError),
}

/// A digital output line, configured as output with no pull resistor.
///
/// Platforms hand these out through [super::GpioPlatform::set_pin_as_digital_out]
pub trait DigitalOutput {
    /// Sets the pin level to either `High` or `Low`.
    ///
    /// # Errors
    ///
    /// - `DigitalOutError::InvalidPin`: If the pin level cannot be set.
    fn set_level(&mut self, level: Level) -> Result<(), DigitalOutError>;

    /// Sets the pin level to `High`.
    fn set_high(&mut self) -> Result<(), DigitalOutError> {
        self.set_level(Level::High)
    }

    /// Sets the pin level to `Low`.
    fn set_low(&mut self) -> Result<(), DigitalOutError> {
        self.set_level(Level::Low)
    }
}

impl From<PeripheralError> for DigitalOutError {
    fn from(value: PeripheralError) -> Self {
        DigitalOutError::InvalidPeripheral(value)
    }
}
