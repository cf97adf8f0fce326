use thiserror::Error;

use super::{DigitalInError, Level};

/// The two moments a pulse measurement can run out of time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseTimeout {
    /// The line never reached the awaited level
    WaitingForLevel,
    /// The line reached the level but did not leave it in time
    DuringPulse,
}

/// Enums the different errors possible when measuring a pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PulseError {
    #[error("pulse measurement timed out ({0:?})")]
    Timeout(PulseTimeout),
    #[error("echo pin failure: {0}")]
    Pin(DigitalInError),
}

/// Timing primitives needed to drive a trigger/echo exchange.
///
/// Every call blocks the calling thread, there is no cancellation.
pub trait PulseTimer {
    /// Input line type the timer knows how to watch
    type Input;

    /// Blocks the calling thread for `micros` microseconds.
    fn delay_us(&mut self, micros: u32);

    /// Longest timeout, in microseconds, accepted by [PulseTimer::time_pulse_us]
    fn max_timeout_us(&self) -> u32;

    /// Waits for `input` to reach `level` and measures how long it stays there.
    ///
    /// # Arguments
    ///
    /// - `input`: The line to watch.
    /// - `level`: The level whose duration is measured.
    /// - `timeout_us`: Bound, in microseconds, for both the wait and the pulse itself.
    ///
    /// # Returns
    ///
    /// A `Result` with the pulse duration in microseconds.
    ///
    /// # Errors
    ///
    /// - `PulseError::Timeout`: If the level was not reached, or not left, within `timeout_us`.
    /// - `PulseError::Pin`: If the line could not be read.
    fn time_pulse_us(
        &mut self,
        input: &mut Self::Input,
        level: Level,
        timeout_us: u32,
    ) -> Result<u32, PulseError>;
}

impl From<DigitalInError> for PulseError {
    fn from(value: DigitalInError) -> Self {
        PulseError::Pin(value)
    }
}
