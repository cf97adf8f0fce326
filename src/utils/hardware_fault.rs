use thiserror::Error;

use crate::gpio::{DigitalInError, DigitalOutError};

/// Any failure reported by the pin or timing layer that is not a measurement timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HardwareFault {
    #[error("digital out: {0}")]
    DigitalOutError(#[from] DigitalOutError),
    #[error("digital in: {0}")]
    DigitalInError(#[from] DigitalInError),
    #[error("echo timeout of {0}us is not supported by the pulse timer")]
    InvalidEchoTimeout(u32),
}
