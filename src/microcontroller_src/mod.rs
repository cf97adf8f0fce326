#[cfg(feature = "esp32")]
pub mod microcontroller;
pub mod peripherals;
#[cfg(feature = "esp32")]
pub use self::microcontroller::{DigitalIn, DigitalOut, EspPulseTimer, EspRangeSensor, Microcontroller};
