//! Driver for HC-SR04 class ultrasonic distance sensors.
//!
//! The sensor is triggered with a 10us pulse and answers with an echo pulse as long as
//! the round trip of the sonic burst. [sensors::RangeSensor] turns that pulse into a
//! distance, correcting the speed of sound with the air temperature.
//!
//! Pins and timing come from a [gpio::GpioPlatform]. The ESP32-C6 platform is available
//! with the `esp32` feature, [gpio::simulated] provides one for host tests.

mod utils;
mod microcontroller_src;

pub mod gpio;
pub mod sensors;

#[cfg(feature = "esp32")]
pub use microcontroller_src::{DigitalIn, DigitalOut, EspPulseTimer, EspRangeSensor, Microcontroller};
pub use microcontroller_src::peripherals::PeripheralError;
pub use utils::hardware_fault::HardwareFault;
