//! Example using the HC-SR04 sensor with the trigger on GPIO5 and the echo on GPIO6.
//! It asks every second for the distance of the object in front.

use esp_idf_svc::hal::delay::FreeRtos;
use hcsr04::{
    sensors::{HCSR04Error, RangeSensor, RangeSensorConfig},
    EspRangeSensor, Microcontroller,
};

fn main() {
    esp_idf_svc::log::EspLogger::initialize_default();

    let mut micro = Microcontroller::new();
    let config = RangeSensorConfig::default().with_air_temperature_c(24.0);
    let mut sensor: EspRangeSensor = RangeSensor::new(&mut micro, 5, 6, config).unwrap();

    loop {
        match sensor.distance_centimeters() {
            Ok(distance) => log::info!("{distance} cm"),
            Err(HCSR04Error::OutOfRange) => log::info!("Nothing in range"),
            Err(err) => log::error!("{err}"),
        }
        FreeRtos::delay_ms(1000);
    }
}
