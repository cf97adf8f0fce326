//! Example running the HC-SR04 driver against the simulated board, with an object
//! getting closer on every measurement until it leaves the sensor range.

use hcsr04::{
    gpio::simulated::{Echo, SimulatedMicrocontroller},
    sensors::{HCSR04Error, RangeSensor, RangeSensorConfig, TimeoutPolicy},
};

const TRIGGER_PIN: usize = 5;
const ECHO_PIN: usize = 6;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let mut micro = SimulatedMicrocontroller::new();
    for distance_mm in [3000.0, 1500.0, 750.0, 100.0] {
        micro.script_echo(ECHO_PIN as u8, Echo::Object { distance_mm, air_temperature_c: 20.0 });
    }
    micro.script_echo(ECHO_PIN as u8, Echo::Silence);

    let mut sensor = RangeSensor::new(&mut micro, TRIGGER_PIN, ECHO_PIN, RangeSensorConfig::default())
        .expect("Error creating the sensor");

    loop {
        match sensor.distance_centimeters() {
            Ok(distance) => println!("{distance} cm"),
            Err(HCSR04Error::OutOfRange) => {
                println!("Nothing in range");
                break;
            }
            Err(err) => panic!("{err}"),
        }
    }

    let config = RangeSensorConfig::default().with_timeout_policy(TimeoutPolicy::Saturate);
    let (trigger, echo, timer) = sensor.release();
    let mut saturating = RangeSensor::from_parts(trigger, echo, timer, config)
        .expect("Error creating the sensor");
    println!("Saturated reading: {} cm", saturating.distance_centimeters().unwrap());
}
