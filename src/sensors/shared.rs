use crate::{
    gpio::{DigitalOutput, PulseTimer},
    sensors::{AirTemperature, HCSR04Error, RangeSensor},
    utils::auxiliary::{SharableRef, SharableRefExt},
};

/// Cloneable handle to a [RangeSensor] that can be used from several threads.
///
/// A trigger/echo exchange cannot overlap with another one on the same sensor, so every
/// measurement holds the lock for the whole exchange. Callers are served one at a time.
pub struct SharedRangeSensor<O, I, T> {
    inner: SharableRef<RangeSensor<O, I, T>>,
}

impl<O, I, T> Clone for SharedRangeSensor<O, I, T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<O, I, T> SharedRangeSensor<O, I, T>
where
    O: DigitalOutput,
    T: PulseTimer<Input = I>,
{
    pub fn new(sensor: RangeSensor<O, I, T>) -> Self {
        Self { inner: SharableRef::new_sharable(sensor) }
    }

    /// See [RangeSensor::measure_pulse_duration]
    pub fn measure_pulse_duration(&self) -> Result<u32, HCSR04Error> {
        self.inner.lock_inner().measure_pulse_duration()
    }

    /// See [RangeSensor::distance_millimeters]
    pub fn distance_millimeters(&self) -> Result<f64, HCSR04Error> {
        self.inner.lock_inner().distance_millimeters()
    }

    /// See [RangeSensor::distance_centimeters]
    pub fn distance_centimeters(&self) -> Result<f64, HCSR04Error> {
        self.inner.lock_inner().distance_centimeters()
    }

    pub fn air_temperature(&self) -> AirTemperature {
        self.inner.lock_inner().air_temperature()
    }
}

impl<O, I, T> From<RangeSensor<O, I, T>> for SharedRangeSensor<O, I, T>
where
    O: DigitalOutput,
    T: PulseTimer<Input = I>,
{
    fn from(sensor: RangeSensor<O, I, T>) -> Self {
        Self::new(sensor)
    }
}

#[cfg(test)]
mod test {
    use std::thread;

    use crate::{
        gpio::simulated::{Echo, SimEvent, SimulatedMicrocontroller},
        sensors::RangeSensorConfig,
    };

    use super::*;

    const THREADS: usize = 4;
    const MEASUREMENTS_PER_THREAD: usize = 5;

    #[test]
    fn test0_concurrent_measurements_do_not_interleave() {
        let mut micro = SimulatedMicrocontroller::new();
        let sensor = RangeSensor::new(&mut micro, 5, 6, RangeSensorConfig::default()).unwrap();
        for _ in 0..THREADS * MEASUREMENTS_PER_THREAD {
            micro.script_echo(6, Echo::Pulse(1000));
        }
        micro.clear_events();
        let shared = SharedRangeSensor::new(sensor);

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..MEASUREMENTS_PER_THREAD {
                        assert_eq!(shared.measure_pulse_duration(), Ok(1000));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let events = micro.events();
        assert_eq!(events.len(), THREADS * MEASUREMENTS_PER_THREAD * 6);
        for exchange in events.chunks(6) {
            assert_eq!(exchange[1], SimEvent::Delay(5));
            assert_eq!(exchange[3], SimEvent::Delay(10));
            assert!(matches!(exchange[5], SimEvent::PulseMeasured { pin: 6, .. }));
        }
    }

    #[test]
    fn test1_shared_sensor_reports_out_of_range() {
        let mut micro = SimulatedMicrocontroller::new();
        let sensor = RangeSensor::new(&mut micro, 5, 6, RangeSensorConfig::default()).unwrap();
        let shared = SharedRangeSensor::from(sensor);
        assert_eq!(shared.distance_centimeters(), Err(HCSR04Error::OutOfRange));
        assert_eq!(shared.air_temperature(), AirTemperature::default());
    }
}
