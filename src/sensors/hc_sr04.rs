use thiserror::Error;

use crate::{
    gpio::{DigitalOutput, GpioPlatform, Level, PulseError, PulseTimer},
    sensors::air_temperature::{AirTemperature, DEFAULT_AIR_TEMPERATURE_C},
    utils::hardware_fault::HardwareFault,
};

/// Nominal maximum range of the sensor used for saturated readings. The datasheet says
/// 400cm but readings up to ~460cm are commonly seen.
pub const MAX_RANGE_CM: u32 = 500;
/// Time sound takes to travel one centimeter through air, in microseconds
pub const MICROS_PER_CM: f64 = 29.1;
/// Pulse reported by [TimeoutPolicy::Saturate] when no echo arrives, the round trip to
/// an object at [MAX_RANGE_CM], so a saturated reading is ~500cm.
///
/// This deliberately differs from the `500 * 29.1`us pulse other HC-SR04 drivers use,
/// which only covers the one way time and so reads ~250cm.
pub const SATURATED_PULSE_US: u32 = (2.0 * MAX_RANGE_CM as f64 * MICROS_PER_CM) as u32;
/// Default echo timeout, the maximum range there and back with a 30us/cm margin
pub const DEFAULT_ECHO_TIMEOUT_US: u32 = MAX_RANGE_CM * 2 * 30;

const STABILIZE_TRIGGER_US: u32 = 5;
const TRIGGER_PULSE_US: u32 = 10;
const CENTIMETER_DECIMALS_SCALE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HCSR04Error {
    /// No echo was received within the echo timeout: nothing in range, or the
    /// sensor is disconnected
    #[error("no echo received, out of range")]
    OutOfRange,
    #[error("hardware fault: {0}")]
    HardwareFault(#[from] HardwareFault),
}

/// What a measurement does when the echo does not arrive in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeoutPolicy {
    /// Fail the measurement with [HCSR04Error::OutOfRange]
    #[default]
    PropagateError,
    /// Report the pulse of an object at [MAX_RANGE_CM]
    Saturate,
}

/// How [RangeSensor::distance_centimeters] rounds its result to two decimals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CentimeterRounding {
    /// Ties round up, 0.125 becomes 0.13
    #[default]
    HalfUp,
    /// Ties round to the even neighbour, 0.125 becomes 0.12
    HalfEven,
    /// No rounding at all
    Unrounded,
}

/// Configuration of a [RangeSensor]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSensorConfig {
    /// Time to wait for the echo, in microseconds
    pub echo_timeout_us: u32,
    /// Air temperature in Celsius, used to correct the speed of sound
    pub air_temperature_c: f64,
    pub timeout_policy: TimeoutPolicy,
    pub centimeter_rounding: CentimeterRounding,
}

impl Default for RangeSensorConfig {
    fn default() -> Self {
        Self {
            echo_timeout_us: DEFAULT_ECHO_TIMEOUT_US,
            air_temperature_c: DEFAULT_AIR_TEMPERATURE_C,
            timeout_policy: TimeoutPolicy::PropagateError,
            centimeter_rounding: CentimeterRounding::HalfUp,
        }
    }
}

impl RangeSensorConfig {
    pub fn with_echo_timeout_us(mut self, echo_timeout_us: u32) -> Self {
        self.echo_timeout_us = echo_timeout_us;
        self
    }

    pub fn with_air_temperature_c(mut self, air_temperature_c: f64) -> Self {
        self.air_temperature_c = air_temperature_c;
        self
    }

    pub fn with_timeout_policy(mut self, timeout_policy: TimeoutPolicy) -> Self {
        self.timeout_policy = timeout_policy;
        self
    }

    pub fn with_centimeter_rounding(mut self, centimeter_rounding: CentimeterRounding) -> Self {
        self.centimeter_rounding = centimeter_rounding;
        self
    }
}

/// Driver of an HC-SR04 class ultrasonic sensor. The sensor range is between 2cm and 4m.
///
/// - `trigger`: Output line that starts the sonic burst.
/// - `echo`: Input line whose high time is the round trip of the burst. It should be
///   protected with a 1k resistor, the sensor drives it at 5V.
/// - `timer`: Delay and pulse measuring primitives.
/// - `air_temperature`: Validated air temperature the speed of sound is derived from.
/// - `sound_speed_mm_per_us`: Speed of sound, fixed at construction.
///
/// Every measurement blocks until the echo arrives or the echo timeout expires. Measurements
/// need `&mut self`, to share a sensor between threads see [super::SharedRangeSensor].
pub struct RangeSensor<O, I, T> {
    trigger: O,
    echo: I,
    timer: T,
    echo_timeout_us: u32,
    air_temperature: AirTemperature,
    sound_speed_mm_per_us: f64,
    timeout_policy: TimeoutPolicy,
    centimeter_rounding: CentimeterRounding,
}

impl<O, I, T> RangeSensor<O, I, T>
where
    O: DigitalOutput,
    T: PulseTimer<Input = I>,
{
    /// Creates a new RangeSensor taking `trigger_pin` and `echo_pin` from the platform.
    ///
    /// # Arguments
    ///
    /// - `platform`: The board the sensor is wired to.
    /// - `trigger_pin`: Pin number of the trigger line, set as output and driven low.
    /// - `echo_pin`: Pin number of the echo line, set as input with no pull resistor.
    /// - `config`: Timeout, air temperature and policies of the sensor.
    ///
    /// # Returns
    ///
    /// A `Result` containing the new `RangeSensor`, or an `HCSR04Error` if the initialization fails.
    ///
    /// # Errors
    ///
    /// - `HCSR04Error::HardwareFault`: If the platform rejects any of the pins, or the pulse
    ///   timer does not support the configured echo timeout. Pins already taken are given
    ///   back to the platform, so a corrected retry can use them.
    pub fn new<P>(
        platform: &mut P,
        trigger_pin: usize,
        echo_pin: usize,
        config: RangeSensorConfig,
    ) -> Result<Self, HCSR04Error>
    where
        P: GpioPlatform<Output = O, Input = I, Timer = T>,
    {
        let timer = platform.get_pulse_timer();
        check_echo_timeout(&timer, config.echo_timeout_us)?;

        let trigger = platform.set_pin_as_digital_out(trigger_pin)?;
        let echo = match platform.set_pin_as_digital_in(echo_pin) {
            Ok(echo) => echo,
            Err(err) => {
                drop(trigger);
                platform.release_pin(trigger_pin);
                return Err(err.into());
            }
        };
        let sensor = Self::from_parts(trigger, echo, timer, config).inspect_err(|_| {
            platform.release_pin(trigger_pin);
            platform.release_pin(echo_pin);
        })?;
        log::info!(
            "HC-SR04 ready on trigger pin {trigger_pin} and echo pin {echo_pin}, sound speed {:.4}mm/us",
            sensor.sound_speed_mm_per_us
        );
        Ok(sensor)
    }

    /// Creates a new RangeSensor from already configured lines. The trigger is driven low.
    ///
    /// # Errors
    ///
    /// - `HCSR04Error::HardwareFault`: If the trigger cannot be driven, or the echo timeout
    ///   is zero or longer than the timer supports.
    pub fn from_parts(
        mut trigger: O,
        echo: I,
        timer: T,
        config: RangeSensorConfig,
    ) -> Result<Self, HCSR04Error> {
        check_echo_timeout(&timer, config.echo_timeout_us)?;
        trigger.set_low()?;

        let air_temperature = AirTemperature::checked(config.air_temperature_c);
        Ok(RangeSensor {
            trigger,
            echo,
            timer,
            echo_timeout_us: config.echo_timeout_us,
            sound_speed_mm_per_us: air_temperature.sound_speed_mm_per_us(),
            air_temperature,
            timeout_policy: config.timeout_policy,
            centimeter_rounding: config.centimeter_rounding,
        })
    }

    /// Sends a burst and measures how long the echo line stays high.
    ///
    /// # Returns
    ///
    /// A `Result` with the echo pulse duration in microseconds. Under
    /// [TimeoutPolicy::Saturate] a missing echo yields [SATURATED_PULSE_US].
    ///
    /// # Errors
    ///
    /// - `HCSR04Error::OutOfRange`: If no echo arrives in time under [TimeoutPolicy::PropagateError].
    /// - `HCSR04Error::HardwareFault`: If a pin cannot be driven or read.
    pub fn measure_pulse_duration(&mut self) -> Result<u32, HCSR04Error> {
        self.trigger.set_low()?;
        self.timer.delay_us(STABILIZE_TRIGGER_US);
        self.trigger.set_high()?;
        self.timer.delay_us(TRIGGER_PULSE_US);
        self.trigger.set_low()?;
        log::trace!("Trigger pulse sent, waiting up to {}us for the echo", self.echo_timeout_us);

        match self.timer.time_pulse_us(&mut self.echo, Level::High, self.echo_timeout_us) {
            Ok(pulse_us) => Ok(pulse_us),
            Err(PulseError::Timeout(timeout)) => match self.timeout_policy {
                TimeoutPolicy::PropagateError => {
                    log::debug!("Echo timed out ({timeout:?})");
                    Err(HCSR04Error::OutOfRange)
                }
                TimeoutPolicy::Saturate => {
                    log::warn!("Echo timed out ({timeout:?}), reporting maximum range of {MAX_RANGE_CM}cm");
                    Ok(SATURATED_PULSE_US)
                }
            },
            Err(PulseError::Pin(err)) => Err(HardwareFault::from(err).into()),
        }
    }

    /// Returns the distance of the object in front of the sensor in millimeters.
    /// The pulse travels the distance twice, so the round trip is halved.
    pub fn distance_millimeters(&mut self) -> Result<f64, HCSR04Error> {
        let pulse_us = self.measure_pulse_duration()?;
        let mm = self.sound_speed_mm_per_us * pulse_us as f64 / 2.0;
        log::debug!("Echo of {pulse_us}us, distance {mm:.1}mm");
        Ok(mm)
    }

    /// Returns the distance of the object in front of the sensor in centimeters, rounded
    /// to two decimals as set by [CentimeterRounding].
    pub fn distance_centimeters(&mut self) -> Result<f64, HCSR04Error> {
        let cm = self.distance_millimeters()? / 10.0;
        Ok(self.centimeter_rounding.apply(cm))
    }
}

impl<O, I, T> RangeSensor<O, I, T> {
    pub fn air_temperature(&self) -> AirTemperature {
        self.air_temperature
    }

    pub fn sound_speed_mm_per_us(&self) -> f64 {
        self.sound_speed_mm_per_us
    }

    pub fn echo_timeout_us(&self) -> u32 {
        self.echo_timeout_us
    }

    pub fn timeout_policy(&self) -> TimeoutPolicy {
        self.timeout_policy
    }

    pub fn centimeter_rounding(&self) -> CentimeterRounding {
        self.centimeter_rounding
    }

    /// Consumes the sensor handing back the trigger, echo and timer
    pub fn release(self) -> (O, I, T) {
        (self.trigger, self.echo, self.timer)
    }
}

fn check_echo_timeout<T: PulseTimer>(timer: &T, echo_timeout_us: u32) -> Result<(), HardwareFault> {
    if echo_timeout_us == 0 || echo_timeout_us > timer.max_timeout_us() {
        return Err(HardwareFault::InvalidEchoTimeout(echo_timeout_us));
    }
    Ok(())
}

impl CentimeterRounding {
    fn apply(self, cm: f64) -> f64 {
        let scaled = cm * CENTIMETER_DECIMALS_SCALE;
        match self {
            CentimeterRounding::HalfUp => (scaled + 0.5).floor() / CENTIMETER_DECIMALS_SCALE,
            CentimeterRounding::HalfEven => scaled.round_ties_even() / CENTIMETER_DECIMALS_SCALE,
            CentimeterRounding::Unrounded => cm,
        }
    }
}

impl From<crate::gpio::DigitalOutError> for HCSR04Error {
    fn from(value: crate::gpio::DigitalOutError) -> Self {
        HCSR04Error::HardwareFault(value.into())
    }
}

impl From<crate::gpio::DigitalInError> for HCSR04Error {
    fn from(value: crate::gpio::DigitalInError) -> Self {
        HCSR04Error::HardwareFault(value.into())
    }
}
