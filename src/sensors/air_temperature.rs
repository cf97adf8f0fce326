//! Air temperature handling and the speed of sound derived from it.
//!
//! The HC-SR04 datasheet gives a working range of -15°C to 70°C. Temperatures
//! outside of it are not trusted for the speed of sound and the default is used instead.

/// Lowest air temperature, in Celsius, the sensor works at
pub const MIN_WORKING_TEMP_C: f64 = -15.0;
/// Highest air temperature, in Celsius, the sensor works at
pub const MAX_WORKING_TEMP_C: f64 = 70.0;
/// Air temperature used when none is given or the given one is out of the working range
pub const DEFAULT_AIR_TEMPERATURE_C: f64 = 20.0;

const ABSOLUTE_ZERO_OFFSET_C: f64 = 273.15;
const SOUND_SPEED_COEFFICIENT: f64 = 20.05;
const M_S_TO_MM_US: f64 = 1000.0;

/// An air temperature in Celsius that is guaranteed to be inside the working range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirTemperature {
    celsius: f64,
    substituted: bool,
}

impl AirTemperature {
    /// Validates `celsius` against the working range of the sensor.
    ///
    /// # Arguments
    ///
    /// - `celsius`: The requested air temperature.
    ///
    /// # Returns
    ///
    /// The requested temperature if it lies in [MIN_WORKING_TEMP_C, MAX_WORKING_TEMP_C],
    /// otherwise [DEFAULT_AIR_TEMPERATURE_C]. A NaN is treated as out of range. A warning
    /// is logged whenever the default is substituted.
    pub fn checked(celsius: f64) -> AirTemperature {
        if (MIN_WORKING_TEMP_C..=MAX_WORKING_TEMP_C).contains(&celsius) {
            return AirTemperature { celsius, substituted: false };
        }
        log::warn!(
            "Air temperature {celsius}°C is out of the working range [{MIN_WORKING_TEMP_C}, {MAX_WORKING_TEMP_C}], using {DEFAULT_AIR_TEMPERATURE_C}°C"
        );
        AirTemperature { celsius: DEFAULT_AIR_TEMPERATURE_C, substituted: true }
    }

    pub fn celsius(&self) -> f64 {
        self.celsius
    }

    /// Whether the requested temperature was replaced by the default
    pub fn was_substituted(&self) -> bool {
        self.substituted
    }

    /// Speed of sound in air at this temperature, in millimeters per microsecond.
    ///
    /// Uses `20.05 * sqrt(T_kelvin)` m/s, which is numerically the same in mm/ms,
    /// then scales it down to mm/us.
    pub fn sound_speed_mm_per_us(&self) -> f64 {
        SOUND_SPEED_COEFFICIENT * (self.celsius + ABSOLUTE_ZERO_OFFSET_C).sqrt() / M_S_TO_MM_US
    }
}

impl Default for AirTemperature {
    fn default() -> Self {
        AirTemperature { celsius: DEFAULT_AIR_TEMPERATURE_C, substituted: false }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test0_sound_speed_at_default_temperature() {
        let speed = AirTemperature::default().sound_speed_mm_per_us();
        assert!((speed - 0.3433).abs() < 0.0005, "speed was {speed}");
    }

    #[test]
    fn test1_sound_speed_increases_with_temperature() {
        let mut previous = AirTemperature::checked(MIN_WORKING_TEMP_C).sound_speed_mm_per_us();
        let mut celsius = MIN_WORKING_TEMP_C + 0.5;
        while celsius <= MAX_WORKING_TEMP_C {
            let speed = AirTemperature::checked(celsius).sound_speed_mm_per_us();
            assert!(speed > previous, "speed at {celsius}°C did not increase");
            previous = speed;
            celsius += 0.5;
        }
    }

    #[test]
    fn test2_bounds_are_inclusive() {
        assert_eq!(AirTemperature::checked(MIN_WORKING_TEMP_C).celsius(), MIN_WORKING_TEMP_C);
        assert_eq!(AirTemperature::checked(MAX_WORKING_TEMP_C).celsius(), MAX_WORKING_TEMP_C);
        assert!(!AirTemperature::checked(MAX_WORKING_TEMP_C).was_substituted());
    }

    #[test]
    fn test3_out_of_range_temperatures_fall_back_to_default() {
        for celsius in [-15.01, -40.0, 70.01, 120.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let temperature = AirTemperature::checked(celsius);
            assert_eq!(temperature.celsius(), DEFAULT_AIR_TEMPERATURE_C);
            assert!(temperature.was_substituted());
            assert_eq!(temperature.sound_speed_mm_per_us(), AirTemperature::default().sound_speed_mm_per_us());
        }
    }
}
