use esp_idf_svc::{
    hal::{
        delay::Ets,
        gpio::{AnyIOPin, Input, Output, PinDriver, Pull},
    },
    sys::esp_timer_get_time,
};
use crate::{
    gpio::{
        DigitalInError, DigitalInput, DigitalOutError, DigitalOutput,
        GpioPlatform, Level, PulseError, PulseTimeout, PulseTimer,
    },
    microcontroller_src::peripherals::Peripherals,
    sensors::RangeSensor,
    utils::error_text_parser::{map_input_errors, map_output_errors},
};

/// Longest pulse the esp timer polling is trusted to measure, one second
const MAX_PULSE_TIMEOUT_US: u32 = 1_000_000;

/// Primary abstraction for interacting with the ESP32-C6, providing the pins and timing
/// primitives used by the sensors of this crate.
///
/// - `peripherals`: Bookkeeping of the pins still available on the board.
pub struct Microcontroller {
    peripherals: Peripherals,
}

/// Digital output backed by an esp PinDriver
pub struct DigitalOut {
    pin_driver: PinDriver<'static, AnyIOPin, Output>,
}

/// Digital input backed by an esp PinDriver
pub struct DigitalIn {
    pin_driver: PinDriver<'static, AnyIOPin, Input>,
}

/// Busy waiting timer based on the esp high resolution timer
pub struct EspPulseTimer;

/// Range sensor wired to the ESP32-C6 pins
pub type EspRangeSensor = RangeSensor<DigitalOut, DigitalIn, EspPulseTimer>;

impl Microcontroller {
    /// Creates a new Microcontroller instance
    pub fn new() -> Self {
        esp_idf_svc::sys::link_patches();
        Microcontroller { peripherals: Peripherals::new() }
    }
}

impl Default for Microcontroller {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioPlatform for Microcontroller {
    type Output = DigitalOut;
    type Input = DigitalIn;
    type Timer = EspPulseTimer;

    fn set_pin_as_digital_out(&mut self, pin_num: usize) -> Result<DigitalOut, DigitalOutError> {
        let gpio = self.peripherals.get_digital_pin(pin_num).into_any_io_pin()?;
        let pin_driver = PinDriver::output(gpio).map_err(|err| {
            self.peripherals.put_back(pin_num);
            map_output_errors(err)
        })?;
        Ok(DigitalOut { pin_driver })
    }

    fn set_pin_as_digital_in(&mut self, pin_num: usize) -> Result<DigitalIn, DigitalInError> {
        let gpio = self.peripherals.get_digital_pin(pin_num).into_any_io_pin()?;
        let mut pin_driver = PinDriver::input(gpio).map_err(|err| {
            self.peripherals.put_back(pin_num);
            map_input_errors(err)
        })?;
        if pin_driver.set_pull(Pull::Floating).is_err() {
            drop(pin_driver);
            self.peripherals.put_back(pin_num);
            return Err(DigitalInError::CannotSetPullForPin);
        }
        Ok(DigitalIn { pin_driver })
    }

    fn get_pulse_timer(&mut self) -> EspPulseTimer {
        EspPulseTimer
    }

    fn release_pin(&mut self, pin_num: usize) {
        self.peripherals.put_back(pin_num);
    }
}

impl DigitalOutput for DigitalOut {
    fn set_level(&mut self, level: Level) -> Result<(), DigitalOutError> {
        let level = if bool::from(level) {
            esp_idf_svc::hal::gpio::Level::High
        } else {
            esp_idf_svc::hal::gpio::Level::Low
        };
        self.pin_driver
            .set_level(level)
            .map_err(|_| DigitalOutError::InvalidPin)
    }
}

impl DigitalInput for DigitalIn {
    fn get_level(&self) -> Level {
        Level::from(self.pin_driver.is_high())
    }
}

impl EspPulseTimer {
    fn now_us() -> i64 {
        unsafe { esp_timer_get_time() }
    }

    /// Busy waits until `input` is at `level`, returning the instant it happened
    fn wait_for_level(input: &DigitalIn, level: Level, deadline: i64) -> Option<i64> {
        loop {
            let now = Self::now_us();
            if input.get_level() == level {
                return Some(now);
            }
            if now >= deadline {
                return None;
            }
        }
    }
}

impl PulseTimer for EspPulseTimer {
    type Input = DigitalIn;

    fn delay_us(&mut self, micros: u32) {
        Ets::delay_us(micros);
    }

    fn max_timeout_us(&self) -> u32 {
        MAX_PULSE_TIMEOUT_US
    }

    fn time_pulse_us(&mut self, input: &mut DigitalIn, level: Level, timeout_us: u32) -> Result<u32, PulseError> {
        let armed_at = Self::now_us();
        let pulse_start = Self::wait_for_level(input, level, armed_at + timeout_us as i64)
            .ok_or(PulseError::Timeout(PulseTimeout::WaitingForLevel))?;

        let pulse_end = Self::wait_for_level(input, !level, pulse_start + timeout_us as i64)
            .ok_or(PulseError::Timeout(PulseTimeout::DuringPulse))?;

        Ok((pulse_end - pulse_start) as u32)
    }
}
