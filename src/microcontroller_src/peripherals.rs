use std::mem;
use thiserror::Error;
#[cfg(feature = "esp32")]
use esp_idf_svc::hal::gpio::*;

pub const PIN_COUNT: usize = 24;
const DIGITAL_PINS_BOUNDS: (usize, usize) = (0,23);
const RESERVED_PIN: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PeripheralError {
    #[error("the peripheral is not an available pin")]
    NotAPin
}

/// Represents a board Peripheral, either a pin still free to be configured or nothing
#[derive(Debug, Default, PartialEq, Eq)]
pub enum Peripheral{
    Pin(u8),
    #[default]
    None
}

impl Peripheral {
    fn take(&mut self) -> Peripheral {
        mem::take(self)
    }

    /// If the Peripheral is a Pin returns its number.
    /// If not it returns PeripheralError::NotAPin
    pub fn into_pin_num(self) -> Result<u8, PeripheralError> {
        match self {
            Peripheral::Pin(pin_num) => Ok(pin_num),
            Peripheral::None => Err(PeripheralError::NotAPin),
        }
    }

    /// If the Peripheral is a Pin returns the corresponding AnyIoPin.
    /// If not it returns PeripheralError::NotAPin
    #[cfg(feature = "esp32")]
    pub fn into_any_io_pin(self) -> Result<AnyIOPin, PeripheralError> {
        let pin = match self.into_pin_num()? {
            0 => unsafe {Gpio0::new().downgrade()},
            1 => unsafe {Gpio1::new().downgrade()},
            2 => unsafe {Gpio2::new().downgrade()},
            3 => unsafe {Gpio3::new().downgrade()},
            4 => unsafe {Gpio4::new().downgrade()},
            5 => unsafe {Gpio5::new().downgrade()},
            6 => unsafe {Gpio6::new().downgrade()},
            7 => unsafe {Gpio7::new().downgrade()},
            8 => unsafe {Gpio8::new().downgrade()},
            9 => unsafe {Gpio9::new().downgrade()},
            10 => unsafe {Gpio10::new().downgrade()},
            11 => unsafe {Gpio11::new().downgrade()},
            12 => unsafe {Gpio12::new().downgrade()},
            13 => unsafe {Gpio13::new().downgrade()},
            15 => unsafe {Gpio15::new().downgrade()},
            16 => unsafe {Gpio16::new().downgrade()},
            17 => unsafe {Gpio17::new().downgrade()},
            18 => unsafe {Gpio18::new().downgrade()},
            19 => unsafe {Gpio19::new().downgrade()},
            20 => unsafe {Gpio20::new().downgrade()},
            21 => unsafe {Gpio21::new().downgrade()},
            22 => unsafe {Gpio22::new().downgrade()},
            23 => unsafe {Gpio23::new().downgrade()},
            _ => return Err(PeripheralError::NotAPin)
        };
        Ok(pin)
    }
}

/// Keeps track of which pins of the board are still free. Subsequent gets of the same
/// pin will return Peripheral::None, as will pins outside the board bounds.
pub struct Peripherals {
    pins: [Peripheral;PIN_COUNT],
}

impl Peripherals {
    pub fn new() -> Peripherals {
        let pins: [Peripheral; PIN_COUNT] = std::array::from_fn(|pin_num| {
            if pin_num == RESERVED_PIN {
                Peripheral::None
            } else {
                Peripheral::Pin(pin_num as u8)
            }
        });
        Peripherals { pins }
    }

    pub fn get_digital_pin(&mut self, pin_num: usize) -> Peripheral {
        self.get_pin_on_bound(pin_num, DIGITAL_PINS_BOUNDS)
    }

    /// Makes a pin taken with [Peripherals::get_digital_pin] available again. Reserved
    /// pins and pins outside the board bounds are ignored.
    pub fn put_back(&mut self, pin_num: usize) {
        if pin_num == RESERVED_PIN || pin_num < DIGITAL_PINS_BOUNDS.0 || pin_num > DIGITAL_PINS_BOUNDS.1 {
            return
        }
        self.pins[pin_num] = Peripheral::Pin(pin_num as u8);
    }

    fn get_pin_on_bound(&mut self, pin_num: usize, bound: (usize,usize)) -> Peripheral {
        if pin_num >= bound.0 && pin_num <= bound.1 {
            return self.pins[pin_num].take()
        }
        Peripheral::None
    }
}

impl Default for Peripherals {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test0_pins_can_only_be_taken_once() {
        let mut peripherals = Peripherals::new();
        assert_eq!(peripherals.get_digital_pin(5), Peripheral::Pin(5));
        assert_eq!(peripherals.get_digital_pin(5), Peripheral::None);
    }

    #[test]
    fn test1_reserved_and_out_of_bound_pins_are_not_available() {
        let mut peripherals = Peripherals::new();
        assert_eq!(peripherals.get_digital_pin(RESERVED_PIN).into_pin_num(), Err(PeripheralError::NotAPin));
        assert_eq!(peripherals.get_digital_pin(PIN_COUNT).into_pin_num(), Err(PeripheralError::NotAPin));
    }

    #[test]
    fn test2_pins_put_back_can_be_taken_again() {
        let mut peripherals = Peripherals::new();
        assert_eq!(peripherals.get_digital_pin(5), Peripheral::Pin(5));
        peripherals.put_back(5);
        assert_eq!(peripherals.get_digital_pin(5), Peripheral::Pin(5));
        assert_eq!(peripherals.get_digital_pin(5), Peripheral::None);
    }

    #[test]
    fn test3_reserved_and_out_of_bound_pins_cannot_be_put_back() {
        let mut peripherals = Peripherals::new();
        peripherals.put_back(RESERVED_PIN);
        peripherals.put_back(PIN_COUNT);
        assert_eq!(peripherals.get_digital_pin(RESERVED_PIN), Peripheral::None);
        assert_eq!(peripherals.get_digital_pin(PIN_COUNT), Peripheral::None);
    }
}
