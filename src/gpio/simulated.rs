//! Host side platform that stands in for a board wired to an HC-SR04.
//!
//! Echoes are scripted per echo pin and replayed in order, every trigger write, delay
//! and echo measurement is recorded so the trigger protocol can be checked afterwards.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::{
    microcontroller_src::peripherals::Peripherals,
    sensors::{AirTemperature, RangeSensor},
    utils::auxiliary::{SharableRef, SharableRefExt},
};

use super::{
    DigitalInError, DigitalInput, DigitalOutError, DigitalOutput, GpioPlatform, Level,
    PulseError, PulseTimeout, PulseTimer,
};

const DEFAULT_MAX_TIMEOUT_US: u32 = 1_000_000;

pub type SimulatedRangeSensor = RangeSensor<SimulatedDigitalOut, SimulatedDigitalIn, SimulatedPulseTimer>;

/// What the simulated sensor answers to the next trigger
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Echo {
    /// The echo line stays high for this many microseconds
    Pulse(u32),
    /// An object at `distance_mm`, in air at `air_temperature_c`
    Object { distance_mm: f64, air_temperature_c: f64 },
    /// The echo line never goes high
    Silence,
    /// The echo line cannot be read
    Fault,
}

/// Everything the simulated board saw happen, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    PinWrite { pin: u8, level: Level },
    Delay(u32),
    PulseMeasured { pin: u8, level: Level, timeout_us: u32 },
}

#[derive(Default)]
struct SimState {
    events: Vec<SimEvent>,
    echoes: HashMap<u8, VecDeque<Echo>>,
}

/// Simulated board handing out pins 0 to 23 (14 is reserved), each one only once.
pub struct SimulatedMicrocontroller {
    peripherals: Peripherals,
    state: SharableRef<SimState>,
    rejected_outputs: HashSet<usize>,
    rejected_inputs: HashSet<usize>,
    max_timeout_us: u32,
}

pub struct SimulatedDigitalOut {
    pin: u8,
    state: SharableRef<SimState>,
}

pub struct SimulatedDigitalIn {
    pin: u8,
}

pub struct SimulatedPulseTimer {
    state: SharableRef<SimState>,
    max_timeout_us: u32,
}

impl SimulatedMicrocontroller {
    pub fn new() -> Self {
        SimulatedMicrocontroller {
            peripherals: Peripherals::new(),
            state: SharableRef::new_sharable(SimState::default()),
            rejected_outputs: HashSet::new(),
            rejected_inputs: HashSet::new(),
            max_timeout_us: DEFAULT_MAX_TIMEOUT_US,
        }
    }

    /// Changes the longest pulse timeout the simulated timer accepts
    pub fn with_max_timeout_us(mut self, max_timeout_us: u32) -> Self {
        self.max_timeout_us = max_timeout_us;
        self
    }

    /// Queues the answer for the next unanswered trigger seen on `echo_pin`.
    /// Once the queue is empty the pin answers with [Echo::Silence].
    pub fn script_echo(&mut self, echo_pin: u8, echo: Echo) {
        self.state
            .lock_inner()
            .echoes
            .entry(echo_pin)
            .or_default()
            .push_back(echo);
    }

    /// Makes the pin exist but fail to be configured as an output
    pub fn reject_output(&mut self, pin_num: usize) {
        self.rejected_outputs.insert(pin_num);
    }

    /// Makes the pin exist but fail to be configured as an input
    pub fn reject_input(&mut self, pin_num: usize) {
        self.rejected_inputs.insert(pin_num);
    }

    pub fn events(&self) -> Vec<SimEvent> {
        self.state.lock_inner().events.clone()
    }

    pub fn clear_events(&mut self) {
        self.state.lock_inner().events.clear();
    }
}

impl Default for SimulatedMicrocontroller {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioPlatform for SimulatedMicrocontroller {
    type Output = SimulatedDigitalOut;
    type Input = SimulatedDigitalIn;
    type Timer = SimulatedPulseTimer;

    fn set_pin_as_digital_out(&mut self, pin_num: usize) -> Result<SimulatedDigitalOut, DigitalOutError> {
        let pin = self.peripherals.get_digital_pin(pin_num).into_pin_num()?;
        if self.rejected_outputs.contains(&pin_num) {
            self.peripherals.put_back(pin_num);
            return Err(DigitalOutError::CannotSetPinAsOutput);
        }
        Ok(SimulatedDigitalOut { pin, state: self.state.clone() })
    }

    fn set_pin_as_digital_in(&mut self, pin_num: usize) -> Result<SimulatedDigitalIn, DigitalInError> {
        let pin = self.peripherals.get_digital_pin(pin_num).into_pin_num()?;
        if self.rejected_inputs.contains(&pin_num) {
            self.peripherals.put_back(pin_num);
            return Err(DigitalInError::CannotSetPinAsInput);
        }
        Ok(SimulatedDigitalIn { pin })
    }

    fn get_pulse_timer(&mut self) -> SimulatedPulseTimer {
        SimulatedPulseTimer { state: self.state.clone(), max_timeout_us: self.max_timeout_us }
    }

    fn release_pin(&mut self, pin_num: usize) {
        self.peripherals.put_back(pin_num);
    }
}

impl DigitalOutput for SimulatedDigitalOut {
    fn set_level(&mut self, level: Level) -> Result<(), DigitalOutError> {
        self.state
            .lock_inner()
            .events
            .push(SimEvent::PinWrite { pin: self.pin, level });
        Ok(())
    }
}

impl DigitalInput for SimulatedDigitalIn {
    /// Between measurements the echo line idles low
    fn get_level(&self) -> Level {
        Level::Low
    }
}

impl PulseTimer for SimulatedPulseTimer {
    type Input = SimulatedDigitalIn;

    fn delay_us(&mut self, micros: u32) {
        self.state.lock_inner().events.push(SimEvent::Delay(micros));
    }

    fn max_timeout_us(&self) -> u32 {
        self.max_timeout_us
    }

    fn time_pulse_us(&mut self, input: &mut SimulatedDigitalIn, level: Level, timeout_us: u32) -> Result<u32, PulseError> {
        let mut state = self.state.lock_inner();
        state.events.push(SimEvent::PulseMeasured { pin: input.pin, level, timeout_us });
        let echo = state
            .echoes
            .get_mut(&input.pin)
            .and_then(|echoes| echoes.pop_front())
            .unwrap_or(Echo::Silence);

        let pulse_us = match echo {
            Echo::Pulse(pulse_us) => pulse_us,
            Echo::Object { distance_mm, air_temperature_c } => {
                let speed = AirTemperature::checked(air_temperature_c).sound_speed_mm_per_us();
                (2.0 * distance_mm / speed).round() as u32
            }
            Echo::Silence => return Err(PulseError::Timeout(PulseTimeout::WaitingForLevel)),
            Echo::Fault => return Err(PulseError::Pin(DigitalInError::InvalidPin)),
        };

        if pulse_us > timeout_us {
            return Err(PulseError::Timeout(PulseTimeout::DuringPulse));
        }
        Ok(pulse_us)
    }
}

#[cfg(test)]
mod test {
    use crate::microcontroller_src::peripherals::PeripheralError;

    use super::*;

    #[test]
    fn test0_pins_are_handed_out_once() {
        let mut micro = SimulatedMicrocontroller::new();
        assert!(micro.set_pin_as_digital_out(5).is_ok());
        assert_eq!(
            micro.set_pin_as_digital_in(5).err(),
            Some(DigitalInError::InvalidPeripheral(PeripheralError::NotAPin))
        );
    }

    #[test]
    fn test1_scripted_echoes_are_replayed_in_order() {
        let mut micro = SimulatedMicrocontroller::new();
        let mut echo = micro.set_pin_as_digital_in(6).unwrap();
        let mut timer = micro.get_pulse_timer();
        micro.script_echo(6, Echo::Pulse(1000));
        micro.script_echo(6, Echo::Fault);

        assert_eq!(timer.time_pulse_us(&mut echo, Level::High, 30000), Ok(1000));
        assert_eq!(
            timer.time_pulse_us(&mut echo, Level::High, 30000),
            Err(PulseError::Pin(DigitalInError::InvalidPin))
        );
        assert_eq!(
            timer.time_pulse_us(&mut echo, Level::High, 30000),
            Err(PulseError::Timeout(PulseTimeout::WaitingForLevel))
        );
    }

    #[test]
    fn test2_pulses_longer_than_the_timeout_time_out() {
        let mut micro = SimulatedMicrocontroller::new();
        let mut echo = micro.set_pin_as_digital_in(6).unwrap();
        let mut timer = micro.get_pulse_timer();
        micro.script_echo(6, Echo::Pulse(2000));

        assert_eq!(
            timer.time_pulse_us(&mut echo, Level::High, 1000),
            Err(PulseError::Timeout(PulseTimeout::DuringPulse))
        );
    }

    #[test]
    fn test3_released_and_rejected_pins_can_be_taken_again() {
        let mut micro = SimulatedMicrocontroller::new();
        let trigger = micro.set_pin_as_digital_out(5).unwrap();
        drop(trigger);
        micro.release_pin(5);
        assert!(micro.set_pin_as_digital_in(5).is_ok());

        micro.reject_output(7);
        assert_eq!(micro.set_pin_as_digital_out(7).err(), Some(DigitalOutError::CannotSetPinAsOutput));
        assert!(micro.set_pin_as_digital_in(7).is_ok());
    }
}
