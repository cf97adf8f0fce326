mod air_temperature;
mod hc_sr04;
mod shared;

pub use{
    air_temperature::*,
    hc_sr04::*,
    shared::*,
};
