use esp_idf_svc::sys::{EspError, ESP_ERR_INVALID_ARG, ESP_ERR_NOT_SUPPORTED};

use crate::gpio::{DigitalInError, DigitalOutError};

pub fn map_output_errors(err: EspError) -> DigitalOutError {
    match err.code() {
        ESP_ERR_INVALID_ARG | ESP_ERR_NOT_SUPPORTED => DigitalOutError::CannotSetPinAsOutput,
        _ => DigitalOutError::InvalidPin,
    }
}

pub fn map_input_errors(err: EspError) -> DigitalInError {
    match err.code() {
        ESP_ERR_INVALID_ARG | ESP_ERR_NOT_SUPPORTED => DigitalInError::CannotSetPinAsInput,
        _ => DigitalInError::InvalidPin,
    }
}
