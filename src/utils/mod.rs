pub mod auxiliary;
#[cfg(feature = "esp32")]
pub mod error_text_parser;
pub mod hardware_fault;
