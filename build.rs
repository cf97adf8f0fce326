fn main() {
    // Only ESP-IDF builds carry the linker args and cfgs exported by esp-idf-sys
    if std::env::var_os("CARGO_FEATURE_ESP32").is_some() {
        embuild::espidf::sysenv::output();
    }
}
