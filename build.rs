fn main() {
    // Only the espidf build carries the ESP-IDF link environment; host
    // test builds have nothing to export.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
