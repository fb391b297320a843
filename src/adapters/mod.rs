//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to              |
//! |------------|--------------|--------------------------|
//! | `hardware` | InputPort    | ESP32 GPIO switch bank   |
//! |            | ActuatorPort | Solenoid / tracer gates  |
//! | `display`  | DisplayPort  | Serial log output        |
//! | `log_sink` | EventSink    | Serial log output        |
//! | `nvs`      | SettingsPort | NVS / in-memory store    |
//! |            | StoragePort  |                          |
//! | `time`     | TimePort     | ESP32 system timer       |

pub mod display;
pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod time;
