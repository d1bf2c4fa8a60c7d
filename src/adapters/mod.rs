//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to              |
//! |----------------|--------------------|--------------------------|
//! | `hardware`     | RelayPort          | GPIO relay outputs       |
//! | `log_sink`     | EventSink          | Serial log output        |
//! | `nvs`          | ConfigPort         | NVS / in-memory store    |
//! |                | StoragePort        |                          |
//! | `time`         | —                  | ESP32 system timer       |
//! | `entropy`      | —                  | Hardware RNG             |
//! | `wifi`         | —                  | ESP-IDF WiFi STA / AP    |
//! | `http_server`  | —                  | ESP-IDF HTTP server      |

pub mod entropy;
pub mod hardware;
#[cfg(target_os = "espidf")]
pub mod http_server;
pub mod log_sink;
pub mod nvs;
pub mod time;
pub mod wifi;
