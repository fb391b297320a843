//! Monotonic clock adapter.
//!
//! Implements [`TimePort`] for the two build targets:
//!
//! - **`target_os = "espidf"`** — `esp_timer_get_time()` for queries
//!   (microsecond, monotonic since boot) and the FreeRTOS scheduler for
//!   blocking delays.  Delay resolution is the FreeRTOS tick; firing
//!   builds run a 1 kHz tick so millisecond dwell values hold.
//! - **`not(target_os = "espidf")`** — `std::time::Instant` and
//!   `thread::sleep` for host-side tests.
//!
//! `now_ms` wraps at `u32::MAX` (~49.7 days); every consumer compares
//! timestamps with `wrapping_sub`.

use crate::app::ports::TimePort;

/// Clock adapter for the ESP32-S3 platform.
pub struct EspClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl EspClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

impl Default for EspClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimePort for EspClock {
    #[cfg(target_os = "espidf")]
    fn now_ms(&self) -> u32 {
        ((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) / 1_000) as u32
    }

    #[cfg(not(target_os = "espidf"))]
    fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }

    #[cfg(target_os = "espidf")]
    fn delay_ms(&self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ms(&self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }

    #[cfg(target_os = "espidf")]
    fn uptime_secs(&self) -> u32 {
        ((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) / 1_000_000) as u32
    }

    #[cfg(not(target_os = "espidf"))]
    fn uptime_secs(&self) -> u32 {
        self.start.elapsed().as_secs() as u32
    }
}
