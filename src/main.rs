//! Sear FCU Firmware — Main Entry Point
//!
//! Hexagonal architecture around a 1 kHz polling fire loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  GpioBank          LogEventSink    NvsStore      EspClock    │
//! │  (Input+Actuator)  (EventSink)     (Settings+    (TimePort)  │
//! │  SettingsMenu      LogDisplay       Storage)                 │
//! │  (MenuPort)        (DisplayPort)                             │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ────────────────       │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │            FireControl (pure logic)                │      │
//! │  │  input scanner · fire FSM · shot session           │      │
//! │  └────────────────────────────────────────────────────┘      │
//! │                                                              │
//! │  CrashLog · ShotOdometer (NVS diagnostics)                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod error;
mod pins;

pub mod app;
mod adapters;
mod drivers;
pub mod diagnostics;
pub mod fsm;
pub mod input;
pub mod menu;
pub mod shot;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use adapters::display::LogDisplay;
use adapters::hardware::GpioBank;
use adapters::log_sink::LogEventSink;
use adapters::nvs::NvsStore;
use adapters::time::EspClock;
use app::ports::{SettingsPort, TimePort};
use app::service::FireControl;
use config::FireSettings;
use diagnostics::{CrashLog, ShotOdometer};
use menu::SettingsMenu;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Sear FCU v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    diagnostics::install_panic_handler();

    // ── 2. Hardware peripherals ───────────────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical: the solenoid gate state
        // would be undefined.  Log and halt; the watchdog-less halt is
        // deliberate so the unit stays safely dead.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let watchdog = drivers::watchdog::Watchdog::new();

    // ── 3. Settings from NVS (or defaults) ────────────────────
    let mut nvs = match NvsStore::new() {
        Ok(n) => n,
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults and no persistence", e);
            NvsStore::unavailable()
        }
    };
    let settings = match nvs.load() {
        Some(s) => {
            info!("Settings loaded from NVS");
            s
        }
        None => {
            let defaults = FireSettings::default();
            // Write-back so the next boot has a valid record and the
            // marker check stops logging.
            if let Err(e) = nvs.save(&defaults) {
                warn!("Default settings write-back failed: {}", e);
            }
            info!("Settings defaulted");
            defaults
        }
    };

    // ── 4. Diagnostics ────────────────────────────────────────
    let mut crash_log = CrashLog::new();
    crash_log.init(&nvs);
    crash_log.replay(&nvs);

    let (mut odometer, total_fired) = ShotOdometer::load(&nvs);
    info!("Odometer: {} lifetime shots", total_fired);

    // ── 5. Construct adapters ─────────────────────────────────
    let mut io = GpioBank::new();
    let clock = EspClock::new();
    let mut sink = LogEventSink::new();
    let mut menu = SettingsMenu::new(LogDisplay::new());

    // ── 6. Construct and start the service ────────────────────
    let mut service = FireControl::new(settings);
    service.set_total_fired(total_fired);
    service.start(&mut io, &clock, &mut menu, &mut nvs, &mut sink);

    info!("System ready. Entering fire loop.");

    // ── 7. Fire loop ──────────────────────────────────────────
    loop {
        service.tick(&mut io, &clock, &mut menu, &mut nvs, &mut sink);
        odometer.sync(service.session().total_fired, &mut nvs);
        watchdog.feed();

        // 1 ms pacing yield: the loop samples at 1 kHz, far inside
        // every debounce window, and the idle task gets scheduled.
        clock.delay_ms(1);
    }
}
