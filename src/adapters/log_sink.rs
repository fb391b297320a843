//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! A future telemetry radio or kill-sound board would implement the
//! same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::ShotFired {
                shot_count,
                total_fired,
            } => {
                info!("SHOT  | mag={} | lifetime={}", shot_count, total_fired);
            }
            AppEvent::ShotLimitReached { shot_limit } => {
                info!("SHOT  | magazine limit reached ({} rds) — reload required", shot_limit);
            }
            AppEvent::MagazineRemoved => {
                info!("RELOAD | magazine out");
            }
            AppEvent::ReloadComplete => {
                info!("RELOAD | magazine seated, counter reset");
            }
            AppEvent::MenuClosed(exit) => {
                info!("MENU  | closed ({:?})", exit);
            }
            AppEvent::SettingsPersisted => {
                info!("MENU  | settings written to flash");
            }
        }
    }
}
