//! Serial-console display adapter.
//!
//! The FCU board in this revision has no screen; the settings menu
//! renders its two lines to the log instead.  An OLED adapter would
//! implement the same [`DisplayPort`] against the I2C bus.

use log::info;

use crate::app::ports::DisplayPort;

/// Renders menu lines to the serial console.
pub struct LogDisplay;

impl LogDisplay {
    pub fn new() -> Self {
        Self
    }
}

impl DisplayPort for LogDisplay {
    fn show(&mut self, line0: &str, line1: &str) {
        info!("DISP  | [{line0}] [{line1}]");
    }
}
