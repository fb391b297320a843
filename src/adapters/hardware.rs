//! GPIO adapter — bridges the switch bank and MOSFET gates to the
//! domain port traits.
//!
//! This is the only module that touches pin levels at runtime.  All
//! inputs are momentary switches wired active-low (closed pulls the pin
//! to ground against the internal pull-up), so the raw level is
//! inverted here before the debouncer ever sees it.  On non-espidf
//! targets the underlying `gpio_read`/`gpio_write` calls are
//! simulation stubs.

use crate::app::ports::{ActuatorPort, InputPort};
use crate::drivers::hw_init::{gpio_read, gpio_write};
use crate::input::ButtonId;
use crate::pins;

/// Concrete adapter over the FCU's direct-wired pins.
pub struct GpioBank;

impl GpioBank {
    /// Construct the bank with both gate outputs driven low.
    pub fn new() -> Self {
        let mut bank = Self;
        bank.all_off();
        bank
    }

    fn pin_for(id: ButtonId) -> i32 {
        match id {
            ButtonId::Trigger => pins::TRIGGER_GPIO,
            ButtonId::Selector => pins::SELECTOR_GPIO,
            ButtonId::Magazine => pins::MAGAZINE_GPIO,
            ButtonId::NavUp => pins::NAV_UP_GPIO,
            ButtonId::NavDown => pins::NAV_DOWN_GPIO,
            ButtonId::NavLeft => pins::NAV_LEFT_GPIO,
            ButtonId::NavRight => pins::NAV_RIGHT_GPIO,
            ButtonId::NavSelect => pins::NAV_SELECT_GPIO,
        }
    }
}

impl Default for GpioBank {
    fn default() -> Self {
        Self::new()
    }
}

// ── InputPort implementation ──────────────────────────────────

impl InputPort for GpioBank {
    fn sample(&mut self, id: ButtonId) -> bool {
        // Active-low: ground = pressed / closed.
        !gpio_read(Self::pin_for(id))
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for GpioBank {
    fn set_solenoid(&mut self, on: bool) {
        gpio_write(pins::SOLENOID_GPIO, on);
    }

    fn set_tracer(&mut self, on: bool) {
        gpio_write(pins::TRACER_GPIO, on);
    }

    fn all_off(&mut self) {
        gpio_write(pins::SOLENOID_GPIO, false);
        gpio_write(pins::TRACER_GPIO, false);
    }
}
