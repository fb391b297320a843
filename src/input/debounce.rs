//! Time-window debouncer for one digital input.
//!
//! ## Model
//!
//! The channel tracks the raw logical level and the instant it last
//! changed.  The debounced level follows the raw level only once the raw
//! level has held still for strictly longer than the configured window, so
//! contact chatter inside the window never reaches the state machine.  An
//! edge latch turns the debounced level into an at-most-once-per-press
//! event for consumers that must not double-fire (menu entry, menu nav).
//!
//! Time is u32 milliseconds with wrapping arithmetic; updates and queries
//! stay valid across the ~49.7-day rollover.

/// Debounced state for one physical button.
///
/// `debounced_pressed` lags the raw level by at least the window and
/// changes only when `now - raw_change_ms > window_ms`.
#[derive(Debug, Clone)]
pub struct ButtonChannel {
    window_ms: u32,
    raw_pressed: bool,
    raw_change_ms: u32,
    debounced_pressed: bool,
    debounced_change_ms: u32,
    edge_latch: bool,
}

impl ButtonChannel {
    pub fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            raw_pressed: false,
            raw_change_ms: 0,
            debounced_pressed: false,
            debounced_change_ms: 0,
            edge_latch: false,
        }
    }

    /// Feed one raw sample.  Call exactly once per control-loop iteration.
    pub fn poll(&mut self, raw_pressed: bool, now_ms: u32) {
        if raw_pressed != self.raw_pressed {
            self.raw_pressed = raw_pressed;
            self.raw_change_ms = now_ms;
        }
        if self.debounced_pressed != self.raw_pressed
            && now_ms.wrapping_sub(self.raw_change_ms) > self.window_ms
        {
            self.debounced_pressed = self.raw_pressed;
            self.debounced_change_ms = now_ms;
        }
    }

    /// Stable level after the debounce window.
    pub fn is_pressed(&self) -> bool {
        self.debounced_pressed
    }

    /// Milliseconds the debounced level has been "pressed"; 0 when released.
    pub fn press_duration(&self, now_ms: u32) -> u32 {
        if self.debounced_pressed {
            now_ms.wrapping_sub(self.debounced_change_ms)
        } else {
            0
        }
    }

    /// True exactly once per press of the debounced level.
    ///
    /// The latch records whether the previous debounced sample was pressed,
    /// so each call consumes the edge: a second call in the same iteration
    /// reads false, and no new edge appears until a release has been
    /// observed through this method.
    pub fn take_new_press_edge(&mut self) -> bool {
        let pressed = self.debounced_pressed;
        let edge = pressed && !self.edge_latch;
        self.edge_latch = pressed;
        edge
    }
}
