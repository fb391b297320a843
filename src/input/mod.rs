//! Debounced, edge-aware sampling of the physical controls.
//!
//! The scanner owns one [`ButtonChannel`] per [`ButtonId`] and samples
//! every channel exactly once per control-loop iteration through the
//! [`InputPort`].  Every query made before the next `poll_all` reads the
//! same snapshot — the state machine never observes a mid-iteration level
//! change, which is what makes its transition decisions deterministic.

pub mod debounce;

use crate::app::ports::InputPort;
use debounce::ButtonChannel;

/// Identifiers for the eight physical inputs.
///
/// Raw index arithmetic never leaves this module; everything downstream
/// addresses buttons by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum ButtonId {
    Trigger = 0,
    Selector,
    Magazine,
    NavUp,
    NavDown,
    NavLeft,
    NavRight,
    NavSelect,
}

impl ButtonId {
    pub const COUNT: usize = 8;

    pub const ALL: [ButtonId; Self::COUNT] = [
        ButtonId::Trigger,
        ButtonId::Selector,
        ButtonId::Magazine,
        ButtonId::NavUp,
        ButtonId::NavDown,
        ButtonId::NavLeft,
        ButtonId::NavRight,
        ButtonId::NavSelect,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Per-button debounce windows (ms).
///
/// Switch classes differ mechanically: the trigger microswitch is crisp,
/// the magazine leaf switch rattles on insertion, the nav dome buttons sit
/// in between.
const fn window_ms(id: ButtonId) -> u32 {
    match id {
        ButtonId::Trigger => 15,
        ButtonId::Selector => 25,
        ButtonId::Magazine => 50,
        ButtonId::NavUp
        | ButtonId::NavDown
        | ButtonId::NavLeft
        | ButtonId::NavRight
        | ButtonId::NavSelect => 30,
    }
}

/// Bank of debounced channels plus the iteration snapshot time.
pub struct InputScanner {
    channels: [ButtonChannel; ButtonId::COUNT],
    now_ms: u32,
}

impl InputScanner {
    pub fn new() -> Self {
        Self {
            channels: ButtonId::ALL.map(|id| ButtonChannel::new(window_ms(id))),
            now_ms: 0,
        }
    }

    /// Sample every channel once.  Call at the top of each loop iteration;
    /// `now_ms` becomes the snapshot time for all queries until the next
    /// poll.
    pub fn poll_all(&mut self, port: &mut dyn InputPort, now_ms: u32) {
        self.now_ms = now_ms;
        for id in ButtonId::ALL {
            let raw = port.sample(id);
            self.channels[id.index()].poll(raw, now_ms);
        }
    }

    /// Debounced level of one button.
    pub fn is_pressed(&self, id: ButtonId) -> bool {
        self.channels[id.index()].is_pressed()
    }

    /// How long the button has been held (debounced), measured against the
    /// snapshot time; 0 when released.
    pub fn press_duration(&self, id: ButtonId) -> u32 {
        self.channels[id.index()].press_duration(self.now_ms)
    }

    /// Consume the at-most-once press edge for one button.
    pub fn take_new_press_edge(&mut self, id: ButtonId) -> bool {
        self.channels[id.index()].take_new_press_edge()
    }

    /// Snapshot time of the current iteration.
    pub fn now_ms(&self) -> u32 {
        self.now_ms
    }
}

impl Default for InputScanner {
    fn default() -> Self {
        Self::new()
    }
}
