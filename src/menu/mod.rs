//! On-device settings editor.
//!
//! Drives the five nav buttons against a draft copy of the settings:
//!
//! ```text
//!   up/down    — move the cursor through the catalog (wraps)
//!   left/right — step the selected value; hold to repeat in
//!                coarse steps after a long press
//!   select     — tap to save and exit, hold to discard and exit
//! ```
//!
//! The editor only ever touches its draft.  The live settings change in
//! one place — [`commit`](SettingsMenu::commit) — after the machine
//! decides the exit was a save, so a browsed-and-abandoned menu can
//! never leave a half-edited configuration behind.

pub mod items;

use core::fmt::Write as _;

use heapless::String;
use log::{debug, info};

use crate::app::ports::{DisplayPort, MenuExit, MenuPort, MenuResult};
use crate::config::FireSettings;
use crate::input::{ButtonId, InputScanner};
use items::{SettingId, SettingKind};

/// Hold time after which a value key starts repeating.
const LONG_PRESS_AFTER_MS: u32 = 600;
/// Repeat interval once a value key is in long-press.
const LONG_PRESS_REPEAT_MS: u32 = 150;
/// Hold time on select that turns the exit into a discard.
const DISCARD_HOLD_MS: u32 = 1_000;

/// Render width; sized for a 128-px OLED or a serial line.
const DISPLAY_COLS: usize = 32;

type Line = String<DISPLAY_COLS>;

/// The menu engine.  Generic over the display so the stock serial-log
/// build and an OLED build share every line of behavior.
pub struct SettingsMenu<D: DisplayPort> {
    display: D,
    draft: FireSettings,
    cursor: usize,
    /// A fresh select press arms the exit gesture; the release (save)
    /// or the hold threshold (discard) resolves it.
    select_armed: bool,
    /// Snapshot time of the last value step, for repeat pacing.
    last_step_ms: u32,
    needs_render: bool,
}

impl<D: DisplayPort> SettingsMenu<D> {
    pub fn new(display: D) -> Self {
        Self {
            display,
            draft: FireSettings::default(),
            cursor: 0,
            select_armed: false,
            last_step_ms: 0,
            needs_render: false,
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let count = SettingId::COUNT as isize;
        self.cursor = (self.cursor as isize + delta).rem_euclid(count) as usize;
        self.needs_render = true;
        debug!("MENU | -> {}", SettingId::ALL[self.cursor].descriptor().label);
    }

    /// Handle one value key: a new press steps once, a long-held press
    /// repeats in coarse steps.
    fn edit(&mut self, inputs: &mut InputScanner, key: ButtonId, increase: bool) {
        let now = inputs.now_ms();
        let long_held =
            inputs.is_pressed(key) && inputs.press_duration(key) >= LONG_PRESS_AFTER_MS;

        let fire = inputs.take_new_press_edge(key)
            || (long_held && now.wrapping_sub(self.last_step_ms) >= LONG_PRESS_REPEAT_MS);
        if !fire {
            return;
        }

        self.apply_step(increase, long_held);
        self.last_step_ms = now;
        self.needs_render = true;
    }

    fn apply_step(&mut self, increase: bool, fast: bool) {
        let id = SettingId::ALL[self.cursor];
        let current = id.read(&self.draft);
        let next = match id.descriptor().kind {
            SettingKind::Toggle => u16::from(current == 0),
            SettingKind::Bounded { min, max, step, fast_step } => {
                let step = if fast { fast_step } else { step };
                if increase {
                    current.saturating_add(step).min(max)
                } else {
                    current.saturating_sub(step).max(min)
                }
            }
        };
        id.write(&mut self.draft, next);
        debug!("MENU | {} = {}", id.descriptor().label, next);
    }

    fn render(&mut self) {
        let id = SettingId::ALL[self.cursor];
        let descriptor = id.descriptor();

        let mut line0 = Line::new();
        let _ = write!(line0, "{:>2}/{} {}", self.cursor + 1, SettingId::COUNT, descriptor.label);

        let mut line1 = Line::new();
        match descriptor.kind {
            SettingKind::Toggle => {
                let state = if id.read(&self.draft) != 0 { "ON" } else { "OFF" };
                let _ = write!(line1, "  {}", state);
            }
            SettingKind::Bounded { .. } => {
                let _ = write!(line1, "  {} {}", id.read(&self.draft), descriptor.unit);
            }
        }

        self.display.show(&line0, &line1);
    }
}

impl<D: DisplayPort> MenuPort for SettingsMenu<D> {
    fn open(&mut self, snapshot: FireSettings) {
        self.draft = snapshot;
        self.cursor = 0;
        self.select_armed = false;
        self.needs_render = true;
        info!("MENU | open ({} items)", SettingId::COUNT);
    }

    fn update(&mut self, inputs: &mut InputScanner) -> MenuResult {
        // Exit gesture first.  The press that *opened* the menu never
        // arms it: its edge was consumed on the way in, and a held
        // button produces no new edge.
        if inputs.take_new_press_edge(ButtonId::NavSelect) {
            self.select_armed = true;
        }
        if self.select_armed {
            if inputs.is_pressed(ButtonId::NavSelect) {
                if inputs.press_duration(ButtonId::NavSelect) >= DISCARD_HOLD_MS {
                    self.select_armed = false;
                    return MenuResult::DiscardAndExit;
                }
            } else {
                self.select_armed = false;
                return MenuResult::SaveAndExit;
            }
        }

        if inputs.take_new_press_edge(ButtonId::NavUp) {
            self.move_cursor(-1);
        }
        if inputs.take_new_press_edge(ButtonId::NavDown) {
            self.move_cursor(1);
        }

        self.edit(inputs, ButtonId::NavLeft, false);
        self.edit(inputs, ButtonId::NavRight, true);

        if self.needs_render {
            self.render();
            self.needs_render = false;
        }
        MenuResult::Continue
    }

    fn commit(&mut self, current: &mut FireSettings) -> bool {
        if self.draft != *current {
            *current = self.draft.clone();
            true
        } else {
            false
        }
    }

    fn show_exit_message(&mut self, kind: MenuExit, _duration_ms: u32) {
        let (line0, line1) = match kind {
            MenuExit::Saved => ("SAVED", "settings stored"),
            MenuExit::Unchanged => ("NO CHANGES", "nothing to store"),
            MenuExit::Discarded => ("DISCARDED", "edits dropped"),
        };
        self.display.show(line0, line1);
    }
}
