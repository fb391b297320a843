//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single value state handlers read from and write
//! to: the debounced input snapshot, the run-time shot session, the
//! active settings, and the ports the firing and menu paths drive.
//! Handlers stay plain `fn` pointers because every collaborator crosses
//! this boundary as a `dyn` reference instead of a generic parameter.

use crate::app::ports::{ActuatorPort, EventSink, MenuPort, SettingsPort, TimePort};
use crate::config::FireSettings;
use crate::input::{ButtonId, InputScanner};
use crate::shot::ShotSession;

/// Everything a state handler may touch during one control-loop
/// iteration.  Borrowed fresh each tick by the service; nothing here
/// outlives the iteration.
pub struct FsmContext<'a> {
    /// Debounced input snapshot for this iteration, plus edge queries.
    pub inputs: &'a mut InputScanner,
    /// Run-time counters owned by the machine.
    pub session: &'a mut ShotSession,
    /// Active settings.  Handlers read these; only the MENU commit
    /// path writes them.
    pub settings: &'a mut FireSettings,
    /// Solenoid and tracer outputs.
    pub hw: &'a mut dyn ActuatorPort,
    /// Monotonic clock and the blocking wait primitive.
    pub clock: &'a dyn TimePort,
    /// Settings editor, driven only while in MENU.
    pub menu: &'a mut dyn MenuPort,
    /// Persistent settings store, written only on a MENU save.
    pub store: &'a mut dyn SettingsPort,
    /// Structured event output.
    pub sink: &'a mut dyn EventSink,
}

impl FsmContext<'_> {
    /// Debounced trigger level.
    pub fn trigger_pressed(&self) -> bool {
        self.inputs.is_pressed(ButtonId::Trigger)
    }

    /// Whether the fire selector sits in the automatic position.
    ///
    /// Standard wiring closes the switch in auto; `invert_selector`
    /// flips the reading for mirrored installs.
    pub fn selector_in_auto(&self) -> bool {
        self.inputs.is_pressed(ButtonId::Selector) != self.settings.invert_selector
    }

    /// Whether the magazine switch reads "seated".
    ///
    /// A reversed mechanical switch changes only this helper.
    pub fn magazine_present(&self) -> bool {
        self.inputs.is_pressed(ButtonId::Magazine)
    }

    /// Fire one shot through the executor with this context's ports.
    /// Returns `false` when the shot counter has hit the limit.
    pub fn fire_one_shot(&mut self) -> bool {
        crate::shot::fire_one_shot(self.settings, self.session, self.hw, self.clock, self.sink)
    }

    /// Block for the configured post-release quiet window so mechanical
    /// ring-down on the trigger cannot restart a cycle.
    pub fn trigger_quiet_wait(&self) {
        self.clock.delay_ms(u32::from(self.settings.trigger_debounce_ms));
    }
}
