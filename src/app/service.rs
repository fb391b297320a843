//! Application service — the hexagonal core.
//!
//! [`FireControl`] owns the FSM, the input scanner and the run-time
//! counters.  It exposes a clean, hardware-agnostic API; all I/O flows
//! through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!   InputPort ──▶ ┌───────────────────────────┐ ──▶ EventSink
//!                 │        FireControl        │
//! ActuatorPort ◀──│  scanner · FSM · session  │──▶ SettingsPort
//!    TimePort ──▶ └───────────────────────────┘ ◀─▶ MenuPort
//! ```
//!
//! One `tick()` is one control cycle: sample every switch, then run
//! exactly one state handler.  Every decision inside that handler sees
//! the same debounced snapshot.

use log::info;

use crate::config::FireSettings;
use crate::fsm::context::FsmContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::input::InputScanner;
use crate::shot::ShotSession;

use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, InputPort, MenuPort, SettingsPort, TimePort};

// ───────────────────────────────────────────────────────────────
// FireControl
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct FireControl {
    fsm: Fsm,
    inputs: InputScanner,
    session: ShotSession,
    settings: FireSettings,
}

impl FireControl {
    /// Construct the service from a settings snapshot.
    ///
    /// Does **not** start the FSM — call [`FireControl::start`] next.
    pub fn new(settings: FireSettings) -> Self {
        Self {
            fsm: Fsm::new(build_state_table(), StateId::Idle),
            inputs: InputScanner::new(),
            session: ShotSession::new(),
            settings,
        }
    }

    /// Seed the lifetime counter from the persisted odometer value.
    pub fn set_total_fired(&mut self, total: u32) {
        self.session.total_fired = total;
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run the initial state's entry action and announce the start.
    pub fn start(
        &mut self,
        io: &mut (impl InputPort + ActuatorPort),
        clock: &impl TimePort,
        menu: &mut impl MenuPort,
        store: &mut impl SettingsPort,
        sink: &mut impl EventSink,
    ) {
        let mut ctx = FsmContext {
            inputs: &mut self.inputs,
            session: &mut self.session,
            settings: &mut self.settings,
            hw: io,
            clock,
            menu,
            store,
            sink,
        };
        self.fsm.start(&mut ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("FireControl started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle: sample inputs → one state handler.
    ///
    /// The `io` parameter satisfies **both** [`InputPort`] and
    /// [`ActuatorPort`] — the switch bank and the gate drives live on
    /// the same adapter, and this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        io: &mut (impl InputPort + ActuatorPort),
        clock: &impl TimePort,
        menu: &mut impl MenuPort,
        store: &mut impl SettingsPort,
        sink: &mut impl EventSink,
    ) {
        self.inputs.poll_all(io, clock.now_ms());

        let mut ctx = FsmContext {
            inputs: &mut self.inputs,
            session: &mut self.session,
            settings: &mut self.settings,
            hw: io,
            clock,
            menu,
            store,
            sink,
        };
        self.fsm.tick(&mut ctx);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Run-time counters (shot counts, reload phase).
    pub fn session(&self) -> &ShotSession {
        &self.session
    }

    /// The live settings snapshot.
    pub fn settings(&self) -> &FireSettings {
        &self.settings
    }
}
