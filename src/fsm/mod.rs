//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  StateTable                                         │
//! │  ┌────────────┬───────────┬───────────────────┐     │
//! │  │ StateId    │ on_enter  │ on_update         │     │
//! │  ├────────────┼───────────┼───────────────────┤     │
//! │  │ Idle       │ —         │ fn(ctx)->Option<> │     │
//! │  │ SemiAuto   │ fn(ctx)   │ fn(ctx)->Option<> │     │
//! │  │ FullAuto   │ fn(ctx)   │ fn(ctx)->Option<> │     │
//! │  │ BinaryTail │ fn(ctx)   │ fn(ctx)->Option<> │     │
//! │  │ Reload     │ fn(ctx)   │ fn(ctx)->Option<> │     │
//! │  │ Menu       │ fn(ctx)   │ fn(ctx)->Option<> │     │
//! │  └────────────┴───────────┴───────────────────┘     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Each iteration the engine calls `on_update` for the **current**
//! state.  If it returns `Some(next_id)`, the engine logs the
//! transition, emits [`AppEvent::StateChanged`], and runs `on_enter`
//! for the next state.  All functions receive `&mut FsmContext`, which
//! carries the input snapshot, shot session, settings, and ports.
//!
//! Handlers may block (shot timing runs inside them), so a single
//! iteration is not fixed-period; the loop re-samples inputs before
//! every call.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;

use crate::app::events::AppEvent;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all possible machine states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StateId {
    Idle = 0,
    SemiAuto = 1,
    FullAuto = 2,
    BinaryTail = 3,
    Reload = 4,
    Menu = 5,
}

impl StateId {
    /// Total number of states — used to size the table array.
    pub const COUNT: usize = 6;

    /// Convert a table index back to `StateId`.  Panics on out-of-range
    /// in debug builds; returns `Idle` in release, the one state that
    /// commands nothing.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::SemiAuto,
            2 => Self::FullAuto,
            3 => Self::BinaryTail,
            4 => Self::Reload,
            5 => Self::Menu,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` actions.  These run exactly once per
/// transition, before the new state's first update.
pub type StateActionFn = fn(&mut FsmContext<'_>);

/// Signature for the per-iteration update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut FsmContext<'_>) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array — no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table (array of [`StateDescriptor`]) and nothing
/// else; all mutable collaborators arrive through the [`FsmContext`]
/// borrowed for each call.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self { table, current: initial as usize }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FsmContext<'_>) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one iteration: call `on_update` for the
    /// current state and execute the transition it requests, if any.
    pub fn tick(&mut self, ctx: &mut FsmContext<'_>) {
        if let Some(next_id) = (self.table[self.current].on_update)(ctx) {
            self.transition(next_id, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut FsmContext<'_>) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );
        ctx.sink.emit(&AppEvent::StateChanged {
            from: self.table[self.current].id,
            to: next_id,
        });

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
