//! Outbound application events.
//!
//! The control core emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — today they go to the serial log.

use crate::app::ports::MenuExit;
use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The control service has started (carries initial state).
    Started(StateId),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// One shot completed its full timing sequence.
    ///
    /// `shot_count` is the forced-reload counter (0 when the policy is
    /// off); `total_fired` is the lifetime odometer input.
    ShotFired { shot_count: u16, total_fired: u32 },

    /// The forced-reload limit blocked a shot.
    ShotLimitReached { shot_limit: u16 },

    /// RELOAD observed the magazine leaving its well.
    MagazineRemoved,

    /// RELOAD observed reinsertion; the shot counter was reset.
    ReloadComplete,

    /// The settings menu closed with the given outcome.
    MenuClosed(MenuExit),

    /// An edited settings record was written to flash.
    SettingsPersisted,
}
