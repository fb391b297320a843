//! The shot primitive — one complete actuator cycle.
//!
//! [`fire_one_shot`] is the only code path that energizes the solenoid.
//! It owns the forced-reload limit check and the dwell/delay timing, and
//! it blocks for the full cycle: the control loop samples no inputs while
//! a shot is in flight, which is what gives the state machine its
//! one-shot-per-iteration cadence.

use log::debug;

use crate::app::events::AppEvent;
use crate::app::ports::{ActuatorPort, EventSink, TimePort};
use crate::config::FireSettings;

/// Two-phase reload progress.
///
/// The magazine must be seen fully out and then back in; a jostled
/// magazine that never reads "absent" cannot complete a reload.  The
/// two-variant enum leaves no undefined phase to guard against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReloadPhase {
    #[default]
    AwaitingRemoval,
    AwaitingReinsertion,
}

/// Mutable run-time counters owned by the state machine.
#[derive(Debug, Clone, Default)]
pub struct ShotSession {
    /// Shots since the last completed reload.  Only meaningful while the
    /// forced-reload policy is enabled; stays 0 ≤ n ≤ `shot_limit`.
    pub shot_count: u16,
    /// Shots fired so far in the burst currently in progress.
    pub current_burst_shot_count: u8,
    /// Progress through the two-phase reload cycle (RELOAD state only).
    pub reload_phase: ReloadPhase,
    /// Lifetime shots, never reset by reloads.  Feeds the odometer.
    pub total_fired: u32,
}

impl ShotSession {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Fire exactly one shot, or refuse because the forced-reload limit is hit.
///
/// Blocking: holds the caller for the full `dwell_ms + shot_delay_ms`
/// window; no inputs are sampled meanwhile.  Returns `false` only for the
/// limit case — there is no other failure mode, and no hardware action
/// happens on refusal.
pub fn fire_one_shot(
    settings: &FireSettings,
    session: &mut ShotSession,
    hw: &mut dyn ActuatorPort,
    clock: &dyn TimePort,
    sink: &mut dyn EventSink,
) -> bool {
    if settings.force_reload && session.shot_count >= settings.shot_limit {
        debug!("SHOT | limit {} reached, refusing", settings.shot_limit);
        sink.emit(&AppEvent::ShotLimitReached {
            shot_limit: settings.shot_limit,
        });
        return false;
    }

    if settings.force_reload {
        session.shot_count += 1;
    }
    session.total_fired = session.total_fired.wrapping_add(1);

    hw.set_solenoid(true);
    if settings.muzzle_flash {
        hw.set_tracer(true);
    }
    clock.delay_ms(u32::from(settings.dwell_ms));
    hw.set_solenoid(false);
    hw.set_tracer(false);
    clock.delay_ms(u32::from(settings.shot_delay_ms));

    debug!(
        "SHOT | fired (count {}/{}, lifetime {})",
        session.shot_count, settings.shot_limit, session.total_fired
    );
    sink.emit(&AppEvent::ShotFired {
        shot_count: session.shot_count,
        total_fired: session.total_fired,
    });
    true
}
