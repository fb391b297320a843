//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers — no closures, no heap.
//! This is the classic embedded C FSM pattern expressed in safe Rust.
//!
//! ```text
//!               [trigger, selector=semi]          [trigger, selector=auto]
//!        ┌─────────────────────────────▶ IDLE ◀─────────────────────────────┐
//!        │                             ▲ │  │ ▲                             │
//!        ▼        [burst done+release] │ │  │ │ [release]                   ▼
//!   SEMI_AUTO ─────────────────────────┘ │  │ └───────────────────── FULL_AUTO
//!        │                               │  │
//!        │ [release, binary]             │  │ [menu-select edge]
//!        ▼              [tail done]      │  ▼
//!   BINARY_TAIL ─────────────────────────┤ MENU ──[save/discard]──▶ IDLE
//!                                        │
//!   SEMI_AUTO / FULL_AUTO / BINARY_TAIL  │
//!        └──[shot limit]──▶ RELOAD ──────┘
//!                   [magazine out, then back in]
//! ```
//!
//! Firing states block inside their update handler (the shot cycle and
//! its follow-through run to completion before the next input sample),
//! so one update call fires at most one shot.

use super::context::FsmContext;
use super::{StateDescriptor, StateId};
use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{MenuExit, MenuResult};
use crate::config::{BINARY_TAIL_AFTER_BURST_CHAIN, BINARY_TAIL_AFTER_FULL_AUTO};
use crate::input::ButtonId;
use crate::shot::ReloadPhase;

/// How long the menu's parting message stays on screen.  The loop holds
/// here deliberately; the trigger is already inert in MENU.
pub const MENU_EXIT_MESSAGE_MS: u32 = 1_200;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: None,
            on_update: idle_update,
        },
        // Index 1 — SemiAuto
        StateDescriptor {
            id: StateId::SemiAuto,
            name: "SemiAuto",
            on_enter: Some(semi_auto_enter),
            on_update: semi_auto_update,
        },
        // Index 2 — FullAuto
        StateDescriptor {
            id: StateId::FullAuto,
            name: "FullAuto",
            on_enter: Some(full_auto_enter),
            on_update: full_auto_update,
        },
        // Index 3 — BinaryTail
        StateDescriptor {
            id: StateId::BinaryTail,
            name: "BinaryTail",
            on_enter: Some(binary_tail_enter),
            on_update: binary_tail_update,
        },
        // Index 4 — Reload
        StateDescriptor {
            id: StateId::Reload,
            name: "Reload",
            on_enter: Some(reload_enter),
            on_update: reload_update,
        },
        // Index 5 — Menu
        StateDescriptor {
            id: StateId::Menu,
            name: "Menu",
            on_enter: Some(menu_enter),
            on_update: menu_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state — safe rest state, outputs de-energized
// ═══════════════════════════════════════════════════════════════════════════

fn idle_update(ctx: &mut FsmContext<'_>) -> Option<StateId> {
    // Level-triggered on purpose: a trigger already held at power-up
    // fires as soon as the debouncer commits it.
    if ctx.trigger_pressed() {
        return Some(if ctx.selector_in_auto() {
            StateId::FullAuto
        } else {
            StateId::SemiAuto
        });
    }

    // Edge-triggered: a held menu button must open the menu once, not
    // re-open it every iteration after exit.
    if ctx.inputs.take_new_press_edge(ButtonId::NavSelect) {
        return Some(StateId::Menu);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  SEMI_AUTO state — one burst per trigger pull
// ═══════════════════════════════════════════════════════════════════════════

fn semi_auto_enter(ctx: &mut FsmContext<'_>) {
    ctx.session.current_burst_shot_count = 0;
    info!("SEMI_AUTO: burst of {}", ctx.settings.burst_size);
}

fn semi_auto_update(ctx: &mut FsmContext<'_>) -> Option<StateId> {
    // A burst, once started, runs to completion — one shot per
    // iteration so inputs stay fresh between shots.
    if ctx.session.current_burst_shot_count < ctx.settings.burst_size {
        if !ctx.fire_one_shot() {
            return Some(StateId::Reload);
        }
        ctx.session.current_burst_shot_count += 1;
        return None;
    }

    // Burst complete.  A selector now in auto means the operator moved
    // it mid-pull; hand the held trigger back to IDLE, whose dispatch
    // owns the mode decision, instead of escalating from here.
    if ctx.selector_in_auto() {
        info!("SEMI_AUTO: selector moved to auto, returning to idle");
        return Some(StateId::Idle);
    }

    if ctx.trigger_pressed() {
        if !ctx.settings.full_auto_burst {
            // Hold here until release; nothing to do this iteration.
            return None;
        }
        // Burst chain: rearm and keep cycling while the trigger is held.
        ctx.session.current_burst_shot_count = 0;
        ctx.clock.delay_ms(u32::from(ctx.settings.burst_delay_ms));
        return None;
    }

    let next = semi_release_exit(
        ctx.settings.full_auto_burst,
        BINARY_TAIL_AFTER_BURST_CHAIN,
        ctx.settings.binary_trigger,
    );
    if next == StateId::Idle {
        ctx.trigger_quiet_wait();
    }
    Some(next)
}

// ═══════════════════════════════════════════════════════════════════════════
//  FULL_AUTO state — sustained fire while the trigger is held
// ═══════════════════════════════════════════════════════════════════════════

fn full_auto_enter(ctx: &mut FsmContext<'_>) {
    ctx.session.current_burst_shot_count = 0;
    info!("FULL_AUTO: sustained fire");
}

fn full_auto_update(ctx: &mut FsmContext<'_>) -> Option<StateId> {
    // Selector check comes first: leaving auto stops the string before
    // another shot goes out.
    if !ctx.selector_in_auto() {
        info!("FULL_AUTO: selector left auto, returning to idle");
        return Some(StateId::Idle);
    }

    if !ctx.fire_one_shot() {
        return Some(StateId::Reload);
    }

    if !ctx.trigger_pressed() {
        let next = full_auto_release_exit(BINARY_TAIL_AFTER_FULL_AUTO, ctx.settings.binary_trigger);
        if next == StateId::Idle {
            ctx.trigger_quiet_wait();
        }
        return Some(next);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  BINARY_TAIL state — the release-side burst of a binary trigger
// ═══════════════════════════════════════════════════════════════════════════

fn binary_tail_enter(ctx: &mut FsmContext<'_>) {
    ctx.session.current_burst_shot_count = 0;
    info!("BINARY_TAIL: release burst of {}", ctx.settings.burst_size);
}

fn binary_tail_update(ctx: &mut FsmContext<'_>) -> Option<StateId> {
    // The tail burst runs to completion whatever the trigger or
    // selector do meanwhile; only the shot limit can cut it short.
    if ctx.session.current_burst_shot_count < ctx.settings.burst_size {
        if !ctx.fire_one_shot() {
            return Some(StateId::Reload);
        }
        ctx.session.current_burst_shot_count += 1;
        return None;
    }

    Some(StateId::Idle)
}

// ═══════════════════════════════════════════════════════════════════════════
//  RELOAD state — firing locked out until the magazine cycles
// ═══════════════════════════════════════════════════════════════════════════

fn reload_enter(ctx: &mut FsmContext<'_>) {
    // Fresh phase every time: a magazine that never reads "absent"
    // cannot complete the reload.
    ctx.session.reload_phase = ReloadPhase::AwaitingRemoval;
    info!(
        "RELOAD: {} shots fired, waiting for magazine change",
        ctx.session.shot_count
    );
}

fn reload_update(ctx: &mut FsmContext<'_>) -> Option<StateId> {
    match ctx.session.reload_phase {
        ReloadPhase::AwaitingRemoval => {
            if !ctx.magazine_present() {
                ctx.session.reload_phase = ReloadPhase::AwaitingReinsertion;
                info!("RELOAD: magazine out");
                ctx.sink.emit(&AppEvent::MagazineRemoved);
            }
            None
        }
        ReloadPhase::AwaitingReinsertion => {
            if ctx.magazine_present() {
                ctx.session.shot_count = 0;
                info!("RELOAD: magazine seated, counter reset");
                ctx.sink.emit(&AppEvent::ReloadComplete);
                return Some(StateId::Idle);
            }
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  MENU state — settings editor owns the controls
// ═══════════════════════════════════════════════════════════════════════════

fn menu_enter(ctx: &mut FsmContext<'_>) {
    let snapshot = ctx.settings.clone();
    ctx.menu.open(snapshot);
    info!("MENU: editor open");
}

fn menu_update(ctx: &mut FsmContext<'_>) -> Option<StateId> {
    match ctx.menu.update(ctx.inputs) {
        MenuResult::Continue => None,
        MenuResult::SaveAndExit => {
            let exit = if ctx.menu.commit(ctx.settings) {
                match ctx.store.save(ctx.settings) {
                    Ok(()) => ctx.sink.emit(&AppEvent::SettingsPersisted),
                    Err(err) => warn!("MENU: settings save failed: {err}"),
                }
                MenuExit::Saved
            } else {
                MenuExit::Unchanged
            };
            close_menu(ctx, exit)
        }
        MenuResult::DiscardAndExit => close_menu(ctx, MenuExit::Discarded),
    }
}

fn close_menu(ctx: &mut FsmContext<'_>, exit: MenuExit) -> Option<StateId> {
    ctx.menu.show_exit_message(exit, MENU_EXIT_MESSAGE_MS);
    // Hold the message on screen before the machine goes live again.
    ctx.clock.delay_ms(MENU_EXIT_MESSAGE_MS);
    info!("MENU: closed ({exit:?})");
    ctx.sink.emit(&AppEvent::MenuClosed(exit));
    Some(StateId::Idle)
}

// ═══════════════════════════════════════════════════════════════════════════
//  Release-exit policy
// ═══════════════════════════════════════════════════════════════════════════

/// Where a FULL_AUTO trigger release lands.  Build-time policy keeps
/// binary trigger a semi-fire feature unless the build opts in.
pub(crate) fn full_auto_release_exit(tail_after_full_auto: bool, binary_enabled: bool) -> StateId {
    if tail_after_full_auto && binary_enabled {
        StateId::BinaryTail
    } else {
        StateId::Idle
    }
}

/// Where a SEMI_AUTO trigger release lands once the burst is done.  A
/// release that ends a burst chain already delivered sustained fire, so
/// the tail only follows it when the build opts in.
pub(crate) fn semi_release_exit(
    chain_enabled: bool,
    tail_after_chain: bool,
    binary_enabled: bool,
) -> StateId {
    if chain_enabled && !tail_after_chain {
        StateId::Idle
    } else if binary_enabled {
        StateId::BinaryTail
    } else {
        StateId::Idle
    }
}
