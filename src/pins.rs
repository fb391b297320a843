//! GPIO pin assignments for the Sear FCU main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Fire group inputs (momentary switches, active-low, pulled up when idle)
// ---------------------------------------------------------------------------

/// Trigger microswitch.
pub const TRIGGER_GPIO: i32 = 4;
/// Fire-selector switch.  Closed = auto position on standard wiring;
/// `FireSettings::invert_selector` flips the interpretation in software.
pub const SELECTOR_GPIO: i32 = 5;
/// Magazine presence switch.  Closed = magazine seated.
pub const MAGAZINE_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Navigation buttons (settings menu) — active-low, pulled up
// ---------------------------------------------------------------------------

pub const NAV_UP_GPIO: i32 = 7;
pub const NAV_DOWN_GPIO: i32 = 8;
pub const NAV_LEFT_GPIO: i32 = 9;
pub const NAV_RIGHT_GPIO: i32 = 10;
/// Menu select / enter button.
pub const NAV_SELECT_GPIO: i32 = 11;

// ---------------------------------------------------------------------------
// Outputs (MOSFET gate drive, active HIGH, must boot LOW)
// ---------------------------------------------------------------------------

/// Solenoid valve gate.  HIGH = energized (firing).
pub const SOLENOID_GPIO: i32 = 1;
/// Tracer-unit trigger line, pulsed in sync with the solenoid when
/// muzzle-flash is enabled.
pub const TRACER_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// UART debug
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
