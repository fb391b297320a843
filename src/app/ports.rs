//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ FireControl (domain)
//! ```
//!
//! Driven adapters (GPIO bank, clock, NVS store, menu, event sinks)
//! implement these traits.  The [`FireControl`](super::service::FireControl)
//! service consumes them via generics and the state handlers via `dyn`
//! references, so the domain core never touches hardware directly.
//!
//! ## Safety notes
//!
//! - **SettingsPort** implementations MUST validate before persisting.
//!   An out-of-range dwell overheats the solenoid coil; validation is the
//!   last line between a corrupted blob and hardware damage.
//! - **ActuatorPort** implementations MUST leave every output de-energized
//!   at construction time.  The solenoid may only be driven through
//!   [`fire_one_shot`](crate::shot::fire_one_shot).

use crate::config::FireSettings;
use crate::input::{ButtonId, InputScanner};

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw sampling of one physical control line.
///
/// Returns the *logical* level: `true` = pressed.  The adapter folds the
/// electrical polarity (every switch is active-low, pulled up when idle)
/// so the debouncer and the state machine reason in logical terms only.
pub trait InputPort {
    fn sample(&mut self, id: ButtonId) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the firing primitive drives the outputs through this.
pub trait ActuatorPort {
    /// Energize (`true`) or release (`false`) the solenoid valve.
    fn set_solenoid(&mut self, on: bool);

    /// Drive the tracer-unit flash line.
    fn set_tracer(&mut self, on: bool);

    /// Kill both outputs — safe shutdown.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Time port (monotonic clock + blocking wait)
// ───────────────────────────────────────────────────────────────

/// Monotonic time and the control core's only wait primitive.
///
/// `delay_ms` blocks the calling thread; the control loop deliberately
/// samples no inputs while a delay runs (shot dwell, burst gaps, menu
/// exit messages), so implementations must not pump callbacks of any
/// kind during it.
pub trait TimePort {
    /// Milliseconds since boot, wrapping at `u32::MAX` (~49.7 days).
    fn now_ms(&self) -> u32;

    /// Block for `ms` milliseconds.
    fn delay_ms(&self, ms: u32);

    /// Whole seconds since boot (diagnostics granularity).
    fn uptime_secs(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log today,
/// a kill-house scoring link some day).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Settings port (driven adapter: domain ↔ persistent settings)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the fire-control settings record.
pub trait SettingsPort {
    /// Load the persisted settings.
    ///
    /// `None` covers every "no valid settings" case — absent key,
    /// version-marker mismatch, undecodable payload.  The caller then
    /// writes and uses the compiled-in defaults.
    fn load(&self) -> Option<FireSettings>;

    /// Validate and persist settings.
    /// Rejects out-of-range values with [`SettingsError::Validation`],
    /// never silently clamps.
    fn save(&mut self, settings: &FireSettings) -> Result<(), SettingsError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage for the crash ring, shot odometer and
/// settings blob.
///
/// Keys are namespaced to prevent collisions between subsystems.  Write
/// operations MUST be atomic — no partial writes on power loss.  The
/// ESP-IDF NVS API guarantees this natively; in-memory simulation
/// achieves it trivially.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Menu port (driven adapter: domain ↔ settings editor)
// ───────────────────────────────────────────────────────────────

/// The MENU state delegates every cycle to this collaborator.
///
/// Protocol: `open` receives an editable snapshot on state entry;
/// `update` runs once per loop iteration against the same debounced
/// input snapshot as the rest of the machine; `commit` writes the edited
/// snapshot back only if it differs (the caller persists on `true`);
/// `show_exit_message` displays the Saved/Unchanged/Discarded outcome.
pub trait MenuPort {
    fn open(&mut self, snapshot: FireSettings);

    fn update(&mut self, inputs: &mut InputScanner) -> MenuResult;

    /// Returns whether `current` was actually replaced.
    fn commit(&mut self, current: &mut FireSettings) -> bool;

    fn show_exit_message(&mut self, kind: MenuExit, duration_ms: u32);
}

/// Per-cycle outcome of [`MenuPort::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuResult {
    /// Stay in the menu.
    Continue,
    /// Operator chose to keep the edits.
    SaveAndExit,
    /// Operator backed out; edits are dropped.
    DiscardAndExit,
}

/// User-visible outcome shown when the menu closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuExit {
    /// Save requested but nothing differed.
    Unchanged,
    /// Edits dropped on request.
    Discarded,
    /// Edits persisted.
    Saved,
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: menu → operator)
// ───────────────────────────────────────────────────────────────

/// Two-line text rendering for the settings menu.
///
/// The stock build logs lines over serial; an OLED adapter slots in here
/// without touching the menu engine.
pub trait DisplayPort {
    fn show(&mut self, line0: &str, line1: &str);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`SettingsPort::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsError {
    /// A settings field failed range validation.
    /// The `&'static str` describes which field and why.
    Validation(&'static str),
    /// Serialization of the record failed.
    Encode,
    /// Underlying storage rejected the write.
    Io,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "validation failed: {}", msg),
            Self::Encode => write!(f, "encode failed"),
            Self::Io => write!(f, "storage I/O failed"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
