//! Fire-control configuration parameters
//!
//! All tunable parameters for the Sear trigger unit.
//! Values persist in NVS and are edited on-device through the settings menu.

use serde::{Deserialize, Serialize};

/// Operator-tunable fire-control settings.
///
/// Loaded once at boot, read-only to the state machine during operation and
/// replaced wholesale only when the settings menu commits an edited snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireSettings {
    // --- Shot timing ---
    /// Solenoid energized duration per shot (milliseconds)
    pub dwell_ms: u16,
    /// Post-shot pause before the next action (milliseconds)
    pub shot_delay_ms: u16,
    /// Pause between bursts when burst continuation is enabled (milliseconds)
    pub burst_delay_ms: u16,
    /// Quiet wait after trigger release before returning to idle (milliseconds)
    pub trigger_debounce_ms: u16,

    // --- Fire discipline ---
    /// Shots per semi-auto trigger pull (1 = true semi-auto)
    pub burst_size: u8,
    /// Shots before a forced reload is required (only with `force_reload`)
    pub shot_limit: u16,

    // --- Policy flags ---
    /// Halt firing at `shot_limit` until a magazine reload cycle is seen
    pub force_reload: bool,
    /// Keep firing bursts back-to-back while the trigger is held
    pub full_auto_burst: bool,
    /// Fire an extra burst on trigger release, not only on press
    pub binary_trigger: bool,
    /// Pulse the tracer output in sync with the solenoid
    pub muzzle_flash: bool,
    /// Reverse the electrical sense of the fire-selector switch
    pub invert_selector: bool,
}

impl Default for FireSettings {
    fn default() -> Self {
        Self {
            // Shot timing
            dwell_ms: 25,           // typical HPA poppet dwell
            shot_delay_ms: 55,      // ~12.5 rounds/s ceiling
            burst_delay_ms: 150,
            trigger_debounce_ms: 40,

            // Fire discipline
            burst_size: 1, // one shot per pull
            shot_limit: 30,

            // Policy flags
            force_reload: false,
            full_auto_burst: false,
            binary_trigger: false,
            muzzle_flash: false,
            invert_selector: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Build-time policy switches
// ---------------------------------------------------------------------------

/// Apply the binary-trigger tail to a FULL_AUTO trigger release as well.
pub const BINARY_TAIL_AFTER_FULL_AUTO: bool = false;

/// Apply the binary-trigger tail after a completed burst-continuation chain
/// (trigger released with `full_auto_burst` enabled).
pub const BINARY_TAIL_AFTER_BURST_CHAIN: bool = false;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_sane() {
        let s = FireSettings::default();
        assert!(s.dwell_ms > 0);
        assert!(s.burst_size >= 1);
        assert!(s.shot_limit > 0);
        assert!(s.shot_delay_ms + s.dwell_ms > 0);
    }

    #[test]
    fn default_cycle_fits_watchdog_budget() {
        let s = FireSettings::default();
        let longest_block = u32::from(s.dwell_ms) + u32::from(s.shot_delay_ms)
            + u32::from(s.burst_delay_ms);
        assert!(
            longest_block < crate::drivers::watchdog::FIRE_LOOP_WDT_MS,
            "longest blocking window must stay under the watchdog timeout"
        );
    }

    #[test]
    fn serde_roundtrip() {
        let s = FireSettings::default();
        let json = serde_json::to_string(&s).unwrap();
        let s2: FireSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(s, s2);
    }

    #[test]
    fn postcard_roundtrip() {
        let s = FireSettings {
            dwell_ms: 30,
            burst_size: 3,
            binary_trigger: true,
            ..FireSettings::default()
        };
        let bytes = postcard::to_allocvec(&s).unwrap();
        let s2: FireSettings = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(s, s2);
    }
}
