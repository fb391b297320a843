//! Crash logging and the lifetime shot odometer.
//!
//! Stores up to 4 crash entries in an NVS ring buffer under the "diag"
//! namespace.  Each entry captures uptime, a truncated panic reason and
//! a sequence number so interleaved reboots read back in order.  A
//! custom panic handler writes the entry before the TWDT or panic
//! handler triggers a reset.
//!
//! The odometer persists `ShotSession::total_fired` with a write-back
//! threshold: NVS wear stays bounded and a power cut loses at most one
//! magazine's worth of count.

use serde::{Deserialize, Serialize};

use crate::app::ports::StoragePort;

const DIAG_NAMESPACE: &str = "diag";
const CRASH_RING_SLOTS: usize = 4;
const CRASH_INDEX_KEY: &str = "idx";
const ODOMETER_KEY: &str = "odo";

/// Unsynced shots tolerated before the odometer hits flash.
const ODOMETER_SYNC_DELTA: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrashEntry {
    pub uptime_secs: u32,
    pub reason: heapless::String<64>,
    /// Monotonic write counter, survives ring wrap-around.
    pub seq: u32,
}

impl CrashEntry {
    pub fn new(uptime_secs: u32, reason: &str, seq: u32) -> Self {
        // Truncate on a char boundary; a slice panic here would fire
        // inside the panic hook itself.
        let mut end = reason.len().min(63);
        while !reason.is_char_boundary(end) {
            end -= 1;
        }
        let mut r = heapless::String::new();
        let _ = r.push_str(&reason[..end]);
        Self {
            uptime_secs,
            reason: r,
            seq,
        }
    }
}

/// NVS-backed ring buffer for crash entries.
#[derive(Default)]
pub struct CrashLog {
    /// Doubles as the sequence counter; slot = seq % ring size.
    seq: u32,
}

impl CrashLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the sequence counter from NVS, or default to 0.
    pub fn init(&mut self, nvs: &dyn StoragePort) {
        let mut buf = [0u8; 4];
        if let Ok(4) = nvs.read(DIAG_NAMESPACE, CRASH_INDEX_KEY, &mut buf) {
            self.seq = u32::from_le_bytes(buf);
        }
    }

    /// Write a crash reason to the next ring slot and advance the counter.
    pub fn record(&mut self, nvs: &mut dyn StoragePort, uptime_secs: u32, reason: &str) {
        let entry = CrashEntry::new(uptime_secs, reason, self.seq);
        let slot_key = Self::slot_key(self.seq as usize % CRASH_RING_SLOTS);
        if let Ok(bytes) = postcard::to_allocvec(&entry) {
            let _ = nvs.write(DIAG_NAMESPACE, &slot_key, &bytes);
        }

        self.seq = self.seq.wrapping_add(1);
        let _ = nvs.write(DIAG_NAMESPACE, CRASH_INDEX_KEY, &self.seq.to_le_bytes());
    }

    /// Read all stored crash entries, oldest first.
    pub fn read_all(&self, nvs: &dyn StoragePort) -> heapless::Vec<CrashEntry, CRASH_RING_SLOTS> {
        let mut entries: heapless::Vec<CrashEntry, CRASH_RING_SLOTS> = heapless::Vec::new();
        for i in 0..CRASH_RING_SLOTS {
            let mut buf = [0u8; 128];
            if let Ok(len) = nvs.read(DIAG_NAMESPACE, &Self::slot_key(i), &mut buf) {
                if let Ok(entry) = postcard::from_bytes::<CrashEntry>(&buf[..len]) {
                    let _ = entries.push(entry);
                }
            }
        }
        entries.sort_unstable_by_key(|e| e.seq);
        entries
    }

    /// Erase all crash entries and reset the counter.
    pub fn clear(&mut self, nvs: &mut dyn StoragePort) {
        for i in 0..CRASH_RING_SLOTS {
            let _ = nvs.delete(DIAG_NAMESPACE, &Self::slot_key(i));
        }
        let _ = nvs.delete(DIAG_NAMESPACE, CRASH_INDEX_KEY);
        self.seq = 0;
    }

    pub fn count(&self, nvs: &dyn StoragePort) -> usize {
        (0..CRASH_RING_SLOTS)
            .filter(|i| nvs.exists(DIAG_NAMESPACE, &Self::slot_key(*i)))
            .count()
    }

    /// Log every stored entry at boot so a field unit's crash history
    /// shows up on the console without extra tooling.
    pub fn replay(&self, nvs: &dyn StoragePort) {
        let entries = self.read_all(nvs);
        if entries.is_empty() {
            return;
        }
        log::warn!("DIAG | {} stored crash record(s):", entries.len());
        for entry in &entries {
            log::warn!(
                "DIAG |   #{} at uptime {}s: {}",
                entry.seq,
                entry.uptime_secs,
                entry.reason
            );
        }
    }

    fn slot_key(index: usize) -> heapless::String<16> {
        let mut s = heapless::String::new();
        let _ = core::fmt::Write::write_fmt(&mut s, format_args!("e{}", index));
        s
    }
}

// ───────────────────────────────────────────────────────────────
// Shot odometer
// ───────────────────────────────────────────────────────────────

/// Lifetime shot counter with wear-bounded persistence.
pub struct ShotOdometer {
    last_synced: u32,
}

impl ShotOdometer {
    /// Load the persisted count; the caller seeds
    /// `ShotSession::total_fired` with the returned value.
    pub fn load(nvs: &dyn StoragePort) -> (Self, u32) {
        let mut buf = [0u8; 4];
        let total = match nvs.read(DIAG_NAMESPACE, ODOMETER_KEY, &mut buf) {
            Ok(4) => u32::from_le_bytes(buf),
            _ => 0,
        };
        (Self { last_synced: total }, total)
    }

    /// Persist `total_fired` once the unsynced delta reaches the
    /// threshold.  Call every loop iteration; it is a no-op almost
    /// always.
    pub fn sync(&mut self, total_fired: u32, nvs: &mut dyn StoragePort) {
        if total_fired.wrapping_sub(self.last_synced) < ODOMETER_SYNC_DELTA {
            return;
        }
        if nvs
            .write(DIAG_NAMESPACE, ODOMETER_KEY, &total_fired.to_le_bytes())
            .is_ok()
        {
            self.last_synced = total_fired;
            log::debug!("DIAG | odometer synced at {}", total_fired);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Custom panic handler — writes a CrashEntry to NVS before reset
// ───────────────────────────────────────────────────────────────

/// Install a panic hook that persists crash info to NVS.
///
/// Must be called once during init, after NVS is ready.  On panic,
/// captures the reason string and writes a CrashEntry to the ring
/// before the default handler aborts.
pub fn install_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        let reason = if let Some(msg) = info.payload().downcast_ref::<&str>() {
            *msg
        } else if let Some(msg) = info.payload().downcast_ref::<String>() {
            msg.as_str()
        } else {
            "unknown panic"
        };

        log::error!("PANIC: {}", reason);

        #[cfg(target_os = "espidf")]
        {
            // SAFETY: esp_timer_get_time is a plain counter read with no
            // allocation; safe in panic context.
            let uptime =
                ((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) / 1_000_000) as u32;

            // NVS flash was initialised in main() long before any panic
            // can reach here; constructing a store only opens handles.
            // If that still fails we log and let the reset proceed.
            match crate::adapters::nvs::NvsStore::new() {
                Ok(mut nvs) => {
                    let mut crash_log = CrashLog::new();
                    crash_log.init(&nvs);
                    crash_log.record(&mut nvs, uptime, reason);
                }
                Err(_) => {
                    log::error!("PANIC: NVS unavailable, crash entry not persisted");
                }
            }
        }
    }));
}
