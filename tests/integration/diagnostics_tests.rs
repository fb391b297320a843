//! Diagnostics against the real NVS adapter.
//!
//! The module's unit tests use a bare mock store; these run the crash
//! ring and the odometer through [`NvsStore`] itself, alongside the
//! settings records it also holds, the way a deployed unit exercises
//! the partition.

use sear::adapters::nvs::NvsStore;
use sear::app::ports::{SettingsPort, StoragePort};
use sear::config::FireSettings;
use sear::diagnostics::{CrashLog, ShotOdometer};

#[test]
fn crash_ring_survives_reboot_in_the_real_store() {
    let mut nvs = NvsStore::new().unwrap();
    let mut log = CrashLog::new();
    log.record(&mut nvs, 10, "watchdog timeout");
    log.record(&mut nvs, 30, "solenoid gate fault");

    // Reboot: new log instance picks the counter back up.
    let mut rebooted = CrashLog::new();
    rebooted.init(&nvs);
    rebooted.record(&mut nvs, 5, "brownout");

    let entries = rebooted.read_all(&nvs);
    let seqs: Vec<u32> = entries.iter().map(|e| e.seq).collect();
    assert_eq!(seqs, vec![0, 1, 2]);
    assert_eq!(entries[2].reason.as_str(), "brownout");
    assert_eq!(rebooted.count(&nvs), 3);
}

#[test]
fn corrupt_slot_is_skipped() {
    let mut nvs = NvsStore::new().unwrap();
    let mut log = CrashLog::new();
    log.record(&mut nvs, 1, "first");
    log.record(&mut nvs, 2, "second");

    // Trample the first slot with bytes that cannot decode.
    nvs.write("diag", "e0", &[0xFF; 7]).unwrap();

    let entries = log.read_all(&nvs);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].seq, 1);
    // Replay on a damaged ring must not panic.
    log.replay(&nvs);
}

#[test]
fn settings_and_diagnostics_coexist() {
    let mut nvs = NvsStore::new().unwrap();

    let settings = FireSettings {
        burst_size: 3,
        ..FireSettings::default()
    };
    nvs.save(&settings).unwrap();

    let mut log = CrashLog::new();
    log.record(&mut nvs, 99, "interleaved");

    let (mut odometer, _) = ShotOdometer::load(&nvs);
    odometer.sync(5_000, &mut nvs);

    // All three records live side by side.
    assert_eq!(nvs.load(), Some(settings));
    assert_eq!(log.count(&nvs), 1);
    let (_, total) = ShotOdometer::load(&nvs);
    assert_eq!(total, 5_000);
}

#[test]
fn clear_resets_the_sequence() {
    let mut nvs = NvsStore::new().unwrap();
    let mut log = CrashLog::new();
    log.record(&mut nvs, 1, "x");
    log.record(&mut nvs, 2, "y");

    log.clear(&mut nvs);
    assert_eq!(log.count(&nvs), 0);

    log.record(&mut nvs, 3, "z");
    let entries = log.read_all(&nvs);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].seq, 0);
}

#[test]
fn odometer_round_trips_through_the_adapter() {
    let mut nvs = NvsStore::new().unwrap();
    let (mut odometer, total) = ShotOdometer::load(&nvs);
    assert_eq!(total, 0);

    odometer.sync(49, &mut nvs);
    assert!(!nvs.exists("diag", "odo"), "below the sync threshold");

    odometer.sync(50, &mut nvs);
    let (_, persisted) = ShotOdometer::load(&nvs);
    assert_eq!(persisted, 50);
}
