//! Fuzz target: full control loop under arbitrary switch activity
//!
//! Byte 0 picks the fire-discipline configuration, bytes 1-4 seed the
//! clock (wrapping arithmetic included), and every following byte is one
//! control-loop iteration's raw switch levels.  Whatever the operator
//! does to the switches:
//! - No panics
//! - The shot counter never passes the configured limit
//! - The burst counter never overruns the burst size
//! - The solenoid is de-energized between iterations
//!
//! cargo fuzz run fuzz_input_sequence

#![no_main]

use libfuzzer_sys::fuzz_target;
use sear::app::events::AppEvent;
use sear::app::ports::{
    ActuatorPort, EventSink, InputPort, MenuExit, MenuPort, MenuResult, SettingsError,
    SettingsPort, TimePort,
};
use sear::app::service::FireControl;
use sear::config::FireSettings;
use sear::input::{ButtonId, InputScanner};
use std::cell::Cell;

// ── Mask-driven port stack ────────────────────────────────────

struct MaskIo {
    mask: u8,
    solenoid: bool,
}

impl InputPort for MaskIo {
    fn sample(&mut self, id: ButtonId) -> bool {
        self.mask & (1 << id as usize) != 0
    }
}

impl ActuatorPort for MaskIo {
    fn set_solenoid(&mut self, on: bool) {
        self.solenoid = on;
    }
    fn set_tracer(&mut self, _on: bool) {}
    fn all_off(&mut self) {
        self.solenoid = false;
    }
}

struct FakeClock(Cell<u32>);

impl TimePort for FakeClock {
    fn now_ms(&self) -> u32 {
        self.0.get()
    }
    fn delay_ms(&self, ms: u32) {
        self.0.set(self.0.get().wrapping_add(ms));
    }
    fn uptime_secs(&self) -> u32 {
        self.0.get() / 1000
    }
}

struct PassMenu;

impl MenuPort for PassMenu {
    fn open(&mut self, _snapshot: FireSettings) {}
    fn update(&mut self, _inputs: &mut InputScanner) -> MenuResult {
        MenuResult::DiscardAndExit
    }
    fn commit(&mut self, _current: &mut FireSettings) -> bool {
        false
    }
    fn show_exit_message(&mut self, _kind: MenuExit, _duration_ms: u32) {}
}

struct NullStore;

impl SettingsPort for NullStore {
    fn load(&self) -> Option<FireSettings> {
        None
    }
    fn save(&mut self, _settings: &FireSettings) -> Result<(), SettingsError> {
        Ok(())
    }
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }

    let settings = FireSettings {
        burst_size: (data[0] % 10) + 1,
        shot_limit: 5,
        force_reload: data[0] & 0x10 != 0,
        full_auto_burst: data[0] & 0x20 != 0,
        binary_trigger: data[0] & 0x40 != 0,
        invert_selector: data[0] & 0x80 != 0,
        ..FireSettings::default()
    };
    let limit = settings.shot_limit;
    let burst = settings.burst_size;

    let mut service = FireControl::new(settings);
    let mut io = MaskIo { mask: 0, solenoid: false };
    let clock = FakeClock(Cell::new(u32::from_le_bytes([
        data[1], data[2], data[3], data[4],
    ])));
    let mut menu = PassMenu;
    let mut store = NullStore;
    let mut sink = NullSink;

    service.start(&mut io, &clock, &mut menu, &mut store, &mut sink);

    for byte in &data[5..] {
        io.mask = *byte;
        service.tick(&mut io, &clock, &mut menu, &mut store, &mut sink);
        clock.delay_ms(1);

        let session = service.session();
        assert!(
            session.shot_count <= limit,
            "shot counter passed the limit: {}",
            session.shot_count
        );
        assert!(
            session.current_burst_shot_count <= burst,
            "burst counter overran: {}",
            session.current_burst_shot_count
        );
        assert!(!io.solenoid, "solenoid left energized between iterations");
    }
});
