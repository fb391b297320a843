//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO registers, and plays back switch
//! levels for the input side of the same adapter.

use std::cell::Cell;
use std::collections::HashMap;

use sear::app::events::AppEvent;
use sear::app::ports::{
    ActuatorPort, DisplayPort, EventSink, InputPort, SettingsError, SettingsPort, StorageError,
    StoragePort, TimePort,
};
use sear::config::FireSettings;
use sear::input::ButtonId;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Solenoid(bool),
    Tracer(bool),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

/// Switch bank plus gate drive on one adapter, mirroring the real GPIO
/// bank the service is wired to.
pub struct MockHardware {
    pub pressed: [bool; ButtonId::COUNT],
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            pressed: [false; ButtonId::COUNT],
            calls: Vec::new(),
        }
    }

    pub fn press(&mut self, id: ButtonId) {
        self.pressed[id as usize] = true;
    }

    pub fn release(&mut self, id: ButtonId) {
        self.pressed[id as usize] = false;
    }

    pub fn last_call(&self) -> Option<&ActuatorCall> {
        self.calls.last()
    }

    /// Rising edges on the solenoid gate — one per shot.
    pub fn pulse_count(&self) -> u32 {
        self.calls
            .iter()
            .filter(|c| matches!(c, ActuatorCall::Solenoid(true)))
            .count() as u32
    }

    pub fn solenoid_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Solenoid(on) => Some(*on),
                ActuatorCall::AllOff => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn tracer_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Tracer(on) => Some(*on),
                ActuatorCall::AllOff => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl InputPort for MockHardware {
    fn sample(&mut self, id: ButtonId) -> bool {
        self.pressed[id as usize]
    }
}

impl ActuatorPort for MockHardware {
    fn set_solenoid(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Solenoid(on));
    }

    fn set_tracer(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Tracer(on));
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// Fake monotonic clock; `delay_ms` jumps it forward, so shot timing
/// and debounce windows behave as on hardware without real sleeps.
pub struct MockClock(pub Cell<u32>);

#[allow(dead_code)]
impl MockClock {
    pub fn new() -> Self {
        Self(Cell::new(0))
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimePort for MockClock {
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

// ── MockNvs ───────────────────────────────────────────────────

/// In-memory store implementing both persistence ports.  The settings
/// side records save calls verbatim so tests can assert on exactly what
/// the machine tried to persist.
pub struct MockNvs {
    store: HashMap<String, Vec<u8>>,
    pub loaded: Option<FireSettings>,
    pub saves: Vec<FireSettings>,
}

#[allow(dead_code)]
impl MockNvs {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            loaded: None,
            saves: Vec::new(),
        }
    }
}

impl Default for MockNvs {
    fn default() -> Self {
        Self::new()
    }
}

impl StoragePort for MockNvs {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        match self.store.get(&format!("{namespace}::{key}")) {
            Some(data) if data.len() > buf.len() => Err(StorageError::IoError),
            Some(data) => {
                buf[..data.len()].copy_from_slice(data);
                Ok(data.len())
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.store
            .insert(format!("{namespace}::{key}"), data.to_vec());
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        self.store.remove(&format!("{namespace}::{key}"));
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.store.contains_key(&format!("{namespace}::{key}"))
    }
}

impl SettingsPort for MockNvs {
    fn load(&self) -> Option<FireSettings> {
        self.loaded.clone()
    }

    fn save(&mut self, settings: &FireSettings) -> Result<(), SettingsError> {
        self.saves.push(settings.clone());
        Ok(())
    }
}

// ── NullDisplay ───────────────────────────────────────────────

pub struct NullDisplay;

impl DisplayPort for NullDisplay {
    fn show(&mut self, _line0: &str, _line1: &str) {}
}

// ── RecSink ───────────────────────────────────────────────────

/// Event sink that keeps the typed event stream for assertions.
pub struct RecSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }

    pub fn count_shots(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::ShotFired { .. }))
            .count()
    }
}

impl Default for RecSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
