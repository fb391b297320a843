#![allow(dead_code)] // Variants reserved for typed returns across the port seams

//! Unified error types for the Sear firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! bring-up path's error handling uniform.  All variants are `Copy` so they
//! can be cheaply passed around without allocation.  The firing path itself
//! is infallible by design: a shot either completes its timing sequence or
//! never starts, so nothing here leaks into the state machine.

use core::fmt;

use crate::app::ports::{SettingsError, StorageError};

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Settings could not be validated, encoded or persisted.
    Settings(SettingsError),
    /// Raw key/value storage access failed.
    Storage(StorageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Settings(e) => write!(f, "settings: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<SettingsError> for Error {
    fn from(e: SettingsError) -> Self {
        Self::Settings(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
