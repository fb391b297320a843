//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`SettingsPort`] and [`StoragePort`] over the ESP-IDF NVS
//! partition; on non-espidf targets an in-memory map stands in so the
//! whole persistence path runs under host tests.
//!
//! The settings record is framed as a 4-byte version marker followed by
//! a postcard payload.  Any blob that fails the marker, the decode, or
//! range validation reads as "no stored settings" — the device then
//! falls back to compiled-in defaults rather than running on garbage.
//!
//! Writes are atomic: ESP-IDF commits per `nvs_commit()`, the simulation
//! map trivially so.  Validation happens before every persist; an
//! out-of-range dwell must never reach flash.

use log::{info, warn};

use crate::app::ports::{SettingsError, SettingsPort, StorageError, StoragePort};
use crate::config::FireSettings;

#[cfg(not(target_os = "espidf"))]
use std::cell::RefCell;
#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const SETTINGS_NAMESPACE: &str = "sear";
const SETTINGS_KEY: &str = "settings";

/// Version marker ahead of the postcard payload.  Bump the digit when
/// the record layout changes; old blobs then read as absent.
const SETTINGS_MAGIC: &[u8; 4] = b"SFC1";

/// Upper bound for the framed settings record.  The postcard encoding
/// of [`FireSettings`] stays well under this.
const SETTINGS_BLOB_MAX: usize = 64;

pub struct NvsStore {
    #[cfg(not(target_os = "espidf"))]
    store: RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsStore {
    /// Create the store and initialise NVS flash.
    ///
    /// On first boot or after an NVS version mismatch the partition is
    /// erased and re-initialised automatically.
    pub fn new() -> crate::error::Result<Self> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase run from the single
            // main-task context before any concurrent NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS | erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK {
                    return Err(crate::error::Error::Init("NVS flash erase failed"));
                }
                if unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(crate::error::Error::Init("NVS flash re-init failed"));
                }
            } else if ret != ESP_OK {
                return Err(crate::error::Error::Init("NVS flash init failed"));
            }
            info!("NVS | flash initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NVS | simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: RefCell::new(HashMap::new()),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    /// Degraded store that skips flash init.  Bring-up falls back to
    /// this when [`NvsStore::new`] fails: the unit runs on defaults and
    /// persistence quietly does nothing until the next healthy boot.
    pub fn unavailable() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            store: RefCell::new(HashMap::new()),
        }
    }

    /// Open an NVS namespace, run a closure with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(namespace: &str, write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        // NVS namespace/key names are limited to 15 chars.
        let mut ns_buf = [0u8; 16];
        let ns_bytes = namespace.as_bytes();
        let len = ns_bytes.len().min(15);
        ns_buf[..len].copy_from_slice(&ns_bytes[..len]);

        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(ns_buf.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }

    #[cfg(target_os = "espidf")]
    fn c_key(key: &str) -> [u8; 16] {
        let mut key_buf = [0u8; 16];
        let kb = key.as_bytes();
        let kl = kb.len().min(15);
        key_buf[..kl].copy_from_slice(&kb[..kl]);
        key_buf
    }
}

/// Range-check every field against the solenoid's and the menu's limits.
fn validate_settings(settings: &FireSettings) -> Result<(), SettingsError> {
    if !(1..=200).contains(&settings.dwell_ms) {
        return Err(SettingsError::Validation("dwell_ms must be 1-200"));
    }
    if settings.shot_delay_ms > 1_000 {
        return Err(SettingsError::Validation("shot_delay_ms must be 0-1000"));
    }
    if settings.burst_delay_ms > 5_000 {
        return Err(SettingsError::Validation("burst_delay_ms must be 0-5000"));
    }
    if settings.trigger_debounce_ms > 500 {
        return Err(SettingsError::Validation("trigger_debounce_ms must be 0-500"));
    }
    if !(1..=10).contains(&settings.burst_size) {
        return Err(SettingsError::Validation("burst_size must be 1-10"));
    }
    if !(1..=10_000).contains(&settings.shot_limit) {
        return Err(SettingsError::Validation("shot_limit must be 1-10000"));
    }
    Ok(())
}

impl SettingsPort for NvsStore {
    fn load(&self) -> Option<FireSettings> {
        let mut buf = [0u8; SETTINGS_BLOB_MAX];
        let len = match StoragePort::read(self, SETTINGS_NAMESPACE, SETTINGS_KEY, &mut buf) {
            Ok(len) => len,
            Err(StorageError::NotFound) => {
                info!("NVS | no stored settings");
                return None;
            }
            Err(err) => {
                warn!("NVS | settings read failed: {err}");
                return None;
            }
        };

        let blob = &buf[..len];
        if blob.len() < SETTINGS_MAGIC.len() || &blob[..SETTINGS_MAGIC.len()] != SETTINGS_MAGIC {
            warn!("NVS | settings marker mismatch, ignoring stored record");
            return None;
        }

        let settings: FireSettings = match postcard::from_bytes(&blob[SETTINGS_MAGIC.len()..]) {
            Ok(settings) => settings,
            Err(_) => {
                warn!("NVS | stored settings undecodable, ignoring");
                return None;
            }
        };

        // A blob written by older firmware may decode fine and still be
        // out of range for this build.
        if let Err(err) = validate_settings(&settings) {
            warn!("NVS | stored settings invalid ({err}), ignoring");
            return None;
        }

        info!("NVS | settings loaded ({} bytes)", blob.len());
        Some(settings)
    }

    fn save(&mut self, settings: &FireSettings) -> Result<(), SettingsError> {
        validate_settings(settings)?;

        let payload = postcard::to_allocvec(settings).map_err(|_| SettingsError::Encode)?;
        let mut framed = Vec::with_capacity(SETTINGS_MAGIC.len() + payload.len());
        framed.extend_from_slice(SETTINGS_MAGIC);
        framed.extend_from_slice(&payload);

        self.write(SETTINGS_NAMESPACE, SETTINGS_KEY, &framed)
            .map_err(|_| SettingsError::Io)?;
        info!("NVS | settings saved ({} bytes)", framed.len());
        Ok(())
    }
}

impl StoragePort for NvsStore {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            match self.store.borrow().get(&composite) {
                Some(data) if data.len() <= buf.len() => {
                    buf[..data.len()].copy_from_slice(data);
                    Ok(data.len())
                }
                // Undersized buffer reads fail the same way ESP-IDF's
                // nvs_get_blob does.
                Some(_) => Err(StorageError::IoError),
                None => Err(StorageError::NotFound),
            }
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(namespace, false, |handle| {
                let key_buf = Self::c_key(key);
                let mut size = buf.len();
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        key_buf.as_ptr() as *const _,
                        buf.as_mut_ptr() as *mut _,
                        &mut size,
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(size)
            });
            match result {
                Ok(size) => Ok(size),
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND => Err(StorageError::NotFound),
                Err(_) => Err(StorageError::IoError),
            }
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            self.store.borrow_mut().insert(composite, data.to_vec());
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(namespace, true, |handle| {
                let key_buf = Self::c_key(key);
                let ret = unsafe {
                    nvs_set_blob(
                        handle,
                        key_buf.as_ptr() as *const _,
                        data.as_ptr() as *const _,
                        data.len(),
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            });
            match result {
                Ok(()) => Ok(()),
                Err(e) if e == ESP_ERR_NVS_NOT_ENOUGH_SPACE => Err(StorageError::Full),
                Err(_) => Err(StorageError::IoError),
            }
        }
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            self.store.borrow_mut().remove(&composite);
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(namespace, true, |handle| {
                let key_buf = Self::c_key(key);
                let ret = unsafe { nvs_erase_key(handle, key_buf.as_ptr() as *const _) };
                if ret != ESP_OK && ret != ESP_ERR_NVS_NOT_FOUND {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            });
            result.map_err(|_| StorageError::IoError)
        }
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            self.store.borrow().contains_key(&composite)
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(namespace, false, |handle| {
                let key_buf = Self::c_key(key);
                let ret = unsafe {
                    nvs_find_key(handle, key_buf.as_ptr() as *const _, core::ptr::null_mut())
                };
                Ok(ret == ESP_OK)
            });
            result.unwrap_or(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> NvsStore {
        NvsStore::new().unwrap()
    }

    #[test]
    fn defaults_pass_validation() {
        assert!(validate_settings(&FireSettings::default()).is_ok());
    }

    #[test]
    fn save_rejects_out_of_range_fields() {
        let mut nvs = store();
        let cases = [
            FireSettings { dwell_ms: 0, ..FireSettings::default() },
            FireSettings { dwell_ms: 201, ..FireSettings::default() },
            FireSettings { shot_delay_ms: 1_001, ..FireSettings::default() },
            FireSettings { burst_delay_ms: 5_001, ..FireSettings::default() },
            FireSettings { trigger_debounce_ms: 501, ..FireSettings::default() },
            FireSettings { burst_size: 0, ..FireSettings::default() },
            FireSettings { burst_size: 11, ..FireSettings::default() },
            FireSettings { shot_limit: 0, ..FireSettings::default() },
        ];
        for bad in cases {
            assert!(
                matches!(nvs.save(&bad), Err(SettingsError::Validation(_))),
                "accepted {bad:?}"
            );
            assert!(!nvs.exists(SETTINGS_NAMESPACE, SETTINGS_KEY), "bad record persisted");
        }
    }

    #[test]
    fn save_load_roundtrip() {
        let mut nvs = store();
        let settings = FireSettings {
            dwell_ms: 30,
            burst_size: 3,
            binary_trigger: true,
            shot_limit: 120,
            ..FireSettings::default()
        };
        nvs.save(&settings).unwrap();
        assert_eq!(nvs.load(), Some(settings));
    }

    #[test]
    fn load_empty_store_returns_none() {
        assert_eq!(store().load(), None);
    }

    #[test]
    fn load_rejects_marker_mismatch() {
        let mut nvs = store();
        nvs.save(&FireSettings::default()).unwrap();

        // Overwrite the record with an older marker.
        let mut buf = [0u8; SETTINGS_BLOB_MAX];
        let len = nvs.read(SETTINGS_NAMESPACE, SETTINGS_KEY, &mut buf).unwrap();
        let mut blob = buf[..len].to_vec();
        blob[..4].copy_from_slice(b"SFC0");
        nvs.write(SETTINGS_NAMESPACE, SETTINGS_KEY, &blob).unwrap();

        assert_eq!(nvs.load(), None);
    }

    #[test]
    fn load_rejects_truncated_payload() {
        let mut nvs = store();
        nvs.write(SETTINGS_NAMESPACE, SETTINGS_KEY, b"SF").unwrap();
        assert_eq!(nvs.load(), None);
    }

    #[test]
    fn load_rejects_undecodable_payload() {
        let mut nvs = store();
        let mut blob = SETTINGS_MAGIC.to_vec();
        blob.push(0xFF);
        nvs.write(SETTINGS_NAMESPACE, SETTINGS_KEY, &blob).unwrap();
        assert_eq!(nvs.load(), None);
    }

    #[test]
    fn load_rejects_decodable_but_out_of_range_record() {
        // An older firmware with laxer rules could have persisted this.
        let mut nvs = store();
        let rogue = FireSettings { dwell_ms: 0, ..FireSettings::default() };
        let mut blob = SETTINGS_MAGIC.to_vec();
        blob.extend_from_slice(&postcard::to_allocvec(&rogue).unwrap());
        nvs.write(SETTINGS_NAMESPACE, SETTINGS_KEY, &blob).unwrap();
        assert_eq!(nvs.load(), None);
    }

    #[test]
    fn storage_round_trip() {
        let mut nvs = store();
        let data = b"hello NVS";
        nvs.write("test_ns", "greeting", data).unwrap();
        assert!(nvs.exists("test_ns", "greeting"));

        let mut buf = [0u8; 64];
        let len = nvs.read("test_ns", "greeting", &mut buf).unwrap();
        assert_eq!(&buf[..len], data);

        nvs.delete("test_ns", "greeting").unwrap();
        assert!(!nvs.exists("test_ns", "greeting"));
    }

    #[test]
    fn storage_read_missing_key() {
        let nvs = store();
        let mut buf = [0u8; 64];
        assert!(matches!(nvs.read("ns", "nope", &mut buf), Err(StorageError::NotFound)));
    }

    #[test]
    fn storage_read_undersized_buffer_fails() {
        let mut nvs = store();
        nvs.write("ns", "big", &[0xAB; 32]).unwrap();
        let mut buf = [0u8; 8];
        assert!(matches!(nvs.read("ns", "big", &mut buf), Err(StorageError::IoError)));
    }

    #[test]
    fn namespace_isolation() {
        let mut nvs = store();
        nvs.write("ns_a", "key", b"alpha").unwrap();
        nvs.write("ns_b", "key", b"bravo").unwrap();

        let mut buf = [0u8; 64];
        let len = nvs.read("ns_a", "key", &mut buf).unwrap();
        assert_eq!(&buf[..len], b"alpha");

        let len = nvs.read("ns_b", "key", &mut buf).unwrap();
        assert_eq!(&buf[..len], b"bravo");
    }
}
