//! Preference store trait
//!
//! Thin key-value abstraction over whatever flat preference mechanism
//! the board provides (NVS namespace, EEPROM emulation, ...). Used only
//! at startup (load) and on state change (save).

/// Errors from the preference store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Store not reachable; caller continues with in-memory state
    Unavailable,
}

/// Trait for the persistence collaborator
///
/// Gets are infallible by contract: a missing or unreadable key yields
/// the supplied default. Puts may fail, and put failures are
/// log-and-continue, never fatal.
pub trait PreferenceStore {
    /// Fetch a float preference, or `default` if absent
    fn get_f32(&mut self, key: &str, default: f32) -> f32;

    /// Fetch a boolean preference, or `default` if absent
    fn get_bool(&mut self, key: &str, default: bool) -> bool;

    /// Store a float preference
    fn put_f32(&mut self, key: &str, value: f32) -> Result<(), StorageError>;

    /// Store a boolean preference
    fn put_bool(&mut self, key: &str, value: bool) -> Result<(), StorageError>;
}

/// No-op store for devices without persistence
impl PreferenceStore for () {
    fn get_f32(&mut self, _key: &str, default: f32) -> f32 {
        default
    }

    fn get_bool(&mut self, _key: &str, default: bool) -> bool {
        default
    }

    fn put_f32(&mut self, _key: &str, _value: f32) -> Result<(), StorageError> {
        Ok(())
    }

    fn put_bool(&mut self, _key: &str, _value: bool) -> Result<(), StorageError> {
        Ok(())
    }
}
