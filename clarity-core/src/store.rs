//! Persistence of the settings record behind a key-value capability
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::flags::FlagName;
use crate::scale::FontScale;
use crate::settings::SettingsRecord;

/// String key-value storage such as the browser's `localStorage`.
///
/// Platform-specific implementations should provide this.
pub trait KeyValueStore {
    type Error: std::error::Error + 'static;

    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be accessed at all.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is refused (quota, disabled storage).
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Delete `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be accessed.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// Reasons a persisted blob could not be turned into a record.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("storage unreadable: {0}")]
    Unreadable(String),
    #[error("persisted settings are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("persisted settings have the wrong shape: {0}")]
    Malformed(String),
}

/// Reasons a record could not be written.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage write failed: {0}")]
    Write(String),
    #[error("settings serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Loads, repairs and saves one widget's [`SettingsRecord`] under a fixed key.
#[derive(Debug, Clone)]
pub struct SettingsStore<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// Load the persisted record, falling back to defaults on any problem.
    #[must_use]
    pub fn load(&self) -> SettingsRecord {
        match self.try_load() {
            Ok(Some(record)) => record,
            Ok(None) => SettingsRecord::default(),
            Err(err) => {
                log::warn!("discarding persisted settings under '{}': {err}", self.key);
                SettingsRecord::default()
            }
        }
    }

    /// Strict load: `Ok(None)` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if storage is unreadable or the blob is malformed.
    pub fn try_load(&self) -> Result<Option<SettingsRecord>, LoadError> {
        let raw = self
            .backend
            .get(&self.key)
            .map_err(|e| LoadError::Unreadable(e.to_string()))?;
        raw.as_deref().map(decode).transpose()
    }

    /// Serialize and write the whole record.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub fn save(&self, record: &SettingsRecord) -> Result<(), PersistenceError> {
        let blob = encode(record)?;
        self.backend
            .set(&self.key, &blob)
            .map_err(|e| PersistenceError::Write(e.to_string()))
    }

    /// Forget the persisted record.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be accessed.
    pub fn clear(&self) -> Result<(), PersistenceError> {
        self.backend
            .remove(&self.key)
            .map_err(|e| PersistenceError::Write(e.to_string()))
    }
}

/// Canonical serialized form: `{"fontScale":N,"flags":{...}}`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(record: &SettingsRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string(record)
}

/// Parse any known blob shape and merge it over defaults.
///
/// Accepts the canonical shape, the nested `{fontSize, settings:{..}}` shape and
/// the flat `{fontSize, highContrast, ..}` shape. Unknown keys are dropped.
///
/// # Errors
///
/// Returns an error if the text is not JSON or a known field has the wrong type.
pub fn decode(raw: &str) -> Result<SettingsRecord, LoadError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(root) = value else {
        return Err(LoadError::Malformed("root is not an object".to_string()));
    };

    let mut record = SettingsRecord::default();
    if let Some(scale) = root.get("fontScale").or_else(|| root.get("fontSize")) {
        record.font_scale = decode_scale(scale)?;
    }

    let flag_source = match root.get("flags").or_else(|| root.get("settings")) {
        Some(Value::Object(nested)) => nested,
        Some(Value::Null) | None => &root,
        Some(_) => return Err(LoadError::Malformed("flags is not an object".to_string())),
    };
    decode_flags(flag_source, &mut record)?;
    Ok(record)
}

fn decode_scale(value: &Value) -> Result<FontScale, LoadError> {
    match value {
        Value::Null => Ok(FontScale::DEFAULT),
        Value::Number(number) => {
            let percent = number
                .as_i64()
                .or_else(|| number.as_f64().map(f64::round).map(saturating_i64))
                .unwrap_or(i64::from(FontScale::DEFAULT.percent()));
            // Zero is how older blobs spelled "never changed".
            if percent == 0 {
                Ok(FontScale::DEFAULT)
            } else {
                Ok(FontScale::clamped(percent))
            }
        }
        other => Err(LoadError::Malformed(format!(
            "fontScale must be a number, got {other}"
        ))),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn saturating_i64(value: f64) -> i64 {
    // `as` saturates on overflow and maps NaN to zero.
    value as i64
}

fn decode_flags(source: &Map<String, Value>, record: &mut SettingsRecord) -> Result<(), LoadError> {
    for flag in FlagName::ALL {
        match source.get(flag.key()) {
            None | Some(Value::Null) => {}
            Some(Value::Bool(on)) => record.set_flag(flag, *on),
            Some(other) => {
                return Err(LoadError::Malformed(format!(
                    "{flag} must be a boolean, got {other}"
                )));
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MemoryStoreError {
    #[error("writes are disabled")]
    WritesDisabled,
    #[error("storage is unavailable")]
    Unavailable,
}

/// In-process [`KeyValueStore`]; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    reject_writes: Rc<Cell<bool>>,
    unavailable: Rc<Cell<bool>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail, as a full quota would.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    /// Make every access fail, as disabled storage would.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    /// Write a raw value, bypassing the failure switches.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    type Error = MemoryStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        if self.unavailable.get() {
            return Err(MemoryStoreError::Unavailable);
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        if self.unavailable.get() {
            return Err(MemoryStoreError::Unavailable);
        }
        if self.reject_writes.get() {
            return Err(MemoryStoreError::WritesDisabled);
        }
        self.insert_raw(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        if self.unavailable.get() {
            return Err(MemoryStoreError::Unavailable);
        }
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "test-settings";

    fn store() -> SettingsStore<MemoryStore> {
        SettingsStore::new(MemoryStore::new(), KEY)
    }

    #[test]
    fn absent_blob_loads_defaults() {
        let store = store();
        assert!(store.try_load().unwrap().is_none());
        assert!(store.load().is_default());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let store = store();
        let mut record = SettingsRecord::default();
        record.font_scale = FontScale::clamped(140);
        record.set_flag(FlagName::LargeCursor, true);
        store.save(&record).unwrap();
        assert_eq!(store.load(), record);
    }

    #[test]
    fn garbage_blob_falls_back_to_defaults() {
        let store = store();
        store.backend().insert_raw(KEY, "{not json");
        assert!(matches!(store.try_load(), Err(LoadError::Parse(_))));
        assert!(store.load().is_default());
    }

    #[test]
    fn wrong_types_reject_the_whole_blob() {
        let store = store();
        store
            .backend()
            .insert_raw(KEY, r#"{"fontScale":150,"flags":{"highContrast":"yes"}}"#);
        assert!(matches!(store.try_load(), Err(LoadError::Malformed(_))));
        assert!(store.load().is_default());

        store.backend().insert_raw(KEY, "[1,2,3]");
        assert!(matches!(store.try_load(), Err(LoadError::Malformed(_))));

        store.backend().insert_raw(KEY, r#"{"fontScale":"huge"}"#);
        assert!(matches!(store.try_load(), Err(LoadError::Malformed(_))));
    }

    #[test]
    fn nested_legacy_shape_loads() {
        let record = decode(
            r#"{"fontSize":125,"settings":{"highContrast":true,"readableFont":false,"extra":1}}"#,
        )
        .unwrap();
        assert_eq!(record.font_scale.percent(), 125);
        assert!(record.flag(FlagName::HighContrast));
        assert!(!record.flag(FlagName::DisableAnimations));
    }

    #[test]
    fn flat_legacy_shape_loads_and_drops_unknown_keys() {
        let record = decode(
            r#"{"fontSize":120,"readableFont":true,"disableAnimations":true,"lineHeight":1.8,"letterSpacing":"0.1em"}"#,
        )
        .unwrap();
        assert_eq!(record.font_scale.percent(), 120);
        assert!(record.flag(FlagName::ReadableFont));
        assert!(record.flag(FlagName::DisableAnimations));
    }

    #[test]
    fn out_of_range_and_unset_scales_are_repaired() {
        assert_eq!(decode(r#"{"fontScale":500}"#).unwrap().font_scale, FontScale::MAX);
        assert_eq!(decode(r#"{"fontScale":10}"#).unwrap().font_scale, FontScale::MIN);
        assert_eq!(decode(r#"{"fontSize":0}"#).unwrap().font_scale, FontScale::DEFAULT);
        assert_eq!(decode(r#"{"fontScale":112.6}"#).unwrap().font_scale.percent(), 113);
        assert_eq!(decode(r#"{"fontScale":null}"#).unwrap().font_scale, FontScale::DEFAULT);
    }

    #[test]
    fn save_always_writes_canonical_shape() {
        let store = store();
        store.backend().insert_raw(KEY, r#"{"fontSize":150,"settings":{"largeCursor":true}}"#);
        let record = store.load();
        store.save(&record).unwrap();
        let raw: Value = serde_json::from_str(&store.backend().raw(KEY).unwrap()).unwrap();
        assert_eq!(raw["fontScale"], 150);
        assert_eq!(raw["flags"]["largeCursor"], true);
        assert!(raw.get("settings").is_none());
    }

    #[test]
    fn rejected_write_reports_error() {
        let store = store();
        store.backend().reject_writes(true);
        let err = store.save(&SettingsRecord::default()).unwrap_err();
        assert!(matches!(err, PersistenceError::Write(_)));
        assert!(store.backend().is_empty());
    }

    #[test]
    fn unreadable_storage_loads_defaults() {
        let store = store();
        store.backend().insert_raw(KEY, r#"{"fontScale":150}"#);
        store.backend().set_unavailable(true);
        assert!(matches!(store.try_load(), Err(LoadError::Unreadable(_))));
        assert!(store.load().is_default());
    }

    #[test]
    fn clear_removes_the_blob() {
        let store = store();
        store.save(&SettingsRecord::default()).unwrap();
        store.clear().unwrap();
        assert!(store.backend().raw(KEY).is_none());
    }
}
