//! `localStorage`-backed persistence for the settings record
use crate::dom;
use clarity_core::KeyValueStore;
use web_sys::Storage;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebStorageError {
    #[error("localStorage is unavailable: {0}")]
    Unavailable(String),
    #[error("localStorage rejected the operation: {0}")]
    Rejected(String),
}

/// Browser storage for one page.
///
/// When the browser refuses `localStorage` the backend still works: reads
/// find nothing and writes fail, so the widget runs on defaults for the
/// rest of the session.
#[derive(Debug, Clone)]
pub struct LocalStorageBackend {
    storage: Option<Storage>,
    reason: String,
}

impl LocalStorageBackend {
    #[must_use]
    pub fn open() -> Self {
        match dom::local_storage() {
            Ok(storage) => Self {
                storage: Some(storage),
                reason: String::new(),
            },
            Err(err) => {
                let reason = dom::js_error_message(&err);
                log::warn!("settings will not persist: {reason}");
                Self {
                    storage: None,
                    reason,
                }
            }
        }
    }

    fn storage(&self) -> Result<&Storage, WebStorageError> {
        self.storage
            .as_ref()
            .ok_or_else(|| WebStorageError::Unavailable(self.reason.clone()))
    }
}

impl KeyValueStore for LocalStorageBackend {
    type Error = WebStorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let Some(storage) = self.storage.as_ref() else {
            return Ok(None);
        };
        storage
            .get_item(key)
            .map_err(|err| WebStorageError::Rejected(dom::js_error_message(&err)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| WebStorageError::Rejected(dom::js_error_message(&err)))
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.storage()?
            .remove_item(key)
            .map_err(|err| WebStorageError::Rejected(dom::js_error_message(&err)))
    }
}
