//! Origin-scoped key/value preferences.
//!
//! Values are plain strings and are written without validation; typed
//! interpretation (and fallback to defaults) belongs to the caller.

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefsError {
    #[error("browser storage unavailable")]
    StorageUnavailable,
    #[error("preference storage error: {0}")]
    Io(String),
}

/// Well-known preference keys.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrefKey {
    DefaultLat,
    DefaultLng,
    DefaultZoom,
    SelectedBasemap,
}

impl PrefKey {
    pub const ALL: [PrefKey; 4] = [
        PrefKey::DefaultLat,
        PrefKey::DefaultLng,
        PrefKey::DefaultZoom,
        PrefKey::SelectedBasemap,
    ];

    /// Storage key as it appears in `localStorage`.
    pub const fn as_str(self) -> &'static str {
        match self {
            PrefKey::DefaultLat => "defaultLat",
            PrefKey::DefaultLng => "defaultLng",
            PrefKey::DefaultZoom => "defaultZoom",
            PrefKey::SelectedBasemap => "selectedBasemap",
        }
    }
}

pub trait PreferenceStore {
    fn get(&self, key: PrefKey) -> Result<Option<String>, PrefsError>;
    fn set(&mut self, key: PrefKey, value: &str) -> Result<(), PrefsError>;
    fn remove(&mut self, key: PrefKey) -> Result<(), PrefsError>;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InMemoryPreferenceStore {
    values: BTreeMap<PrefKey, String>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get(&self, key: PrefKey) -> Result<Option<String>, PrefsError> {
        Ok(self.values.get(&key).cloned())
    }

    fn set(&mut self, key: PrefKey, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: PrefKey) -> Result<(), PrefsError> {
        self.values.remove(&key);
        Ok(())
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn get(&self, key: PrefKey) -> Result<Option<String>, PrefsError> {
        (**self).get(key)
    }

    fn set(&mut self, key: PrefKey, value: &str) -> Result<(), PrefsError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: PrefKey) -> Result<(), PrefsError> {
        (**self).remove(key)
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_storage {
    use super::{PrefKey, PreferenceStore, PrefsError};

    /// `window.localStorage` of the page's origin.
    #[derive(Debug)]
    pub struct LocalStoragePreferenceStore {
        storage: web_sys::Storage,
    }

    impl LocalStoragePreferenceStore {
        pub fn new() -> Result<Self, PrefsError> {
            Ok(Self {
                storage: window_local_storage()?,
            })
        }
    }

    impl PreferenceStore for LocalStoragePreferenceStore {
        fn get(&self, key: PrefKey) -> Result<Option<String>, PrefsError> {
            self.storage
                .get_item(key.as_str())
                .map_err(|e| PrefsError::Io(format!("get_item({}) failed: {:?}", key.as_str(), e)))
        }

        fn set(&mut self, key: PrefKey, value: &str) -> Result<(), PrefsError> {
            self.storage
                .set_item(key.as_str(), value)
                .map_err(|e| PrefsError::Io(format!("set_item({}) failed: {:?}", key.as_str(), e)))
        }

        fn remove(&mut self, key: PrefKey) -> Result<(), PrefsError> {
            self.storage
                .remove_item(key.as_str())
                .map_err(|e| {
                    PrefsError::Io(format!("remove_item({}) failed: {:?}", key.as_str(), e))
                })
        }
    }

    fn window_local_storage() -> Result<web_sys::Storage, PrefsError> {
        let win = web_sys::window().ok_or(PrefsError::StorageUnavailable)?;
        win.local_storage()
            .map_err(|e| PrefsError::Io(format!("localStorage error: {:?}", e)))?
            .ok_or(PrefsError::StorageUnavailable)
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_storage::LocalStoragePreferenceStore;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct LocalStoragePreferenceStore;

#[cfg(not(target_arch = "wasm32"))]
impl LocalStoragePreferenceStore {
    pub fn new() -> Result<Self, PrefsError> {
        Err(PrefsError::StorageUnavailable)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PreferenceStore for LocalStoragePreferenceStore {
    fn get(&self, _key: PrefKey) -> Result<Option<String>, PrefsError> {
        Err(PrefsError::StorageUnavailable)
    }

    fn set(&mut self, _key: PrefKey, _value: &str) -> Result<(), PrefsError> {
        Err(PrefsError::StorageUnavailable)
    }

    fn remove(&mut self, _key: PrefKey) -> Result<(), PrefsError> {
        Err(PrefsError::StorageUnavailable)
    }
}

/// Local storage when the browser provides it, memory otherwise.
#[derive(Debug)]
pub enum BrowserPreferenceStore {
    Local(LocalStoragePreferenceStore),
    Memory(InMemoryPreferenceStore),
}

impl BrowserPreferenceStore {
    pub fn open() -> Self {
        match LocalStoragePreferenceStore::new() {
            Ok(s) => BrowserPreferenceStore::Local(s),
            Err(err) => {
                tracing::warn!(%err, "localStorage unavailable, preferences will not persist");
                BrowserPreferenceStore::Memory(InMemoryPreferenceStore::new())
            }
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, BrowserPreferenceStore::Local(_))
    }
}

impl PreferenceStore for BrowserPreferenceStore {
    fn get(&self, key: PrefKey) -> Result<Option<String>, PrefsError> {
        match self {
            BrowserPreferenceStore::Local(s) => s.get(key),
            BrowserPreferenceStore::Memory(s) => s.get(key),
        }
    }

    fn set(&mut self, key: PrefKey, value: &str) -> Result<(), PrefsError> {
        match self {
            BrowserPreferenceStore::Local(s) => s.set(key, value),
            BrowserPreferenceStore::Memory(s) => s.set(key, value),
        }
    }

    fn remove(&mut self, key: PrefKey) -> Result<(), PrefsError> {
        match self {
            BrowserPreferenceStore::Local(s) => s.remove(key),
            BrowserPreferenceStore::Memory(s) => s.remove(key),
        }
    }
}
