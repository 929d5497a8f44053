mod config;
pub mod database;

pub use config::{Config, DialogueConfig, HintsConfig, RemindersConfig, TimerConfig};
pub use database::Database;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::dialogue::Profile;
use crate::error::StorageError;

/// Returns the data directory, creating it if needed.
///
/// `SIDEKICK_DATA_DIR` wins when set; otherwise `~/.config/sidekick[-dev]/`
/// based on `SIDEKICK_ENV` (set it to `dev` for the development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("SIDEKICK_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("SIDEKICK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("sidekick-dev")
            } else {
                base_dir.join("sidekick")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(StorageError::DataDir)?;
    Ok(dir)
}

/// String key-value persistence. Every component flushes through this on
/// each mutation.
pub trait KvStore: Send + Sync {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON value.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KvStore + ?Sized,
{
    match store.kv_get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Serialization {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Encode and write a JSON value.
pub fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KvStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialization {
        key: key.to_string(),
        source,
    })?;
    store.kv_set(key, &raw)
}

/// Non-durable store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().map_err(|_| StorageError::Locked)?;
        Ok(values.get(key).cloned())
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|_| StorageError::Locked)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Durable per-user profile records, owned outside the dialogue engine.
pub trait ProfileStore: Send + Sync {
    /// Missing or unreadable records come back as an empty profile.
    fn get(&self, key: &str) -> Profile;
    fn set(&self, key: &str, profile: &Profile) -> Result<(), StorageError>;
}

fn profile_key(key: &str) -> String {
    format!("profile:{key}")
}

impl<S: KvStore + ?Sized> ProfileStore for S {
    fn get(&self, key: &str) -> Profile {
        match load_json::<Profile, S>(self, &profile_key(key)) {
            Ok(Some(profile)) => profile,
            Ok(None) => Profile::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "unreadable profile, starting fresh");
                Profile::default()
            }
        }
    }

    fn set(&self, key: &str, profile: &Profile) -> Result<(), StorageError> {
        save_json(self, &profile_key(key), profile)
    }
}
