use crate::app_dirs::AppDirs;
use crate::settings::Settings;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const PLAYER_NAME_KEY: &str = "yiyi_player_name";
pub const PLAYER_AVATAR_KEY: &str = "yiyi_player_avatar";
pub const GAME_SETTINGS_KEY: &str = "yiyi_game_settings";
pub const PLAYER_HISTORY_KEY: &str = "yiyi_player_history";

pub const MAX_PLAYER_HISTORY: usize = 10;

/// String key-value persistence, the shape of browser local storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> std::io::Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> std::io::Result<()> {
        (**self).set(key, value)
    }
}

/// In-process store, used by tests and when persistence is disabled
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> std::io::Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// All keys live in a single JSON object on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn new() -> Self {
        Self::with_path(AppDirs::store_path())
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        let path = p.as_ref().to_path_buf();
        let entries = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!("ignoring unreadable store {}: {e}", path.display());
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, entries }
    }

    fn flush(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&self.entries).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> std::io::Result<()> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }
}

/// Typed view over a [`KeyValueStore`]: settings plus the player profile.
///
/// Reads never fail. Anything missing or malformed comes back as the default
/// value and a warning is logged.
#[derive(Debug)]
pub struct Profile<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Profile<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("could not parse stored {key}: {e}");
                None
            }
        }
    }

    fn save_json<T: Serialize>(&mut self, key: &str, value: &T) -> std::io::Result<()> {
        let data = serde_json::to_string(value).map_err(std::io::Error::other)?;
        self.store.set(key, data)
    }

    pub fn settings(&self) -> Settings {
        self.load_json::<Settings>(GAME_SETTINGS_KEY)
            .unwrap_or_default()
            .sanitized()
    }

    pub fn save_settings(&mut self, settings: &Settings) -> std::io::Result<()> {
        self.save_json(GAME_SETTINGS_KEY, settings)
    }

    pub fn player_name(&self) -> String {
        self.store.get(PLAYER_NAME_KEY).unwrap_or_default()
    }

    pub fn player_avatar(&self) -> Option<String> {
        self.store.get(PLAYER_AVATAR_KEY).filter(|a| !a.is_empty())
    }

    pub fn player_history(&self) -> Vec<String> {
        self.load_json(PLAYER_HISTORY_KEY).unwrap_or_default()
    }

    /// Store name and avatar; a new non-empty name is appended to the
    /// history, which keeps only the most recent entries.
    pub fn save_player(&mut self, name: &str, avatar: &str) -> std::io::Result<()> {
        self.store.set(PLAYER_NAME_KEY, name.to_string())?;
        self.store.set(PLAYER_AVATAR_KEY, avatar.to_string())?;

        let mut history = self.player_history();
        if !name.is_empty() && !history.iter().any(|h| h == name) {
            history.push(name.to_string());
            if history.len() > MAX_PLAYER_HISTORY {
                let excess = history.len() - MAX_PLAYER_HISTORY;
                history.drain(..excess);
            }
            self.save_json(PLAYER_HISTORY_KEY, &history)?;
        }
        Ok(())
    }
}
