//! Persistence capability for session-boundary state.
//!
//! Environments, templates, and similar editor state are persisted as
//! JSON through an injected key-value capability. The core never decides
//! where the bytes live: callers hand in a [`KeyValueStore`], typically a
//! [`FileStore`] rooted in the user's data directory, and tests use a
//! [`MemoryStore`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::overlay::Environment;

/// Store key under which the environment list is persisted.
pub const ENVIRONMENTS_KEY: &str = "environments";

/// A minimal key-value persistence capability.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn put(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`; returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be modified.
    fn remove(&mut self, key: &str) -> Result<bool>;
}

/// A file-backed store keeping one JSON file per key.
///
/// # Examples
///
/// ```no_run
/// use stackform::store::{FileStore, KeyValueStore};
///
/// let mut store = FileStore::open_default().unwrap();
/// store.put("environments", "[]").unwrap();
/// ```
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created lazily
    /// on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Opens the default per-user store at `~/.stackform`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn open_default() -> Result<Self> {
        let home = home::home_dir().ok_or_else(|| Error::InvalidPath {
            path: PathBuf::from("~"),
            reason: "cannot determine home directory".to_string(),
        })?;
        Ok(Self::new(home.join(".stackform")))
    }

    /// The directory backing this store.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(Error::validation(
                "key",
                format!("invalid store key: {key:?}"),
            ));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(path, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }
}

/// An in-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }
}

/// Load the persisted environment list; an absent key is an empty list.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the JSON is invalid.
pub fn load_environments(store: &impl KeyValueStore) -> Result<Vec<Environment>> {
    match store.get(ENVIRONMENTS_KEY)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}

/// Persist the environment list as JSON.
///
/// # Errors
///
/// Returns an error if serialization or the store write fails.
pub fn save_environments(
    store: &mut impl KeyValueStore,
    environments: &[Environment],
) -> Result<()> {
    let json = serde_json::to_string_pretty(environments)?;
    store.put(ENVIRONMENTS_KEY, &json)
}
