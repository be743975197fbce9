//! Durable key-value storage for preferences
//!
//! [`FileStorage`] keeps a flat TOML table on disk
//! (`<config_dir>/folio/preferences.toml` by default). [`MemoryStorage`]
//! serves tests and sessions without a writable directory.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage failures
///
/// Callers in this crate never surface these to the user; they fall back to
/// in-memory state and log.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed preferences file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to encode preferences: {0}")]
    Encode(#[from] toml::ser::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// String key-value storage
pub trait PreferenceStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Preferences persisted as a TOML table
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/folio/preferences.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("folio").join("preferences.toml"))
    }

    /// Storage at the platform default location
    pub fn at_default_location() -> StorageResult<Self> {
        Self::default_path()
            .map(Self::new)
            .ok_or_else(|| StorageError::Unavailable("no configuration directory".into()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StorageResult<BTreeMap<String, String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        toml::from_str(&content).map_err(|source| StorageError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn store(&self, table: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = toml::to_string(table)?;
        fs::write(&self.path, content).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStorage for FileStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        // A malformed file is replaced; an unreadable one is left alone
        let mut table = match self.load() {
            Ok(table) => table,
            Err(err @ StorageError::Parse { .. }) => {
                tracing::warn!(%err, "replacing malformed preferences file");
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        table.insert(key.to_string(), value.to_string());
        self.store(&table)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut table = self.load()?;
        if table.remove(key).is_some() {
            self.store(&table)?;
        }
        Ok(())
    }
}

/// In-process storage; optionally simulates an unavailable backend
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<FxHashMap<String, String>>,
    unavailable: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose every call fails (private browsing, sandboxed hosts)
    pub fn unavailable() -> Self {
        Self {
            values: RefCell::default(),
            unavailable: true,
        }
    }

    fn check(&self) -> StorageResult<()> {
        if self.unavailable {
            Err(StorageError::Unavailable("memory storage disabled".into()))
        } else {
            Ok(())
        }
    }
}

impl PreferenceStorage for MemoryStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        self.check()?;
        Ok(self.values.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        self.check()?;
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.check()?;
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

impl<T: PreferenceStorage + ?Sized> PreferenceStorage for std::rc::Rc<T> {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}
