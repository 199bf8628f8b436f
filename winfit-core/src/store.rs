//! Persistence for the single saved [`WindowSettings`] record.
//!
//! [`SettingsStore::load`] never fails: a missing or unusable record falls back
//! to [`WindowSettings::default`]. [`SettingsStore::save`] is the only
//! operation that reports errors, since durability was explicitly requested.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::settings::{SettingsError, WindowSettings};

/// Key of the one record the store holds. Also names the file on disk.
pub const SETTINGS_KEY: &str = "window-settings";

const APP_DIR: &str = "winfit";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not determine the user config directory")]
    NoConfigDir,
    #[error("no saved settings at {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("I/O error accessing settings at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed settings at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid settings: {0}")]
    Invalid(#[from] SettingsError),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("settings store is read-only")]
    ReadOnly,
}

pub trait SettingsStore {
    /// Whether a saved record is present.
    fn exists(&self) -> bool;

    /// Reads the saved record, failing if it is missing or unusable.
    fn read(&self) -> Result<WindowSettings, StoreError>;

    /// Replaces the saved record.
    fn save(&self, settings: &WindowSettings) -> Result<(), StoreError>;

    /// Reads the saved record, or returns the defaults if there is none or it
    /// cannot be used.
    fn load(&self) -> WindowSettings {
        match self.read() {
            Ok(settings) => settings,
            Err(StoreError::NotFound { path }) => {
                tracing::debug!("No saved settings at {}, using defaults", path.display());
                WindowSettings::default()
            }
            Err(e) => {
                tracing::warn!("Ignoring saved settings: {}", e);
                WindowSettings::default()
            }
        }
    }
}

/// Stores the record as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The per-user location, e.g. `~/Library/Application Support/winfit/window-settings.json`.
    pub fn default_location() -> Result<Self, StoreError> {
        let dir = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        Ok(Self::new(
            dir.join(APP_DIR).join(format!("{}.json", SETTINGS_KEY)),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl SettingsStore for JsonFileStore {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn read(&self) -> Result<WindowSettings, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    path: self.path.clone(),
                })
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let settings: WindowSettings =
            serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    fn save(&self, settings: &WindowSettings) -> Result<(), StoreError> {
        settings.validate()?;
        let mut json = serde_json::to_string_pretty(settings).map_err(StoreError::Serialize)?;
        json.push('\n');

        let dir = self.parent_dir();
        fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;

        // Each save gets its own temp file next to the record; the rename is
        // atomic, so readers see either the old or the new record.
        let write = || -> io::Result<()> {
            let mut file = NamedTempFile::new_in(dir)?;
            file.write_all(json.as_bytes())?;
            file.as_file().sync_all()?;
            file.persist(&self.path).map_err(|e| e.error)?;
            Ok(())
        };
        write().map_err(|e| self.io_error(e))?;

        tracing::info!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

/// Keeps the record in memory. Useful as a test double and for one-off runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: RefCell<Option<WindowSettings>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: WindowSettings) -> Self {
        Self {
            record: RefCell::new(Some(settings)),
            read_only: false,
        }
    }

    /// A store that rejects every save.
    pub fn read_only() -> Self {
        Self {
            record: RefCell::new(None),
            read_only: true,
        }
    }

    pub fn saved(&self) -> Option<WindowSettings> {
        self.record.borrow().clone()
    }
}

impl SettingsStore for MemoryStore {
    fn exists(&self) -> bool {
        self.record.borrow().is_some()
    }

    fn read(&self) -> Result<WindowSettings, StoreError> {
        let settings = self.record.borrow().clone().ok_or(StoreError::NotFound {
            path: PathBuf::from(SETTINGS_KEY),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn save(&self, settings: &WindowSettings) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        settings.validate()?;
        *self.record.borrow_mut() = Some(settings.clone());
        Ok(())
    }
}
