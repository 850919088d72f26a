//! JSON file persistence for the profile config.
//!
//! # Security
//!
//! The file holds sealed secret keys, so on unix it is always written `0600`.
//! Missing parent directories are created `0700`; directories that already
//! exist keep their mode. Writes go to a uniquely named sibling temp file
//! that is renamed over the target, so a failed or concurrent write never
//! leaves a truncated config behind.
//!
//! There is no file locking. Concurrent writers race and the last one wins.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::error::{ConfigError, Result};
use super::legacy::migrate;
use super::types::{Config, StoredDocument};

/// Mode for directories created to hold the config.
#[cfg(unix)]
const DIR_MODE: u32 = 0o700;

/// Reads and writes the config document at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Creates a store for the given file path. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns `$HOME/.config/nostr/config.json`, if the home directory is known.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("nostr").join("config.json"))
    }

    /// Creates a store at [`Self::default_path`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHomeDir`] if the home directory is unknown.
    pub fn open_default() -> Result<Self> {
        Self::default_path()
            .map(Self::new)
            .ok_or(ConfigError::NoHomeDir)
    }

    /// The file this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the config, migrating a legacy document in place.
    ///
    /// A legacy document is converted and saved immediately, so migration
    /// happens at most once. A stale or empty `current_profile` is repaired in
    /// memory.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NotFound`] if the file does not exist
    /// - [`ConfigError::Parse`] on malformed JSON or an unrecognized shape
    /// - [`ConfigError::IncompleteLegacy`] if a legacy document lacks key data
    /// - [`ConfigError::Io`] on other read or write failures
    pub fn load(&self) -> Result<Config> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(self.path.clone()));
            }
            Err(e) => {
                return Err(ConfigError::Io(format!(
                    "reading {}: {e}",
                    self.path.display()
                )));
            }
        };

        let value: serde_json::Value =
            serde_json::from_str(&data).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let document =
            StoredDocument::probe(value).map_err(|e| ConfigError::Parse(e.to_string()))?;

        match document {
            StoredDocument::Current(mut config) => {
                if config.repair_current_profile() {
                    debug!(
                        current_profile = %config.current_profile,
                        "Stored current profile was stale; using first alias"
                    );
                }
                Ok(config)
            }
            StoredDocument::Legacy(legacy) => {
                if !legacy.is_complete() {
                    return Err(ConfigError::IncompleteLegacy);
                }
                let mut config = migrate(legacy);
                self.save(&mut config)?;
                info!(path = %self.path.display(), "Migrated legacy config to profiles");
                Ok(config)
            }
        }
    }

    /// Loads the config, treating a missing file as an empty config.
    ///
    /// # Errors
    ///
    /// Returns every error of [`Self::load`] except [`ConfigError::NotFound`].
    pub fn load_or_default(&self) -> Result<Config> {
        match self.load() {
            Err(ConfigError::NotFound(_)) => Ok(Config::new()),
            other => other,
        }
    }

    /// Writes the whole config with owner-only permissions.
    ///
    /// An empty `current_profile` is filled in first when profiles exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the directory or file cannot be written.
    pub fn save(&self, config: &mut Config) -> Result<()> {
        if config.current_profile.is_empty() {
            config.repair_current_profile();
        }

        self.ensure_parent_dir()?;

        let mut data = serde_json::to_vec_pretty(config)?;
        data.push(b'\n');
        self.write_private(&data)?;

        debug!(path = %self.path.display(), profiles = config.profiles.len(), "Saved config");
        Ok(())
    }

    /// Directory holding the config file.
    fn parent_dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        let parent = self.parent_dir();
        if parent.is_dir() {
            return Ok(());
        }

        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(DIR_MODE);
        }

        builder
            .create(parent)
            .map_err(|e| ConfigError::Io(format!("creating {}: {e}", parent.display())))
    }

    fn write_private(&self, data: &[u8]) -> Result<()> {
        let dir = self.parent_dir();
        let io_err = |action: &str, e: std::io::Error| {
            ConfigError::Io(format!("{action} temp file in {}: {e}", dir.display()))
        };

        // Created 0600 on unix with a unique name.
        let mut file = NamedTempFile::new_in(dir).map_err(|e| io_err("creating", e))?;
        file.write_all(data).map_err(|e| io_err("writing", e))?;
        file.as_file()
            .sync_all()
            .map_err(|e| io_err("syncing", e))?;

        file.persist(&self.path).map_err(|e| {
            ConfigError::Io(format!("replacing {}: {}", self.path.display(), e.error))
        })?;
        Ok(())
    }
}
