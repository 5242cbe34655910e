//! Default file locations for hoist
//!
//! ## Resolution Order
//!
//! Configuration file (when none is given):
//! 1. `settings.eyml` in the working directory, if it exists and the command
//!    reads encrypted configuration
//! 2. `settings.yml` in the working directory
//!
//! Key file (when none is given):
//! 1. `key.pem` in the working directory, if it exists
//! 2. `~/.ssh/id_rsa`

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::{HoistError, HoistResult};

/// Plaintext configuration file name
pub const SETTINGS_FILE: &str = "settings.yml";

/// Encrypted configuration file name
pub const SETTINGS_FILE_ENCRYPTED: &str = "settings.eyml";

/// Project-local key file name
pub const LOCAL_KEY_FILE: &str = "key.pem";

/// Resolves the default files relative to a working and a home directory
#[derive(Debug, Clone)]
pub struct HoistPaths {
    work_dir: PathBuf,
    home_dir: Option<PathBuf>,
}

impl HoistPaths {
    /// Create paths for the current working directory and user home
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined.
    pub fn new() -> HoistResult<Self> {
        let work_dir = std::env::current_dir().map_err(|e| {
            HoistError::Config(format!("Could not determine working directory: {}", e))
        })?;
        let home_dir = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());

        Ok(Self { work_dir, home_dir })
    }

    /// Create paths with explicit directories (useful for testing)
    pub fn with_dirs(work_dir: PathBuf, home_dir: Option<PathBuf>) -> Self {
        Self { work_dir, home_dir }
    }

    /// Path of `settings.yml` in the working directory
    pub fn settings_file(&self) -> PathBuf {
        self.work_dir.join(SETTINGS_FILE)
    }

    /// Path of `settings.eyml` in the working directory
    pub fn encrypted_settings_file(&self) -> PathBuf {
        self.work_dir.join(SETTINGS_FILE_ENCRYPTED)
    }

    /// Path of `key.pem` in the working directory
    pub fn local_key_file(&self) -> PathBuf {
        self.work_dir.join(LOCAL_KEY_FILE)
    }

    /// Path of `~/.ssh/id_rsa`, if the home directory is known
    pub fn home_key_file(&self) -> Option<PathBuf> {
        self.home_dir
            .as_ref()
            .map(|home| home.join(".ssh").join("id_rsa"))
    }

    /// Default configuration file
    ///
    /// An encrypted settings file takes precedence when `prefer_encrypted`
    /// is set and it exists.
    pub fn default_config_file(&self, prefer_encrypted: bool) -> PathBuf {
        let encrypted = self.encrypted_settings_file();
        if prefer_encrypted && encrypted.exists() {
            encrypted
        } else {
            self.settings_file()
        }
    }

    /// Default key file
    ///
    /// A local `key.pem` takes precedence over `~/.ssh/id_rsa`. Without a
    /// home directory the local path is returned even if it does not exist,
    /// so the error surfaces when the key is actually read.
    pub fn default_key_file(&self) -> PathBuf {
        let local = self.local_key_file();
        if local.exists() {
            return local;
        }
        self.home_key_file().unwrap_or(local)
    }
}
