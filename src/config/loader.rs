//! Configuration loading
//!
//! Classifies a configuration path by its extension and produces a
//! [`ConfigDocument`]. Plaintext files are parsed directly and never touch
//! the key file; encrypted files are read, decrypted and then parsed.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::info;
use zeroize::Zeroizing;

use super::settings::Settings;
use crate::crypto::{self, key_store, SecureString};
use crate::error::{HoistError, HoistResult};
use crate::storage::payload;

/// Kind of configuration file, decided by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yml` / `.yaml`
    Plain,
    /// `.eyml` / `.eyaml`
    Encrypted,
}

impl ConfigFormat {
    /// Classify a path by its extension
    ///
    /// # Errors
    ///
    /// Returns [`HoistError::UnsupportedFormat`] for any other extension.
    pub fn classify(path: &Path) -> HoistResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml" | "yaml") => Ok(Self::Plain),
            Some("eyml" | "eyaml") => Ok(Self::Encrypted),
            _ => Err(HoistError::unsupported_format(path)),
        }
    }
}

/// Structured configuration, a YAML mapping at the top level
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument(Mapping);

impl ConfigDocument {
    /// Parse YAML text; an empty document is an empty mapping
    pub fn parse(text: &str) -> HoistResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        match serde_yaml::from_str::<Value>(text)? {
            Value::Mapping(mapping) => Ok(Self(mapping)),
            Value::Null => Ok(Self::default()),
            _ => Err(HoistError::Parse(
                "top-level value must be a mapping of keys to values".to_string(),
            )),
        }
    }

    /// Look up a top-level key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of top-level keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render back to YAML text
    pub fn to_yaml(&self) -> HoistResult<String> {
        Ok(serde_yaml::to_string(&self.0)?)
    }
}

/// Loads configuration documents, decrypting with a lazily read key
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    key_file: PathBuf,
    passphrase: SecureString,
}

impl ConfigLoader {
    /// Loader that reads `key_file` only when an encrypted file is loaded
    pub fn new(key_file: impl Into<PathBuf>, passphrase: SecureString) -> Self {
        Self {
            key_file: key_file.into(),
            passphrase,
        }
    }

    /// Loader using the key file and passphrase from `settings`
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.key_file.clone(), settings.passphrase.clone())
    }

    /// Load and parse the configuration at `path`
    pub fn load(&self, path: &Path) -> HoistResult<ConfigDocument> {
        let format = ConfigFormat::classify(path)?;
        info!(config = %path.display(), ?format, "Loading configuration");

        match format {
            ConfigFormat::Plain => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    HoistError::Io(format!("Failed to read {}: {}", path.display(), e))
                })?;
                ConfigDocument::parse(&text)
            }
            ConfigFormat::Encrypted => {
                let plaintext = self.decrypt_file(path)?;
                let text = std::str::from_utf8(&plaintext).map_err(|_| {
                    HoistError::Parse(format!(
                        "decrypted {} is not valid UTF-8",
                        path.display()
                    ))
                })?;
                ConfigDocument::parse(text)
            }
        }
    }

    /// Read an encrypted payload file and return its plaintext
    ///
    /// The extension is not checked, so any payload file can be decrypted.
    pub fn decrypt_file(&self, path: &Path) -> HoistResult<Zeroizing<Vec<u8>>> {
        let bytes = payload::read(path)?;
        let chunks = payload::parse_persisted(&bytes)?;
        let keypair = key_store::load(&self.key_file, self.passphrase.as_bytes())?;
        crypto::decrypt(&chunks, &keypair)
    }
}
