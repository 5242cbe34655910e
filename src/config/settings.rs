//! Per-invocation settings for hoist
//!
//! Every command builds one [`Settings`] from its command-line options and
//! the default paths, then passes it down explicitly.

use std::path::PathBuf;

use super::paths::HoistPaths;
use crate::crypto::{SecureString, DEFAULT_CHUNK_SIZE};

/// Which default configuration file a command should fall back to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigSource {
    /// Commands that read plaintext configuration (`encrypt`)
    #[default]
    Plain,
    /// Commands that prefer the encrypted file when present (`decrypt`, `show`)
    PreferEncrypted,
}

/// Values given explicitly on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
    pub passphrase: Option<SecureString>,
    pub chunk_size: Option<usize>,
}

/// Settings for a single hoist command
#[derive(Debug, Clone)]
pub struct Settings {
    /// Configuration file to read
    pub config_file: PathBuf,

    /// PEM key file
    pub key_file: PathBuf,

    /// Passphrase for the key file; empty when none was given
    pub passphrase: SecureString,

    /// Plaintext bytes per encrypted chunk
    pub chunk_size: usize,
}

impl Settings {
    /// Fill in everything not overridden from the default paths
    pub fn resolve(paths: &HoistPaths, overrides: Overrides, source: ConfigSource) -> Self {
        let config_file = overrides.config_file.unwrap_or_else(|| {
            paths.default_config_file(source == ConfigSource::PreferEncrypted)
        });
        let key_file = overrides
            .key_file
            .unwrap_or_else(|| paths.default_key_file());

        Self {
            config_file,
            key_file,
            passphrase: overrides.passphrase.unwrap_or_default(),
            chunk_size: overrides.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
        }
    }
}
