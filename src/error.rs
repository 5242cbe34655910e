//! Custom error types for hoist
//!
//! Every failure in the crate is one of the variants below. Errors propagate
//! up to `main`, which prints a single diagnostic line and exits non-zero.

use std::path::Path;

use thiserror::Error;

/// The main error type for hoist operations
#[derive(Error, Debug)]
pub enum HoistError {
    /// Key file missing, unreadable, malformed, or locked with another passphrase
    #[error("Key load error: {0}")]
    KeyLoad(String),

    /// A chunk could not be encrypted (usually too large for the key)
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Wrong key, corrupted ciphertext, or missing private key
    #[error("Decryption error: {0}")]
    Decryption(String),

    /// Serialized payload could not be read back
    #[error("Payload format error: {0}")]
    PayloadFormat(String),

    /// Configuration path has an extension hoist does not know
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Invalid settings (chunk size, paths)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration text is not a valid YAML mapping
    #[error("Parse error: {0}")]
    Parse(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl HoistError {
    /// Create an "unsupported format" error for a configuration path
    pub fn unsupported_format(path: &Path) -> Self {
        Self::UnsupportedFormat(format!(
            "{} (expected .yml, .yaml, .eyml or .eyaml)",
            path.display()
        ))
    }

    /// Check if this error came from a failed decryption
    pub fn is_decryption(&self) -> bool {
        matches!(self, Self::Decryption(_))
    }

    /// Check if this error came from loading the key file
    pub fn is_key_load(&self) -> bool {
        matches!(self, Self::KeyLoad(_))
    }
}

impl From<std::io::Error> for HoistError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HoistError {
    fn from(err: serde_json::Error) -> Self {
        Self::PayloadFormat(err.to_string())
    }
}

impl From<serde_yaml::Error> for HoistError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type alias for hoist operations
pub type HoistResult<T> = Result<T, HoistError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_display() {
        let err = HoistError::Encryption("chunk too large".into());
        assert_eq!(err.to_string(), "Encryption error: chunk too large");
    }

    #[test]
    fn test_unsupported_format_names_path() {
        let err = HoistError::unsupported_format(&PathBuf::from("settings.toml"));
        assert!(err.to_string().contains("settings.toml"));
        assert!(matches!(err, HoistError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: HoistError = io_err.into();
        assert!(matches!(err, HoistError::Io(_)));
    }

    #[test]
    fn test_from_json_error_is_payload_format() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: HoistError = json_err.into();
        assert!(matches!(err, HoistError::PayloadFormat(_)));
    }

    #[test]
    fn test_predicates() {
        assert!(HoistError::Decryption("x".into()).is_decryption());
        assert!(HoistError::KeyLoad("x".into()).is_key_load());
        assert!(!HoistError::Io("x".into()).is_decryption());
    }
}
