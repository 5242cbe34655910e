//! Encrypt and decrypt commands
//!
//! `encrypt` turns a plaintext configuration file into a payload file (or
//! armored text on stdout); `decrypt` does the reverse.

use std::io::Write;
use std::path::Path;

use tracing::info;
use zeroize::Zeroizing;

use crate::config::{ConfigFormat, ConfigLoader, Settings};
use crate::crypto::{self, key_store};
use crate::error::{HoistError, HoistResult};
use crate::storage::{file_io, payload};

/// Encrypt the configuration file to `dest`, or print it armored to `out`
pub fn handle_encrypt_command<W: Write>(
    settings: &Settings,
    dest: Option<&Path>,
    out: &mut W,
) -> HoistResult<()> {
    let source = &settings.config_file;
    if matches!(ConfigFormat::classify(source), Ok(ConfigFormat::Encrypted)) {
        return Err(HoistError::Config(format!(
            "{} is already encrypted",
            source.display()
        )));
    }

    let plaintext = Zeroizing::new(file_io::read_bytes(source)?);
    let keypair = key_store::load(&settings.key_file, settings.passphrase.as_bytes())?;

    let chunks = crypto::encrypt(&plaintext, &keypair, settings.chunk_size)?;
    let bytes = payload::serialize(&chunks)?;
    payload::write(dest, &bytes, out)?;

    info!(
        config = %source.display(),
        chunks = chunks.len(),
        dest = ?dest,
        "Encrypted configuration"
    );
    Ok(())
}

/// Decrypt the configuration file to `dest`, or print the plaintext to `out`
///
/// Nothing is written unless every chunk decrypts.
pub fn handle_decrypt_command<W: Write>(
    settings: &Settings,
    dest: Option<&Path>,
    out: &mut W,
) -> HoistResult<()> {
    let loader = ConfigLoader::from_settings(settings);
    let plaintext = loader.decrypt_file(&settings.config_file)?;

    match dest {
        Some(path) => file_io::write_bytes_atomic(path, &plaintext)?,
        None => {
            out.write_all(&plaintext)?;
            if !plaintext.ends_with(b"\n") {
                out.write_all(b"\n")?;
            }
        }
    }

    info!(
        config = %settings.config_file.display(),
        dest = ?dest,
        "Decrypted configuration"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SecureString;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    fn settings(config_file: PathBuf, key: &str, passphrase: &str) -> Settings {
        Settings {
            config_file,
            key_file: fixture(key),
            passphrase: SecureString::new(passphrase),
            chunk_size: crypto::DEFAULT_CHUNK_SIZE,
        }
    }

    #[test]
    fn test_encrypt_then_decrypt_file() {
        let temp_dir = TempDir::new().unwrap();
        let plain = temp_dir.path().join("settings.yml");
        let encrypted = temp_dir.path().join("settings.eyml");
        let restored = temp_dir.path().join("restored.yml");
        std::fs::write(&plain, "db_password: s3cr3t\n").unwrap();

        let mut out = Vec::new();
        let plain_settings = settings(plain, "test_key.pem", "");
        handle_encrypt_command(&plain_settings, Some(encrypted.as_path()), &mut out).unwrap();
        assert!(out.is_empty());

        handle_decrypt_command(
            &settings(encrypted, "test_key.pem", ""),
            Some(restored.as_path()),
            &mut out,
        )
        .unwrap();

        assert_eq!(std::fs::read(&restored).unwrap(), b"db_password: s3cr3t\n");
    }

    #[test]
    fn test_encrypt_to_stdout_then_decrypt_armored() {
        let temp_dir = TempDir::new().unwrap();
        let plain = temp_dir.path().join("settings.yml");
        std::fs::write(&plain, "api_key: abc123").unwrap();

        let mut armored = Vec::new();
        handle_encrypt_command(&settings(plain, "test_key.pem", ""), None, &mut armored).unwrap();

        let saved = temp_dir.path().join("settings.eyml");
        std::fs::write(&saved, &armored).unwrap();

        let mut out = Vec::new();
        handle_decrypt_command(&settings(saved, "test_key.pem", ""), None, &mut out).unwrap();
        assert_eq!(out, b"api_key: abc123\n");
    }

    #[test]
    fn test_decrypt_with_wrong_key_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let plain = temp_dir.path().join("settings.yml");
        let encrypted = temp_dir.path().join("settings.eyml");
        let restored = temp_dir.path().join("restored.yml");
        std::fs::write(&plain, "db_password: s3cr3t\n").unwrap();

        let mut out = Vec::new();
        let plain_settings = settings(plain, "test_key.pem", "");
        handle_encrypt_command(&plain_settings, Some(encrypted.as_path()), &mut out).unwrap();

        let err = handle_decrypt_command(
            &settings(encrypted.clone(), "other_key.pem", ""),
            Some(restored.as_path()),
            &mut out,
        )
        .unwrap_err();
        assert!(err.is_decryption());
        assert!(!restored.exists());

        let err = handle_decrypt_command(&settings(encrypted, "other_key.pem", ""), None, &mut out)
            .unwrap_err();
        assert!(err.is_decryption());
        assert!(out.is_empty());
    }

    #[test]
    fn test_encrypt_refuses_encrypted_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("settings.eyml");
        std::fs::write(&source, "{}").unwrap();

        let mut out = Vec::new();
        let err = handle_encrypt_command(&settings(source, "test_key.pem", ""), None, &mut out)
            .unwrap_err();
        assert!(matches!(err, HoistError::Config(_)));
    }

    #[test]
    fn test_encrypt_with_small_key_and_default_chunk_size() {
        let temp_dir = TempDir::new().unwrap();
        let plain = temp_dir.path().join("settings.yml");
        let dest = temp_dir.path().join("settings.eyml");
        std::fs::write(&plain, "db_password: s3cr3t\n").unwrap();

        let mut out = Vec::new();
        let small_key = settings(plain, "small_key.pem", "");
        let err = handle_encrypt_command(&small_key, Some(dest.as_path()), &mut out).unwrap_err();
        assert!(matches!(err, HoistError::Encryption(_)));
        assert!(!dest.exists());
    }
}
