//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the
//! clap argument parsing with the crypto, storage and config layers.

pub mod crypt;
pub mod show;

use std::path::PathBuf;

use clap::Args;

use crate::config::Overrides;
use crate::crypto::SecureString;
use crate::error::{HoistError, HoistResult};

pub use crypt::{handle_decrypt_command, handle_encrypt_command};
pub use show::handle_show_command;

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file [default: settings.eyml if present, else settings.yml]
    #[arg(short, long, global = true, env = "HOIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// PEM key file [default: key.pem if present, else ~/.ssh/id_rsa]
    #[arg(short, long, global = true, env = "HOIST_KEY")]
    pub key: Option<PathBuf>,

    /// Passphrase for an encrypted key file
    #[arg(short, long, global = true, env = "HOIST_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,

    /// Prompt for the key passphrase without echoing it (wins over --passphrase)
    #[arg(long, global = true)]
    pub ask_passphrase: bool,

    /// Log what hoist is doing to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Turn the parsed options into settings overrides
    ///
    /// Prompts on the terminal when `--ask-passphrase` was given.
    pub fn overrides(&self, chunk_size: Option<usize>) -> HoistResult<Overrides> {
        let passphrase = if self.ask_passphrase {
            Some(prompt_passphrase("Key passphrase: ")?)
        } else {
            self.passphrase.clone().map(SecureString::from)
        };

        Ok(Overrides {
            config_file: self.config.clone(),
            key_file: self.key.clone(),
            passphrase,
            chunk_size,
        })
    }
}

/// Prompt for a passphrase (hidden input)
fn prompt_passphrase(prompt: &str) -> HoistResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::from)
        .map_err(|e| HoistError::KeyLoad(format!("Failed to read passphrase: {}", e)))
}
