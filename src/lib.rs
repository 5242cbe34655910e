//! hoist - keep configuration files in version control, encrypted
//!
//! This library provides the core of the `hoist` command-line tool. A
//! configuration file is split into small byte chunks, each chunk is
//! encrypted with the public half of an RSA key, and the resulting payload is
//! stored next to the templates that consume it. Only holders of the private
//! key can read it back.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `crypto`: Key loading, chunking and chunked RSA encryption
//! - `storage`: Payload serialization and atomic file writes
//! - `config`: Default paths, settings and configuration loading
//! - `cli`: Command handlers for `encrypt`, `decrypt` and `show`
//! - `error`: Custom error types
//!
//! # Example
//!
//! ```rust,ignore
//! use hoist::config::ConfigLoader;
//! use hoist::crypto::SecureString;
//!
//! let loader = ConfigLoader::new("key.pem", SecureString::default());
//! let document = loader.load("settings.eyml".as_ref())?;
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod storage;

pub use error::{HoistError, HoistResult};
