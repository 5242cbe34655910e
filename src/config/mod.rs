//! Configuration module for hoist
//!
//! This module provides:
//! - Default file resolution (settings file, key file)
//! - Per-command settings
//! - Loading plaintext or encrypted configuration documents

pub mod loader;
pub mod paths;
pub mod settings;

pub use loader::{ConfigDocument, ConfigFormat, ConfigLoader};
pub use paths::HoistPaths;
pub use settings::{ConfigSource, Overrides, Settings};
