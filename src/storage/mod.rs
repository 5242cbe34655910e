//! Storage layer for hoist
//!
//! Reading and writing encrypted payloads, with atomic writes and automatic
//! directory creation.

pub mod file_io;
pub mod payload;

pub use file_io::{read_bytes, write_bytes_atomic};
pub use payload::{armor, deserialize, parse_persisted, serialize, EncryptedPayload};
