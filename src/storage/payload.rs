//! Encrypted payload persistence
//!
//! A payload is the ordered list of encoded chunks plus a format version,
//! stored as compact JSON. When no destination file is given the serialized
//! bytes are printed as one line of base64 ("armored"), and that text form is
//! accepted back when reading.

use std::io::Write;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crypto::EncodedChunk;
use crate::error::{HoistError, HoistResult};

use super::file_io;

/// Current payload format version
pub const PAYLOAD_VERSION: u8 = 1;

/// Encoded chunks with associated metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    /// Version for future format upgrades
    #[serde(default = "default_version")]
    pub version: u8,
    /// Encrypted chunks, in plaintext order
    pub chunks: Vec<EncodedChunk>,
}

fn default_version() -> u8 {
    PAYLOAD_VERSION
}

impl EncryptedPayload {
    /// Wrap a chunk sequence in the current format version
    pub fn new(chunks: Vec<EncodedChunk>) -> Self {
        Self {
            version: PAYLOAD_VERSION,
            chunks,
        }
    }
}

/// Serialize an ordered chunk sequence to bytes
pub fn serialize(encoded_chunks: &[EncodedChunk]) -> HoistResult<Vec<u8>> {
    let payload = EncryptedPayload::new(encoded_chunks.to_vec());
    Ok(serde_json::to_vec(&payload)?)
}

/// Deserialize bytes produced by [`serialize`]
///
/// # Errors
///
/// Returns [`HoistError::PayloadFormat`] for anything that is not a payload
/// of a supported version.
pub fn deserialize(bytes: &[u8]) -> HoistResult<Vec<EncodedChunk>> {
    let payload: EncryptedPayload = serde_json::from_slice(bytes)
        .map_err(|e| HoistError::PayloadFormat(format!("Not an encrypted payload: {}", e)))?;

    if payload.version != PAYLOAD_VERSION {
        return Err(HoistError::PayloadFormat(format!(
            "Unsupported payload version: {}",
            payload.version
        )));
    }

    Ok(payload.chunks)
}

/// Printable form of serialized payload bytes
pub fn armor(payload_bytes: &[u8]) -> String {
    STANDARD.encode(payload_bytes)
}

/// Deserialize persisted bytes that are either raw or armored
pub fn parse_persisted(bytes: &[u8]) -> HoistResult<Vec<EncodedChunk>> {
    let trimmed = bytes.trim_ascii();
    if trimmed.first() == Some(&b'{') {
        return deserialize(trimmed);
    }

    let decoded = STANDARD
        .decode(trimmed)
        .map_err(|e| HoistError::PayloadFormat(format!("Not an encrypted payload: {}", e)))?;
    deserialize(&decoded)
}

/// Write payload bytes to `path`, or print them armored to `stdout`
pub fn write<W: Write>(
    path: Option<&Path>,
    payload_bytes: &[u8],
    stdout: &mut W,
) -> HoistResult<()> {
    match path {
        Some(path) => file_io::write_bytes_atomic(path, payload_bytes),
        None => {
            debug!("No destination given, printing armored payload");
            writeln!(stdout, "{}", armor(payload_bytes))?;
            Ok(())
        }
    }
}

/// Read raw payload bytes from `path`
pub fn read(path: &Path) -> HoistResult<Vec<u8>> {
    file_io::read_bytes(path)
}
