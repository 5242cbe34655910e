//! Chunked RSA encryption/decryption
//!
//! Each plaintext chunk is encrypted on its own with RSA PKCS#1 v1.5 and the
//! ciphertext is stored as standard base64. Decryption is all or nothing:
//! a single bad chunk fails the whole payload and no partial plaintext leaves
//! this module.

use std::fmt;
use std::num::NonZeroUsize;

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{HoistError, HoistResult};

use super::chunking;
use super::key_store::{KeyPair, PKCS1_PADDING_OVERHEAD};

/// Base64 text of one encrypted chunk
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedChunk(String);

impl EncodedChunk {
    /// Wrap already-encoded text
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// The base64 text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn decode(&self) -> HoistResult<Vec<u8>> {
        STANDARD
            .decode(&self.0)
            .map_err(|e| HoistError::Decryption(format!("Invalid chunk encoding: {}", e)))
    }
}

impl fmt::Debug for EncodedChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EncodedChunk")
            .field(&format_args!("{} chars", self.0.len()))
            .finish()
    }
}

/// Encrypt one chunk with the public key and encode it
///
/// # Errors
///
/// Returns [`HoistError::Encryption`] if the chunk is larger than the key can
/// take in one operation.
pub fn encrypt_chunk(chunk: &[u8], public_key: &RsaPublicKey) -> HoistResult<EncodedChunk> {
    let capacity = public_key.size().saturating_sub(PKCS1_PADDING_OVERHEAD);
    if chunk.len() > capacity {
        return Err(HoistError::Encryption(format!(
            "chunk of {} bytes exceeds the {}-byte capacity of a {}-bit key",
            chunk.len(),
            capacity,
            public_key.size() * 8
        )));
    }

    let ciphertext = public_key
        .encrypt(&mut OsRng, Pkcs1v15Encrypt, chunk)
        .map_err(|e| HoistError::Encryption(format!("RSA encryption failed: {}", e)))?;

    Ok(EncodedChunk(STANDARD.encode(ciphertext)))
}

/// Decode one chunk and decrypt it with the private key
///
/// # Errors
///
/// Returns [`HoistError::Decryption`] on malformed base64, a wrong key or
/// corrupted ciphertext.
pub fn decrypt_chunk(
    encoded: &EncodedChunk,
    private_key: &RsaPrivateKey,
) -> HoistResult<Zeroizing<Vec<u8>>> {
    let ciphertext = encoded.decode()?;

    // Padding failures all collapse into one message.
    private_key
        .decrypt(Pkcs1v15Encrypt, &ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| {
            HoistError::Decryption("wrong key or corrupted ciphertext".to_string())
        })
}

/// Split `plaintext` and encrypt every chunk in order
///
/// The chunk size is checked against the key before anything is encrypted.
pub fn encrypt(
    plaintext: &[u8],
    keypair: &KeyPair,
    chunk_size: usize,
) -> HoistResult<Vec<EncodedChunk>> {
    let chunk_size = NonZeroUsize::new(chunk_size)
        .ok_or_else(|| HoistError::Config("chunk size must be at least 1 byte".to_string()))?;

    let capacity = keypair.max_chunk_size();
    if chunk_size.get() > capacity {
        return Err(HoistError::Encryption(format!(
            "chunk size {} exceeds the {}-byte capacity of a {}-bit key; \
             use a larger key or a chunk size of at most {}",
            chunk_size,
            capacity,
            keypair.modulus_size() * 8,
            capacity
        )));
    }

    let chunks = chunking::split(plaintext, chunk_size);
    let encoded = chunks
        .iter()
        .map(|chunk| encrypt_chunk(chunk, keypair.public_key()))
        .collect::<HoistResult<Vec<_>>>()?;

    debug!(
        bytes = plaintext.len(),
        chunks = encoded.len(),
        chunk_size = chunk_size.get(),
        "Encrypted payload"
    );

    Ok(encoded)
}

/// Decrypt every chunk in order and join the results
///
/// # Errors
///
/// Fails with [`HoistError::Decryption`] if the pair has no private key or
/// any chunk fails; nothing is returned in that case.
pub fn decrypt(
    encoded_chunks: &[EncodedChunk],
    keypair: &KeyPair,
) -> HoistResult<Zeroizing<Vec<u8>>> {
    let private_key = keypair.private_key()?;

    let mut chunks = Vec::with_capacity(encoded_chunks.len());
    for (index, encoded) in encoded_chunks.iter().enumerate() {
        let chunk = decrypt_chunk(encoded, private_key).map_err(|e| match e {
            HoistError::Decryption(reason) => HoistError::Decryption(format!(
                "chunk {} of {}: {}",
                index + 1,
                encoded_chunks.len(),
                reason
            )),
            other => other,
        })?;
        chunks.push(chunk);
    }

    debug!(chunks = chunks.len(), "Decrypted payload");

    Ok(Zeroizing::new(chunking::join(&chunks)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::chunking::DEFAULT_CHUNK_SIZE;
    use crate::crypto::key_store;
    use proptest::prelude::*;
    use std::path::PathBuf;
    use std::sync::OnceLock;

    fn fixture_key(name: &str) -> KeyPair {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name);
        key_store::load(&path, b"").unwrap()
    }

    fn test_key() -> &'static KeyPair {
        static KEY: OnceLock<KeyPair> = OnceLock::new();
        KEY.get_or_init(|| fixture_key("test_key.pem"))
    }

    #[test]
    fn test_encrypt_decrypt() {
        let plaintext = b"db_password: s3cr3t\n";

        let encrypted = encrypt(plaintext, test_key(), DEFAULT_CHUNK_SIZE).unwrap();
        assert_eq!(encrypted.len(), 1);

        let decrypted = decrypt(&encrypted, test_key()).unwrap();
        assert_eq!(plaintext.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn test_encrypt_decrypt_multiple_chunks() {
        let plaintext = "database:\n  host: db.internal\n  user: app\n  password: \"p@ss wörd\"\n\
                         cache:\n  url: redis://cache.internal:6379/0\n";

        let encrypted = encrypt(plaintext.as_bytes(), test_key(), 16).unwrap();
        assert_eq!(encrypted.len(), plaintext.len().div_ceil(16));

        let decrypted = decrypt(&encrypted, test_key()).unwrap();
        assert_eq!(plaintext.as_bytes(), decrypted.as_slice());
    }

    #[test]
    fn test_round_trip_at_various_chunk_sizes() {
        let plaintext: Vec<u8> = (0..300).map(|i| (i % 256) as u8).collect();
        for chunk_size in [13, 64, 245] {
            let encrypted = encrypt(&plaintext, test_key(), chunk_size).unwrap();
            let decrypted = decrypt(&encrypted, test_key()).unwrap();
            assert_eq!(plaintext, *decrypted, "chunk size {}", chunk_size);
        }
    }

    #[test]
    fn test_empty_plaintext() {
        let encrypted = encrypt(b"", test_key(), DEFAULT_CHUNK_SIZE).unwrap();
        assert!(encrypted.is_empty());
        assert!(decrypt(&encrypted, test_key()).unwrap().is_empty());
    }

    #[test]
    fn test_same_chunk_encrypts_differently() {
        let a = encrypt_chunk(b"same", test_key().public_key()).unwrap();
        let b = encrypt_chunk(b"same", test_key().public_key()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_fails() {
        let other = fixture_key("other_key.pem");
        let encrypted = encrypt(b"db_password: s3cr3t\n", test_key(), DEFAULT_CHUNK_SIZE).unwrap();

        let err = decrypt(&encrypted, &other).unwrap_err();
        assert!(err.is_decryption());
    }

    #[test]
    fn test_one_corrupted_chunk_fails_everything() {
        let plaintext = vec![b'x'; 200];
        let mut encrypted = encrypt(&plaintext, test_key(), 64).unwrap();
        assert_eq!(encrypted.len(), 4);

        let mut raw = STANDARD.decode(encrypted[2].as_str()).unwrap();
        raw[10] ^= 0xFF;
        encrypted[2] = EncodedChunk::new(STANDARD.encode(raw));

        let err = decrypt(&encrypted, test_key()).unwrap_err();
        assert!(err.is_decryption());
        assert!(err.to_string().contains("chunk 3 of 4"));
    }

    #[test]
    fn test_malformed_encoding_fails() {
        let encoded = vec![EncodedChunk::new("not base64 !!")];
        let err = decrypt(&encoded, test_key()).unwrap_err();
        assert!(err.is_decryption());
    }

    #[test]
    fn test_public_only_pair_cannot_decrypt() {
        let public_only = fixture_key("test_key_pub.pem");
        let encrypted = encrypt(b"hello", &public_only, DEFAULT_CHUNK_SIZE).unwrap();

        assert!(decrypt(&encrypted, &public_only).unwrap_err().is_decryption());
        assert_eq!(decrypt(&encrypted, test_key()).unwrap().as_slice(), b"hello");
    }

    #[test]
    fn test_chunk_too_large_for_key() {
        let err = encrypt_chunk(&[0u8; 246], test_key().public_key()).unwrap_err();
        assert!(matches!(err, HoistError::Encryption(_)));
    }

    #[test]
    fn test_default_chunk_size_exceeds_small_key() {
        let small = fixture_key("small_key.pem");
        assert_eq!(small.max_chunk_size(), 53);

        let err = encrypt(b"short", &small, DEFAULT_CHUNK_SIZE).unwrap_err();
        assert!(matches!(err, HoistError::Encryption(_)));

        let encrypted = encrypt(b"short", &small, 53).unwrap();
        assert_eq!(decrypt(&encrypted, &small).unwrap().as_slice(), b"short");
    }

    #[test]
    fn test_zero_chunk_size_is_config_error() {
        let err = encrypt(b"data", test_key(), 0).unwrap_err();
        assert!(matches!(err, HoistError::Config(_)));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn test_decrypt_encrypt_identity(
            plaintext in proptest::collection::vec(any::<u8>(), 0..128),
            chunk_size in 1usize..=245,
        ) {
            let encrypted = encrypt(&plaintext, test_key(), chunk_size).unwrap();
            prop_assert_eq!(encrypted.len(), plaintext.len().div_ceil(chunk_size));

            let decrypted = decrypt(&encrypted, test_key()).unwrap();
            prop_assert_eq!(decrypted.as_slice(), plaintext.as_slice());
        }
    }
}
