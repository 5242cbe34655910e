//! Cryptographic functions for hoist
//!
//! Chunked RSA (PKCS#1 v1.5) encryption of configuration files, with keys
//! read from PEM files that may be passphrase-protected.

pub mod chunking;
pub mod encryption;
pub mod key_store;
pub mod secure_memory;

pub use chunking::DEFAULT_CHUNK_SIZE;
pub use encryption::{decrypt, decrypt_chunk, encrypt, encrypt_chunk, EncodedChunk};
pub use key_store::KeyPair;
pub use secure_memory::SecureString;
