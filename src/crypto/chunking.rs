//! Byte-level chunking of plaintext
//!
//! RSA can only encrypt a few hundred bytes at a time, so plaintext is cut
//! into fixed-size pieces first. Chunks are raw bytes; a multi-byte UTF-8
//! character may straddle two chunks and is restored intact by [`join`].

use std::num::NonZeroUsize;

/// Chunk size the tool has always used; fits any key of 600 bits or more
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// Split `plaintext` into ordered chunks of at most `chunk_size` bytes
///
/// Only the final chunk may be shorter. Empty input yields no chunks.
pub fn split(plaintext: &[u8], chunk_size: NonZeroUsize) -> Vec<Vec<u8>> {
    plaintext
        .chunks(chunk_size.get())
        .map(<[u8]>::to_vec)
        .collect()
}

/// Concatenate chunks back into the original plaintext
pub fn join<I, C>(chunks: I) -> Vec<u8>
where
    I: IntoIterator<Item = C>,
    C: AsRef<[u8]>,
{
    let mut out = Vec::new();
    for chunk in chunks {
        out.extend_from_slice(chunk.as_ref());
    }
    out
}
