//! DVPL container codec for World of Tanks Blitz data files
//!
//! Game data files ship wrapped in a small envelope that carries sizes, a
//! checksum and an optional LZ4 block compression of the payload.
//!
//! # Format Overview
//!
//! ```text
//! [payload: compressed_size bytes][footer: 20 bytes]
//! ```
//!
//! Footer (all fields little-endian `u32`):
//! - Bytes 0-3: Original (decompressed) size
//! - Bytes 4-7: Compressed size (length of the payload)
//! - Bytes 8-11: CRC-32 (IEEE) of the payload
//! - Bytes 12-15: Compression kind (0 = stored, anything else = LZ4 block)
//! - Bytes 16-19: Reserved (`DVPL` in shipped files, never checked)

mod codec;
mod footer;
mod tree;

pub use codec::{decode, encode, Compression};
pub use footer::Footer;
pub use tree::{
    decode_tree, is_container_path, strip_container_extension, TreeSummary, DECODED_EXTENSIONS,
};

/// Footer size in bytes
pub const FOOTER_SIZE: usize = footer::FOOTER_SIZE;

/// Bytes written into the reserved footer slot
pub const DVPL_MAGIC: [u8; 4] = *b"DVPL";

/// File extension of wrapped files
pub const CONTAINER_EXTENSION: &str = "dvpl";

/// Errors from container decoding
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Data too short: need {needed} bytes, got {actual}")]
    DataTooShort { needed: usize, actual: usize },

    #[error("Compressed size mismatch: footer declares {declared}, payload is {actual} bytes")]
    SizeMismatch { declared: usize, actual: usize },

    #[error("CRC32 mismatch: footer stores 0x{stored:08x}, payload hashes to 0x{computed:08x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    #[error("LZ4 decompression error: {0}")]
    Lz4(#[from] lz4_flex::block::DecompressError),

    #[error("Decompression size mismatch: expected {expected}, got {actual}")]
    DecompressionSize { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the envelope itself is damaged (length or checksum), as
    /// opposed to a payload that fails to decompress
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            Error::DataTooShort { .. } | Error::SizeMismatch { .. } | Error::ChecksumMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
