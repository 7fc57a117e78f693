//! Container decode/encode

use crate::footer::{crc32, Footer, FOOTER_SIZE};
use crate::{Error, Result};

/// Payload compression written by [`encode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Payload stored as-is (tag 0)
    None,
    /// Single LZ4 block (tag 1)
    Lz4,
}

impl Compression {
    pub fn tag(self) -> u32 {
        match self {
            Compression::None => 0,
            Compression::Lz4 => 1,
        }
    }
}

/// Strip the container envelope from a wrapped file
///
/// Validates the declared payload length and CRC-32 before touching the
/// payload. Compressed payloads must decompress to exactly the declared
/// original size.
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let footer = Footer::from_bytes(data)?;
    let payload = &data[..data.len() - FOOTER_SIZE];
    footer.verify(payload)?;

    if !footer.is_compressed() {
        return Ok(payload.to_vec());
    }

    decompress_block(payload, footer.original_size as usize)
}

/// Decompress a single LZ4 block into a buffer of exactly `original_size` bytes
fn decompress_block(payload: &[u8], original_size: usize) -> Result<Vec<u8>> {
    let mut decompressed = vec![0u8; original_size];
    let actual = lz4_flex::block::decompress_into(payload, &mut decompressed)?;

    if actual != original_size {
        return Err(Error::DecompressionSize {
            expected: original_size,
            actual,
        });
    }

    Ok(decompressed)
}

/// Wrap raw content in a container envelope
pub fn encode(content: &[u8], compression: Compression) -> Vec<u8> {
    let payload = match compression {
        Compression::None => content.to_vec(),
        Compression::Lz4 => lz4_flex::block::compress(content),
    };

    let footer = Footer {
        original_size: content.len() as u32,
        compressed_size: payload.len() as u32,
        crc32: crc32(&payload),
        compression: compression.tag(),
    };

    let mut out = payload;
    out.extend_from_slice(&footer.to_bytes());
    out
}
