//! Trailing container footer

use byteorder::{ByteOrder, LittleEndian};

use crate::{Error, Result, DVPL_MAGIC};

/// Footer size in bytes
pub const FOOTER_SIZE: usize = 20;

// Field offsets within the footer
const ORIGINAL_SIZE: usize = 0;
const COMPRESSED_SIZE: usize = 4;
const CRC32: usize = 8;
const COMPRESSION: usize = 12;
const RESERVED: usize = 16;

/// Container footer (20 bytes, trailing the payload)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footer {
    /// Size after decompression
    pub original_size: u32,
    /// Size of the payload as stored
    pub compressed_size: u32,
    /// CRC-32 (IEEE) of the stored payload
    pub crc32: u32,
    /// Compression kind (0 = stored)
    pub compression: u32,
}

impl Footer {
    /// Parse the footer from the last 20 bytes of a wrapped file
    #[inline]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < FOOTER_SIZE {
            return Err(Error::DataTooShort {
                needed: FOOTER_SIZE,
                actual: data.len(),
            });
        }

        let footer = &data[data.len() - FOOTER_SIZE..];
        Ok(Self {
            original_size: LittleEndian::read_u32(&footer[ORIGINAL_SIZE..]),
            compressed_size: LittleEndian::read_u32(&footer[COMPRESSED_SIZE..]),
            crc32: LittleEndian::read_u32(&footer[CRC32..]),
            compression: LittleEndian::read_u32(&footer[COMPRESSION..]),
        })
    }

    /// Serialize the footer, filling the reserved slot with `DVPL`
    pub fn to_bytes(&self) -> [u8; FOOTER_SIZE] {
        let mut out = [0u8; FOOTER_SIZE];
        LittleEndian::write_u32(&mut out[ORIGINAL_SIZE..], self.original_size);
        LittleEndian::write_u32(&mut out[COMPRESSED_SIZE..], self.compressed_size);
        LittleEndian::write_u32(&mut out[CRC32..], self.crc32);
        LittleEndian::write_u32(&mut out[COMPRESSION..], self.compression);
        out[RESERVED..].copy_from_slice(&DVPL_MAGIC);
        out
    }

    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.compression != 0
    }

    /// Check the payload against the declared size and checksum
    pub fn verify(&self, payload: &[u8]) -> Result<()> {
        if self.compressed_size as usize != payload.len() {
            return Err(Error::SizeMismatch {
                declared: self.compressed_size as usize,
                actual: payload.len(),
            });
        }

        let computed = crc32(payload);
        if computed != self.crc32 {
            return Err(Error::ChecksumMismatch {
                stored: self.crc32,
                computed,
            });
        }

        Ok(())
    }
}

/// CRC-32 (IEEE 802.3) of a byte slice
pub(crate) fn crc32(data: &[u8]) -> u32 {
    let mut crc = flate2::Crc::new();
    crc.update(data);
    crc.sum()
}
