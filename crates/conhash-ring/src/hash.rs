//! Hash functions used to place nodes and keys on the ring.
//!
//! A hash function is a plain `fn(&[u8]) -> u32`. It must be deterministic
//! and should spread similar inputs (`"0node-a"`, `"1node-a"`, ...) across
//! the whole `u32` space.

use serde::Deserialize;

/// A ring hash function: bytes in, 32-bit ring position out.
pub type HashFn = fn(&[u8]) -> u32;

/// CRC32 (IEEE polynomial) checksum. The default ring hash.
pub fn crc32_ieee(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// First four bytes of the BLAKE3 digest, little endian.
pub fn blake3_32(data: &[u8]) -> u32 {
    let hash = blake3::hash(data);
    let bytes = hash.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Named hash algorithms selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// [`crc32_ieee`].
    #[default]
    Crc32,
    /// [`blake3_32`].
    Blake3,
}

impl HashAlgorithm {
    /// Return the hash function for this algorithm.
    pub fn hasher(self) -> HashFn {
        match self {
            Self::Crc32 => crc32_ieee,
            Self::Blake3 => blake3_32,
        }
    }
}
