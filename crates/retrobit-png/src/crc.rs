/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! CRC32 as used by PNG chunks
//!
//! This is the reflected IEEE 802.3 CRC with polynomial `0xEDB88320`,
//! the same one zlib computes. The register starts at `0xFFFFFFFF` and
//! the result is inverted.
//!
//! The lookup table is an explicit value, whoever needs checksums owns
//! one (see [`ChunkCodec`](crate::ChunkCodec)) or borrows the one built
//! at compile time by [`crc32`].
use crate::constants::CRC32_POLYNOMIAL;

/// Built during compilation, never at runtime
pub(crate) static DEFAULT_TABLE: CrcTable = CrcTable::new();

/// An immutable 256 entry CRC32 lookup table
#[derive(Clone)]
pub struct CrcTable {
    table: [u32; 256]
}

impl CrcTable {
    /// Build the lookup table
    ///
    /// This is a `const fn` so it can be evaluated during compilation
    pub const fn new() -> CrcTable {
        let mut table = [0_u32; 256];
        let mut n = 0;

        while n < 256 {
            let mut c = n as u32;
            let mut k = 0;

            while k < 8 {
                if c & 1 == 1 {
                    c = CRC32_POLYNOMIAL ^ (c >> 1);
                } else {
                    c >>= 1;
                }
                k += 1;
            }
            table[n] = c;
            n += 1;
        }
        CrcTable { table }
    }

    /// Feed `bytes` into a running (non inverted) crc register
    ///
    /// Start with `u32::MAX` and invert the final value, crc is a
    /// continuous function so a chunk type and its data can be fed
    /// separately.
    #[inline]
    pub fn update(&self, crc: u32, bytes: &[u8]) -> u32 {
        let mut c = crc;

        for byte in bytes {
            c = self.table[((c ^ u32::from(*byte)) & 0xFF) as usize] ^ (c >> 8);
        }
        c
    }

    /// Calculate the CRC32 of `bytes`
    ///
    /// ```
    /// use retrobit_png::CrcTable;
    /// let table = CrcTable::new();
    /// assert_eq!(table.checksum(&[]), 0);
    /// assert_eq!(table.checksum(b"123456789"), 0xCBF4_3926);
    /// ```
    #[inline]
    pub fn checksum(&self, bytes: &[u8]) -> u32 {
        !self.update(u32::MAX, bytes)
    }

    /// Calculate the CRC of a chunk, covering its type followed by its data
    #[inline]
    pub fn chunk_crc(&self, chunk_type: &[u8; 4], data: &[u8]) -> u32 {
        // equal to crc((chunk_type + data))
        let crc = self.update(u32::MAX, chunk_type);
        !self.update(crc, data)
    }
}

impl Default for CrcTable {
    fn default() -> Self {
        CrcTable::new()
    }
}

/// Calculate the CRC32 of `bytes` using a table built at compile time
pub fn crc32(bytes: &[u8]) -> u32 {
    DEFAULT_TABLE.checksum(bytes)
}
