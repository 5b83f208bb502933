/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Chunk level reading and writing of PNG streams
//!
//! A PNG stream is the eight byte signature followed by chunks laid out as
//!
//! ```text
//! length (4 bytes, BE) - chunk type (4 bytes) - [data] - crc (4 bytes, BE)
//! ```
//!
//! and terminated by an `IEND` chunk with no data.
#![allow(clippy::upper_case_acronyms, non_camel_case_types)]

use retrobit_core::bytestream::{ByteReader, ByteWriter};
use retrobit_core::log::{trace, warn};

use crate::constants::{CHUNK_OVERHEAD, PNG_SIGNATURE};
use crate::crc::CrcTable;
use crate::error::PngErrors;
use crate::text::text_chunk_with_table;

pub(crate) static DEFAULT_CODEC: ChunkCodec = ChunkCodec::new();

/// Chunk types this crate gives a name to,
/// see https://www.w3.org/TR/2003/REC-PNG-20031110/ table 5.3
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngChunkType {
    IHDR,
    PLTE,
    IDAT,
    IEND,
    eXIf,
    tEXt,
    zTXt,
    iTXt,
    unkn
}

impl PngChunkType {
    pub fn from_bytes(chunk_type: &[u8; 4]) -> PngChunkType {
        match chunk_type {
            b"IHDR" => Self::IHDR,
            b"PLTE" => Self::PLTE,
            b"IDAT" => Self::IDAT,
            b"IEND" => Self::IEND,
            b"eXIf" => Self::eXIf,
            b"tEXt" => Self::tEXt,
            b"zTXt" => Self::zTXt,
            b"iTXt" => Self::iTXt,
            _ => Self::unkn
        }
    }

    /// Return true if the chunk carries keyword/text metadata
    pub const fn is_text(self) -> bool {
        matches!(self, Self::tEXt | Self::zTXt | Self::iTXt)
    }
}

/// A single chunk of a PNG stream
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PngChunk {
    pub chunk_type: [u8; 4],
    pub data:       Vec<u8>,
    /// The crc as read from the stream, or as computed when the chunk
    /// was created by this crate.
    ///
    /// It is not trusted, writing always recomputes it.
    pub crc:        u32
}

impl PngChunk {
    /// Create a chunk computing its crc with `table`
    pub fn new(chunk_type: [u8; 4], data: Vec<u8>, table: &CrcTable) -> PngChunk {
        let crc = table.chunk_crc(&chunk_type, &data);

        PngChunk {
            chunk_type,
            data,
            crc
        }
    }
    /// Byte length of the chunk data
    pub fn length(&self) -> usize {
        self.data.len()
    }
    pub fn kind(&self) -> PngChunkType {
        PngChunkType::from_bytes(&self.chunk_type)
    }
    /// The chunk type as text, lossy for non ASCII types
    pub fn name(&self) -> String {
        String::from_utf8_lossy(&self.chunk_type).into_owned()
    }
}

/// Reads and writes PNG chunk streams
///
/// The codec owns the crc lookup table used whenever a chunk is written,
/// construct it once and pass it around by reference.
pub struct ChunkCodec {
    crc: CrcTable
}

impl ChunkCodec {
    /// Create a new codec, building its crc table
    pub const fn new() -> ChunkCodec {
        ChunkCodec {
            crc: CrcTable::new()
        }
    }

    /// The crc table owned by this codec
    pub const fn crc_table(&self) -> &CrcTable {
        &self.crc
    }

    /// Calculate the CRC32 of `bytes`
    pub fn crc32(&self, bytes: &[u8]) -> u32 {
        self.crc.checksum(bytes)
    }

    /// Create a chunk of `chunk_type` with a freshly computed crc
    pub fn chunk(&self, chunk_type: [u8; 4], data: Vec<u8>) -> PngChunk {
        PngChunk::new(chunk_type, data, &self.crc)
    }

    /// Split a PNG stream into its chunks
    ///
    /// Chunks are returned in stream order, iteration stops when fewer than
    /// eight bytes remain. Checksums are not verified.
    ///
    /// # Errors
    /// - [`PngErrors::BadSignature`] if the stream doesn't start with the PNG signature
    pub fn parse(&self, bytes: &[u8]) -> Result<Vec<PngChunk>, PngErrors> {
        if !is_png(bytes) {
            return Err(PngErrors::BadSignature);
        }
        let mut stream = ByteReader::new(&bytes[PNG_SIGNATURE.len()..]);
        let mut chunks = Vec::new();

        while stream.has(8) {
            // Format is length - chunk type - [data] -  crc chunk
            let length = stream.get_u32_be_err()? as usize;
            let chunk_type = stream.get_fixed_bytes_or_error::<4>()?;

            if !stream.has(length.saturating_add(4)) {
                warn!(
                    "Not enough bytes for chunk {:?}, bytes requested are {}, but bytes present are {}, ignoring the rest of the stream",
                    String::from_utf8_lossy(&chunk_type),
                    length.saturating_add(4),
                    stream.remaining()
                );
                break;
            }
            let data = stream.get_as_ref(length)?.to_vec();
            let crc = stream.get_u32_be_err()?;

            trace!(
                "Chunk {}, length {}",
                String::from_utf8_lossy(&chunk_type),
                length
            );

            chunks.push(PngChunk {
                chunk_type,
                data,
                crc
            });
        }
        Ok(chunks)
    }

    /// Serialize chunks into a PNG stream, signature first
    ///
    /// Chunks are written in the given order, the crc of every chunk is
    /// recomputed.
    pub fn build(&self, chunks: &[PngChunk]) -> Vec<u8> {
        let size = PNG_SIGNATURE.len()
            + chunks
                .iter()
                .map(|x| CHUNK_OVERHEAD + x.length())
                .sum::<usize>();

        let mut output = Vec::with_capacity(size);
        let mut writer = ByteWriter::new(&mut output);

        writer.write_all(&PNG_SIGNATURE);

        for chunk in chunks {
            self.write_chunk(&chunk.chunk_type, &chunk.data, &mut writer);
        }
        debug_assert_eq!(output.len(), size);

        output
    }

    /// Write the boilerplate of a single chunk
    ///
    /// It writes the length, chunk type, the data and then the CRC of
    /// type and data.
    pub(crate) fn write_chunk(&self, chunk_type: &[u8; 4], data: &[u8], writer: &mut ByteWriter) {
        writer.write_u32_be(data.len() as u32);
        writer.write_all(chunk_type);
        writer.write_all(data);
        writer.write_u32_be(self.crc.chunk_crc(chunk_type, data));
    }

    /// Create a `tEXt` chunk
    ///
    /// Returns `None` when the keyword is empty or longer than 79 characters,
    /// see [`make_text_chunk`](crate::make_text_chunk)
    pub fn make_text_chunk(&self, keyword: &str, text: &str) -> Option<PngChunk> {
        text_chunk_with_table(keyword, text, &self.crc)
    }

    /// Splice `new_chunks` immediately before the `IEND` chunk
    ///
    /// # Errors
    /// - [`PngErrors::MissingIend`] if the stream has no `IEND` chunk
    pub fn insert_before_iend(
        &self, mut chunks: Vec<PngChunk>, new_chunks: Vec<PngChunk>
    ) -> Result<Vec<PngChunk>, PngErrors> {
        let position = chunks
            .iter()
            .position(|x| x.kind() == PngChunkType::IEND)
            .ok_or(PngErrors::MissingIend)?;

        chunks.splice(position..position, new_chunks);

        Ok(chunks)
    }
}

impl Default for ChunkCodec {
    fn default() -> Self {
        ChunkCodec::new()
    }
}

/// Return true if `bytes` starts with the eight byte PNG signature
///
/// ```
/// use retrobit_png::is_png;
/// assert!(is_png(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]));
/// assert!(!is_png(&[0xFF, 0xD8, 0xFF, 0xE0]));
/// ```
pub fn is_png(bytes: &[u8]) -> bool {
    bytes.starts_with(&PNG_SIGNATURE)
}

/// Split a PNG stream into chunks, see [`ChunkCodec::parse`]
pub fn parse_chunks(bytes: &[u8]) -> Result<Vec<PngChunk>, PngErrors> {
    DEFAULT_CODEC.parse(bytes)
}

/// Serialize chunks into a PNG stream, see [`ChunkCodec::build`]
pub fn build_chunks(chunks: &[PngChunk]) -> Vec<u8> {
    DEFAULT_CODEC.build(chunks)
}

/// Splice chunks before `IEND`, see [`ChunkCodec::insert_before_iend`]
pub fn insert_before_iend(
    chunks: Vec<PngChunk>, new_chunks: Vec<PngChunk>
) -> Result<Vec<PngChunk>, PngErrors> {
    DEFAULT_CODEC.insert_before_iend(chunks, new_chunks)
}
