/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A PNG chunk reader and writer
//!
//! This crate works on the chunk level of ISO/IEC 15948:2003 (E) PNG
//! streams, it does not filter or decompress image data.
//!
//! # Features
//! - Chunk stream parsing and building with CRC32 recomputation on write
//! - `tEXt` chunk construction with Latin-1 encoding
//! - Reading of `tEXt`, `zTXt` and `iTXt` keyword/text pairs
//! - A minimal RGBA8 encoder producing a valid PNG stream
//!
//! # Splicing text into a PNG
//!
//!```
//! use retrobit_png::{ChunkCodec, PngEncoder};
//!
//! let pixels = [255_u8, 0, 0, 255];
//! let png = PngEncoder::new(&pixels, 1, 1).encode().unwrap();
//!
//! let codec = ChunkCodec::new();
//! let chunks = codec.parse(&png).unwrap();
//! let text = codec.make_text_chunk("Software", "retrobit").unwrap();
//! let chunks = codec.insert_before_iend(chunks, vec![text]).unwrap();
//!
//! let output = codec.build(&chunks);
//! assert!(retrobit_png::is_png(&output));
//!```
//!
//! # Reading CRCs
//! Checksums are never verified when reading, they are always
//! recomputed when writing.
#![forbid(unsafe_code)]

pub use chunk::{
    build_chunks, insert_before_iend, is_png, parse_chunks, ChunkCodec, PngChunk, PngChunkType
};
pub use crc::{crc32, CrcTable};
pub use encoder::PngEncoder;
pub use error::PngErrors;
pub use text::{make_text_chunk, read_text_chunks, TextChunk, TextChunkKind};

mod chunk;
pub mod constants;
mod crc;
mod encoder;
pub mod error;
mod text;
