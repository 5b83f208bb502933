/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Constants defined by the PNG format

/// The eight byte signature every PNG stream starts with
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Size of the per chunk overhead, length + type + crc
pub const CHUNK_OVERHEAD: usize = 12;

/// Longest keyword a text chunk may carry
pub const MAX_KEYWORD_LENGTH: usize = 79;

/// Size of the pieces image data is split into when writing `IDAT` chunks
pub const IDAT_CHUNK_SIZE: usize = 8192;

/// The CRC32 polynomial (reflected) mandated by the PNG format
pub const CRC32_POLYNOMIAL: u32 = 0xEDB8_8320;
