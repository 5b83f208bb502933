/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! End to end tests, decode -> pipeline -> encode -> preserve -> parse back
#![allow(unused_imports, unused)]

use nanorand::{Rng, WyRand};
use retrobit_image::image::PixelBuffer;
use retrobit_png::{
    build_chunks, insert_before_iend, make_text_chunk, parse_chunks, ChunkCodec, PngEncoder
};
use xxhash_rust::xxh3::xxh3_128;

mod chunks;
mod metadata;
mod pipeline;

pub fn random_image(width: usize, height: usize, seed: u64) -> PixelBuffer {
    let mut rand = WyRand::new_seed(seed);
    let pixels = (0..width * height * 4).map(|_| rand.generate::<u8>()).collect();

    PixelBuffer::new(pixels, width, height).unwrap()
}

pub fn encode(image: &PixelBuffer) -> Vec<u8> {
    let (width, height) = image.dimensions();
    PngEncoder::new(image.pixels(), width, height)
        .encode()
        .unwrap()
}

/// Encode `image` and add a `tEXt` chunk per entry before `IEND`
pub fn encode_with_text(image: &PixelBuffer, entries: &[(&str, &str)]) -> Vec<u8> {
    let chunks = parse_chunks(&encode(image)).unwrap();
    let texts = entries
        .iter()
        .map(|(keyword, text)| make_text_chunk(keyword, text).unwrap())
        .collect();

    build_chunks(&insert_before_iend(chunks, texts).unwrap())
}

/// A little endian TIFF holding an ASCII `Make` of `Nikon` and a RATIONAL
/// `ExposureTime` of 1/250 in its Exif IFD
pub fn exif_tiff() -> Vec<u8> {
    let entry = |tag: u16, kind: u16, count: u32, value: u32| {
        [
            &tag.to_le_bytes()[..],
            &kind.to_le_bytes(),
            &count.to_le_bytes(),
            &value.to_le_bytes()
        ]
        .concat()
    };
    let mut tiff = b"II*\0".to_vec();
    tiff.extend_from_slice(&8_u32.to_le_bytes());

    tiff.extend_from_slice(&2_u16.to_le_bytes());
    tiff.extend(entry(0x010F, 2, 6, 38));
    tiff.extend(entry(0x8769, 4, 1, 44));
    tiff.extend_from_slice(&0_u32.to_le_bytes());
    tiff.extend_from_slice(b"Nikon\0");

    tiff.extend_from_slice(&1_u16.to_le_bytes());
    tiff.extend(entry(0x829A, 5, 1, 62));
    tiff.extend_from_slice(&0_u32.to_le_bytes());
    tiff.extend_from_slice(&1_u32.to_le_bytes());
    tiff.extend_from_slice(&250_u32.to_le_bytes());

    tiff
}

/// Encode `image` with `exif` stored in an `eXIf` chunk
pub fn encode_with_exif(image: &PixelBuffer, exif: Vec<u8>) -> Vec<u8> {
    let chunks = parse_chunks(&encode(image)).unwrap();
    let exif = ChunkCodec::new().chunk(*b"eXIf", exif);

    build_chunks(&insert_before_iend(chunks, vec![exif]).unwrap())
}

fn hash(contents: &[u8]) -> u128 {
    xxh3_128(contents)
}
