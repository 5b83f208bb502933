/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use retrobit_core::bytestream::{ByteIoError, ByteWriter};
use retrobit_core::log::trace;
use zune_inflate::DeflateEncoder;

use crate::chunk::{ChunkCodec, DEFAULT_CODEC};
use crate::constants::{CHUNK_OVERHEAD, IDAT_CHUNK_SIZE, PNG_SIGNATURE};
use crate::error::PngErrors;

const RGBA_COMPONENTS: usize = 4;
/// Filter type byte prefixed to every scanline
const FILTER_NONE: u8 = 0;

/// A minimal PNG encoder for 8 bit RGBA images
///
/// Output is `IHDR`, `IDAT` split in 8 KiB pieces and `IEND`, every
/// scanline uses filter type None.
pub struct PngEncoder<'a> {
    data:   &'a [u8],
    width:  usize,
    height: usize
}

impl<'a> PngEncoder<'a> {
    /// Create a new encoder for `width` x `height` RGBA pixels in `data`
    pub const fn new(data: &'a [u8], width: usize, height: usize) -> PngEncoder<'a> {
        PngEncoder {
            data,
            width,
            height
        }
    }

    /// Encode the image using the crate's shared codec
    pub fn encode(&self) -> Result<Vec<u8>, PngErrors> {
        self.encode_with(&DEFAULT_CODEC)
    }

    /// Encode the image writing chunks through `codec`
    ///
    /// # Errors
    /// - [`PngErrors::BadDimensions`] if either dimension is zero or too large for PNG
    /// - [`PngErrors::IoErrors`] if the buffer length doesn't match the dimensions
    pub fn encode_with(&self, codec: &ChunkCodec) -> Result<Vec<u8>, PngErrors> {
        let expected_size = self.expected_size()?;

        if self.data.len() != expected_size {
            return Err(ByteIoError::NotEnoughBytes(expected_size, self.data.len()).into());
        }
        let compressed = DeflateEncoder::new(&self.add_filters()).encode_zlib();

        let idat_chunks = compressed.chunks(IDAT_CHUNK_SIZE).len();
        let ihdr = self.ihdr();

        let size = PNG_SIGNATURE.len()
            + (CHUNK_OVERHEAD + ihdr.len())
            + (CHUNK_OVERHEAD * idat_chunks + compressed.len())
            + CHUNK_OVERHEAD;

        let mut output = Vec::with_capacity(size);
        let mut writer = ByteWriter::new(&mut output);

        writer.write_all(&PNG_SIGNATURE);
        codec.write_chunk(b"IHDR", &ihdr, &mut writer);

        // Most decoders love data in 8KB chunks, since
        // probably libpng does that by default
        for chunk in compressed.chunks(IDAT_CHUNK_SIZE) {
            codec.write_chunk(b"IDAT", chunk, &mut writer);
        }
        codec.write_chunk(b"IEND", &[], &mut writer);

        trace!(
            "Encoded {}x{} image into {} bytes, {} IDAT chunks",
            self.width,
            self.height,
            writer.bytes_written(),
            idat_chunks
        );
        Ok(output)
    }

    fn expected_size(&self) -> Result<usize, PngErrors> {
        let max_dimension = i32::MAX as usize;

        if self.width == 0
            || self.height == 0
            || self.width > max_dimension
            || self.height > max_dimension
        {
            return Err(PngErrors::BadDimensions(self.width, self.height));
        }
        self.width
            .checked_mul(self.height)
            .and_then(|x| x.checked_mul(RGBA_COMPONENTS))
            .ok_or(PngErrors::BadDimensions(self.width, self.height))
    }

    fn ihdr(&self) -> [u8; 13] {
        let mut ihdr = [0_u8; 13];

        ihdr[0..4].copy_from_slice(&(self.width as u32).to_be_bytes());
        ihdr[4..8].copy_from_slice(&(self.height as u32).to_be_bytes());
        // bit depth
        ihdr[8] = 8;
        // colour type, truecolour with alpha
        ihdr[9] = 6;
        // compression, filter and interlace methods stay zero
        ihdr
    }

    fn add_filters(&self) -> Vec<u8> {
        let scanline_size = self.width * RGBA_COMPONENTS;
        let mut filtered = Vec::with_capacity((scanline_size + 1) * self.height);

        for scanline in self.data.chunks_exact(scanline_size) {
            filtered.push(FILTER_NONE);
            filtered.extend_from_slice(scanline);
        }
        filtered
    }
}

#[cfg(test)]
mod tests {
    use nanorand::{Rng, WyRand};

    use super::*;
    use crate::chunk::parse_chunks;

    fn decode_with_png(bytes: &[u8]) -> (png::OutputInfo, Vec<u8>) {
        let decoder = png::Decoder::new(bytes);
        let mut reader = decoder.read_info().unwrap();
        let mut output = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut output).unwrap();
        output.truncate(info.buffer_size());
        (info, output)
    }

    #[test]
    fn test_simple_write() {
        let width = 40;
        let height = 10;
        let data = vec![100; width * height * 4];

        let bytes = PngEncoder::new(&data, width, height).encode().unwrap();
        let (info, pixels) = decode_with_png(&bytes);

        assert_eq!(info.width, 40);
        assert_eq!(info.height, 10);
        assert_eq!(info.color_type, png::ColorType::Rgba);
        assert_eq!(pixels, data);
    }

    #[test]
    fn test_random_pixels_span_many_idat_chunks() {
        let (width, height) = (97, 61);
        let mut rand = WyRand::new_seed(42);
        let data: Vec<u8> = (0..width * height * 4)
            .map(|_| rand.generate::<u8>())
            .collect();

        let bytes = PngEncoder::new(&data, width, height).encode().unwrap();

        let chunks = parse_chunks(&bytes).unwrap();
        assert_eq!(&chunks[0].chunk_type, b"IHDR");
        assert_eq!(&chunks.last().unwrap().chunk_type, b"IEND");
        let idat = chunks.iter().filter(|x| &x.chunk_type == b"IDAT").count();
        assert!(idat > 1);
        assert!(chunks
            .iter()
            .filter(|x| &x.chunk_type == b"IDAT")
            .all(|x| x.length() <= IDAT_CHUNK_SIZE));

        let (_, pixels) = decode_with_png(&bytes);
        assert_eq!(pixels, data);
    }

    #[test]
    fn test_bad_dimensions() {
        assert!(matches!(
            PngEncoder::new(&[], 0, 10).encode(),
            Err(PngErrors::BadDimensions(0, 10))
        ));
        assert!(matches!(
            PngEncoder::new(&[0; 12], 2, 2).encode(),
            Err(PngErrors::IoErrors(ByteIoError::NotEnoughBytes(16, 12)))
        ));
    }
}
