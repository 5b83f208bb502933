/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Format detection and decoding into RGBA
//!
//! Decoding is delegated to `zune-png` and `zune-jpeg`, whatever colorspace
//! they return is expanded into 8 bit RGBA.
use retrobit_core::log::{debug, trace};
use zune_core::colorspace::ColorSpace;

use crate::errors::ImageErrors;
use crate::image::{PixelBuffer, RGBA_COMPONENTS};

/// All recognised image formats
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    WebP,
    /// Any unknown format.
    Unknown
}

impl ImageFormat {
    /// Guess the format from the first bytes of a file
    ///
    /// ```
    /// use retrobit_image::codecs::ImageFormat;
    ///
    /// assert_eq!(ImageFormat::guess_format(&[0xFF, 0xD8, 0xFF, 0xE0]), ImageFormat::Jpeg);
    /// assert_eq!(ImageFormat::guess_format(b"hello"), ImageFormat::Unknown);
    /// ```
    pub fn guess_format(bytes: &[u8]) -> ImageFormat {
        static MAGIC_BYTES: [(&[u8], ImageFormat); 7] = [
            (&[137, 80, 78, 71, 13, 10, 26, 10], ImageFormat::Png),
            // Of course with jpg we need to relax our definition of what is a jpeg
            // the best identifier would be 0xFF,0xd8 0xff but nop, some images exist
            // which do not have that
            (&[0xff, 0xd8], ImageFormat::Jpeg),
            (b"GIF87a", ImageFormat::Gif),
            (b"GIF89a", ImageFormat::Gif),
            (b"BM", ImageFormat::Bmp),
            (b"II*\0", ImageFormat::Tiff),
            (b"MM\0*", ImageFormat::Tiff)
        ];

        for (magic, format) in MAGIC_BYTES {
            if bytes.starts_with(magic) {
                return format;
            }
        }
        if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            return ImageFormat::WebP;
        }
        ImageFormat::Unknown
    }

    /// The MIME type of the format
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
            Self::WebP => "image/webp",
            Self::Unknown => "application/octet-stream"
        }
    }

    /// Return true if this build can decode the format
    pub const fn has_decoder(self) -> bool {
        match self {
            Self::Png => cfg!(feature = "png"),
            Self::Jpeg => cfg!(feature = "jpeg"),
            _ => false
        }
    }
}

/// Decode `bytes` into an RGBA image
///
/// # Errors
/// - [`ImageErrors::ImageDecoderNotImplemented`] for formats without a decoder
/// - [`ImageErrors::ImageDecodeErrors`] if the decoder rejects the data
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, ImageErrors> {
    let format = ImageFormat::guess_format(bytes);

    debug!("Detected format {:?}", format);

    match format {
        #[cfg(feature = "png")]
        ImageFormat::Png => decode_png(bytes),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => decode_jpeg(bytes),
        _ => Err(ImageErrors::ImageDecoderNotImplemented(format))
    }
}

#[cfg(feature = "png")]
fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, ImageErrors> {
    use zune_core::result::DecodingResult;

    let mut decoder = zune_png::PngDecoder::new(bytes);

    let pixels = decoder
        .decode()
        .map_err(|e| ImageErrors::ImageDecodeErrors(format!("{e:?}")))?;

    let (width, height) = decoder
        .get_dimensions()
        .ok_or(ImageErrors::GenericStr("PNG decoder returned no dimensions"))?;
    let colorspace = decoder
        .get_colorspace()
        .ok_or(ImageErrors::GenericStr("PNG decoder returned no colorspace"))?;

    let pixels = match pixels {
        DecodingResult::U8(data) => data,
        // keep the most significant byte
        DecodingResult::U16(data) => data.iter().map(|x| (x >> 8) as u8).collect(),
        _ => return Err(ImageErrors::GenericStr("Unsupported PNG sample type"))
    };
    trace!("Decoded PNG {}x{} {:?}", width, height, colorspace);

    expand_to_rgba(&pixels, width, height, colorspace)
}

#[cfg(feature = "jpeg")]
fn decode_jpeg(bytes: &[u8]) -> Result<PixelBuffer, ImageErrors> {
    let mut decoder = zune_jpeg::JpegDecoder::new(bytes);

    let pixels = decoder
        .decode()
        .map_err(|e| ImageErrors::ImageDecodeErrors(format!("{e:?}")))?;

    let (width, height) = decoder
        .dimensions()
        .ok_or(ImageErrors::GenericStr("JPEG decoder returned no dimensions"))?;
    let colorspace = decoder
        .get_output_colorspace()
        .ok_or(ImageErrors::GenericStr("JPEG decoder returned no colorspace"))?;

    trace!("Decoded JPEG {}x{} {:?}", width, height, colorspace);

    expand_to_rgba(&pixels, width, height, colorspace)
}

/// Expand interleaved 8 bit pixels in `colorspace` into RGBA
///
/// # Errors
/// - [`ImageErrors::ImageDecodeErrors`] for colorspaces other than Luma, LumaA, RGB and RGBA
/// - [`ImageErrors::DimensionsMisMatch`] if `pixels` is too short for the dimensions
pub fn expand_to_rgba(
    pixels: &[u8], width: usize, height: usize, colorspace: ColorSpace
) -> Result<PixelBuffer, ImageErrors> {
    let components = colorspace.num_components();
    let expected = width
        .checked_mul(height)
        .and_then(|x| x.checked_mul(components))
        .ok_or(ImageErrors::GenericStr("Image dimensions overflow"))?;

    if pixels.len() < expected {
        return Err(ImageErrors::DimensionsMisMatch(expected, pixels.len()));
    }
    let pixels = &pixels[..expected];

    let rgba: Vec<u8> = match colorspace {
        ColorSpace::RGBA => pixels.to_vec(),
        ColorSpace::RGB => pixels
            .chunks_exact(3)
            .flat_map(|x| [x[0], x[1], x[2], 255])
            .collect(),
        ColorSpace::Luma => pixels.iter().flat_map(|x| [*x, *x, *x, 255]).collect(),
        ColorSpace::LumaA => pixels
            .chunks_exact(2)
            .flat_map(|x| [x[0], x[0], x[0], x[1]])
            .collect(),
        _ => {
            return Err(ImageErrors::ImageDecodeErrors(format!(
                "Cannot convert colorspace {colorspace:?} to RGBA"
            )))
        }
    };
    debug_assert_eq!(rgba.len(), width * height * RGBA_COMPONENTS);

    PixelBuffer::new(rgba, width, height)
}
