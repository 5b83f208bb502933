/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Nearest neighbor resampling
//!
//! Every destination pixel `(x,y)` takes the value of source pixel
//! `(floor(x*in_width/out_width), floor(y*in_height/out_height))`,
//! all four channels copied as is.
//!
//! No filtering is done, downscaling drops pixels and upscaling repeats them,
//! which is exactly the blocky look we want.
use retrobit_image::errors::ImageErrors;
use retrobit_image::image::{PixelBuffer, RGBA_COMPONENTS};
use retrobit_image::traits::OperationsTrait;

/// How a [`Resample`] operation computes its output dimensions
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ResampleBy {
    /// Divide both dimensions by this factor, rounding down
    Divide(usize),
    /// Multiply both dimensions by this factor
    Multiply(usize)
}

/// Resample an image using nearest neighbor sampling
///
/// # Example
/// Pixelate a 64x64 image by 4
///
/// ```
/// use retrobit_image::image::PixelBuffer;
/// use retrobit_image::traits::OperationsTrait;
/// use retrobit_imageprocs::resize::{Resample, ResampleBy};
///
/// let image = PixelBuffer::new(vec![0; 64 * 64 * 4], 64, 64).unwrap();
/// let smaller = Resample::new(ResampleBy::Divide(4)).execute(&image).unwrap();
/// assert_eq!(smaller.dimensions(), (16, 16));
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Resample {
    by: ResampleBy
}

impl Resample {
    #[must_use]
    pub const fn new(by: ResampleBy) -> Resample {
        Resample { by }
    }

    /// Output dimensions this operation produces for an input of
    /// `width` x `height`
    ///
    /// # Errors
    /// - A zero factor
    /// - A multiplication that overflows
    pub fn output_dimensions(
        &self, width: usize, height: usize
    ) -> Result<(usize, usize), ImageErrors> {
        match self.by {
            ResampleBy::Divide(0) | ResampleBy::Multiply(0) => Err(
                ImageErrors::InvalidParameter("Resample factor cannot be zero".to_string())
            ),
            ResampleBy::Divide(factor) => Ok((width / factor, height / factor)),
            ResampleBy::Multiply(factor) => {
                let new_width = width.checked_mul(factor);
                let new_height = height.checked_mul(factor);

                match (new_width, new_height) {
                    (Some(w), Some(h)) => Ok((w, h)),
                    _ => Err(ImageErrors::InvalidParameter(format!(
                        "Scaling {width}x{height} by {factor} overflows"
                    )))
                }
            }
        }
    }
}

impl OperationsTrait for Resample {
    fn name(&self) -> &'static str {
        match self.by {
            ResampleBy::Divide(_) => "Downscale",
            ResampleBy::Multiply(_) => "Rescale"
        }
    }

    fn execute_impl(&self, image: &PixelBuffer) -> Result<PixelBuffer, ImageErrors> {
        let (in_width, in_height) = image.dimensions();
        let (out_width, out_height) = self.output_dimensions(in_width, in_height)?;

        resample_image(image, out_width, out_height)
    }
}

/// Resample `image` to `out_width` x `out_height`
///
/// # Errors
/// If the output dimensions overflow the address space
pub fn resample_image(
    image: &PixelBuffer, out_width: usize, out_height: usize
) -> Result<PixelBuffer, ImageErrors> {
    // validate before allocating
    PixelBuffer::expected_length(out_width, out_height)?;

    let (in_width, in_height) = image.dimensions();
    let pixels = resample(image.pixels(), in_width, in_height, out_width, out_height);

    PixelBuffer::new(pixels, out_width, out_height)
}

/// Resample an interleaved RGBA buffer
///
/// # Arguments
/// - in_image: RGBA pixels, `in_width*in_height*4` bytes
/// - in_width: `in_image`'s width
/// - in_height: `in_image`'s height
/// - out_width: The expected width
/// - out_height: The expected height
///
/// returns: A new buffer of `out_width*out_height*4` bytes.
///
/// # Notes
/// - A zero output dimension returns an empty buffer
/// - A zero input dimension has nothing to sample, the output stays zeroed
/// - If `in_image` is shorter than the dimensions say, missing rows are
/// left zeroed
pub fn resample(
    in_image: &[u8], in_width: usize, in_height: usize, out_width: usize, out_height: usize
) -> Vec<u8> {
    let out_stride = out_width * RGBA_COMPONENTS;
    let mut out_image = vec![0; out_stride * out_height];

    if in_width == 0 || in_height == 0 || out_stride == 0 {
        return out_image;
    }
    let in_stride = in_width * RGBA_COMPONENTS;

    // source column offset for every destination column, same for every row
    let columns: Vec<usize> = (0..out_width)
        .map(|x| (x * in_width / out_width) * RGBA_COMPONENTS)
        .collect();

    for (y, out_row) in out_image.chunks_exact_mut(out_stride).enumerate() {
        let source_y = y * in_height / out_height;

        let Some(in_row) = in_image.get(source_y * in_stride..(source_y + 1) * in_stride) else {
            continue;
        };

        for (out_pixel, column) in out_row.chunks_exact_mut(RGBA_COMPONENTS).zip(&columns) {
            out_pixel.copy_from_slice(&in_row[*column..*column + RGBA_COMPONENTS]);
        }
    }
    out_image
}
