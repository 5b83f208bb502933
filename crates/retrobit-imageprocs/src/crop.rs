/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Crop an image around its center
//!
//! # Algorithm
//!
//! A crop is a view into a sub-image starting at `(left,top)`,
//! so it's just a row by row memory copy.
//!
//! ```text
//!    width ──────────────────────────────►
//! │ ┌─────────────────────────────────────┐
//! │ │         (left,top)                  │
//! │ │             ┌────────────┐          │
//! │ │             │  CROPPED   │          │
//! │ │             │   IMAGE    │          │
//! │ │             └────────────┘          │
//! ▼ │                                     │
//!   └─────────────────────────────────────┘
//! ```
//!
//! The crop is centered and clamped to the image, an image smaller than the
//! target in some dimension keeps that dimension, it is never padded.
use retrobit_image::errors::ImageErrors;
use retrobit_image::image::{PixelBuffer, RGBA_COMPONENTS};
use retrobit_image::traits::OperationsTrait;

/// SNES visible resolution width
pub const SNES_WIDTH: usize = 256;
/// SNES visible resolution height
pub const SNES_HEIGHT: usize = 224;

/// Crop out the center of an image
///
/// # Example
/// Crop a 300x300 image to the SNES resolution
/// ```
/// use retrobit_image::image::PixelBuffer;
/// use retrobit_image::traits::OperationsTrait;
/// use retrobit_imageprocs::crop::CenterCrop;
///
/// let image = PixelBuffer::new_zeroed(300, 300).unwrap();
/// let cropped = CenterCrop::snes().execute(&image).unwrap();
///
/// assert_eq!(cropped.dimensions(), (256, 224));
/// ```
#[derive(Copy, Clone, Debug)]
pub struct CenterCrop {
    width:  usize,
    height: usize,
    label:  &'static str
}

impl CenterCrop {
    /// Create a new crop operation
    ///
    /// # Arguments
    /// - width: The largest width of the cropped out image
    /// - height: The largest height of the cropped out image
    #[must_use]
    pub const fn new(width: usize, height: usize) -> CenterCrop {
        CenterCrop {
            width,
            height,
            label: "Center crop"
        }
    }

    /// A crop to the 256x224 SNES visible area
    #[must_use]
    pub const fn snes() -> CenterCrop {
        CenterCrop {
            width:  SNES_WIDTH,
            height: SNES_HEIGHT,
            label:  "SNES crop"
        }
    }
}

impl OperationsTrait for CenterCrop {
    fn name(&self) -> &'static str {
        self.label
    }

    fn execute_impl(&self, image: &PixelBuffer) -> Result<PixelBuffer, ImageErrors> {
        center_crop(image, self.width, self.height)
    }
}

/// Rectangle a centered crop of `target_width` x `target_height` takes from a
/// `width` x `height` image, as `(left, top, crop_width, crop_height)`
#[must_use]
pub const fn center_crop_rect(
    width: usize, height: usize, target_width: usize, target_height: usize
) -> (usize, usize, usize, usize) {
    let left = width.saturating_sub(target_width) / 2;
    let top = height.saturating_sub(target_height) / 2;

    let crop_width = min(target_width, width - left);
    let crop_height = min(target_height, height - top);

    (left, top, crop_width, crop_height)
}

const fn min(a: usize, b: usize) -> usize {
    if a < b {
        a
    } else {
        b
    }
}

/// Crop the center `target_width` x `target_height` part out of `image`
///
/// # Errors
/// If the cropped buffer does not match its dimensions
pub fn center_crop(
    image: &PixelBuffer, target_width: usize, target_height: usize
) -> Result<PixelBuffer, ImageErrors> {
    let (width, height) = image.dimensions();
    let (left, top, crop_width, crop_height) =
        center_crop_rect(width, height, target_width, target_height);

    let mut out_image = vec![0; crop_width * crop_height * RGBA_COMPONENTS];

    crop(
        image.pixels(),
        width * RGBA_COMPONENTS,
        &mut out_image,
        crop_width * RGBA_COMPONENTS,
        crop_height,
        left * RGBA_COMPONENTS,
        top
    );

    PixelBuffer::new(out_image, crop_width, crop_height)
}

/// Crop an interleaved image
///
/// # Arguments
///
/// * `in_image`:   Input image
/// * `in_width`:   Input row length, (width*components)
/// * `out_image`:  Output image
/// * `out_width`:  Output row length, (width*components)
/// * `out_height`: Output height
/// * `x`:  x offset from start of a row, in elements
/// * `y`:  y offset from start (height)
///
/// returns: Nothing.
///
/// `out_image` will contain cropped image
///
/// # Notes
/// - If `out_image` is smaller than expected, bottom output will be truncated
///
/// - A row that doesn't fit in the input is not copied and stays as is.
/// This helps avoid an out of bounds read->panic
pub fn crop<T: Copy>(
    in_image: &[T], in_width: usize, out_image: &mut [T], out_width: usize, out_height: usize,
    x: usize, y: usize
) {
    if in_width == 0 || out_width == 0 {
        // these generate panic paths for chunks_exact so just eliminate them
        return;
    }

    for (in_row, out_row) in in_image
        .chunks_exact(in_width)
        .skip(y)
        .take(out_height)
        .zip(out_image.chunks_exact_mut(out_width))
    {
        if let Some(v) = in_row.get(x..x + out_width) {
            out_row.copy_from_slice(v);
        }
    }
}
