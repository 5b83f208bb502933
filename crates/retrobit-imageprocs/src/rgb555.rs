/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Reduce color depth to 15 bits, 5 bits per channel
//!
//! This is the color depth of the SNES and many other 16 bit era consoles.
use retrobit_image::errors::ImageErrors;
use retrobit_image::image::PixelBuffer;
use retrobit_image::traits::OperationsTrait;

/// Drop the lowest three bits of every red, green and blue value
///
/// Alpha is untouched.
#[derive(Default, Copy, Clone, Debug)]
pub struct Rgb555;

impl Rgb555 {
    #[must_use]
    pub const fn new() -> Rgb555 {
        Rgb555
    }
}

impl OperationsTrait for Rgb555 {
    fn name(&self) -> &'static str {
        "RGB555"
    }

    fn execute_impl(&self, image: &PixelBuffer) -> Result<PixelBuffer, ImageErrors> {
        Ok(truncate_to_15bit(image))
    }
}

/// Truncate a single channel value to 5 bits, keeping it in the 8 bit range
#[inline]
#[must_use]
pub const fn truncate_channel(value: u8) -> u8 {
    (value >> 3) << 3
}

/// Return a copy of `image` with every color channel truncated to 5 bits
#[must_use]
pub fn truncate_to_15bit(image: &PixelBuffer) -> PixelBuffer {
    image.map_pixels(|pixel| {
        for channel in &mut pixel[..3] {
            *channel = truncate_channel(*channel);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_colors_keeps_alpha() {
        let image = PixelBuffer::new(vec![255, 7, 8, 13, 0, 129, 250, 255], 2, 1).unwrap();
        let out = truncate_to_15bit(&image);

        assert_eq!(out.pixels(), &[248, 0, 8, 13, 0, 128, 248, 255]);
    }

    #[test]
    fn output_is_idempotent() {
        let pixels = (0..=255).flat_map(|x| [x, x, x, x]).collect();
        let image = PixelBuffer::new(pixels, 256, 1).unwrap();

        let once = truncate_to_15bit(&image);
        let twice = truncate_to_15bit(&once);
        assert_eq!(once, twice);

        for pixel in once.pixels().chunks_exact(4) {
            assert_eq!(pixel[0] % 8, 0);
        }
    }

    #[test]
    fn progress_message() {
        let image = PixelBuffer::new_zeroed(5, 3).unwrap();
        let out = Rgb555.execute(&image).unwrap();

        assert_eq!(Rgb555.progress_message(&out), "RGB555: 5x3");
    }
}
