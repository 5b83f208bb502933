/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Posterize, snap every channel to a few evenly spaced levels
//!
//! This is the fast alternative to [quantization](crate::quantize), it needs
//! no palette but can only approximate a color budget since `levels` per
//! channel gives up to `levels^3` colors.
use retrobit_image::errors::ImageErrors;
use retrobit_image::image::PixelBuffer;
use retrobit_image::traits::OperationsTrait;

/// Posterize an image to `levels` values per channel
///
/// # Example
/// ```
/// use retrobit_image::image::PixelBuffer;
/// use retrobit_image::traits::OperationsTrait;
/// use retrobit_imageprocs::posterize::Posterize;
///
/// let image = PixelBuffer::new(vec![10, 100, 200, 30], 1, 1).unwrap();
/// let out = Posterize::new(2).execute(&image).unwrap();
///
/// assert_eq!(out.pixels(), &[0, 0, 255, 30]);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Posterize {
    levels: usize,
    colors: Option<usize>
}

impl Posterize {
    #[must_use]
    pub const fn new(levels: usize) -> Posterize {
        Posterize {
            levels,
            colors: None
        }
    }

    /// Posterize with the level count [`levels_for_colors`] picks for `colors`
    #[must_use]
    pub const fn for_colors(colors: usize) -> Posterize {
        Posterize {
            levels: levels_for_colors(colors),
            colors: Some(colors)
        }
    }

    pub const fn levels(&self) -> usize {
        self.levels
    }
}

impl OperationsTrait for Posterize {
    fn name(&self) -> &'static str {
        "Posterize"
    }

    fn execute_impl(&self, image: &PixelBuffer) -> Result<PixelBuffer, ImageErrors> {
        posterize(image, self.levels)
    }

    fn progress_message(&self, output: &PixelBuffer) -> String {
        let (width, height) = output.dimensions();

        match self.colors {
            Some(colors) => format!(
                "Posterize ({} levels, ~{colors} colors): {width}x{height}",
                self.levels
            ),
            None => format!("Posterize ({} levels): {width}x{height}", self.levels)
        }
    }
}

/// Levels per channel used to approximate a budget of `colors`
///
/// This is a fixed table, not a solution of `levels^3 <= colors`,
/// 32 colors gives 5 levels, which can produce up to 125 colors.
#[must_use]
pub const fn levels_for_colors(colors: usize) -> usize {
    match colors {
        0..=4 => 2,
        5..=8 => 3,
        9..=16 => 4,
        17..=32 => 5,
        33..=64 => 6,
        65..=128 => 7,
        _ => 8
    }
}

/// Snap a single channel value to the nearest multiple of `step`
#[inline]
fn snap(value: u8, step: f64) -> u8 {
    let snapped = (f64::from(value) / step).round() * step;

    snapped.clamp(0.0, 255.0).round_ties_even() as u8
}

/// Return a copy of `image` with every color channel snapped to `levels`
/// evenly spaced values between 0 and 255
///
/// Alpha is untouched.
///
/// # Errors
/// If `levels` is less than two
pub fn posterize(image: &PixelBuffer, levels: usize) -> Result<PixelBuffer, ImageErrors> {
    if levels < 2 {
        return Err(ImageErrors::InvalidParameter(format!(
            "Posterize needs at least 2 levels, found {levels}"
        )));
    }
    let step = 255.0 / (levels - 1) as f64;

    let mut lut = [0_u8; 256];

    for (value, out) in (0..=255_u8).zip(lut.iter_mut()) {
        *out = snap(value, step);
    }

    Ok(image.map_pixels(|pixel| {
        for channel in &mut pixel[..3] {
            *channel = lut[usize::from(*channel)];
        }
    }))
}
