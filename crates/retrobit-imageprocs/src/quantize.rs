/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Median cut color quantization
//!
//! # Algorithm
//!
//! The set of colors is split in two on the channel with the widest range,
//! at the median, and each half is split again until we have as many
//! buckets as colors asked for. Every bucket contributes its average color
//! to the palette.
//!
//! Pixels are then replaced by the closest palette entry.
use std::collections::HashMap;

use retrobit_core::log::trace;
use retrobit_image::errors::ImageErrors;
use retrobit_image::image::PixelBuffer;
use retrobit_image::traits::OperationsTrait;

/// A single RGB color
pub type Color = [u8; 3];

/// Reduce an image to at most `colors` colors using median cut
///
/// # Example
/// ```
/// use retrobit_image::image::PixelBuffer;
/// use retrobit_image::traits::OperationsTrait;
/// use retrobit_imageprocs::quantize::Quantize;
///
/// let image = PixelBuffer::new(vec![0, 0, 0, 255, 250, 250, 250, 255], 2, 1).unwrap();
/// let out = Quantize::new(1).execute(&image).unwrap();
///
/// assert_eq!(out.pixels(), &[125, 125, 125, 255, 125, 125, 125, 255]);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Quantize {
    colors: usize
}

impl Quantize {
    #[must_use]
    pub const fn new(colors: usize) -> Quantize {
        Quantize { colors }
    }
}

impl OperationsTrait for Quantize {
    fn name(&self) -> &'static str {
        "Quantize"
    }

    fn execute_impl(&self, image: &PixelBuffer) -> Result<PixelBuffer, ImageErrors> {
        if self.colors == 0 {
            return Err(ImageErrors::InvalidParameter(
                "Cannot quantize to zero colors".to_string()
            ));
        }
        Ok(quantize(image, self.colors))
    }

    fn progress_message(&self, output: &PixelBuffer) -> String {
        let (width, height) = output.dimensions();
        format!("Quantize ({} colors): {width}x{height}", self.colors)
    }
}

/// Build a palette of `target_count` colors from `pixels`
///
/// An empty input gives a single black entry per requested color,
/// and a `target_count` of zero gives an empty palette.
#[must_use]
pub fn median_cut(pixels: &[Color], target_count: usize) -> Vec<Color> {
    if target_count == 0 {
        return Vec::new();
    }
    let mut pixels = pixels.to_vec();
    let mut palette = Vec::with_capacity(target_count);

    median_cut_inner(&mut pixels, target_count, &mut palette);

    palette
}

fn median_cut_inner(pixels: &mut [Color], target_count: usize, palette: &mut Vec<Color>) {
    if target_count <= 1 || pixels.is_empty() {
        palette.push(average(pixels));
        return;
    }
    let channel = widest_channel(pixels);

    // stable, equal values keep their input order
    pixels.sort_by_key(|x| x[channel]);

    let (left, right) = pixels.split_at_mut(pixels.len() / 2);
    let left_count = target_count / 2;

    median_cut_inner(left, left_count, palette);
    median_cut_inner(right, target_count - left_count, palette);
}

/// Channel with the largest value range, earlier channels win ties
fn widest_channel(pixels: &[Color]) -> usize {
    let mut min = [u8::MAX; 3];
    let mut max = [u8::MIN; 3];

    for pixel in pixels {
        for ((lo, hi), value) in min.iter_mut().zip(max.iter_mut()).zip(pixel) {
            *lo = (*lo).min(*value);
            *hi = (*hi).max(*value);
        }
    }
    let mut widest = 0;

    for channel in 1..3 {
        if max[channel] - min[channel] > max[widest] - min[widest] {
            widest = channel;
        }
    }
    widest
}

/// Per channel mean, rounded half up
fn average(pixels: &[Color]) -> Color {
    if pixels.is_empty() {
        return [0; 3];
    }
    let mut sums = [0_u64; 3];

    for pixel in pixels {
        for (sum, value) in sums.iter_mut().zip(pixel) {
            *sum += u64::from(*value);
        }
    }
    let count = pixels.len() as u64;

    sums.map(|x| ((x + count / 2) / count) as u8)
}

/// Find the palette entry closest to `pixel` in RGB space
///
/// The first of equally close entries wins, an empty palette
/// returns `pixel` itself.
#[must_use]
pub fn nearest_color(pixel: Color, palette: &[Color]) -> Color {
    let mut best = pixel;
    let mut best_distance = u32::MAX;

    for color in palette {
        let distance = pixel
            .iter()
            .zip(color)
            .map(|(a, b)| {
                let diff = u32::from(a.abs_diff(*b));
                diff * diff
            })
            .sum::<u32>();

        if distance < best_distance {
            best_distance = distance;
            best = *color;
        }
    }
    best
}

/// Replace every pixel of `image` with its nearest color in a
/// `target_count` entry median cut palette
///
/// Alpha is untouched.
#[must_use]
pub fn quantize(image: &PixelBuffer, target_count: usize) -> PixelBuffer {
    let pixels = image.rgb_pixels().collect::<Vec<Color>>();
    let palette = median_cut(&pixels, target_count);

    trace!("Built a palette of {} colors", palette.len());

    let mut cache: HashMap<Color, Color> = HashMap::with_capacity(palette.len() * 4);

    image.map_pixels(|pixel| {
        let rgb = [pixel[0], pixel[1], pixel[2]];
        let mapped = *cache
            .entry(rgb)
            .or_insert_with(|| nearest_color(rgb, &palette));

        pixel[..3].copy_from_slice(&mapped);
    })
}
