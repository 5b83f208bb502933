/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The in memory image representation
use crate::errors::ImageErrors;

/// Number of bytes a single RGBA pixel occupies
pub const RGBA_COMPONENTS: usize = 4;

/// An owned 8 bit RGBA image
///
/// Pixels are stored row major with the origin at the top left,
/// four bytes per pixel in R, G, B, A order.
///
/// The length of the pixel data always equals `width * height * 4`,
/// construction fails otherwise. Operations never modify a buffer in place,
/// they read from one buffer and produce a new one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width:  usize,
    height: usize
}

impl PixelBuffer {
    /// Create a buffer from existing RGBA pixels
    ///
    /// # Errors
    /// - [`ImageErrors::DimensionsMisMatch`] if `pixels.len() != width * height * 4`
    ///
    /// # Example
    /// ```
    /// use retrobit_image::image::PixelBuffer;
    ///
    /// let image = PixelBuffer::new(vec![0; 2 * 3 * 4], 2, 3).unwrap();
    /// assert_eq!(image.dimensions(), (2, 3));
    ///
    /// assert!(PixelBuffer::new(vec![0; 7], 2, 3).is_err());
    /// ```
    pub fn new(pixels: Vec<u8>, width: usize, height: usize) -> Result<PixelBuffer, ImageErrors> {
        let expected = Self::expected_length(width, height)?;

        if pixels.len() != expected {
            return Err(ImageErrors::DimensionsMisMatch(expected, pixels.len()));
        }
        Ok(PixelBuffer {
            pixels,
            width,
            height
        })
    }

    /// Create a buffer with every byte set to zero
    pub fn new_zeroed(width: usize, height: usize) -> Result<PixelBuffer, ImageErrors> {
        let length = Self::expected_length(width, height)?;
        Self::new(vec![0; length], width, height)
    }

    /// Number of bytes an RGBA image of `width` x `height` occupies
    pub fn expected_length(width: usize, height: usize) -> Result<usize, ImageErrors> {
        width
            .checked_mul(height)
            .and_then(|x| x.checked_mul(RGBA_COMPONENTS))
            .ok_or(ImageErrors::GenericStr(
                "Image dimensions overflow the address space"
            ))
    }

    /// Get image dimensions as a tuple of (width,height)
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }
    pub const fn width(&self) -> usize {
        self.width
    }
    pub const fn height(&self) -> usize {
        self.height
    }
    /// Return true if the image has no pixels
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
    /// The raw RGBA bytes
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
    /// Consume the buffer returning the raw RGBA bytes
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
    /// Return the pixel at (`x`,`y`) or `None` if out of bounds
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y * self.width + x) * RGBA_COMPONENTS;
        let mut pixel = [0; 4];
        pixel.copy_from_slice(&self.pixels[start..start + RGBA_COMPONENTS]);
        Some(pixel)
    }
    /// Create a new image of the same dimensions by applying `function`
    /// to a copy of every RGBA pixel
    ///
    /// ```
    /// use retrobit_image::image::PixelBuffer;
    ///
    /// let image = PixelBuffer::new(vec![10, 20, 30, 40], 1, 1).unwrap();
    /// let darker = image.map_pixels(|x| x[0] /= 2);
    ///
    /// assert_eq!(darker.pixels(), &[5, 20, 30, 40]);
    /// assert_eq!(image.pixels(), &[10, 20, 30, 40]);
    /// ```
    pub fn map_pixels<F: FnMut(&mut [u8])>(&self, mut function: F) -> PixelBuffer {
        let mut pixels = self.pixels.clone();

        for pixel in pixels.chunks_exact_mut(RGBA_COMPONENTS) {
            function(pixel);
        }
        PixelBuffer {
            pixels,
            width: self.width,
            height: self.height
        }
    }
    /// Iterate over the RGB part of every pixel, ignoring alpha
    pub fn rgb_pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.pixels
            .chunks_exact(RGBA_COMPONENTS)
            .map(|x| [x[0], x[1], x[2]])
    }
}
