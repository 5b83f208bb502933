/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use retrobit_core::log::trace;
use web_time::Instant;

use crate::errors::ImageErrors;
use crate::image::PixelBuffer;

/// This encapsulates an image operation.
///
/// All operations that can be stored in a pipeline
/// need to implement this trait.
pub trait OperationsTrait {
    /// Get the name of this operation
    fn name(&self) -> &'static str;

    /// Execute the operation, producing a new image
    ///
    /// The input image is never modified.
    ///
    /// Implementations should not call this directly, call
    /// [`execute`](OperationsTrait::execute) which adds stage context to errors
    fn execute_impl(&self, image: &PixelBuffer) -> Result<PixelBuffer, ImageErrors>;

    /// A human readable line describing the result of this operation
    ///
    /// Defaults to the operation name followed by the output dimensions
    fn progress_message(&self, output: &PixelBuffer) -> String {
        let (width, height) = output.dimensions();
        format!("{}: {width}x{height}", self.name())
    }

    /// Execute the operation on `image`
    ///
    /// # Errors
    /// Any error from the operation is returned wrapped in
    /// [`ImageErrors::StageFailed`] carrying the operation name
    ///
    /// # Example
    /// ```
    /// use retrobit_image::errors::ImageErrors;
    /// use retrobit_image::image::PixelBuffer;
    /// use retrobit_image::traits::OperationsTrait;
    ///
    /// struct Invert;
    ///
    /// impl OperationsTrait for Invert {
    ///     fn name(&self) -> &'static str {
    ///         "Invert"
    ///     }
    ///     fn execute_impl(&self, image: &PixelBuffer) -> Result<PixelBuffer, ImageErrors> {
    ///         let pixels = image.pixels().iter().map(|x| 255 - x).collect();
    ///         PixelBuffer::new(pixels, image.width(), image.height())
    ///     }
    /// }
    ///
    /// let image = PixelBuffer::new(vec![0, 10, 20, 30], 1, 1).unwrap();
    /// let inverted = Invert.execute(&image).unwrap();
    /// assert_eq!(inverted.pixels(), &[255, 245, 235, 225]);
    /// ```
    fn execute(&self, image: &PixelBuffer) -> Result<PixelBuffer, ImageErrors> {
        let name = self.name();
        let start = Instant::now();

        let result = self
            .execute_impl(image)
            .map_err(|source| ImageErrors::StageFailed {
                stage:  name,
                source: Box::new(source)
            })?;

        trace!(
            "Finished running `{name}` in {} ms",
            start.elapsed().as_millis()
        );
        Ok(result)
    }
}
