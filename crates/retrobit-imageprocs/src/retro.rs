/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The retro look, a fixed order of pixel transforms
//!
//! ```text
//! Loaded ─► Downscaled ─► ColorReduced ─► (Rgb555Applied) ─► (Cropped) ─► (Rescaled) ─► Done
//! ```
//!
//! Stages in brackets only run when their flag is set, downscaling and
//! rescaling only when the scale is larger than one.
use std::fmt::{Display, Formatter};
use std::sync::atomic::AtomicBool;

use retrobit_core::log::{debug, trace};
use retrobit_image::errors::ImageErrors;
use retrobit_image::image::PixelBuffer;
use retrobit_image::pipelines::{Pipeline, ProgressSink};

use crate::crop::CenterCrop;
use crate::posterize::Posterize;
use crate::quantize::Quantize;
use crate::resize::{Resample, ResampleBy};
use crate::rgb555::Rgb555;

/// Smallest color budget accepted
pub const MIN_COLORS: usize = 4;
/// Largest color budget accepted
pub const MAX_COLORS: usize = 256;

/// Options for the retro transform
///
/// # Example
/// ```
/// use retrobit_imageprocs::retro::TransformParameters;
///
/// let parameters = TransformParameters::new(2, 16)
///     .unwrap()
///     .set_rgb555(true)
///     .set_snescrop(true);
///
/// assert_eq!(parameters.scale(), 2);
/// assert!(parameters.rgb555());
/// assert!(!parameters.quantize());
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TransformParameters {
    scale:    usize,
    colors:   usize,
    quantize: bool,
    rgb555:   bool,
    snescrop: bool,
    rescale:  bool
}

impl Default for TransformParameters {
    fn default() -> Self {
        TransformParameters {
            scale:    4,
            colors:   32,
            quantize: false,
            rgb555:   false,
            snescrop: false,
            rescale:  false
        }
    }
}

impl TransformParameters {
    /// Create new parameters with every optional stage turned off
    ///
    /// # Errors
    /// - `scale` is zero
    /// - `colors` is outside `4..=256`
    pub fn new(scale: usize, colors: usize) -> Result<TransformParameters, ImageErrors> {
        if scale < 1 {
            return Err(ImageErrors::InvalidParameter(
                "Scale must be at least 1".to_string()
            ));
        }
        if !(MIN_COLORS..=MAX_COLORS).contains(&colors) {
            return Err(ImageErrors::InvalidParameter(format!(
                "Colors must be between {MIN_COLORS} and {MAX_COLORS}, found {colors}"
            )));
        }
        Ok(TransformParameters {
            scale,
            colors,
            ..Default::default()
        })
    }

    /// Use median cut quantization instead of posterization
    #[must_use]
    pub const fn set_quantize(mut self, yes: bool) -> Self {
        self.quantize = yes;
        self
    }
    /// Truncate colors to 15 bits after color reduction
    #[must_use]
    pub const fn set_rgb555(mut self, yes: bool) -> Self {
        self.rgb555 = yes;
        self
    }
    /// Crop the center 256x224 area
    #[must_use]
    pub const fn set_snescrop(mut self, yes: bool) -> Self {
        self.snescrop = yes;
        self
    }
    /// Scale the result back up by `scale`
    #[must_use]
    pub const fn set_rescale(mut self, yes: bool) -> Self {
        self.rescale = yes;
        self
    }

    pub const fn scale(&self) -> usize {
        self.scale
    }
    pub const fn colors(&self) -> usize {
        self.colors
    }
    pub const fn quantize(&self) -> bool {
        self.quantize
    }
    pub const fn rgb555(&self) -> bool {
        self.rgb555
    }
    pub const fn snescrop(&self) -> bool {
        self.snescrop
    }
    pub const fn rescale(&self) -> bool {
        self.rescale
    }
}

/// States an image goes through in the retro pipeline
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RetroStage {
    Loaded,
    Downscaled,
    ColorReduced,
    Rgb555Applied,
    Cropped,
    Rescaled,
    Done
}

impl Display for RetroStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// The retro transform, built once from parameters and run on any number
/// of images
///
/// # Example
/// ```
/// use retrobit_image::image::PixelBuffer;
/// use retrobit_imageprocs::retro::{RetroPipeline, RetroStage, TransformParameters};
///
/// let parameters = TransformParameters::new(2, 8).unwrap().set_rescale(true);
/// let pipeline = RetroPipeline::new(parameters);
///
/// assert_eq!(
///     pipeline.stages(),
///     &[
///         RetroStage::Loaded,
///         RetroStage::Downscaled,
///         RetroStage::ColorReduced,
///         RetroStage::Rescaled,
///         RetroStage::Done
///     ]
/// );
///
/// let mut lines = vec![];
/// let image = PixelBuffer::new_zeroed(10, 6).unwrap();
/// let out = pipeline.run(image, &mut |x: &str| lines.push(x.to_string())).unwrap();
///
/// assert_eq!(out.dimensions(), (10, 6));
/// assert_eq!(lines.len(), 3);
/// ```
pub struct RetroPipeline {
    parameters: TransformParameters,
    pipeline:   Pipeline,
    stages:     Vec<RetroStage>
}

impl RetroPipeline {
    /// Build the stages `parameters` ask for
    pub fn new(parameters: TransformParameters) -> RetroPipeline {
        let mut pipeline = Pipeline::new();
        let mut stages = vec![RetroStage::Loaded];
        let scale = parameters.scale;

        if scale > 1 {
            pipeline.chain_operations(Box::new(Resample::new(ResampleBy::Divide(scale))));
            stages.push(RetroStage::Downscaled);
        }
        if parameters.quantize {
            pipeline.chain_operations(Box::new(Quantize::new(parameters.colors)));
        } else {
            pipeline.chain_operations(Box::new(Posterize::for_colors(parameters.colors)));
        }
        stages.push(RetroStage::ColorReduced);

        if parameters.rgb555 {
            pipeline.chain_operations(Box::new(Rgb555::new()));
            stages.push(RetroStage::Rgb555Applied);
        }
        if parameters.snescrop {
            pipeline.chain_operations(Box::new(CenterCrop::snes()));
            stages.push(RetroStage::Cropped);
        }
        if parameters.rescale && scale > 1 {
            pipeline.chain_operations(Box::new(Resample::new(ResampleBy::Multiply(scale))));
            stages.push(RetroStage::Rescaled);
        }
        stages.push(RetroStage::Done);

        trace!("Retro stages: {:?}", stages);

        RetroPipeline {
            parameters,
            pipeline,
            stages
        }
    }

    pub const fn parameters(&self) -> &TransformParameters {
        &self.parameters
    }

    /// Every state an image passes through, `Loaded` first and `Done` last
    pub fn stages(&self) -> &[RetroStage] {
        &self.stages
    }

    /// Names of the operations in the order they run
    pub fn operation_names(&self) -> Vec<&'static str> {
        self.pipeline.operation_names()
    }

    /// Transform `image`, reporting one line per finished stage to `progress`
    ///
    /// # Errors
    /// The first failing stage, as [`ImageErrors::StageFailed`]
    pub fn run<P: ProgressSink>(
        &self, image: PixelBuffer, progress: &mut P
    ) -> Result<PixelBuffer, ImageErrors> {
        debug!("Running retro transform with {:?}", self.parameters);
        self.pipeline.run(image, progress)
    }

    /// Like [`run`](Self::run), but stops before the next stage once `abort`
    /// is raised
    ///
    /// # Errors
    /// - [`ImageErrors::Aborted`] if `abort` was raised
    /// - The first failing stage, as [`ImageErrors::StageFailed`]
    pub fn run_with_abort<P: ProgressSink>(
        &self, image: PixelBuffer, abort: &AtomicBool, progress: &mut P
    ) -> Result<PixelBuffer, ImageErrors> {
        debug!("Running retro transform with {:?}", self.parameters);
        self.pipeline.run_with_abort(image, abort, progress)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::AtomicBool;

    use nanorand::{Rng, WyRand};
    use retrobit_image::pipelines::no_progress;

    use super::*;

    fn random_image(width: usize, height: usize) -> PixelBuffer {
        let mut rand = WyRand::new_seed(12);
        let pixels = (0..width * height * 4).map(|_| rand.generate::<u8>()).collect();
        PixelBuffer::new(pixels, width, height).unwrap()
    }

    fn run(parameters: TransformParameters, image: PixelBuffer) -> (PixelBuffer, Vec<String>) {
        let mut lines = Vec::new();
        let out = RetroPipeline::new(parameters)
            .run(image, &mut |x: &str| lines.push(x.to_string()))
            .unwrap();
        (out, lines)
    }

    #[test]
    fn parameter_validation() {
        assert!(TransformParameters::new(0, 32).is_err());
        assert!(TransformParameters::new(1, 3).is_err());
        assert!(TransformParameters::new(1, 257).is_err());
        assert!(TransformParameters::new(1, 4).is_ok());
        assert!(TransformParameters::new(1, 256).is_ok());
    }

    #[test]
    fn defaults() {
        let parameters = TransformParameters::default();

        assert_eq!(parameters.scale(), 4);
        assert_eq!(parameters.colors(), 32);
        assert!(!parameters.quantize());
        assert!(!parameters.rgb555());
        assert!(!parameters.snescrop());
        assert!(!parameters.rescale());
    }

    #[test]
    fn scale_one_skips_resampling() {
        let parameters = TransformParameters::new(1, 32).unwrap().set_rescale(true);
        let pipeline = RetroPipeline::new(parameters);

        assert_eq!(pipeline.operation_names(), vec!["Posterize"]);
        assert_eq!(
            pipeline.stages(),
            &[RetroStage::Loaded, RetroStage::ColorReduced, RetroStage::Done]
        );
    }

    #[test]
    fn every_stage_in_order() {
        let parameters = TransformParameters::new(2, 16)
            .unwrap()
            .set_quantize(true)
            .set_rgb555(true)
            .set_snescrop(true)
            .set_rescale(true);

        let pipeline = RetroPipeline::new(parameters);

        assert_eq!(
            pipeline.operation_names(),
            vec!["Downscale", "Quantize", "RGB555", "SNES crop", "Rescale"]
        );
        assert_eq!(
            pipeline.stages(),
            &[
                RetroStage::Loaded,
                RetroStage::Downscaled,
                RetroStage::ColorReduced,
                RetroStage::Rgb555Applied,
                RetroStage::Cropped,
                RetroStage::Rescaled,
                RetroStage::Done
            ]
        );
    }

    #[test]
    fn downscale_quantize_end_to_end() {
        let parameters = TransformParameters::new(4, 16).unwrap().set_quantize(true);
        let (out, lines) = run(parameters, random_image(64, 48));

        assert_eq!(out.dimensions(), (16, 12));
        assert!(out.rgb_pixels().collect::<HashSet<_>>().len() <= 16);
        assert_eq!(
            lines,
            vec!["Downscale: 16x12", "Quantize (16 colors): 16x12"]
        );
    }

    #[test]
    fn crop_then_rescale() {
        let parameters = TransformParameters::new(2, 32)
            .unwrap()
            .set_snescrop(true)
            .set_rescale(true);
        let (out, lines) = run(parameters, random_image(600, 500));

        // 300x250 -> 256x224 -> 512x448
        assert_eq!(out.dimensions(), (512, 448));
        assert_eq!(lines.last().map(String::as_str), Some("Rescale: 512x448"));
    }

    #[test]
    fn rgb555_after_posterize() {
        let parameters = TransformParameters::new(1, 4).unwrap().set_rgb555(true);
        let (out, _) = run(parameters, random_image(8, 8));

        // two levels are 0 and 255, truncated to 0 and 248
        for pixel in out.pixels().chunks_exact(4) {
            for channel in &pixel[..3] {
                assert!(*channel == 0 || *channel == 248);
            }
        }
    }

    #[test]
    fn raised_abort_stops_before_first_stage() {
        let abort = AtomicBool::new(true);
        let pipeline = RetroPipeline::new(TransformParameters::default());

        let result = pipeline.run_with_abort(random_image(8, 8), &abort, &mut no_progress);
        assert!(matches!(result, Err(ImageErrors::Aborted("Downscale"))));
    }

    #[test]
    fn lowered_abort_runs_to_completion() {
        let abort = AtomicBool::new(false);
        let pipeline = RetroPipeline::new(TransformParameters::default());

        let result = pipeline.run_with_abort(random_image(8, 8), &abort, &mut no_progress);
        assert_eq!(result.unwrap().dimensions(), (2, 2));
    }
}
