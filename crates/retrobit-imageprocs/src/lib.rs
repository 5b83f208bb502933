/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image processing routines for `retrobit`
//!
//! This implements the pixel transforms and color reducers that make up the
//! retro look, each one as an operation implementing the `OperationsTrait`
//! defined by retrobit-image.
//!
//! [`retro::RetroPipeline`] strings them together in a fixed order.
//!
//! # Example
//! - Downscale an image by 4 and reduce it to 32 colors
//! ```
//! use retrobit_image::image::PixelBuffer;
//! use retrobit_image::pipelines::no_progress;
//! use retrobit_imageprocs::retro::{RetroPipeline, TransformParameters};
//!
//! let image = PixelBuffer::new(vec![200; 64 * 64 * 4], 64, 64).unwrap();
//! let parameters = TransformParameters::new(4, 32).unwrap().set_quantize(true);
//!
//! let output = RetroPipeline::new(parameters)
//!     .run(image, &mut no_progress)
//!     .unwrap();
//! assert_eq!(output.dimensions(), (16, 16));
//! ```
#![forbid(unsafe_code)]
#![warn(
    clippy::correctness,
    clippy::perf,
    clippy::pedantic,
    clippy::inline_always,
    clippy::missing_errors_doc,
    clippy::panic
)]
#![allow(
    clippy::needless_return,
    clippy::similar_names,
    clippy::inline_always,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::wildcard_imports,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

pub mod crop;
pub mod posterize;
pub mod quantize;
pub mod resize;
pub mod retro;
pub mod rgb555;
