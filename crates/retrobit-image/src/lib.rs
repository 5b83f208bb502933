/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image buffers, operations and metadata for retrobit
//!
//! This crate provides the pieces the retro transforms are built on
//!
//! - [`PixelBuffer`](crate::image::PixelBuffer): an owned 8 bit RGBA image
//! - [`OperationsTrait`](crate::traits::OperationsTrait): a single image operation
//! - [`Pipeline`](crate::pipelines::Pipeline): an ordered list of operations with progress reporting
//! - [`codecs`]: format detection and decoding into RGBA
//! - [`metadata`]: tag extraction, generation parameter parsing and
//!   re-embedding of metadata into PNG output
//!
//! # Features
//! - `png`: decode PNG input via `zune-png`
//! - `jpeg`: decode JPEG input via `zune-jpeg`
//! - `metadata`: read EXIF tags via `kamadak-exif`
//! - `serde-support`: serialize metadata via `serde`
//! - `log`: emit logs through the `log` crate
#![forbid(unsafe_code)]
#![warn(clippy::correctness, clippy::perf, clippy::pedantic, clippy::inline_always)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]

pub mod codecs;
pub mod errors;
pub mod image;
pub mod metadata;
pub mod pipelines;
mod serde;
pub mod traits;
