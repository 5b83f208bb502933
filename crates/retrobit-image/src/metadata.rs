/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image metadata
//!
//! Metadata is read once from the source file bytes, independent of pixel
//! decoding, and written into the output PNG as `tEXt` chunks.
//!
//! - [`extract`] reads tags through a [`TagReader`] and sorts them into EXIF,
//!   PNG text and AI generation buckets
//! - [`parse_generation_parameters`] decomposes Stable Diffusion style
//!   generation parameters
//! - [`preserve_metadata`] embeds metadata into an encoded PNG
//!
//! Failures here never stop image processing, they surface as warnings.
use std::fmt::{Debug, Display, Formatter};

use retrobit_png::error::PngErrors;

pub use crate::metadata::extract::{extract, extract_with, FileInfo, MetadataReport};
pub use crate::metadata::parameters::{
    parse_generation_parameters, GenerationParameters, Lora, ParseOutcome
};
pub use crate::metadata::readers::{CombinedTagReader, PngTextTagReader, TagReader};
#[cfg(feature = "metadata")]
pub use crate::metadata::readers::ExifTagReader;
pub use crate::metadata::reinject::{preserve_metadata, preserve_metadata_at, text_entries};
pub use crate::metadata::tags::{TagMap, TagValue};
pub use crate::metadata::timestamp::{format_iso8601, iso8601_now};
use crate::codecs::ImageFormat;

mod extract;
mod parameters;
mod readers;
mod reinject;
mod tags;
mod timestamp;

/// Metadata extracted from a source file
#[derive(Clone, Debug, PartialEq)]
pub struct Metadata {
    /// Format detected from the file's magic bytes
    pub format:        ImageFormat,
    /// File size in bytes
    pub size:          u64,
    /// Last modification time in milliseconds since the unix epoch
    pub last_modified: Option<u64>,
    pub name:          String,
    pub mime_type:     String,
    /// Every tag the readers returned
    pub tags:          TagMap,
    /// Well known photographic EXIF tags
    pub exif:          TagMap,
    /// PNG text keys
    pub png:           TagMap,
    pub ai:            AiMetadata
}

/// Tags that look like they came from an image generator
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AiMetadata {
    pub raw:               TagMap,
    pub parsed_parameters: Option<GenerationParameters>
}

impl Metadata {
    /// Create metadata with no tags for a file
    pub fn new(name: &str, size: u64, format: ImageFormat) -> Metadata {
        Metadata {
            format,
            size,
            last_modified: None,
            name: name.to_string(),
            mime_type: format.mime_type().to_string(),
            tags: TagMap::new(),
            exif: TagMap::new(),
            png: TagMap::new(),
            ai: AiMetadata::default()
        }
    }
}

/// Errors from tag readers
///
/// These are soft failures, [`extract`] turns them into warnings
pub enum MetadataError {
    Exif(String),
    Png(PngErrors),
    Generic(String)
}

impl Debug for MetadataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exif(err) => writeln!(f, "Could not read EXIF tags: {err}"),
            Self::Png(err) => writeln!(f, "Could not read PNG text: {err:?}"),
            Self::Generic(err) => writeln!(f, "{err}")
        }
    }
}

impl Display for MetadataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for MetadataError {}

impl From<PngErrors> for MetadataError {
    fn from(from: PngErrors) -> Self {
        MetadataError::Png(from)
    }
}

impl From<String> for MetadataError {
    fn from(from: String) -> Self {
        MetadataError::Generic(from)
    }
}
