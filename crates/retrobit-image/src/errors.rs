/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during image processing
use std::fmt::{Debug, Display, Formatter};

use retrobit_png::error::PngErrors;

use crate::codecs::ImageFormat;

/// All possible image errors that can occur.
///
/// This is the grandfather of image errors and contains
/// all decoding, processing and encoding errors possible
pub enum ImageErrors {
    /// Buffer length doesn't match its dimensions, expected then found
    DimensionsMisMatch(usize, usize),
    /// An operation or transform was configured with a value it can't use
    InvalidParameter(String),
    /// A pipeline stage failed
    StageFailed {
        stage:  &'static str,
        source: Box<ImageErrors>
    },
    /// The pipeline was cancelled before running the named stage
    Aborted(&'static str),
    /// No decoder exists (or was compiled in) for this format
    ImageDecoderNotImplemented(ImageFormat),
    ImageDecodeErrors(String),
    PngErrors(PngErrors),
    IoErrors(std::io::Error),
    GenericString(String),
    GenericStr(&'static str)
}

impl Debug for ImageErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DimensionsMisMatch(expected, found) => {
                writeln!(
                    f,
                    "Dimensions mismatch, expected {expected} bytes but found {found}"
                )
            }
            Self::InvalidParameter(reason) => writeln!(f, "Invalid parameter: {reason}"),
            Self::StageFailed { stage, source } => {
                writeln!(f, "Stage `{stage}` failed: {source:?}")
            }
            Self::Aborted(stage) => writeln!(f, "Aborted before running `{stage}`"),
            Self::ImageDecoderNotImplemented(format) => {
                writeln!(f, "No decoder present for the format {format:?}")
            }
            Self::ImageDecodeErrors(err) => writeln!(f, "Decoding failed: {err}"),
            Self::PngErrors(err) => writeln!(f, "{err:?}"),
            Self::IoErrors(err) => writeln!(f, "I/O error: {err}"),
            Self::GenericString(err) => writeln!(f, "{err}"),
            Self::GenericStr(err) => writeln!(f, "{err}")
        }
    }
}

impl Display for ImageErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for ImageErrors {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StageFailed { source, .. } => Some(source.as_ref()),
            Self::PngErrors(err) => Some(err),
            Self::IoErrors(err) => Some(err),
            _ => None
        }
    }
}

impl From<PngErrors> for ImageErrors {
    fn from(from: PngErrors) -> Self {
        ImageErrors::PngErrors(from)
    }
}

impl From<std::io::Error> for ImageErrors {
    fn from(from: std::io::Error) -> Self {
        ImageErrors::IoErrors(from)
    }
}

impl From<String> for ImageErrors {
    fn from(s: String) -> ImageErrors {
        ImageErrors::GenericString(s)
    }
}

impl From<&'static str> for ImageErrors {
    fn from(s: &'static str) -> ImageErrors {
        ImageErrors::GenericStr(s)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::ImageErrors;

    #[test]
    fn stage_failure_exposes_source() {
        let err = ImageErrors::StageFailed {
            stage:  "Quantize",
            source: Box::new(ImageErrors::InvalidParameter("colors".to_string()))
        };
        let source = err.source().unwrap();

        assert!(source.to_string().contains("colors"));
        assert!(err.to_string().contains("Quantize"));
    }
}
