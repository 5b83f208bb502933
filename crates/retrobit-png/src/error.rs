/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible when reading or writing PNG chunk streams
use std::fmt::{Debug, Display, Formatter};

use retrobit_core::bytestream::ByteIoError;

/// Errors that can occur while working with PNG chunks
pub enum PngErrors {
    /// The first eight bytes are not the PNG signature
    BadSignature,
    /// No `IEND` chunk is present, the stream is truncated or malformed
    MissingIend,
    /// The first chunk of the stream is not `IHDR`
    MissingIhdr,
    /// Width or height is zero or the pixel buffer doesn't match them
    ///
    /// Fields are expected, found.
    BadDimensions(usize, usize),
    /// A compressed text chunk couldn't be inflated
    ZlibDecode(String),
    /// Underlying byte stream errors
    IoErrors(ByteIoError),
    GenericStatic(&'static str),
    Generic(String)
}

impl Debug for PngErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadSignature => writeln!(f, "Bad PNG signature, not a png"),
            Self::MissingIend => writeln!(f, "No IEND chunk found, truncated or corrupt PNG"),
            Self::MissingIhdr => writeln!(f, "First chunk not IHDR, corrupt PNG"),
            Self::BadDimensions(expected, found) => {
                writeln!(
                    f,
                    "Bad image dimensions, expected {expected} bytes of pixels but found {found}"
                )
            }
            Self::ZlibDecode(err) => writeln!(f, "Could not inflate text chunk: {err}"),
            Self::IoErrors(err) => writeln!(f, "{err:?}"),
            Self::GenericStatic(val) => writeln!(f, "{val:?}"),
            Self::Generic(val) => writeln!(f, "{val:?}")
        }
    }
}

impl Display for PngErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for PngErrors {}

impl From<&'static str> for PngErrors {
    fn from(val: &'static str) -> Self {
        Self::GenericStatic(val)
    }
}

impl From<String> for PngErrors {
    fn from(val: String) -> Self {
        Self::Generic(val)
    }
}

impl From<ByteIoError> for PngErrors {
    fn from(val: ByteIoError) -> Self {
        Self::IoErrors(val)
    }
}
