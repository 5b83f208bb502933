/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core routines shared by all retrobit crates
//!
//! It currently contains
//!
//! - A bytestream reader and writer with big endian aware reads and writes,
//!   used by the PNG chunk codec
//! - Logging macros that forward to the `log` crate when the `log` feature
//!   is enabled and compile to nothing otherwise
//!
//! # Features
//!  - `log`: Forward the logging macros to the [`log`](https://docs.rs/log) facade
#![macro_use]

pub mod bytestream;
pub mod log;
