/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A simple implementation of a bytestream reader
//! and writer.
//!
//! This module contains two main structs that help in
//! byte reading and byte writing
//!
//! Useful for PNG chunk streams, where every integer is stored
//! in big endian and every read has to be bounds checked.
pub use reader::{ByteIoError, ByteReader};
pub use writer::ByteWriter;

mod reader;
mod writer;
