/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Encapsulates a simple growable byte writer with
/// support for big endian writes
///
/// Writes never fail, the underlying vector grows as needed.
pub struct ByteWriter<'a> {
    buffer:        &'a mut Vec<u8>,
    bytes_written: usize
}

impl<'a> ByteWriter<'a> {
    /// Create a new writer that appends to `buffer`
    pub fn new(buffer: &'a mut Vec<u8>) -> ByteWriter<'a> {
        ByteWriter {
            buffer,
            bytes_written: 0
        }
    }
    /// Return the number of bytes this writer has appended
    ///
    /// ```
    /// use retrobit_core::bytestream::ByteWriter;
    /// let mut sink = vec![];
    /// let mut writer = ByteWriter::new(&mut sink);
    /// writer.write_u32_be(10);
    /// assert_eq!(writer.bytes_written(), 4);
    /// ```
    pub const fn bytes_written(&self) -> usize {
        self.bytes_written
    }
    /// Write a single byte
    pub fn write_u8(&mut self, byte: u8) {
        self.buffer.push(byte);
        self.bytes_written += 1;
    }
    /// Write a u32 in big endian
    pub fn write_u32_be(&mut self, value: u32) {
        self.write_all(&value.to_be_bytes());
    }
    /// Write all bytes from `buf`
    pub fn write_all(&mut self, buf: &[u8]) {
        self.buffer.extend_from_slice(buf);
        self.bytes_written += buf.len();
    }
    /// Reserve space for at least `additional` more bytes
    pub fn reserve(&mut self, additional: usize) {
        self.buffer.reserve(additional);
    }
}
