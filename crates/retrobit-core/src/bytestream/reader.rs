/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

/// Errors that can occur when reading from a byte stream
pub enum ByteIoError {
    // requested, present
    NotEnoughBytes(usize, usize),
    Generic(&'static str)
}

impl Debug for ByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ByteIoError::NotEnoughBytes(expected, found) => {
                writeln!(f, "Not enough bytes, expected {expected} but found {found}")
            }
            ByteIoError::Generic(err) => {
                writeln!(f, "Generic I/O error: {err}")
            }
        }
    }
}

impl Display for ByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for ByteIoError {}

impl From<&'static str> for ByteIoError {
    fn from(value: &'static str) -> Self {
        ByteIoError::Generic(value)
    }
}

/// An encapsulation of a byte stream reader
///
/// This provides an interface similar to [std::io::Cursor] but
/// it provides fine grained options for reading different integer data types from
/// the underlying buffer.
///
/// The reader never panics, reads past the end either return an error
/// or, for the `no_error` variants, zero.
pub struct ByteReader<'a> {
    /// Data stream
    stream:   &'a [u8],
    position: usize
}

impl<'a> ByteReader<'a> {
    /// Create a new instance of the byte stream
    pub const fn new(buf: &'a [u8]) -> ByteReader<'a> {
        ByteReader {
            stream:   buf,
            position: 0
        }
    }
    /// Return the current position of the inner cursor.
    pub const fn position(&self) -> usize {
        self.position
    }
    /// Return the number of bytes between the current position and the
    /// end of the stream
    pub const fn remaining(&self) -> usize {
        self.stream.len().saturating_sub(self.position)
    }
    /// Return true if the stream has at least `num` bytes left
    ///
    /// ```
    /// use retrobit_core::bytestream::ByteReader;
    /// let stream = ByteReader::new(&[1, 2, 3]);
    /// assert!(stream.has(3));
    /// assert!(!stream.has(4));
    /// ```
    pub const fn has(&self, num: usize) -> bool {
        self.remaining() >= num
    }
    /// Return true if there are no more bytes to read
    pub const fn eof(&self) -> bool {
        self.position >= self.stream.len()
    }
    /// Get a single byte or zero if the stream is exhausted
    pub fn get_u8(&mut self) -> u8 {
        match self.stream.get(self.position) {
            Some(byte) => {
                self.position += 1;
                *byte
            }
            None => 0
        }
    }
    /// Get a single byte or an error if the stream is exhausted
    pub fn get_u8_err(&mut self) -> Result<u8, ByteIoError> {
        if self.eof() {
            return Err(ByteIoError::NotEnoughBytes(1, 0));
        }
        Ok(self.get_u8())
    }
    /// Read `N` bytes into a fixed array, or error out when the stream
    /// doesn't have enough bytes.
    ///
    /// The position is left unchanged on error.
    pub fn get_fixed_bytes_or_error<const N: usize>(&mut self) -> Result<[u8; N], ByteIoError> {
        let bytes = self.peek_at(0, N)?;
        let mut byte_store: [u8; N] = [0; N];
        byte_store.copy_from_slice(bytes);
        self.position += N;
        Ok(byte_store)
    }
    /// Read a big endian u32 or error out if there are less than four bytes
    pub fn get_u32_be_err(&mut self) -> Result<u32, ByteIoError> {
        self.get_fixed_bytes_or_error::<4>().map(u32::from_be_bytes)
    }
    /// Look ahead `position` bytes and return a reference
    /// to `num_bytes` from that position, or an error if the
    /// peek would be out of bounds.
    ///
    /// This doesn't increment the position.
    pub fn peek_at(&self, position: usize, num_bytes: usize) -> Result<&'a [u8], ByteIoError> {
        let start = self
            .position
            .checked_add(position)
            .ok_or(ByteIoError::Generic("Overflow"))?;
        let end = start
            .checked_add(num_bytes)
            .ok_or(ByteIoError::Generic("Overflow"))?;

        self.stream
            .get(start..end)
            .ok_or(ByteIoError::NotEnoughBytes(num_bytes, self.remaining()))
    }
    /// Return a reference to the next `num_bytes` and advance past them
    pub fn get_as_ref(&mut self, num_bytes: usize) -> Result<&'a [u8], ByteIoError> {
        let bytes = self.peek_at(0, num_bytes)?;
        self.position += num_bytes;
        Ok(bytes)
    }
    /// Return every byte from the current position to the end
    /// and move the position to the end
    pub fn remaining_bytes(&mut self) -> &'a [u8] {
        let start = self.position.min(self.stream.len());
        self.position = self.stream.len();
        &self.stream[start..]
    }
    /// Read bytes up to (not including) the first zero byte
    /// and consume the terminator.
    ///
    /// Returns `None` and leaves the position unchanged when no
    /// terminator exists.
    pub fn get_null_terminated(&mut self) -> Option<&'a [u8]> {
        let rest = self.stream.get(self.position..)?;
        let end = rest.iter().position(|x| *x == 0)?;
        self.position += end + 1;
        Some(&rest[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::ByteReader;

    #[test]
    fn read_big_endian_integers() {
        let data = [0, 0, 0, 13, b'I', b'H', b'D', b'R'];
        let mut stream = ByteReader::new(&data);

        assert_eq!(stream.get_u32_be_err().unwrap(), 13);
        assert_eq!(&stream.get_fixed_bytes_or_error::<4>().unwrap(), b"IHDR");
        assert!(stream.eof());
        assert!(stream.get_u32_be_err().is_err());
    }

    #[test]
    fn short_reads_keep_position() {
        let data = [1, 2, 3];
        let mut stream = ByteReader::new(&data);

        assert!(stream.get_as_ref(4).is_err());
        assert_eq!(stream.position(), 0);
        assert_eq!(stream.get_as_ref(2).unwrap(), &[1, 2]);
        assert_eq!(stream.remaining(), 1);
    }

    #[test]
    fn null_terminated_strings() {
        let data = b"Title\0retro";
        let mut stream = ByteReader::new(data);

        assert_eq!(stream.get_null_terminated().unwrap(), b"Title");
        assert!(stream.get_null_terminated().is_none());
        assert_eq!(stream.remaining_bytes(), b"retro");
        assert!(stream.eof());
    }
}
