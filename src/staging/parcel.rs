//! Flat byte layout for moving staging records between processes.
//!
//! # Layout
//! ```text
//! u32 version (big-endian)
//! then, per field, in schema order:
//!   string      : u32 byte length, UTF-8 bytes
//!   string list : u32 item count, that many strings
//! ```
//!
//! Absent text is written as the empty string; there is no null marker.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

/// Errors produced while reading a parcel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParcelError {
    /// Stream ended before a field was complete.
    #[error("unexpected end of parcel: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// A string field is not UTF-8.
    #[error("string field is not valid UTF-8")]
    InvalidUtf8,

    /// Layout version this reader does not understand.
    #[error("unsupported parcel version {0}")]
    UnsupportedVersion(u32),

    /// Bytes left over after the last field.
    #[error("{0} trailing bytes after last field")]
    TrailingBytes(usize),

    /// A string or list is too long for its `u32` prefix.
    #[error("length {0} does not fit a u32 prefix")]
    LengthOverflow(usize),
}

/// Result type for parcel encoding and decoding.
pub type ParcelResult<T> = Result<T, ParcelError>;

fn length_prefix(len: usize) -> ParcelResult<u32> {
    u32::try_from(len).map_err(|_| ParcelError::LengthOverflow(len))
}

/// Sequential writer.
#[derive(Debug, Default)]
pub struct ParcelWriter {
    buf: BytesMut,
}

impl ParcelWriter {
    /// Start a parcel with the given layout version.
    pub fn new(version: u32) -> Self {
        let mut buf = BytesMut::new();
        buf.put_u32(version);
        Self { buf }
    }

    pub fn write_string(&mut self, value: &str) -> ParcelResult<()> {
        self.buf.put_u32(length_prefix(value.len())?);
        self.buf.put_slice(value.as_bytes());
        Ok(())
    }

    pub fn write_string_list<T: AsRef<str>>(&mut self, values: &[T]) -> ParcelResult<()> {
        self.buf.put_u32(length_prefix(values.len())?);
        for value in values {
            self.write_string(value.as_ref())?;
        }
        Ok(())
    }

    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Sequential reader over a parcel produced by [`ParcelWriter`].
#[derive(Debug)]
pub struct ParcelReader {
    buf: Bytes,
}

impl ParcelReader {
    /// Open a parcel, checking its version against `expected_version`.
    pub fn new(bytes: impl Into<Bytes>, expected_version: u32) -> ParcelResult<Self> {
        let mut reader = Self { buf: bytes.into() };
        let version = reader.read_u32()?;
        if version != expected_version {
            return Err(ParcelError::UnsupportedVersion(version));
        }
        Ok(reader)
    }

    fn ensure(&self, needed: usize) -> ParcelResult<()> {
        let remaining = self.buf.remaining();
        if remaining < needed {
            return Err(ParcelError::UnexpectedEof { needed, remaining });
        }
        Ok(())
    }

    fn read_u32(&mut self) -> ParcelResult<u32> {
        self.ensure(4)?;
        Ok(self.buf.get_u32())
    }

    pub fn read_string(&mut self) -> ParcelResult<String> {
        let len = self.read_u32()? as usize;
        self.ensure(len)?;
        let raw = self.buf.split_to(len);
        String::from_utf8(raw.to_vec()).map_err(|_| ParcelError::InvalidUtf8)
    }

    pub fn read_string_list(&mut self) -> ParcelResult<Vec<String>> {
        let count = self.read_u32()? as usize;
        // Each item needs at least its length prefix.
        self.ensure(count.saturating_mul(4))?;
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.read_string()?);
        }
        Ok(values)
    }

    /// Require that every byte has been consumed.
    pub fn finish(self) -> ParcelResult<()> {
        match self.buf.remaining() {
            0 => Ok(()),
            n => Err(ParcelError::TrailingBytes(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_layout() {
        let mut writer = ParcelWriter::new(1);
        writer.write_string("ab").unwrap();
        let bytes = writer.finish();
        assert_eq!(&bytes[..], &[0, 0, 0, 1, 0, 0, 0, 2, b'a', b'b']);
    }

    #[test]
    fn test_list_and_empty_values() {
        let mut writer = ParcelWriter::new(7);
        writer.write_string("").unwrap();
        writer.write_string_list(&["x", "yz"]).unwrap();
        writer.write_string_list::<String>(&[]).unwrap();

        let mut reader = ParcelReader::new(writer.finish(), 7).unwrap();
        assert_eq!(reader.read_string().unwrap(), "");
        assert_eq!(reader.read_string_list().unwrap(), vec!["x", "yz"]);
        assert!(reader.read_string_list().unwrap().is_empty());
        reader.finish().unwrap();
    }

    #[test]
    fn test_version_mismatch() {
        let bytes = ParcelWriter::new(2).finish();
        assert_eq!(
            ParcelReader::new(bytes, 1).unwrap_err(),
            ParcelError::UnsupportedVersion(2)
        );
    }

    #[test]
    fn test_truncated_string() {
        let mut writer = ParcelWriter::new(1);
        writer.write_string("hello").unwrap();
        let bytes = writer.finish();
        let truncated = bytes.slice(..bytes.len() - 2);

        let mut reader = ParcelReader::new(truncated, 1).unwrap();
        assert_eq!(
            reader.read_string().unwrap_err(),
            ParcelError::UnexpectedEof { needed: 5, remaining: 3 }
        );
    }

    #[test]
    fn test_empty_stream() {
        assert_eq!(
            ParcelReader::new(Bytes::new(), 1).unwrap_err(),
            ParcelError::UnexpectedEof { needed: 4, remaining: 0 }
        );
    }

    #[test]
    fn test_invalid_utf8() {
        let mut buf = BytesMut::new();
        buf.put_u32(1);
        buf.put_u32(2);
        buf.put_slice(&[0xff, 0xfe]);
        let mut reader = ParcelReader::new(buf.freeze(), 1).unwrap();
        assert_eq!(reader.read_string().unwrap_err(), ParcelError::InvalidUtf8);
    }

    #[test]
    fn test_length_prefix_bounds() {
        assert_eq!(length_prefix(u32::MAX as usize), Ok(u32::MAX));
        #[cfg(target_pointer_width = "64")]
        {
            let too_long = u32::MAX as usize + 1;
            assert_eq!(length_prefix(too_long), Err(ParcelError::LengthOverflow(too_long)));
        }
    }

    #[test]
    fn test_trailing_bytes() {
        let mut writer = ParcelWriter::new(1);
        writer.write_string("a").unwrap();
        let reader = ParcelReader::new(writer.finish(), 1).unwrap();
        assert_eq!(reader.finish().unwrap_err(), ParcelError::TrailingBytes(5));
    }
}
