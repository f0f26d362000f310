//! TLV field streams.
//!
//! Every field on the wire is a 1-byte type, a 4-byte little-endian length
//! and `length` value bytes. A record ends with an END field (`0xff`) of
//! zero length.

use crate::error::{CodecError, CodecResult};
use std::fmt;
use std::io::{ErrorKind, Read, Write};
use zeroize::Zeroizing;

/// Type byte of the end-of-record marker.
pub const END_TYPE: u8 = 0xff;

/// Default maximum accepted field length.
///
/// Guards allocation against corrupt length prefixes. 64 MB covers
/// inline attachments.
pub const DEFAULT_MAX_FIELD_LEN: u32 = 64 * 1024 * 1024;

/// A single field as read from or written to a stream.
///
/// Values may hold secrets, so the buffer is wiped on drop and `Debug`
/// prints only the length.
#[derive(Clone, PartialEq, Eq)]
pub struct RawField {
    /// Field type byte.
    pub type_byte: u8,
    /// Field value bytes.
    pub data: Zeroizing<Vec<u8>>,
}

impl RawField {
    /// Creates a field from a type byte and value.
    pub fn new(type_byte: u8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            type_byte,
            data: Zeroizing::new(data.into()),
        }
    }

    /// Creates the END marker.
    #[must_use]
    pub fn end() -> Self {
        Self::new(END_TYPE, Vec::new())
    }

    /// Returns true if this is the END marker.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.type_byte == END_TYPE
    }

    /// Value length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the value is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for RawField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawField")
            .field("type_byte", &format_args!("0x{:02x}", self.type_byte))
            .field("len", &self.data.len())
            .finish()
    }
}

/// Source of TLV fields.
pub trait FieldReader {
    /// Reads the next field.
    ///
    /// Returns `Ok(None)` when the stream is exhausted at a field boundary.
    /// A stream that ends inside a field is an error.
    fn read_field(&mut self) -> CodecResult<Option<RawField>>;
}

/// Sink for TLV fields.
pub trait FieldWriter {
    /// Writes one field.
    fn write_field(&mut self, type_byte: u8, data: &[u8]) -> CodecResult<()>;

    /// Writes the END marker.
    fn write_end(&mut self) -> CodecResult<()> {
        self.write_field(END_TYPE, &[])
    }
}

impl<T: FieldReader + ?Sized> FieldReader for &mut T {
    fn read_field(&mut self) -> CodecResult<Option<RawField>> {
        (**self).read_field()
    }
}

impl<T: FieldWriter + ?Sized> FieldWriter for &mut T {
    fn write_field(&mut self, type_byte: u8, data: &[u8]) -> CodecResult<()> {
        (**self).write_field(type_byte, data)
    }
}

/// Reads TLV fields from any [`Read`] implementation.
pub struct TlvReader<R> {
    inner: R,
    max_field_len: u32,
}

impl<R: Read> TlvReader<R> {
    /// Creates a reader with the default field length limit.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            max_field_len: DEFAULT_MAX_FIELD_LEN,
        }
    }

    /// Sets the maximum accepted field length.
    #[must_use]
    pub fn with_max_field_len(mut self, max: u32) -> Self {
        self.max_field_len = max;
        self
    }

    /// Consumes the reader, returning the inner stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn read_type_byte(&mut self) -> CodecResult<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl<R: Read> FieldReader for TlvReader<R> {
    fn read_field(&mut self) -> CodecResult<Option<RawField>> {
        let Some(type_byte) = self.read_type_byte()? else {
            return Ok(None);
        };

        let mut len_buf = [0u8; 4];
        self.inner.read_exact(&mut len_buf)?;
        let len = u32::from_le_bytes(len_buf);
        if len > self.max_field_len {
            return Err(CodecError::FieldTooLarge {
                type_byte,
                len: u64::from(len),
                max: u64::from(self.max_field_len),
            });
        }

        let mut data = Zeroizing::new(vec![0u8; len as usize]);
        self.inner.read_exact(&mut data)?;
        Ok(Some(RawField { type_byte, data }))
    }
}

/// Writes TLV fields to any [`Write`] implementation.
pub struct TlvWriter<W> {
    inner: W,
}

impl<W: Write> TlvWriter<W> {
    /// Creates a writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Flushes the inner stream.
    pub fn flush(&mut self) -> CodecResult<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Consumes the writer, returning the inner stream.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> FieldWriter for TlvWriter<W> {
    fn write_field(&mut self, type_byte: u8, data: &[u8]) -> CodecResult<()> {
        let len = u32::try_from(data.len()).map_err(|_| CodecError::FieldTooLarge {
            type_byte,
            len: data.len() as u64,
            max: u64::from(u32::MAX),
        })?;
        self.inner.write_all(&[type_byte])?;
        self.inner.write_all(&len.to_le_bytes())?;
        self.inner.write_all(data)?;
        Ok(())
    }
}
