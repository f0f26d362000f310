//! # SafeDB Codec
//!
//! Tagged-length-value framing for SafeDB record streams.
//!
//! A record is a sequence of fields, each encoded as:
//!
//! - 1 byte field type
//! - 4 byte little-endian value length
//! - `length` value bytes
//!
//! and is terminated by an END field (`0xff`) with zero length.
//!
//! This crate knows the field-type table, the fixed-width value encodings
//! for both format versions, and text transcoding. It knows nothing about
//! records; `safedb_core` builds those on top.
//!
//! ## Usage
//!
//! ```
//! use safedb_codec::{FieldReader, FieldWriter, TlvReader, TlvWriter, FieldType};
//!
//! let mut writer = TlvWriter::new(Vec::new());
//! writer.write_field(FieldType::Title.as_byte(), b"Bank").unwrap();
//! writer.write_end().unwrap();
//! let bytes = writer.into_inner();
//!
//! let mut reader = TlvReader::new(bytes.as_slice());
//! let field = reader.read_field().unwrap().unwrap();
//! assert_eq!(field.type_byte, FieldType::Title.as_byte());
//! assert_eq!(field.data.as_slice(), b"Bank");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod field_type;
pub mod fixed;
mod stream;
pub mod text;
mod version;

pub use error::{CodecError, CodecResult};
pub use field_type::{FieldKind, FieldType};
pub use stream::{
    FieldReader, FieldWriter, RawField, TlvReader, TlvWriter, DEFAULT_MAX_FIELD_LEN, END_TYPE,
};
pub use version::FormatVersion;

/// Maximum number of fields read for a single record before the stream is
/// declared corrupt.
pub const MAX_FIELDS_PER_RECORD: usize = 255;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_type_matches_table() {
        assert_eq!(FieldType::End.as_byte(), END_TYPE);
    }

    #[test]
    fn time_field_on_the_wire() {
        let mut w = TlvWriter::new(Vec::new());
        let t = fixed::encode_time(1_700_000_000, FormatVersion::V4.time_width()).unwrap();
        w.write_field(FieldType::CTime.as_byte(), &t).unwrap();
        let bytes = w.into_inner();
        assert_eq!(bytes.len(), 1 + 4 + 5);

        let mut r = TlvReader::new(bytes.as_slice());
        let f = r.read_field().unwrap().unwrap();
        assert_eq!(fixed::decode_time(f.type_byte, &f.data).unwrap(), 1_700_000_000);
    }
}
