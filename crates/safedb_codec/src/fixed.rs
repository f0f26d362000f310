//! Fixed-width little-endian value routines.
//!
//! All byte-order handling in the workspace lives here.

use crate::error::{CodecError, CodecResult};

/// Encodes a 16-bit signed integer.
#[inline]
#[must_use]
pub fn encode_i16(value: i16) -> [u8; 2] {
    value.to_le_bytes()
}

/// Encodes a 32-bit signed integer.
#[inline]
#[must_use]
pub fn encode_i32(value: i32) -> [u8; 4] {
    value.to_le_bytes()
}

/// Encodes a 32-bit unsigned integer.
#[inline]
#[must_use]
pub fn encode_u32(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

/// Decodes a 16-bit signed integer; `bytes` must be exactly 2 long.
pub fn decode_i16(type_byte: u8, bytes: &[u8]) -> CodecResult<i16> {
    let arr: [u8; 2] = bytes
        .try_into()
        .map_err(|_| CodecError::invalid_width(type_byte, "2", bytes.len()))?;
    Ok(i16::from_le_bytes(arr))
}

/// Decodes a 32-bit signed integer; `bytes` must be exactly 4 long.
pub fn decode_i32(type_byte: u8, bytes: &[u8]) -> CodecResult<i32> {
    let arr: [u8; 4] = bytes
        .try_into()
        .map_err(|_| CodecError::invalid_width(type_byte, "4", bytes.len()))?;
    Ok(i32::from_le_bytes(arr))
}

/// Decodes a 32-bit unsigned integer; `bytes` must be exactly 4 long.
pub fn decode_u32(type_byte: u8, bytes: &[u8]) -> CodecResult<u32> {
    let arr: [u8; 4] = bytes
        .try_into()
        .map_err(|_| CodecError::invalid_width(type_byte, "4", bytes.len()))?;
    Ok(u32::from_le_bytes(arr))
}

/// Decodes a single byte.
pub fn decode_u8(type_byte: u8, bytes: &[u8]) -> CodecResult<u8> {
    match bytes {
        [b] => Ok(*b),
        _ => Err(CodecError::invalid_width(type_byte, "1", bytes.len())),
    }
}

/// Encodes a timestamp using `width` bytes (4, 5 or 8).
///
/// 4- and 5-byte times are unsigned, so they hold `0..2^32` and `0..2^40`.
/// A value outside that range is an error rather than being truncated.
pub fn encode_time(value: i64, width: usize) -> CodecResult<Vec<u8>> {
    let fits = match width {
        4 | 5 => (0..1i64 << (width * 8)).contains(&value),
        8 => true,
        _ => return Err(CodecError::corrupt(format!("unsupported time width {width}"))),
    };
    if !fits {
        return Err(CodecError::TimeOutOfRange { value, width });
    }
    Ok(value.to_le_bytes()[..width].to_vec())
}

/// Decodes a timestamp of 4, 5 or 8 bytes.
///
/// 4- and 5-byte values are unsigned and zero-extended; 8-byte values are
/// taken as signed.
pub fn decode_time(type_byte: u8, bytes: &[u8]) -> CodecResult<i64> {
    match bytes.len() {
        4 | 5 => {
            let mut buf = [0u8; 8];
            buf[..bytes.len()].copy_from_slice(bytes);
            Ok(i64::from_le_bytes(buf))
        }
        8 => {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(bytes);
            Ok(i64::from_le_bytes(buf))
        }
        n => Err(CodecError::invalid_width(type_byte, "4, 5 or 8", n)),
    }
}

/// Decodes a 16-byte UUID value.
pub fn decode_uuid_bytes(type_byte: u8, bytes: &[u8]) -> CodecResult<[u8; 16]> {
    bytes
        .try_into()
        .map_err(|_| CodecError::invalid_width(type_byte, "16", bytes.len()))
}
