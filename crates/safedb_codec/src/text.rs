//! Text transcoding between UTF-8 and UTF-16LE.

use crate::error::{CodecError, CodecResult};

/// Encodes a string as UTF-16LE bytes.
#[must_use]
pub fn to_utf16le(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}

/// Decodes UTF-16LE bytes into a string.
pub fn from_utf16le(bytes: &[u8]) -> CodecResult<String> {
    if bytes.len() % 2 != 0 {
        return Err(CodecError::InvalidUtf16);
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|_| CodecError::InvalidUtf16)
}

/// Decodes UTF-8 bytes read from a stream into a string.
pub fn from_utf8(bytes: &[u8]) -> CodecResult<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| CodecError::InvalidUtf8)
}

/// Transcodes UTF-8 bytes to UTF-16LE.
pub fn utf8_to_utf16le(bytes: &[u8]) -> CodecResult<Vec<u8>> {
    let text = std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;
    Ok(to_utf16le(text))
}

/// Number of UTF-16 code units in a string.
#[must_use]
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_roundtrip() {
        let wide = to_utf16le("abc");
        assert_eq!(wide, vec![b'a', 0, b'b', 0, b'c', 0]);
        assert_eq!(from_utf16le(&wide).unwrap(), "abc");
    }

    #[test]
    fn non_bmp_roundtrip() {
        let s = "pässwörd \u{1F511}";
        assert_eq!(from_utf16le(&to_utf16le(s)).unwrap(), s);
        assert_eq!(utf16_len("\u{1F511}"), 2);
    }

    #[test]
    fn odd_length_rejected() {
        assert_eq!(from_utf16le(&[0x61]), Err(CodecError::InvalidUtf16));
    }

    #[test]
    fn invalid_utf8_rejected() {
        assert_eq!(utf8_to_utf16le(&[0xff, 0xfe]), Err(CodecError::InvalidUtf8));
    }
}
