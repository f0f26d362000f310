//! Binary format versions.

use std::fmt;

/// On-disk format version of a record stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatVersion {
    /// Legacy format: 32-bit times, dependencies encoded in the password.
    V3,
    /// Current format: 40-bit times, explicit dependency fields.
    #[default]
    V4,
}

impl FormatVersion {
    /// Number of bytes a time field occupies on the wire.
    #[must_use]
    pub const fn time_width(self) -> usize {
        match self {
            Self::V3 => 4,
            Self::V4 => 5,
        }
    }

    /// Parses a version from its short name (`"v3"`, `"3"`, `"v4"`, `"4"`).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "v3" | "3" => Some(Self::V3),
            "v4" | "4" => Some(Self::V4),
            _ => None,
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V3 => f.write_str("V3"),
            Self::V4 => f.write_str("V4"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        assert_eq!(FormatVersion::parse("V3"), Some(FormatVersion::V3));
        assert_eq!(FormatVersion::parse("4"), Some(FormatVersion::V4));
        assert_eq!(FormatVersion::parse("v5"), None);
    }

    #[test]
    fn time_widths() {
        assert_eq!(FormatVersion::V3.time_width(), 4);
        assert_eq!(FormatVersion::V4.time_width(), 5);
    }
}
