//! Password history.
//!
//! The history of a record is kept as a single text blob:
//!
//! ```text
//! F MM NN  { TTTTTTTT LLLL <password> } * NN
//! ```
//!
//! without the spaces: `F` is `1` when saving is enabled, `MM` the maximum
//! number of entries and `NN` the number present, both two hex digits. Each
//! entry is an 8 hex digit change time, a 4 hex digit password length in
//! characters, and the password itself. `"0"` and `"00000"` denote the empty
//! history.

use crate::error::CoreResult;
use crate::record::Record;
use crate::timefmt;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Largest maximum representable in the blob header.
pub const MAX_HISTORY_ENTRIES: usize = 0xff;

const HEADER_LEN: usize = 5;
const MAX_PASSWORD_CHARS: usize = 0xffff;

/// History retention settings applied when a record has no history blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Whether old passwords are kept.
    pub enabled: bool,
    /// Maximum number of old passwords kept.
    pub max: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max: 3,
        }
    }
}

/// One superseded password.
#[derive(Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// When the password stopped being current.
    pub changed: i64,
    /// The old password.
    pub password: String,
}

impl fmt::Debug for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryEntry")
            .field("changed", &self.changed)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Error parsing a history blob; the blob cannot be salvaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedHistory(pub &'static str);

impl fmt::Display for MalformedHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed password history: {}", self.0)
    }
}

impl std::error::Error for MalformedHistory {}

/// Parsed password history, ordered oldest to newest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PasswordHistory {
    /// Whether old passwords are kept.
    pub enabled: bool,
    /// Maximum number of entries.
    pub max: usize,
    /// Entries, oldest first.
    pub entries: Vec<HistoryEntry>,
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryStatus {
    /// The blob is empty or well-formed.
    Valid,
    /// The blob was unrecoverable and must be reset to empty.
    Invalid,
    /// The blob was inconsistent; the contained blob replaces it.
    Repaired(String),
}

/// Returns true for the blobs that denote an empty history.
#[must_use]
pub fn is_empty_blob(blob: &str) -> bool {
    blob.is_empty() || blob == "0" || blob == "00000"
}

fn hex_field(chars: &[char], pos: &mut usize, width: usize) -> Result<u32, MalformedHistory> {
    let end = *pos + width;
    if end > chars.len() {
        return Err(MalformedHistory("truncated"));
    }
    let digits: String = chars[*pos..end].iter().collect();
    let value = u32::from_str_radix(&digits, 16).map_err(|_| MalformedHistory("bad hex digits"))?;
    *pos = end;
    Ok(value)
}

impl PasswordHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new(enabled: bool, max: usize) -> Self {
        Self {
            enabled,
            max: max.min(MAX_HISTORY_ENTRIES),
            entries: Vec::new(),
        }
    }

    /// Parses a blob.
    ///
    /// Exactly the number of entries announced in the header is read; any
    /// truncation, bad digit or trailing text is an error.
    pub fn parse(blob: &str) -> Result<Self, MalformedHistory> {
        if is_empty_blob(blob) {
            return Ok(Self::default());
        }
        let chars: Vec<char> = blob.chars().collect();
        if chars.len() < HEADER_LEN {
            return Err(MalformedHistory("too short"));
        }
        let enabled = match chars[0] {
            '0' => false,
            '1' => true,
            _ => return Err(MalformedHistory("bad status flag")),
        };
        let mut pos = 1;
        let max = hex_field(&chars, &mut pos, 2)? as usize;
        let count = hex_field(&chars, &mut pos, 2)? as usize;

        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let changed = i64::from(hex_field(&chars, &mut pos, 8)?);
            let len = hex_field(&chars, &mut pos, 4)? as usize;
            if pos + len > chars.len() {
                return Err(MalformedHistory("truncated password"));
            }
            let password = chars[pos..pos + len].iter().collect();
            pos += len;
            entries.push(HistoryEntry { changed, password });
        }
        if pos != chars.len() {
            return Err(MalformedHistory("trailing data"));
        }
        Ok(Self {
            enabled,
            max,
            entries,
        })
    }

    /// The blob header: status flag, max and count.
    #[must_use]
    pub fn header(&self) -> String {
        format!(
            "{}{:02x}{:02x}",
            u8::from(self.enabled),
            self.max.min(MAX_HISTORY_ENTRIES),
            self.entries.len().min(MAX_HISTORY_ENTRIES)
        )
    }

    /// Serializes to the blob form.
    #[must_use]
    pub fn to_blob(&self) -> String {
        let mut out = self.header();
        for entry in self.entries.iter().take(MAX_HISTORY_ENTRIES) {
            let changed = entry.changed.clamp(0, i64::from(u32::MAX));
            let password: String = entry.password.chars().take(MAX_PASSWORD_CHARS).collect();
            out.push_str(&format!("{changed:08x}{:04x}", password.chars().count()));
            out.push_str(&password);
        }
        out
    }

    /// Appends a password and drops the oldest entries beyond `max`.
    pub fn push(&mut self, changed: i64, password: String) {
        self.entries.push(HistoryEntry { changed, password });
        self.trim();
    }

    /// Drops the oldest entries beyond `max`.
    pub fn trim(&mut self) {
        if self.entries.len() > self.max {
            let excess = self.entries.len() - self.max;
            self.entries.drain(..excess);
        }
    }

    /// Delimited-text export form.
    ///
    /// The header followed by, per entry, a space, the change date, a
    /// space, the 4 hex digit length, a space and the password.
    #[must_use]
    pub fn export_string(&self) -> String {
        let mut out = self.header();
        for entry in &self.entries {
            out.push_str(&format!(
                " {} {:04x} {}",
                timefmt::format_export(entry.changed),
                entry.password.chars().count(),
                entry.password
            ));
        }
        out
    }
}

/// Checks a history blob.
///
/// Unparseable blobs are [`HistoryStatus::Invalid`]. A blob holding more
/// entries than its declared maximum is repaired by raising the maximum.
#[must_use]
pub fn validate(blob: &str) -> HistoryStatus {
    if blob.is_empty() {
        return HistoryStatus::Valid;
    }
    if blob.chars().count() < HEADER_LEN {
        return HistoryStatus::Invalid;
    }
    let Ok(mut history) = PasswordHistory::parse(blob) else {
        return HistoryStatus::Invalid;
    };
    if history.entries.len() <= history.max {
        return HistoryStatus::Valid;
    }
    history.max = history.entries.len();
    HistoryStatus::Repaired(history.to_blob())
}

/// Validates the history of `record` in place.
///
/// Invalid histories are cleared; repaired ones are rewritten.
pub fn validate_record(record: &mut Record) -> CoreResult<HistoryStatus> {
    let status = validate(&record.pw_history());
    match &status {
        HistoryStatus::Valid => {}
        HistoryStatus::Invalid => {
            warn!(uuid = %record.uuid(), "password history unrecoverable, resetting");
            record.set_pw_history("")?;
        }
        HistoryStatus::Repaired(blob) => {
            warn!(uuid = %record.uuid(), "password history inconsistent, repaired");
            record.set_pw_history(blob)?;
        }
    }
    Ok(status)
}

/// Records the current password of `record` in its history.
///
/// A record without history uses `defaults`. Nothing happens when saving
/// is disabled. The change time is the password modification time, or the
/// creation time if the password was never modified.
pub fn record_change(record: &mut Record, defaults: &HistorySettings) -> CoreResult<()> {
    let blob = record.pw_history();
    let mut history = if is_empty_blob(&blob) {
        PasswordHistory::new(defaults.enabled, defaults.max)
    } else {
        PasswordHistory::parse(&blob).unwrap_or_else(|e| {
            warn!(uuid = %record.uuid(), error = %e, "discarding unreadable password history");
            PasswordHistory::new(defaults.enabled, defaults.max)
        })
    };
    if !history.enabled {
        return Ok(());
    }

    let changed = match record.pmtime() {
        0 => record.ctime(),
        t => t,
    };
    history.push(changed, record.password());
    record.set_pw_history(&history.to_blob())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PasswordHistory {
        PasswordHistory {
            enabled: true,
            max: 3,
            entries: vec![
                HistoryEntry {
                    changed: 0x5f5e_1000,
                    password: "abc".into(),
                },
                HistoryEntry {
                    changed: 0x5f5e_2000,
                    password: "pässword".into(),
                },
            ],
        }
    }

    #[test]
    fn blob_layout() {
        let blob = sample().to_blob();
        assert!(blob.starts_with("10302"));
        assert_eq!(&blob[5..17], "5f5e10000003");
        assert_eq!(PasswordHistory::parse(&blob).unwrap(), sample());
    }

    #[test]
    fn empty_markers() {
        for blob in ["", "0", "00000"] {
            assert!(is_empty_blob(blob));
            assert_eq!(PasswordHistory::parse(blob).unwrap(), PasswordHistory::default());
        }
    }

    #[test]
    fn validate_outcomes() {
        assert_eq!(validate(""), HistoryStatus::Valid);
        assert_eq!(validate("1ff"), HistoryStatus::Invalid);
        assert_eq!(validate("1zz00"), HistoryStatus::Invalid);
        assert_eq!(validate("00000junk"), HistoryStatus::Invalid);
        assert_eq!(validate(&sample().to_blob()), HistoryStatus::Valid);
        assert_eq!(validate(&sample().to_blob().to_uppercase()), HistoryStatus::Valid);

        let mut over = sample();
        over.max = 1;
        let blob = over.to_blob();
        let HistoryStatus::Repaired(fixed) = validate(&blob) else {
            panic!("expected repair");
        };
        let repaired = PasswordHistory::parse(&fixed).unwrap();
        assert_eq!(repaired.max, 2);
        assert_eq!(repaired.entries, sample().entries);
    }

    #[test]
    fn trim_keeps_newest() {
        let mut h = PasswordHistory::new(true, 2);
        for i in 0..5 {
            h.push(i, format!("pw{i}"));
        }
        let kept: Vec<_> = h.entries.iter().map(|e| e.password.as_str()).collect();
        assert_eq!(kept, ["pw3", "pw4"]);
    }

    #[test]
    fn record_change_uses_defaults_and_pmtime() {
        let mut r = Record::new().unwrap();
        r.set_password("first").unwrap();
        r.set_ctime(10).unwrap();
        let defaults = HistorySettings { enabled: true, max: 2 };
        record_change(&mut r, &defaults).unwrap();

        r.set_password("second").unwrap();
        r.set_pmtime(20).unwrap();
        record_change(&mut r, &defaults).unwrap();

        let h = PasswordHistory::parse(&r.pw_history()).unwrap();
        assert_eq!(h.max, 2);
        assert_eq!(h.entries[0].changed, 10);
        assert_eq!(h.entries[1].changed, 20);
        assert_eq!(h.entries[1].password, "second");
    }

    #[test]
    fn disabled_is_noop() {
        let mut r = Record::new().unwrap();
        r.set_password("pw").unwrap();
        record_change(&mut r, &HistorySettings { enabled: false, max: 5 }).unwrap();
        assert_eq!(r.pw_history(), "");

        r.set_pw_history("00300").unwrap();
        record_change(&mut r, &HistorySettings::default()).unwrap();
        assert_eq!(r.pw_history(), "00300");
    }

    #[test]
    fn validate_record_resets_garbage() {
        let mut r = Record::new().unwrap();
        r.set_pw_history("1x").unwrap();
        assert_eq!(validate_record(&mut r).unwrap(), HistoryStatus::Invalid);
        assert_eq!(r.pw_history(), "");
    }

    #[test]
    fn export_string_format() {
        let h = PasswordHistory {
            enabled: true,
            max: 1,
            entries: vec![HistoryEntry {
                changed: 86_400,
                password: "pw".into(),
            }],
        };
        assert_eq!(h.export_string(), "10101 1970/01/02 00:00:00 0002 pw");
    }
}
