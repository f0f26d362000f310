//! Structured values packed into record fields.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Action performed on double-click (or shift + double-click) of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoubleClickAction {
    /// Perform autotype.
    AutoType,
    /// Open the URL in a browser.
    Browse,
    /// Copy notes to the clipboard.
    CopyNotes,
    /// Copy the password to the clipboard.
    CopyPassword,
    /// Copy the user name to the clipboard.
    CopyUsername,
    /// Open the entry for viewing or editing.
    ViewEdit,
    /// Copy the password and minimize.
    CopyPasswordMinimize,
    /// Browse, then autotype.
    BrowsePlus,
    /// Execute the run command.
    Run,
    /// Compose an e-mail to the entry address.
    SendEmail,
}

impl DoubleClickAction {
    /// Smallest valid stored value.
    pub const MIN: i16 = 0;
    /// Largest valid stored value.
    pub const MAX: i16 = 9;
    /// Stored value meaning "use the preference default".
    pub const UNSET: i16 = -1;

    /// Converts a stored value into an action.
    #[must_use]
    pub const fn from_i16(value: i16) -> Option<Self> {
        Some(match value {
            0 => Self::AutoType,
            1 => Self::Browse,
            2 => Self::CopyNotes,
            3 => Self::CopyPassword,
            4 => Self::CopyUsername,
            5 => Self::ViewEdit,
            6 => Self::CopyPasswordMinimize,
            7 => Self::BrowsePlus,
            8 => Self::Run,
            9 => Self::SendEmail,
            _ => return None,
        })
    }

    /// Returns the stored value of this action.
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::AutoType => 0,
            Self::Browse => 1,
            Self::CopyNotes => 2,
            Self::CopyPassword => 3,
            Self::CopyUsername => 4,
            Self::ViewEdit => 5,
            Self::CopyPasswordMinimize => 6,
            Self::BrowsePlus => 7,
            Self::Run => 8,
            Self::SendEmail => 9,
        }
    }
}

/// Bit flags of a [`PasswordPolicy`].
pub mod policy_flags {
    /// Use lowercase letters.
    pub const USE_LOWERCASE: u16 = 0x8000;
    /// Use uppercase letters.
    pub const USE_UPPERCASE: u16 = 0x4000;
    /// Use digits.
    pub const USE_DIGITS: u16 = 0x2000;
    /// Use symbols.
    pub const USE_SYMBOLS: u16 = 0x1000;
    /// Use hexadecimal digits only.
    pub const USE_HEX_DIGITS: u16 = 0x0800;
    /// Avoid easily confused characters.
    pub const USE_EASY_VISION: u16 = 0x0400;
    /// Generate pronounceable passwords.
    pub const MAKE_PRONOUNCEABLE: u16 = 0x0200;
}

/// Per-entry password generation policy.
///
/// Packed as text: 4 hex digits of flags followed by 3 hex digits each of
/// length, lowercase, uppercase, digit and symbol minimums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PasswordPolicy {
    /// Policy flags, see [`policy_flags`].
    pub flags: u16,
    /// Total password length.
    pub length: u16,
    /// Minimum lowercase characters.
    pub lower_min: u16,
    /// Minimum uppercase characters.
    pub upper_min: u16,
    /// Minimum digits.
    pub digit_min: u16,
    /// Minimum symbols.
    pub symbol_min: u16,
}

/// Length of the packed policy text.
pub const POLICY_TEXT_LEN: usize = 19;

impl PasswordPolicy {
    /// Parses the packed text form. Returns `None` if malformed.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        if text.len() != POLICY_TEXT_LEN || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let num = |range: std::ops::Range<usize>| u16::from_str_radix(&text[range], 16).ok();
        Some(Self {
            flags: num(0..4)?,
            length: num(4..7)?,
            lower_min: num(7..10)?,
            upper_min: num(10..13)?,
            digit_min: num(13..16)?,
            symbol_min: num(16..19)?,
        })
    }

    /// Returns true if no flags are set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.flags == 0
    }

    /// Returns true if `flag` is set.
    #[must_use]
    pub const fn has(&self, flag: u16) -> bool {
        self.flags & flag != 0
    }
}

impl fmt::Display for PasswordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04x}{:03x}{:03x}{:03x}{:03x}{:03x}",
            self.flags,
            self.length.min(0xfff),
            self.lower_min.min(0xfff),
            self.upper_min.min(0xfff),
            self.digit_min.min(0xfff),
            self.symbol_min.min(0xfff)
        )
    }
}

/// Keyboard shortcut modifier bits.
pub mod kb_modifiers {
    /// Shift key.
    pub const SHIFT: u16 = 0x01;
    /// Control key.
    pub const CONTROL: u16 = 0x02;
    /// Alt key.
    pub const ALT: u16 = 0x04;
    /// Extended key.
    pub const EXT: u16 = 0x08;
    /// Meta key.
    pub const META: u16 = 0x10;
    /// Windows key.
    pub const WIN: u16 = 0x20;
    /// Command key.
    pub const CMD: u16 = 0x40;
}

const KB_LETTERS: [(char, u16); 7] = [
    ('A', kb_modifiers::ALT),
    ('C', kb_modifiers::CONTROL),
    ('S', kb_modifiers::SHIFT),
    ('E', kb_modifiers::EXT),
    ('M', kb_modifiers::META),
    ('W', kb_modifiers::WIN),
    ('D', kb_modifiers::CMD),
];

/// Keyboard shortcut packed as `modifiers << 16 | virtual_key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KbShortcut(pub i32);

impl KbShortcut {
    /// Builds a shortcut from modifiers and a virtual key code.
    ///
    /// Either part being zero yields the empty shortcut.
    #[must_use]
    pub fn new(modifiers: u16, virtual_key: u16) -> Self {
        if modifiers == 0 || virtual_key == 0 {
            return Self(0);
        }
        Self((i32::from(modifiers) << 16) + i32::from(virtual_key))
    }

    /// Modifier bits.
    #[must_use]
    pub const fn modifiers(self) -> u16 {
        ((self.0 >> 16) & 0xffff) as u16
    }

    /// Virtual key code.
    #[must_use]
    pub const fn virtual_key(self) -> u16 {
        (self.0 & 0xff) as u16
    }

    /// Returns true if no shortcut is assigned.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Parses the `ACSEMWD:xxxx` text form. Empty text is the empty shortcut.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        if text.is_empty() {
            return Some(Self(0));
        }
        let (mods, key) = text.split_once(':')?;
        if key.len() != 4 {
            return None;
        }
        let virtual_key = u16::from_str_radix(key, 16).ok()?;
        let mut modifiers = 0u16;
        for c in mods.chars() {
            let (_, bit) = KB_LETTERS.iter().find(|(l, _)| *l == c)?;
            modifiers |= bit;
        }
        Some(Self::new(modifiers, virtual_key))
    }
}

impl fmt::Display for KbShortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let mods = self.modifiers();
        for (letter, bit) in KB_LETTERS {
            if mods & bit != 0 {
                write!(f, "{letter}")?;
            }
        }
        write!(f, ":{:04x}", self.virtual_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dca_range() {
        for v in DoubleClickAction::MIN..=DoubleClickAction::MAX {
            let dca = DoubleClickAction::from_i16(v).unwrap();
            assert_eq!(dca.as_i16(), v);
        }
        assert_eq!(DoubleClickAction::from_i16(-1), None);
        assert_eq!(DoubleClickAction::from_i16(10), None);
    }

    #[test]
    fn policy_text() {
        let policy = PasswordPolicy {
            flags: policy_flags::USE_LOWERCASE | policy_flags::USE_DIGITS,
            length: 12,
            lower_min: 1,
            upper_min: 0,
            digit_min: 2,
            symbol_min: 0,
        };
        let text = policy.to_string();
        assert_eq!(text, "a00000c001000002000");
        assert_eq!(PasswordPolicy::parse(&text), Some(policy));
        assert!(policy.has(policy_flags::USE_DIGITS));
        assert!(!policy.has(policy_flags::USE_SYMBOLS));
    }

    #[test]
    fn policy_rejects_garbage() {
        assert_eq!(PasswordPolicy::parse("xyz"), None);
        assert_eq!(PasswordPolicy::parse("g00000c001000002000"), None);
    }

    #[test]
    fn kb_shortcut_text() {
        let kb = KbShortcut::new(kb_modifiers::ALT | kb_modifiers::CONTROL, 0x41);
        assert_eq!(kb.to_string(), "AC:0041");
        assert_eq!(KbShortcut::parse("AC:0041"), Some(kb));
        assert_eq!(KbShortcut::parse(""), Some(KbShortcut(0)));
        assert_eq!(KbShortcut::parse("Q:0041"), None);
        assert_eq!(KbShortcut::parse(":0041"), Some(KbShortcut(0)));
        assert_eq!(KbShortcut(0).to_string(), "");
    }
}
