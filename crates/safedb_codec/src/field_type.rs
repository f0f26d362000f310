//! Field identifiers and their wire classification.

use crate::version::FormatVersion;
use std::fmt;

/// Storage class of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 16-byte UUID.
    Uuid,
    /// Text, UTF-8 on the wire.
    Text,
    /// Timestamp (seconds since the Unix epoch).
    Time,
    /// Little-endian 32-bit integer.
    Int32,
    /// Little-endian 16-bit integer.
    Int16,
    /// Single byte.
    Byte,
    /// Opaque bytes.
    Binary,
}

impl FieldKind {
    /// Width of the in-memory representation for fixed-width kinds.
    ///
    /// Times are held as 64-bit values in memory regardless of the
    /// on-disk width.
    #[must_use]
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            Self::Uuid => Some(16),
            Self::Time => Some(8),
            Self::Int32 => Some(4),
            Self::Int16 => Some(2),
            Self::Byte => Some(1),
            Self::Text | Self::Binary => None,
        }
    }
}

/// Field identifier of a record.
///
/// The discriminant is the type byte used in every TLV stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum FieldType {
    /// Virtual "group.title" field, never stored.
    GroupTitle = 0x00,
    /// Identifier of a normal (or base) record.
    Uuid = 0x01,
    /// Dot-separated group path.
    Group = 0x02,
    /// Title.
    Title = 0x03,
    /// User name.
    User = 0x04,
    /// Notes.
    Notes = 0x05,
    /// Password.
    Password = 0x06,
    /// Creation time.
    CTime = 0x07,
    /// Password modification time.
    PmTime = 0x08,
    /// Last access time.
    ATime = 0x09,
    /// Password expiry time.
    XTime = 0x0a,
    /// Reserved, never interpreted.
    Reserved = 0x0b,
    /// Record modification time.
    RmTime = 0x0c,
    /// URL.
    Url = 0x0d,
    /// Autotype sequence.
    Autotype = 0x0e,
    /// Password history blob.
    PwHistory = 0x0f,
    /// Packed password policy.
    Policy = 0x10,
    /// Password expiry interval in days.
    XTimeInterval = 0x11,
    /// Run command.
    RunCommand = 0x12,
    /// Double-click action.
    Dca = 0x13,
    /// E-mail address.
    Email = 0x14,
    /// Protected-entry flag.
    Protected = 0x15,
    /// Entry-specific password symbols.
    Symbols = 0x16,
    /// Shift + double-click action.
    ShiftDca = 0x17,
    /// Named password policy.
    PolicyName = 0x18,
    /// Keyboard shortcut.
    KbShortcut = 0x19,
    /// Reference to an attachment record.
    AttRef = 0x1a,
    /// Two-factor (TOTP) shared key.
    TwoFactorKey = 0x1b,
    /// TOTP configuration byte.
    TotpConfig = 0x1c,
    /// TOTP code length.
    TotpLength = 0x1d,
    /// TOTP time step in seconds.
    TotpTimeStep = 0x1e,
    /// TOTP start time.
    TotpStartTime = 0x1f,
    /// Inline attachment title.
    DataAttTitle = 0x20,
    /// Inline attachment media type.
    DataAttMediaType = 0x21,
    /// Inline attachment file name.
    DataAttFileName = 0x22,
    /// Inline attachment modification time.
    DataAttMTime = 0x23,
    /// Inline attachment content.
    DataAttContent = 0x24,
    /// Passkey credential id.
    PasskeyCredId = 0x25,
    /// Passkey relying party id.
    PasskeyRpId = 0x26,
    /// Passkey user handle.
    PasskeyUserHandle = 0x27,
    /// Passkey COSE algorithm id.
    PasskeyAlgoId = 0x28,
    /// Passkey private key.
    PasskeyPrivateKey = 0x29,
    /// Passkey signature counter.
    PasskeySignCount = 0x2a,
    /// Base record of an alias or shortcut.
    BaseUuid = 0x41,
    /// Identifier of an alias record.
    AliasUuid = 0x42,
    /// Identifier of a shortcut record.
    ShortcutUuid = 0x43,
    /// End-of-record marker.
    End = 0xff,
}

impl FieldType {
    /// Every field type, in type-byte order.
    pub const ALL: [FieldType; 47] = [
        Self::GroupTitle,
        Self::Uuid,
        Self::Group,
        Self::Title,
        Self::User,
        Self::Notes,
        Self::Password,
        Self::CTime,
        Self::PmTime,
        Self::ATime,
        Self::XTime,
        Self::Reserved,
        Self::RmTime,
        Self::Url,
        Self::Autotype,
        Self::PwHistory,
        Self::Policy,
        Self::XTimeInterval,
        Self::RunCommand,
        Self::Dca,
        Self::Email,
        Self::Protected,
        Self::Symbols,
        Self::ShiftDca,
        Self::PolicyName,
        Self::KbShortcut,
        Self::AttRef,
        Self::TwoFactorKey,
        Self::TotpConfig,
        Self::TotpLength,
        Self::TotpTimeStep,
        Self::TotpStartTime,
        Self::DataAttTitle,
        Self::DataAttMediaType,
        Self::DataAttFileName,
        Self::DataAttMTime,
        Self::DataAttContent,
        Self::PasskeyCredId,
        Self::PasskeyRpId,
        Self::PasskeyUserHandle,
        Self::PasskeyAlgoId,
        Self::PasskeyPrivateKey,
        Self::PasskeySignCount,
        Self::BaseUuid,
        Self::AliasUuid,
        Self::ShortcutUuid,
        Self::End,
    ];

    /// Returns the type byte.
    #[inline]
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Looks up a field type by its type byte.
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|ft| ft.as_byte() == byte)
    }

    /// Returns the storage class of this field.
    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Uuid | Self::AttRef | Self::BaseUuid | Self::AliasUuid | Self::ShortcutUuid => {
                FieldKind::Uuid
            }
            Self::CTime
            | Self::PmTime
            | Self::ATime
            | Self::XTime
            | Self::RmTime
            | Self::TotpStartTime
            | Self::DataAttMTime => FieldKind::Time,
            Self::XTimeInterval | Self::KbShortcut | Self::PasskeyAlgoId | Self::PasskeySignCount => {
                FieldKind::Int32
            }
            Self::Dca | Self::ShiftDca => FieldKind::Int16,
            Self::Protected | Self::TotpConfig | Self::TotpLength | Self::TotpTimeStep => {
                FieldKind::Byte
            }
            Self::DataAttContent
            | Self::PasskeyCredId
            | Self::PasskeyUserHandle
            | Self::PasskeyPrivateKey
            | Self::Reserved
            | Self::End => FieldKind::Binary,
            Self::GroupTitle
            | Self::Group
            | Self::Title
            | Self::User
            | Self::Notes
            | Self::Password
            | Self::Url
            | Self::Autotype
            | Self::PwHistory
            | Self::Policy
            | Self::RunCommand
            | Self::Email
            | Self::Symbols
            | Self::PolicyName
            | Self::TwoFactorKey
            | Self::DataAttTitle
            | Self::DataAttMediaType
            | Self::DataAttFileName
            | Self::PasskeyRpId => FieldKind::Text,
        }
    }

    /// Returns true if this field holds text.
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self.kind(), FieldKind::Text)
    }

    /// Returns true if the given format version interprets this field.
    ///
    /// Fields outside this set are carried as unknown fields.
    #[must_use]
    pub const fn is_recognized_by(self, version: FormatVersion) -> bool {
        match self {
            Self::GroupTitle | Self::Reserved | Self::End => false,
            Self::AttRef
            | Self::DataAttTitle
            | Self::DataAttMediaType
            | Self::DataAttFileName
            | Self::DataAttMTime
            | Self::DataAttContent
            | Self::PasskeyCredId
            | Self::PasskeyRpId
            | Self::PasskeyUserHandle
            | Self::PasskeyAlgoId
            | Self::PasskeyPrivateKey
            | Self::PasskeySignCount
            | Self::BaseUuid
            | Self::AliasUuid
            | Self::ShortcutUuid => matches!(version, FormatVersion::V4),
            _ => true,
        }
    }

    /// English display name of the field.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GroupTitle => "Group/Title",
            Self::Uuid => "UUID",
            Self::Group => "Group",
            Self::Title => "Title",
            Self::User => "Username",
            Self::Notes => "Notes",
            Self::Password => "Password",
            Self::CTime => "Created Time",
            Self::PmTime => "Password Modified Time",
            Self::ATime => "Last Access Time",
            Self::XTime => "Password Expiry Date",
            Self::Reserved => "Reserved",
            Self::RmTime => "Record Modified Time",
            Self::Url => "URL",
            Self::Autotype => "AutoType",
            Self::PwHistory => "History",
            Self::Policy => "Password Policy",
            Self::XTimeInterval => "Password Expiry Interval",
            Self::RunCommand => "Run Command",
            Self::Dca => "DCA",
            Self::Email => "e-mail",
            Self::Protected => "Protected",
            Self::Symbols => "Symbols",
            Self::ShiftDca => "Shift+DCA",
            Self::PolicyName => "Password Policy Name",
            Self::KbShortcut => "Keyboard Shortcut",
            Self::AttRef => "Attachment Reference",
            Self::TwoFactorKey => "Two Factor Key",
            Self::TotpConfig => "TOTP Config",
            Self::TotpLength => "TOTP Length",
            Self::TotpTimeStep => "TOTP Time Step",
            Self::TotpStartTime => "TOTP Start Time",
            Self::DataAttTitle => "Attachment Title",
            Self::DataAttMediaType => "Attachment Media Type",
            Self::DataAttFileName => "Attachment File Name",
            Self::DataAttMTime => "Attachment Modified Time",
            Self::DataAttContent => "Attachment Content",
            Self::PasskeyCredId => "Passkey Credential ID",
            Self::PasskeyRpId => "Passkey Relying Party ID",
            Self::PasskeyUserHandle => "Passkey User Handle",
            Self::PasskeyAlgoId => "Passkey Algorithm ID",
            Self::PasskeyPrivateKey => "Passkey Private Key",
            Self::PasskeySignCount => "Passkey Sign Count",
            Self::BaseUuid => "Base UUID",
            Self::AliasUuid => "Alias UUID",
            Self::ShortcutUuid => "Shortcut UUID",
            Self::End => "End",
        }
    }

    /// XML element name: the English name lower-cased with spaces removed.
    #[must_use]
    pub fn xml_name(self) -> String {
        self.name()
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for FieldType {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_byte(byte).ok_or(byte)
    }
}
