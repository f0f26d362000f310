//! Password records.
//!
//! A [`Record`] owns an encrypted [`FieldStore`] plus an ordered list of
//! unknown fields carried verbatim from the stream it was read from.
//! Typed accessors treat a field that fails to decrypt as unset and log
//! the failure.

mod field_value;
mod store;
mod values;

pub use store::FieldStore;
pub use values::{
    kb_modifiers, policy_flags, DoubleClickAction, KbShortcut, PasswordPolicy, POLICY_TEXT_LEN,
};

use crate::error::{CoreError, CoreResult};
use crate::history::{self, HistorySettings};
use crate::timefmt::SECONDS_PER_DAY;
use safedb_codec::{fixed, text, FieldKind, FieldType, RawField};
use std::fmt;
use uuid::Uuid;
use zeroize::Zeroizing;

/// Role of a record with respect to aliases and shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntryType {
    /// Ordinary entry.
    #[default]
    Normal,
    /// Normal entry referenced by at least one alias.
    AliasBase,
    /// Normal entry referenced by shortcuts only.
    ShortcutBase,
    /// Entry borrowing its password from a base.
    Alias,
    /// Entry borrowing everything but group/title/user from a base.
    Shortcut,
}

impl EntryType {
    /// Returns true for Normal, AliasBase and ShortcutBase.
    #[must_use]
    pub const fn is_normal_family(self) -> bool {
        matches!(self, Self::Normal | Self::AliasBase | Self::ShortcutBase)
    }

    /// Returns true for Alias and Shortcut.
    #[must_use]
    pub const fn is_dependent(self) -> bool {
        matches!(self, Self::Alias | Self::Shortcut)
    }

    /// Returns true for AliasBase and ShortcutBase.
    #[must_use]
    pub const fn is_base(self) -> bool {
        matches!(self, Self::AliasBase | Self::ShortcutBase)
    }

    /// Field holding the identifying UUID of a record of this type.
    #[must_use]
    pub const fn uuid_field(self) -> FieldType {
        match self {
            Self::Alias => FieldType::AliasUuid,
            Self::Shortcut => FieldType::ShortcutUuid,
            _ => FieldType::Uuid,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::AliasBase => "alias base",
            Self::ShortcutBase => "shortcut base",
            Self::Alias => "alias",
            Self::Shortcut => "shortcut",
        };
        f.write_str(name)
    }
}

/// Change status of a record relative to the last load or save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntryStatus {
    /// Unchanged.
    #[default]
    Clean,
    /// Added since load.
    Added,
    /// Modified since load.
    Modified,
    /// Marked for deletion.
    Deleted,
}

/// Default TOTP code length.
pub const DEFAULT_TOTP_LENGTH: u8 = 6;
/// Default TOTP time step in seconds.
pub const DEFAULT_TOTP_TIME_STEP: u8 = 30;
/// Largest accepted password expiry interval, in days.
pub const MAX_XTIME_INTERVAL: i32 = 3650;

/// A single password entry.
#[derive(Clone)]
pub struct Record {
    fields: FieldStore,
    unknown: Vec<RawField>,
    entry_type: EntryType,
    status: EntryStatus,
}

macro_rules! text_accessors {
    ($($field:ident: $get:ident / $set:ident;)*) => {
        $(
            #[doc = concat!("Returns the `", stringify!($field), "` text field, empty if unset.")]
            #[must_use]
            pub fn $get(&self) -> String {
                self.text(FieldType::$field)
            }

            #[doc = concat!("Sets the `", stringify!($field), "` text field; empty text clears it.")]
            pub fn $set(&mut self, value: &str) -> CoreResult<()> {
                self.set_text(FieldType::$field, value)
            }
        )*
    };
}

macro_rules! time_accessors {
    ($($field:ident: $get:ident / $set:ident;)*) => {
        $(
            #[doc = concat!("Returns the `", stringify!($field), "` time, zero if unset.")]
            #[must_use]
            pub fn $get(&self) -> i64 {
                self.time(FieldType::$field)
            }

            #[doc = concat!("Sets the `", stringify!($field), "` time; zero clears it.")]
            pub fn $set(&mut self, t: i64) -> CoreResult<()> {
                self.set_time(FieldType::$field, t)
            }
        )*
    };
}

impl Record {
    /// Creates an empty Normal record with a fresh UUID.
    pub fn new() -> CoreResult<Self> {
        let mut record = Self::empty()?;
        record.set_uuid(Uuid::new_v4())?;
        Ok(record)
    }

    /// Creates a record with no fields at all, not even a UUID.
    pub fn empty() -> CoreResult<Self> {
        Ok(Self {
            fields: FieldStore::new()?,
            unknown: Vec::new(),
            entry_type: EntryType::Normal,
            status: EntryStatus::Clean,
        })
    }

    // ---- raw field access ----

    /// Returns the decrypted bytes of `field`.
    pub fn field_bytes(&self, field: FieldType) -> CoreResult<Option<Zeroizing<Vec<u8>>>> {
        self.fields.get(field)
    }

    /// Stores raw bytes for `field`, in the in-memory representation.
    ///
    /// Text must be UTF-16LE, times 8 bytes. An empty value clears.
    pub fn set_field_bytes(&mut self, field: FieldType, value: &[u8]) -> CoreResult<()> {
        self.fields.set(field, value)
    }

    /// Returns true if `field` holds a value.
    #[must_use]
    pub fn is_field_set(&self, field: FieldType) -> bool {
        self.fields.is_set(field)
    }

    /// Removes `field`.
    pub fn clear_field(&mut self, field: FieldType) {
        self.fields.clear(field);
    }

    /// The underlying field store.
    #[must_use]
    pub fn field_store(&self) -> &FieldStore {
        &self.fields
    }

    fn read(&self, field: FieldType) -> Option<Zeroizing<Vec<u8>>> {
        match self.fields.get(field) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(field = %field, error = %e, "failed to read field");
                None
            }
        }
    }

    fn expect_kind(field: FieldType, kind: FieldKind) -> CoreResult<()> {
        if field.kind() == kind {
            Ok(())
        } else {
            Err(CoreError::invalid_value(
                field,
                format!("not a {kind:?} field"),
            ))
        }
    }

    /// Returns the text value of `field`, empty if unset.
    #[must_use]
    pub fn text(&self, field: FieldType) -> String {
        match self.fields.get_text(field) {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                tracing::error!(field = %field, error = %e, "failed to read text field");
                String::new()
            }
        }
    }

    /// Sets a text field; empty text clears it.
    pub fn set_text(&mut self, field: FieldType, value: &str) -> CoreResult<()> {
        Self::expect_kind(field, FieldKind::Text)?;
        self.fields.set_text(field, value)
    }

    /// Returns a time field, zero if unset.
    #[must_use]
    pub fn time(&self, field: FieldType) -> i64 {
        self.read(field)
            .and_then(|b| fixed::decode_time(field.as_byte(), &b).ok())
            .unwrap_or(0)
    }

    /// Sets a time field; zero clears it.
    pub fn set_time(&mut self, field: FieldType, t: i64) -> CoreResult<()> {
        Self::expect_kind(field, FieldKind::Time)?;
        if t == 0 {
            self.fields.clear(field);
            return Ok(());
        }
        self.fields.set(field, &t.to_le_bytes())
    }

    fn int32(&self, field: FieldType) -> Option<i32> {
        self.read(field)
            .and_then(|b| fixed::decode_i32(field.as_byte(), &b).ok())
    }

    fn int16(&self, field: FieldType) -> Option<i16> {
        self.read(field)
            .and_then(|b| fixed::decode_i16(field.as_byte(), &b).ok())
    }

    /// Returns a single-byte field.
    #[must_use]
    pub fn byte(&self, field: FieldType) -> Option<u8> {
        self.read(field)
            .and_then(|b| fixed::decode_u8(field.as_byte(), &b).ok())
    }

    /// Sets a single-byte field.
    pub fn set_byte(&mut self, field: FieldType, value: u8) -> CoreResult<()> {
        Self::expect_kind(field, FieldKind::Byte)?;
        self.fields.set(field, &[value])
    }

    /// Returns a binary field.
    #[must_use]
    pub fn binary(&self, field: FieldType) -> Option<Zeroizing<Vec<u8>>> {
        self.read(field)
    }

    /// Sets a binary field; empty bytes clear it.
    pub fn set_binary(&mut self, field: FieldType, value: &[u8]) -> CoreResult<()> {
        Self::expect_kind(field, FieldKind::Binary)?;
        self.fields.set(field, value)
    }

    /// Returns a UUID field.
    #[must_use]
    pub fn uuid_field(&self, field: FieldType) -> Option<Uuid> {
        self.read(field)
            .and_then(|b| fixed::decode_uuid_bytes(field.as_byte(), &b).ok())
            .map(Uuid::from_bytes)
    }

    /// Sets or clears a UUID field.
    pub fn set_uuid_field(&mut self, field: FieldType, uuid: Option<Uuid>) -> CoreResult<()> {
        Self::expect_kind(field, FieldKind::Uuid)?;
        match uuid {
            Some(u) => self.fields.set(field, u.as_bytes()),
            None => {
                self.fields.clear(field);
                Ok(())
            }
        }
    }

    // ---- identity ----

    /// Identifying UUID, nil if none is set.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.uuid_field(self.entry_type.uuid_field())
            .unwrap_or_else(Uuid::nil)
    }

    /// Sets the identifying UUID in the field matching the entry type.
    pub fn set_uuid(&mut self, uuid: Uuid) -> CoreResult<()> {
        self.set_uuid_field(self.entry_type.uuid_field(), Some(uuid))
    }

    /// Assigns a fresh random identifying UUID.
    pub fn create_uuid(&mut self) -> CoreResult<Uuid> {
        let uuid = Uuid::new_v4();
        self.set_uuid(uuid)?;
        Ok(uuid)
    }

    /// Base record of an alias or shortcut.
    #[must_use]
    pub fn base_uuid(&self) -> Option<Uuid> {
        self.uuid_field(FieldType::BaseUuid)
    }

    /// Sets or clears the base UUID.
    pub fn set_base_uuid(&mut self, uuid: Option<Uuid>) -> CoreResult<()> {
        self.set_uuid_field(FieldType::BaseUuid, uuid)
    }

    /// Referenced attachment record.
    #[must_use]
    pub fn att_ref(&self) -> Option<Uuid> {
        self.uuid_field(FieldType::AttRef)
    }

    /// Sets or clears the attachment reference.
    pub fn set_att_ref(&mut self, uuid: Option<Uuid>) -> CoreResult<()> {
        self.set_uuid_field(FieldType::AttRef, uuid)
    }

    /// Entry type.
    #[must_use]
    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub(crate) fn set_entry_type_raw(&mut self, entry_type: EntryType) {
        self.entry_type = entry_type;
    }

    /// Entry status.
    #[must_use]
    pub fn status(&self) -> EntryStatus {
        self.status
    }

    /// Sets the entry status.
    pub fn set_status(&mut self, status: EntryStatus) {
        self.status = status;
    }

    // ---- text fields ----

    text_accessors! {
        Group: group / set_group;
        Title: title / set_title;
        User: user / set_user;
        Password: password / set_password;
        Notes: notes / set_notes;
        Url: url / set_url;
        Autotype: autotype / set_autotype;
        Email: email / set_email;
        RunCommand: run_command / set_run_command;
        Symbols: symbols / set_symbols;
        PolicyName: policy_name / set_policy_name;
        TwoFactorKey: two_factor_key / set_two_factor_key;
        DataAttTitle: attachment_title / set_attachment_title;
        DataAttMediaType: attachment_media_type / set_attachment_media_type;
        DataAttFileName: attachment_file_name / set_attachment_file_name;
        PasskeyRpId: passkey_rp_id / set_passkey_rp_id;
    }

    /// Password history blob.
    #[must_use]
    pub fn pw_history(&self) -> String {
        self.text(FieldType::PwHistory)
    }

    /// Sets the password history blob. `"0"` and `"00000"` clear it.
    pub fn set_pw_history(&mut self, blob: &str) -> CoreResult<()> {
        let blob = if history::is_empty_blob(blob) { "" } else { blob };
        self.set_text(FieldType::PwHistory, blob)
    }

    /// Sets the title, replacing each `delimiter` with the group separator `.`.
    pub fn set_title_with_delimiter(&mut self, title: &str, delimiter: char) -> CoreResult<()> {
        let replaced: String = title
            .chars()
            .map(|c| if c == delimiter { '.' } else { c })
            .collect();
        self.set_title(&replaced)
    }

    /// Sets multi-line notes from single-line text, expanding each
    /// `delimiter` to CRLF.
    pub fn set_notes_with_delimiter(&mut self, notes: &str, delimiter: char) -> CoreResult<()> {
        let mut expanded = String::with_capacity(notes.len());
        for c in notes.chars() {
            if c == delimiter {
                expanded.push_str("\r\n");
            } else {
                expanded.push(c);
            }
        }
        self.set_notes(&expanded)
    }

    /// Notes flattened to one line: CR dropped, LF replaced by `delimiter`.
    #[must_use]
    pub fn notes_with_delimiter(&self, delimiter: char) -> String {
        self.notes()
            .chars()
            .filter(|&c| c != '\r')
            .map(|c| if c == '\n' { delimiter } else { c })
            .collect()
    }

    /// Length of the password in UTF-16 units.
    #[must_use]
    pub fn password_length(&self) -> usize {
        text::utf16_len(&self.password())
    }

    // ---- times ----

    time_accessors! {
        CTime: ctime / set_ctime;
        PmTime: pmtime / set_pmtime;
        ATime: atime / set_atime;
        XTime: xtime / set_xtime;
        RmTime: rmtime / set_rmtime;
        TotpStartTime: totp_start_time / set_totp_start_time;
        DataAttMTime: attachment_mtime / set_attachment_mtime;
    }

    /// Returns true if the password has an expiry time in the past.
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        let xtime = self.xtime();
        xtime != 0 && xtime < now
    }

    /// Returns true if the password expires within `days` days but has not
    /// yet expired.
    #[must_use]
    pub fn will_expire(&self, now: i64, days: i64) -> bool {
        let xtime = self.xtime();
        if xtime == 0 || xtime <= now {
            return false;
        }
        xtime < now + days * SECONDS_PER_DAY
    }

    /// Sets times for a record duplicated from `src`.
    ///
    /// Creation time becomes `now`; the other times are copied from `src`,
    /// with unset ones taking the source creation time.
    pub fn set_duplicate_times(&mut self, src: &Record, now: i64) -> CoreResult<()> {
        self.set_ctime(now)?;
        let original_ctime = src.ctime();
        let or_ctime = |t: i64| if t == 0 { original_ctime } else { t };
        if src.entry_type() != EntryType::Shortcut {
            self.set_pmtime(or_ctime(src.pmtime()))?;
        }
        self.set_atime(or_ctime(src.atime()))?;
        self.set_rmtime(or_ctime(src.rmtime()))
    }

    // ---- numeric fields ----

    /// Password expiry interval in days, zero if unset.
    #[must_use]
    pub fn xtime_interval(&self) -> i32 {
        self.int32(FieldType::XTimeInterval).unwrap_or(0)
    }

    /// Sets the expiry interval. Zero clears it.
    ///
    /// # Errors
    ///
    /// Values outside `0..=3650` are rejected.
    pub fn set_xtime_interval(&mut self, days: i32) -> CoreResult<()> {
        if !(0..=MAX_XTIME_INTERVAL).contains(&days) {
            return Err(CoreError::invalid_value(
                FieldType::XTimeInterval,
                format!("{days} is outside 0..={MAX_XTIME_INTERVAL}"),
            ));
        }
        if days == 0 {
            self.fields.clear(FieldType::XTimeInterval);
            return Ok(());
        }
        self.fields
            .set(FieldType::XTimeInterval, &fixed::encode_i32(days))
    }

    /// Entry-specific double-click action.
    #[must_use]
    pub fn dca(&self) -> Option<DoubleClickAction> {
        self.int16(FieldType::Dca)
            .and_then(DoubleClickAction::from_i16)
    }

    /// Entry-specific shift + double-click action.
    #[must_use]
    pub fn shift_dca(&self) -> Option<DoubleClickAction> {
        self.int16(FieldType::ShiftDca)
            .and_then(DoubleClickAction::from_i16)
    }

    /// Sets or clears the double-click action.
    pub fn set_dca(&mut self, dca: Option<DoubleClickAction>) -> CoreResult<()> {
        self.set_dca_raw(FieldType::Dca, dca.map_or(DoubleClickAction::UNSET, DoubleClickAction::as_i16))
    }

    /// Sets or clears the shift + double-click action.
    pub fn set_shift_dca(&mut self, dca: Option<DoubleClickAction>) -> CoreResult<()> {
        self.set_dca_raw(
            FieldType::ShiftDca,
            dca.map_or(DoubleClickAction::UNSET, DoubleClickAction::as_i16),
        )
    }

    /// Stores a raw action value; out-of-range values clear the field.
    pub(crate) fn set_dca_raw(&mut self, field: FieldType, value: i16) -> CoreResult<()> {
        if DoubleClickAction::from_i16(value).is_some() {
            self.fields.set(field, &fixed::encode_i16(value))
        } else {
            self.fields.clear(field);
            Ok(())
        }
    }

    /// Protected-entry flag.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        self.byte(FieldType::Protected).is_some_and(|b| b != 0)
    }

    /// Sets the protected flag. Clearing removes the field.
    pub fn set_protected(&mut self, protected: bool) -> CoreResult<()> {
        if protected {
            self.fields.set(FieldType::Protected, &[1])
        } else {
            self.fields.clear(FieldType::Protected);
            Ok(())
        }
    }

    /// Keyboard shortcut.
    #[must_use]
    pub fn kb_shortcut(&self) -> KbShortcut {
        KbShortcut(self.int32(FieldType::KbShortcut).unwrap_or(0))
    }

    /// Sets the keyboard shortcut; the empty shortcut clears it.
    pub fn set_kb_shortcut(&mut self, shortcut: KbShortcut) -> CoreResult<()> {
        if shortcut.is_empty() {
            self.fields.clear(FieldType::KbShortcut);
            return Ok(());
        }
        self.fields
            .set(FieldType::KbShortcut, &fixed::encode_i32(shortcut.0))
    }

    /// Password policy, if one is set and well-formed.
    #[must_use]
    pub fn policy(&self) -> Option<PasswordPolicy> {
        PasswordPolicy::parse(&self.text(FieldType::Policy))
    }

    /// Sets the password policy; `None` or an empty policy clears it.
    pub fn set_policy(&mut self, policy: Option<PasswordPolicy>) -> CoreResult<()> {
        match policy {
            Some(p) if !p.is_empty() => self.set_text(FieldType::Policy, &p.to_string()),
            _ => {
                self.fields.clear(FieldType::Policy);
                Ok(())
            }
        }
    }

    // ---- TOTP ----

    /// Returns true if a two-factor key is present.
    #[must_use]
    pub fn is_totp_active(&self) -> bool {
        self.fields.is_set(FieldType::TwoFactorKey)
    }

    /// TOTP configuration byte, zero by default.
    #[must_use]
    pub fn totp_config(&self) -> u8 {
        self.byte(FieldType::TotpConfig).unwrap_or(0)
    }

    /// TOTP code length.
    #[must_use]
    pub fn totp_length(&self) -> u8 {
        self.byte(FieldType::TotpLength)
            .unwrap_or(DEFAULT_TOTP_LENGTH)
    }

    /// TOTP time step in seconds.
    #[must_use]
    pub fn totp_time_step(&self) -> u8 {
        self.byte(FieldType::TotpTimeStep)
            .unwrap_or(DEFAULT_TOTP_TIME_STEP)
    }

    // ---- attachment ----

    /// Inline attachment content.
    #[must_use]
    pub fn attachment_content(&self) -> Option<Zeroizing<Vec<u8>>> {
        self.binary(FieldType::DataAttContent)
    }

    /// Sets the inline attachment content.
    pub fn set_attachment_content(&mut self, content: &[u8]) -> CoreResult<()> {
        self.set_binary(FieldType::DataAttContent, content)
    }

    /// Size of the inline attachment in bytes.
    #[must_use]
    pub fn attachment_content_len(&self) -> usize {
        self.fields.value_len(FieldType::DataAttContent)
    }

    /// Returns true if inline attachment content is present.
    #[must_use]
    pub fn has_attachment(&self) -> bool {
        self.fields.is_set(FieldType::DataAttContent)
    }

    /// Removes every inline attachment field.
    pub fn clear_attachment(&mut self) {
        for field in ATTACHMENT_FIELDS {
            self.fields.clear(field);
        }
    }

    // ---- passkey ----

    /// Passkey algorithm id, zero if unset.
    #[must_use]
    pub fn passkey_algorithm_id(&self) -> i32 {
        self.int32(FieldType::PasskeyAlgoId).unwrap_or(0)
    }

    /// Sets the passkey algorithm id.
    pub fn set_passkey_algorithm_id(&mut self, id: i32) -> CoreResult<()> {
        self.fields
            .set(FieldType::PasskeyAlgoId, &fixed::encode_i32(id))
    }

    /// Passkey signature counter, zero if unset.
    #[must_use]
    pub fn passkey_sign_count(&self) -> u32 {
        self.read(FieldType::PasskeySignCount)
            .and_then(|b| fixed::decode_u32(FieldType::PasskeySignCount.as_byte(), &b).ok())
            .unwrap_or(0)
    }

    /// Sets the passkey signature counter.
    pub fn set_passkey_sign_count(&mut self, count: u32) -> CoreResult<()> {
        self.fields
            .set(FieldType::PasskeySignCount, &fixed::encode_u32(count))
    }

    /// Returns true if a passkey credential id is present.
    #[must_use]
    pub fn has_passkey(&self) -> bool {
        self.fields.is_set(FieldType::PasskeyCredId)
    }

    /// Returns true if some, but not all, passkey fields are set.
    #[must_use]
    pub fn has_incomplete_passkey(&self) -> bool {
        let set = PASSKEY_FIELDS
            .iter()
            .filter(|&&f| self.fields.is_set(f))
            .count();
        set != 0 && set != PASSKEY_FIELDS.len()
    }

    /// Removes every passkey field.
    pub fn clear_passkey(&mut self) {
        for field in PASSKEY_FIELDS {
            self.fields.clear(field);
        }
    }

    // ---- unknown fields ----

    /// Fields not interpreted by the format the record was read with.
    #[must_use]
    pub fn unknown_fields(&self) -> &[RawField] {
        &self.unknown
    }

    /// Appends an unknown field, preserving insertion order.
    pub fn add_unknown_field(&mut self, field: RawField) {
        self.unknown.push(field);
    }

    /// Removes all unknown fields.
    pub fn clear_unknown_fields(&mut self) {
        self.unknown.clear();
    }

    /// Total plaintext bytes held by the record, unknown fields included.
    #[must_use]
    pub fn entry_size(&self) -> usize {
        let known: usize = self.fields.fields().map(|f| self.fields.value_len(f)).sum();
        let unknown: usize = self.unknown.iter().map(RawField::len).sum();
        known + unknown
    }

    // ---- password changes ----

    /// Replaces the password, recording the old one in the history and
    /// updating the modification and expiry times.
    pub fn update_password(
        &mut self,
        password: &str,
        settings: &HistorySettings,
        now: i64,
    ) -> CoreResult<()> {
        history::record_change(self, settings)?;
        self.set_password(password)?;
        self.set_pmtime(now)?;
        let interval = self.xtime_interval();
        if interval != 0 {
            self.set_xtime(now + i64::from(interval) * SECONDS_PER_DAY)
        } else {
            self.set_xtime(0)
        }
    }
}

/// Inline attachment fields.
pub const ATTACHMENT_FIELDS: [FieldType; 5] = [
    FieldType::DataAttTitle,
    FieldType::DataAttMediaType,
    FieldType::DataAttFileName,
    FieldType::DataAttMTime,
    FieldType::DataAttContent,
];

/// Passkey fields.
pub const PASSKEY_FIELDS: [FieldType; 6] = [
    FieldType::PasskeyCredId,
    FieldType::PasskeyRpId,
    FieldType::PasskeyUserHandle,
    FieldType::PasskeyAlgoId,
    FieldType::PasskeyPrivateKey,
    FieldType::PasskeySignCount,
];

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.entry_type == other.entry_type
            && self.status == other.status
            && self.unknown == other.unknown
            && self.fields == other.fields
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("uuid", &self.uuid())
            .field("entry_type", &self.entry_type)
            .field("status", &self.status)
            .field("fields", &self.fields)
            .field("unknown", &self.unknown.len())
            .finish()
    }
}
