//! Alias and shortcut resolution.
//!
//! An alias shares its base's password, history and TOTP parameters. A
//! shortcut shares everything except its own group, title and user. The
//! caller supplies the base record; nothing here looks records up.

use crate::error::{CoreError, CoreResult};
use crate::record::{EntryType, Record};
use safedb_codec::FieldType;
use uuid::Uuid;

/// Fields an alias takes from its base.
pub const ALIAS_BASE_FIELDS: [FieldType; 7] = [
    FieldType::Password,
    FieldType::PwHistory,
    FieldType::TwoFactorKey,
    FieldType::TotpConfig,
    FieldType::TotpStartTime,
    FieldType::TotpTimeStep,
    FieldType::TotpLength,
];

/// Length of the V3 in-password dependency marker.
pub const V3_MARKER_LEN: usize = 36;

impl Record {
    /// Changes the entry type.
    ///
    /// Moving between the normal family and alias or shortcut moves the
    /// identifying UUID to the matching field, so only one UUID field is
    /// ever set.
    pub fn set_entry_type(&mut self, entry_type: EntryType) -> CoreResult<()> {
        let from = self.entry_type().uuid_field();
        let to = entry_type.uuid_field();
        if from != to {
            if let Some(uuid) = self.uuid_field(from) {
                self.set_uuid_field(to, Some(uuid))?;
            }
            self.clear_field(from);
        }
        self.set_entry_type_raw(entry_type);
        Ok(())
    }

    /// Returns true if this record is an alias or shortcut.
    #[must_use]
    pub fn is_dependent(&self) -> bool {
        self.entry_type().is_dependent()
    }

    /// Returns true if this record is an alias or shortcut base.
    #[must_use]
    pub fn is_base(&self) -> bool {
        self.entry_type().is_base()
    }
}

/// Returns true if a record of `entry_type` reads `field` from its base.
#[must_use]
pub fn takes_from_base(entry_type: EntryType, field: FieldType) -> bool {
    match entry_type {
        EntryType::Alias => ALIAS_BASE_FIELDS.contains(&field),
        EntryType::Shortcut => !matches!(
            field,
            FieldType::Group
                | FieldType::Title
                | FieldType::User
                | FieldType::Uuid
                | FieldType::AliasUuid
                | FieldType::ShortcutUuid
                | FieldType::BaseUuid
        ),
        _ => false,
    }
}

/// Record that supplies the effective value of `field` for `record`.
///
/// Falls back to `record` itself when no base is given.
#[must_use]
pub fn effective_source<'a>(
    record: &'a Record,
    field: FieldType,
    base: Option<&'a Record>,
) -> &'a Record {
    match base {
        Some(base) if takes_from_base(record.entry_type(), field) => base,
        _ => record,
    }
}

/// Effective text of `field`, following the base where applicable.
#[must_use]
pub fn effective_text(record: &Record, field: FieldType, base: Option<&Record>) -> String {
    effective_source(record, field, base).text(field)
}

/// Entry type a normal-family record takes given its dependent counts.
///
/// Any alias makes it an alias base, even if shortcuts also exist.
#[must_use]
pub const fn base_type_for(aliases: usize, shortcuts: usize) -> EntryType {
    if aliases > 0 {
        EntryType::AliasBase
    } else if shortcuts > 0 {
        EntryType::ShortcutBase
    } else {
        EntryType::Normal
    }
}

/// Placeholder shown instead of a dependent's password.
///
/// Built from the base's group, title and user.
#[must_use]
pub fn placeholder(entry_type: EntryType, base: &Record) -> Option<String> {
    let inner = format!("{}:{}:{}", base.group(), base.title(), base.user());
    match entry_type {
        EntryType::Alias => Some(format!("[[{inner}]]")),
        EntryType::Shortcut => Some(format!("[~{inner}~]")),
        _ => None,
    }
}

/// Password as rendered in human-readable output.
///
/// Dependents with a known base render the placeholder, never a secret.
#[must_use]
pub fn display_password(record: &Record, base: Option<&Record>) -> String {
    match base.and_then(|b| placeholder(record.entry_type(), b)) {
        Some(text) => text,
        None if record.is_dependent() => String::new(),
        None => record.password(),
    }
}

/// Encodes a V3 in-password dependency marker.
#[must_use]
pub fn encode_v3_marker(entry_type: EntryType, base: Uuid) -> Option<String> {
    let hex = base.simple().to_string();
    match entry_type {
        EntryType::Alias => Some(format!("[[{hex}]]")),
        EntryType::Shortcut => Some(format!("[~{hex}~]")),
        _ => None,
    }
}

/// Decodes a V3 in-password dependency marker.
#[must_use]
pub fn decode_v3_marker(password: &str) -> Option<(EntryType, Uuid)> {
    if password.len() != V3_MARKER_LEN || !password.is_ascii() {
        return None;
    }
    let entry_type = match (&password[..2], &password[34..]) {
        ("[[", "]]") => EntryType::Alias,
        ("[~", "~]") => EntryType::Shortcut,
        _ => return None,
    };
    let hex = &password[2..34];
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Uuid::try_parse(hex).ok().map(|uuid| (entry_type, uuid))
}

/// Checks that `dependent` may link to `base`.
///
/// # Errors
///
/// Self references and bases outside the normal family are rejected.
pub fn check_link(dependent: Uuid, base: &Record) -> CoreResult<()> {
    if dependent == base.uuid() {
        return Err(CoreError::invalid_dependency(format!(
            "entry {dependent} cannot be its own base"
        )));
    }
    if !base.entry_type().is_normal_family() {
        return Err(CoreError::invalid_dependency(format!(
            "base {} is itself a {}",
            base.uuid(),
            base.entry_type()
        )));
    }
    Ok(())
}
