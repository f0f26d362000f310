//! Plaintext record blob used for drag-and-drop and clipboard transfer.
//!
//! Same TLV framing as the file formats, but independent of them: UTF-8
//! text, 8-byte times, and a dependent's password replaced by its
//! placeholder. Every field type is understood on the way back in.

use crate::codec;
use crate::error::{CoreError, CoreResult};
use crate::record::{Record, DEFAULT_TOTP_LENGTH, DEFAULT_TOTP_TIME_STEP};
use crate::resolver;
use safedb_codec::{fixed, FieldType, FieldWriter, FormatVersion, TlvReader, TlvWriter};

const TIME_WIDTH: usize = 8;

struct BlobWriter {
    inner: TlvWriter<Vec<u8>>,
}

impl BlobWriter {
    fn text(&mut self, field: FieldType, value: &str) -> CoreResult<()> {
        if !value.is_empty() {
            self.inner.write_field(field.as_byte(), value.as_bytes())?;
        }
        Ok(())
    }

    fn time(&mut self, field: FieldType, t: i64) -> CoreResult<()> {
        if t != 0 {
            let bytes = fixed::encode_time(t, TIME_WIDTH)?;
            self.inner.write_field(field.as_byte(), &bytes)?;
        }
        Ok(())
    }

    fn raw(&mut self, field: FieldType, bytes: &[u8]) -> CoreResult<()> {
        self.inner.write_field(field.as_byte(), bytes)?;
        Ok(())
    }
}

/// Serializes `record` for transfer.
///
/// `base` is the record's base when it is an alias or shortcut; the
/// password is then written as the `[[group:title:user]]` or
/// `[~group:title:user~]` placeholder.
///
/// # Errors
///
/// Fails if a field cannot be read or encoded.
pub fn serialize_to_bytes(record: &Record, base: Option<&Record>) -> CoreResult<Vec<u8>> {
    let mut w = BlobWriter {
        inner: TlvWriter::new(Vec::new()),
    };

    let id_field = record.entry_type().uuid_field();
    if record.is_field_set(id_field) {
        w.raw(id_field, record.uuid().as_bytes())?;
    }
    w.text(FieldType::Group, &record.group())?;
    w.text(FieldType::Title, &record.title())?;
    w.text(FieldType::User, &record.user())?;
    if record.is_dependent() {
        if let Some(base_uuid) = record.base_uuid() {
            w.raw(FieldType::BaseUuid, base_uuid.as_bytes())?;
        }
    }
    w.text(FieldType::Password, &resolver::display_password(record, base))?;

    if record.is_totp_active() {
        w.text(FieldType::TwoFactorKey, &record.two_factor_key())?;
        if record.totp_config() != 0 {
            w.raw(FieldType::TotpConfig, &[record.totp_config()])?;
        }
        w.time(FieldType::TotpStartTime, record.totp_start_time())?;
        if record.totp_time_step() != DEFAULT_TOTP_TIME_STEP {
            w.raw(FieldType::TotpTimeStep, &[record.totp_time_step()])?;
        }
        if record.totp_length() != DEFAULT_TOTP_LENGTH {
            w.raw(FieldType::TotpLength, &[record.totp_length()])?;
        }
    }

    w.text(FieldType::Notes, &record.notes())?;
    w.text(FieldType::Url, &record.url())?;
    w.text(FieldType::Autotype, &record.autotype())?;

    w.time(FieldType::CTime, record.ctime())?;
    w.time(FieldType::PmTime, record.pmtime())?;
    w.time(FieldType::ATime, record.atime())?;
    w.time(FieldType::XTime, record.xtime())?;
    w.time(FieldType::RmTime, record.rmtime())?;

    let interval = record.xtime_interval();
    if interval != 0 {
        w.raw(FieldType::XTimeInterval, &fixed::encode_i32(interval))?;
    }
    w.text(FieldType::Policy, &record.text(FieldType::Policy))?;
    w.text(FieldType::PwHistory, &record.pw_history())?;
    w.text(FieldType::RunCommand, &record.run_command())?;
    if let Some(dca) = record.dca() {
        w.raw(FieldType::Dca, &fixed::encode_i16(dca.as_i16()))?;
    }
    if let Some(dca) = record.shift_dca() {
        w.raw(FieldType::ShiftDca, &fixed::encode_i16(dca.as_i16()))?;
    }
    w.text(FieldType::Email, &record.email())?;
    if record.is_protected() {
        w.raw(FieldType::Protected, &[1])?;
    }
    w.text(FieldType::Symbols, &record.symbols())?;
    w.text(FieldType::PolicyName, &record.policy_name())?;
    let shortcut = record.kb_shortcut();
    if !shortcut.is_empty() {
        w.raw(FieldType::KbShortcut, &fixed::encode_i32(shortcut.0))?;
    }

    for field in record.unknown_fields() {
        if !field.is_empty() {
            w.inner.write_field(field.type_byte, &field.data)?;
        }
    }
    w.inner.write_end()?;
    Ok(w.inner.into_inner())
}

/// Rebuilds a record from [`serialize_to_bytes`] output.
///
/// # Errors
///
/// Fails on an empty or truncated blob, or one without an identifying
/// UUID.
pub fn deserialize_from_bytes(bytes: &[u8]) -> CoreResult<Record> {
    codec::read_record(TlvReader::new(bytes), FormatVersion::V4)?
        .ok_or_else(|| CoreError::invalid_format("empty record blob"))
}
