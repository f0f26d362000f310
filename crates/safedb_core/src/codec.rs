//! Record serialization for the V3 and V4 formats.
//!
//! A record is a run of TLV fields closed by an END field. Reading decodes
//! the fields the active format recognizes into the record's field store
//! and keeps everything else, byte for byte, as unknown fields. Writing
//! emits recognized fields in a fixed order followed by the unknown fields
//! in the order they were read.
//!
//! V3 has no dependency fields: an alias or shortcut is written with a
//! 36-character marker in place of its password (`[[hex]]` or `[~hex~]`,
//! where `hex` is the base UUID). The marker is computed while writing and
//! parsed back while reading; the record itself is never modified.

use crate::error::{CoreError, CoreResult};
use crate::record::{EntryType, Record, MAX_XTIME_INTERVAL};
use crate::resolver;
use safedb_codec::{
    fixed, text, CodecError, FieldKind, FieldReader, FieldType, FieldWriter, FormatVersion,
    MAX_FIELDS_PER_RECORD,
};
use tracing::{debug, warn};

/// Text fields written by both formats, in write order.
const TEXT_FIELDS: [FieldType; 14] = [
    FieldType::Group,
    FieldType::Title,
    FieldType::User,
    FieldType::Password,
    FieldType::TwoFactorKey,
    FieldType::Notes,
    FieldType::Url,
    FieldType::Autotype,
    FieldType::Policy,
    FieldType::PwHistory,
    FieldType::RunCommand,
    FieldType::Email,
    FieldType::Symbols,
    FieldType::PolicyName,
];

/// Text fields only V4 writes.
const V4_TEXT_FIELDS: [FieldType; 4] = [
    FieldType::DataAttTitle,
    FieldType::DataAttMediaType,
    FieldType::DataAttFileName,
    FieldType::PasskeyRpId,
];

const TIME_FIELDS: [FieldType; 6] = [
    FieldType::ATime,
    FieldType::CTime,
    FieldType::XTime,
    FieldType::PmTime,
    FieldType::RmTime,
    FieldType::TotpStartTime,
];

const TOTP_BYTE_FIELDS: [FieldType; 3] = [
    FieldType::TotpConfig,
    FieldType::TotpTimeStep,
    FieldType::TotpLength,
];

/// Reads one record.
///
/// Returns `Ok(None)` when the stream ends cleanly before the first field
/// of a record.
///
/// # Errors
///
/// Fails without returning a partial record if the stream ends inside a
/// record, a record holds more than [`MAX_FIELDS_PER_RECORD`] fields, a
/// recognized field has a bad width or encoding, or the record carries no
/// identifying UUID.
pub fn read_record<R: FieldReader>(
    mut reader: R,
    version: FormatVersion,
) -> CoreResult<Option<Record>> {
    let mut record = Record::empty()?;
    let mut count = 0usize;

    loop {
        let Some(field) = reader.read_field()? else {
            if count == 0 {
                return Ok(None);
            }
            return Err(CodecError::MissingEnd.into());
        };
        if field.is_end() {
            break;
        }
        count += 1;
        if count > MAX_FIELDS_PER_RECORD {
            return Err(CodecError::TooManyFields {
                limit: MAX_FIELDS_PER_RECORD,
            }
            .into());
        }
        match FieldType::from_byte(field.type_byte) {
            Some(ft) if ft.is_recognized_by(version) => decode_field(&mut record, ft, &field.data)?,
            _ => record.add_unknown_field(field),
        }
    }

    if version == FormatVersion::V3 {
        apply_v3_marker(&mut record)?;
    }
    infer_entry_type(&mut record)?;
    debug!(uuid = %record.uuid(), entry_type = %record.entry_type(), fields = count, "read record");
    Ok(Some(record))
}

/// Reads records until the stream ends.
///
/// # Errors
///
/// Stops at the first record that fails to read.
pub fn read_records<R: FieldReader>(mut reader: R, version: FormatVersion) -> CoreResult<Vec<Record>> {
    let mut records = Vec::new();
    while let Some(record) = read_record(&mut reader, version)? {
        records.push(record);
    }
    Ok(records)
}

fn decode_field(record: &mut Record, field: FieldType, data: &[u8]) -> CoreResult<()> {
    match field.kind() {
        FieldKind::Uuid => {
            let bytes = fixed::decode_uuid_bytes(field.as_byte(), data)?;
            record.set_field_bytes(field, &bytes)
        }
        FieldKind::Text => {
            let wide = text::utf8_to_utf16le(data)?;
            if field == FieldType::PwHistory {
                let blob = text::from_utf16le(&wide)?;
                return record.set_pw_history(&blob);
            }
            record.set_field_bytes(field, &wide)
        }
        FieldKind::Time => {
            let t = fixed::decode_time(field.as_byte(), data)?;
            record.set_time(field, t)
        }
        FieldKind::Int32 => {
            let value = fixed::decode_i32(field.as_byte(), data)?;
            match field {
                FieldType::XTimeInterval if !(0..=MAX_XTIME_INTERVAL).contains(&value) => {
                    warn!(days = value, "ignoring out-of-range expiry interval");
                    Ok(())
                }
                FieldType::XTimeInterval => record.set_xtime_interval(value),
                FieldType::KbShortcut if value == 0 => Ok(()),
                _ => record.set_field_bytes(field, data),
            }
        }
        FieldKind::Int16 => {
            let value = fixed::decode_i16(field.as_byte(), data)?;
            record.set_dca_raw(field, value)
        }
        FieldKind::Byte => {
            let value = fixed::decode_u8(field.as_byte(), data)?;
            if field == FieldType::Protected {
                record.set_protected(value != 0)
            } else {
                record.set_byte(field, value)
            }
        }
        FieldKind::Binary => record.set_binary(field, data),
    }
}

fn apply_v3_marker(record: &mut Record) -> CoreResult<()> {
    let Some((entry_type, base)) = resolver::decode_v3_marker(&record.password()) else {
        return Ok(());
    };
    record.set_base_uuid(Some(base))?;
    record.set_entry_type(entry_type)?;
    record.set_password("")
}

fn infer_entry_type(record: &mut Record) -> CoreResult<()> {
    let entry_type = if record.is_field_set(FieldType::Uuid) {
        EntryType::Normal
    } else if record.is_field_set(FieldType::AliasUuid) {
        EntryType::Alias
    } else if record.is_field_set(FieldType::ShortcutUuid) {
        EntryType::Shortcut
    } else {
        return Err(CoreError::invalid_format("record has no UUID"));
    };
    record.set_entry_type_raw(entry_type);
    Ok(())
}

/// Writes one record followed by END.
///
/// # Errors
///
/// Fails on the first field the writer rejects; the stream should be
/// considered unusable afterwards.
pub fn write_record<W: FieldWriter>(
    record: &Record,
    mut writer: W,
    version: FormatVersion,
) -> CoreResult<()> {
    let v4 = version == FormatVersion::V4;
    let entry_type = record.entry_type();
    let base = record.base_uuid().filter(|_| entry_type.is_dependent());

    let id_field = if v4 {
        entry_type.uuid_field()
    } else {
        FieldType::Uuid
    };
    writer.write_field(id_field.as_byte(), record.uuid().as_bytes())?;
    if v4 {
        if let Some(base) = base {
            writer.write_field(FieldType::BaseUuid.as_byte(), base.as_bytes())?;
        }
        if let Some(att) = record.att_ref() {
            writer.write_field(FieldType::AttRef.as_byte(), att.as_bytes())?;
        }
    }

    let v3_marker = match base {
        Some(base) if !v4 => resolver::encode_v3_marker(entry_type, base),
        _ => None,
    };
    let v4_text: &[FieldType] = if v4 { &V4_TEXT_FIELDS } else { &[] };
    for &field in TEXT_FIELDS.iter().chain(v4_text) {
        let value = match (&v3_marker, field) {
            (Some(marker), FieldType::Password) => marker.clone(),
            _ => record.text(field),
        };
        if !value.is_empty() {
            writer.write_field(field.as_byte(), value.as_bytes())?;
        }
    }

    let v4_times: &[FieldType] = if v4 { &[FieldType::DataAttMTime] } else { &[] };
    for &field in TIME_FIELDS.iter().chain(v4_times) {
        let t = record.time(field);
        if t != 0 {
            let bytes = fixed::encode_time(t, version.time_width())?;
            writer.write_field(field.as_byte(), &bytes)?;
        }
    }

    let interval = record.xtime_interval();
    if (1..=MAX_XTIME_INTERVAL).contains(&interval) {
        writer.write_field(FieldType::XTimeInterval.as_byte(), &fixed::encode_i32(interval))?;
    }
    let shortcut = record.kb_shortcut();
    if !shortcut.is_empty() {
        writer.write_field(FieldType::KbShortcut.as_byte(), &fixed::encode_i32(shortcut.0))?;
    }
    if let Some(dca) = record.dca() {
        writer.write_field(FieldType::Dca.as_byte(), &fixed::encode_i16(dca.as_i16()))?;
    }
    if let Some(dca) = record.shift_dca() {
        writer.write_field(FieldType::ShiftDca.as_byte(), &fixed::encode_i16(dca.as_i16()))?;
    }
    if record.is_protected() {
        writer.write_field(FieldType::Protected.as_byte(), &[1])?;
    }
    for field in TOTP_BYTE_FIELDS {
        if let Some(byte) = record.byte(field) {
            writer.write_field(field.as_byte(), &[byte])?;
        }
    }

    if v4 {
        write_v4_binaries(record, &mut writer)?;
    }

    for field in record.unknown_fields() {
        writer.write_field(field.type_byte, &field.data)?;
    }
    writer.write_end()?;
    debug!(uuid = %record.uuid(), %version, "wrote record");
    Ok(())
}

fn write_v4_binaries<W: FieldWriter>(record: &Record, writer: &mut W) -> CoreResult<()> {
    for field in [
        FieldType::DataAttContent,
        FieldType::PasskeyCredId,
        FieldType::PasskeyUserHandle,
    ] {
        if let Some(bytes) = record.binary(field) {
            writer.write_field(field.as_byte(), &bytes)?;
        }
    }
    if record.is_field_set(FieldType::PasskeyAlgoId) {
        let id = fixed::encode_i32(record.passkey_algorithm_id());
        writer.write_field(FieldType::PasskeyAlgoId.as_byte(), &id)?;
    }
    if let Some(key) = record.binary(FieldType::PasskeyPrivateKey) {
        writer.write_field(FieldType::PasskeyPrivateKey.as_byte(), &key)?;
    }
    if record.is_field_set(FieldType::PasskeySignCount) {
        let count = fixed::encode_u32(record.passkey_sign_count());
        writer.write_field(FieldType::PasskeySignCount.as_byte(), &count)?;
    }
    Ok(())
}

/// Writes every record in order.
///
/// # Errors
///
/// Stops at the first record that fails to write.
pub fn write_records<'a, W, I>(records: I, mut writer: W, version: FormatVersion) -> CoreResult<()>
where
    W: FieldWriter,
    I: IntoIterator<Item = &'a Record>,
{
    for record in records {
        write_record(record, &mut writer, version)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DoubleClickAction, KbShortcut};
    use safedb_codec::{RawField, TlvReader, TlvWriter};
    use uuid::Uuid;

    fn write(record: &Record, version: FormatVersion) -> Vec<u8> {
        let mut writer = TlvWriter::new(Vec::new());
        write_record(record, &mut writer, version).unwrap();
        writer.into_inner()
    }

    fn read(bytes: &[u8], version: FormatVersion) -> CoreResult<Option<Record>> {
        read_record(TlvReader::new(bytes), version)
    }

    fn sample() -> Record {
        let mut r = Record::new().unwrap();
        r.set_group("Banking").unwrap();
        r.set_title("Checking").unwrap();
        r.set_user("alice").unwrap();
        r.set_password("s3cr\u{e9}t").unwrap();
        r.set_notes("line one\r\nline two").unwrap();
        r.set_ctime(1_600_000_000).unwrap();
        r.set_pmtime(1_600_000_100).unwrap();
        r.set_xtime_interval(90).unwrap();
        r.set_dca(Some(DoubleClickAction::Browse)).unwrap();
        r.set_kb_shortcut(KbShortcut::new(3, 0x41)).unwrap();
        r.set_protected(true).unwrap();
        r
    }

    #[test]
    fn time_outside_format_range_fails_write() {
        let mut r = sample();
        r.set_ctime(-86_400).unwrap();
        let mut writer = TlvWriter::new(Vec::new());
        let err = write_record(&r, &mut writer, FormatVersion::V3).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Codec(safedb_codec::CodecError::TimeOutOfRange { value: -86_400, width: 4 })
        ));

        let mut r = sample();
        r.set_xtime(i64::from(u32::MAX) + 1).unwrap();
        let mut writer = TlvWriter::new(Vec::new());
        assert!(write_record(&r, &mut writer, FormatVersion::V3).is_err());
        let back = read(&write(&r, FormatVersion::V4), FormatVersion::V4).unwrap().unwrap();
        assert_eq!(back.xtime(), i64::from(u32::MAX) + 1);

        r.set_xtime(1i64 << 40).unwrap();
        let mut writer = TlvWriter::new(Vec::new());
        assert!(write_record(&r, &mut writer, FormatVersion::V4).is_err());
    }

    #[test]
    fn roundtrip_both_versions() {
        let r = sample();
        for version in [FormatVersion::V3, FormatVersion::V4] {
            let bytes = write(&r, version);
            let back = read(&bytes, version).unwrap().unwrap();
            assert_eq!(back, r, "{version}");
        }
    }

    #[test]
    fn identifying_uuid_written_first() {
        let r = sample();
        let bytes = write(&r, FormatVersion::V4);
        assert_eq!(bytes[0], FieldType::Uuid.as_byte());
        assert_eq!(&bytes[1..5], &16u32.to_le_bytes());
        assert_eq!(&bytes[5..21], r.uuid().as_bytes());
        assert_eq!(&bytes[bytes.len() - 5..], &[0xff, 0, 0, 0, 0]);
    }

    #[test]
    fn time_widths_follow_version() {
        let mut r = Record::new().unwrap();
        r.set_ctime(0x1234_5678).unwrap();
        for (version, width) in [(FormatVersion::V3, 4u32), (FormatVersion::V4, 5)] {
            let bytes = write(&r, version);
            let pos = 21;
            assert_eq!(bytes[pos], FieldType::CTime.as_byte());
            assert_eq!(&bytes[pos + 1..pos + 5], &width.to_le_bytes());
        }
    }

    #[test]
    fn unknown_fields_survive_in_order() {
        let mut r = sample();
        r.add_unknown_field(RawField::new(0x99, vec![1, 2, 3]));
        r.add_unknown_field(RawField::new(0x60, Vec::new()));
        r.add_unknown_field(RawField::new(0x98, vec![9]));
        for version in [FormatVersion::V3, FormatVersion::V4] {
            let back = read(&write(&r, version), version).unwrap().unwrap();
            let unknown: Vec<(u8, Vec<u8>)> = back
                .unknown_fields()
                .iter()
                .map(|f| (f.type_byte, f.data.to_vec()))
                .collect();
            assert_eq!(
                unknown,
                vec![(0x99, vec![1, 2, 3]), (0x60, vec![]), (0x98, vec![9])]
            );
        }
    }

    #[test]
    fn v4_only_fields_are_unknown_to_v3() {
        let mut writer = TlvWriter::new(Vec::new());
        writer.write_field(0x01, Uuid::new_v4().as_bytes()).unwrap();
        writer.write_field(0x20, b"Receipt").unwrap();
        writer.write_end().unwrap();
        let bytes = writer.into_inner();

        let v3 = read(&bytes, FormatVersion::V3).unwrap().unwrap();
        assert_eq!(v3.unknown_fields().len(), 1);
        assert_eq!(v3.attachment_title(), "");

        let v4 = read(&bytes, FormatVersion::V4).unwrap().unwrap();
        assert!(v4.unknown_fields().is_empty());
        assert_eq!(v4.attachment_title(), "Receipt");
    }

    #[test]
    fn v3_dependency_marker() {
        let base = Uuid::new_v4();
        let mut alias = Record::new().unwrap();
        let id = alias.uuid();
        alias.set_entry_type(EntryType::Alias).unwrap();
        alias.set_base_uuid(Some(base)).unwrap();
        alias.set_title("alias").unwrap();

        let bytes = write(&alias, FormatVersion::V3);
        assert_eq!(bytes[0], FieldType::Uuid.as_byte());
        let marker = format!("[[{}]]", base.simple());
        let needle = marker.as_bytes();
        assert!(bytes.windows(needle.len()).any(|w| w == needle));
        assert_eq!(alias.password(), "");

        let back = read(&bytes, FormatVersion::V3).unwrap().unwrap();
        assert_eq!(back.entry_type(), EntryType::Alias);
        assert_eq!(back.uuid(), id);
        assert_eq!(back.base_uuid(), Some(base));
        assert_eq!(back.password(), "");
        assert_eq!(back, alias);
    }

    #[test]
    fn v4_dependency_fields() {
        let base = Uuid::new_v4();
        let mut sc = Record::new().unwrap();
        sc.set_entry_type(EntryType::Shortcut).unwrap();
        sc.set_base_uuid(Some(base)).unwrap();
        let bytes = write(&sc, FormatVersion::V4);
        assert_eq!(bytes[0], FieldType::ShortcutUuid.as_byte());
        assert_eq!(bytes[21], FieldType::BaseUuid.as_byte());
        let back = read(&bytes, FormatVersion::V4).unwrap().unwrap();
        assert_eq!(back, sc);
    }

    #[test]
    fn v4_password_is_not_parsed_as_marker() {
        let mut r = Record::new().unwrap();
        let marker = format!("[[{}]]", Uuid::new_v4().simple());
        r.set_password(&marker).unwrap();
        let back = read(&write(&r, FormatVersion::V4), FormatVersion::V4)
            .unwrap()
            .unwrap();
        assert_eq!(back.entry_type(), EntryType::Normal);
        assert_eq!(back.password(), marker);
    }

    #[test]
    fn clean_eof_is_none() {
        assert!(read(&[], FormatVersion::V4).unwrap().is_none());
    }

    #[test]
    fn missing_end_is_error() {
        let mut writer = TlvWriter::new(Vec::new());
        writer.write_field(0x01, Uuid::new_v4().as_bytes()).unwrap();
        let bytes = writer.into_inner();
        assert!(matches!(
            read(&bytes, FormatVersion::V4),
            Err(CoreError::Codec(CodecError::MissingEnd))
        ));
    }

    #[test]
    fn too_many_fields_is_error() {
        let mut writer = TlvWriter::new(Vec::new());
        writer.write_field(0x01, Uuid::new_v4().as_bytes()).unwrap();
        for _ in 0..MAX_FIELDS_PER_RECORD {
            writer.write_field(0x90, &[0]).unwrap();
        }
        writer.write_end().unwrap();
        let bytes = writer.into_inner();
        assert!(matches!(
            read(&bytes, FormatVersion::V4),
            Err(CoreError::Codec(CodecError::TooManyFields { .. }))
        ));
    }

    #[test]
    fn record_without_uuid_is_error() {
        let mut writer = TlvWriter::new(Vec::new());
        writer.write_field(0x03, b"title").unwrap();
        writer.write_end().unwrap();
        assert!(matches!(
            read(&writer.into_inner(), FormatVersion::V4),
            Err(CoreError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn bad_width_is_error() {
        let mut writer = TlvWriter::new(Vec::new());
        writer.write_field(0x01, &[1, 2, 3]).unwrap();
        writer.write_end().unwrap();
        assert!(read(&writer.into_inner(), FormatVersion::V4).is_err());
    }

    #[test]
    fn multiple_records() {
        let records = vec![sample(), sample(), Record::new().unwrap()];
        let mut writer = TlvWriter::new(Vec::new());
        write_records(&records, &mut writer, FormatVersion::V4).unwrap();
        let bytes = writer.into_inner();
        let back = read_records(TlvReader::new(&bytes[..]), FormatVersion::V4).unwrap();
        assert_eq!(back, records);
    }
}
