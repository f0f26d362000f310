//! Human-readable exports: delimited text lines and XML entries.
//!
//! Dependents never export their base's password; they show the
//! placeholder built by [`resolver::placeholder`]. Both exports take the
//! set of fields to include as a [`FieldSet`].

use crate::collection::RecordStore;
use crate::error::{CoreError, CoreResult};
use crate::history::PasswordHistory;
use crate::record::{policy_flags, Record, DEFAULT_TOTP_LENGTH, DEFAULT_TOTP_TIME_STEP, MAX_XTIME_INTERVAL};
use crate::resolver;
use crate::timefmt;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use safedb_codec::FieldType;
use std::io::Write;

/// A set of field types, indexed by type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldSet(u128);

impl FieldSet {
    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every field that can be exported.
    #[must_use]
    pub fn all() -> Self {
        FieldType::ALL
            .into_iter()
            .filter(|f| !matches!(f, FieldType::GroupTitle | FieldType::Reserved | FieldType::End))
            .collect()
    }

    const fn bit(field: FieldType) -> u128 {
        let byte = field.as_byte() as u32;
        if byte < u128::BITS {
            1 << byte
        } else {
            0
        }
    }

    /// Returns the set with `field` added.
    #[must_use]
    pub const fn with(self, field: FieldType) -> Self {
        Self(self.0 | Self::bit(field))
    }

    /// Adds `field`.
    pub fn insert(&mut self, field: FieldType) {
        self.0 |= Self::bit(field);
    }

    /// Removes `field`.
    pub fn remove(&mut self, field: FieldType) {
        self.0 &= !Self::bit(field);
    }

    /// Returns true if `field` is in the set.
    #[must_use]
    pub const fn contains(self, field: FieldType) -> bool {
        self.0 & Self::bit(field) != 0
    }

    /// Returns true if every exportable field is in the set.
    #[must_use]
    pub fn is_all(self) -> bool {
        let all = Self::all();
        self.0 & all.0 == all.0
    }

    /// Number of fields in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<FieldType> for FieldSet {
    fn from_iter<I: IntoIterator<Item = FieldType>>(iter: I) -> Self {
        let mut set = Self::empty();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

/// Options shared by the text and XML exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Fields to export.
    pub fields: FieldSet,
    /// Column separator of the text export.
    pub separator: char,
    /// Replaces `.` in titles and line breaks in notes. Without one, a
    /// dotted title is quoted and notes keep their line breaks.
    pub delimiter: Option<char>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            fields: FieldSet::all(),
            separator: '\t',
            delimiter: Some('\u{bb}'),
        }
    }
}

impl ExportOptions {
    /// Options exporting `fields` with the default separator and delimiter.
    #[must_use]
    pub fn new(fields: FieldSet) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Sets the column separator.
    #[must_use]
    pub const fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Sets the title and notes delimiter.
    #[must_use]
    pub const fn delimiter(mut self, delimiter: Option<char>) -> Self {
        self.delimiter = delimiter;
        self
    }
}

// Columns after the group/title column, in output order. Policy and
// policy name share handling and sit between RMTIME and the history.
const LEADING_COLUMNS: [FieldType; 15] = [
    FieldType::User,
    FieldType::Password,
    FieldType::TwoFactorKey,
    FieldType::TotpConfig,
    FieldType::TotpStartTime,
    FieldType::TotpTimeStep,
    FieldType::TotpLength,
    FieldType::Url,
    FieldType::Autotype,
    FieldType::CTime,
    FieldType::PmTime,
    FieldType::ATime,
    FieldType::XTime,
    FieldType::XTimeInterval,
    FieldType::RmTime,
];

const TRAILING_COLUMNS: [FieldType; 9] = [
    FieldType::PwHistory,
    FieldType::RunCommand,
    FieldType::Dca,
    FieldType::ShiftDca,
    FieldType::Email,
    FieldType::Protected,
    FieldType::Symbols,
    FieldType::KbShortcut,
    FieldType::Notes,
];

fn group_title(record: &Record, delimiter: Option<char>) -> String {
    let title = record.title();
    let title = if title.contains('.') {
        match delimiter {
            Some(d) => title.replace('.', &d.to_string()),
            None => format!("\"{title}\""),
        }
    } else {
        title
    };
    let group = record.group();
    if group.is_empty() {
        title
    } else {
        format!("{group}.{title}")
    }
}

fn notes(record: &Record, delimiter: Option<char>) -> String {
    match delimiter {
        Some(d) => record.notes_with_delimiter(d),
        None => record.notes(),
    }
}

fn history_export(record: &Record) -> String {
    PasswordHistory::parse(&record.pw_history())
        .unwrap_or_default()
        .export_string()
}

/// TOTP column value; empty unless TOTP is active and the value differs
/// from its default.
fn totp_column(record: &Record, field: FieldType) -> String {
    if !record.is_totp_active() {
        return String::new();
    }
    match field {
        FieldType::TwoFactorKey => record.two_factor_key(),
        FieldType::TotpConfig if record.totp_config() != 0 => record.totp_config().to_string(),
        FieldType::TotpStartTime => timefmt::format_export(record.totp_start_time()),
        FieldType::TotpTimeStep if record.totp_time_step() != DEFAULT_TOTP_TIME_STEP => {
            record.totp_time_step().to_string()
        }
        FieldType::TotpLength if record.totp_length() != DEFAULT_TOTP_LENGTH => {
            record.totp_length().to_string()
        }
        _ => String::new(),
    }
}

fn column(record: &Record, base: Option<&Record>, field: FieldType, delimiter: Option<char>) -> String {
    match field {
        FieldType::Password => resolver::display_password(record, base),
        FieldType::TwoFactorKey
        | FieldType::TotpConfig
        | FieldType::TotpStartTime
        | FieldType::TotpTimeStep
        | FieldType::TotpLength => totp_column(record, field),
        FieldType::PwHistory => history_export(record),
        FieldType::Protected => if record.is_protected() { "Y" } else { "N" }.to_owned(),
        FieldType::Notes => format!("\"{}\"", notes(record, delimiter)),
        _ => record.field_value(field),
    }
}

/// One delimited text line for `record`.
///
/// With every field selected the columns are fixed and both the policy
/// and the policy name are written. Otherwise only selected columns are
/// written and a policy name replaces the policy, keeping its empty
/// column. Notes are always last and quoted.
#[must_use]
pub fn text_line(record: &Record, base: Option<&Record>, options: &ExportOptions) -> String {
    let fields = options.fields;
    let full = fields.is_all();
    let mut columns: Vec<String> = Vec::with_capacity(32);

    let has_group = fields.contains(FieldType::Group);
    let has_title = fields.contains(FieldType::Title);
    match (has_group || full, has_title || full) {
        (true, true) => columns.push(group_title(record, options.delimiter)),
        (true, false) => columns.push(record.group()),
        (false, true) => columns.push(record.title()),
        (false, false) => {}
    }

    for field in LEADING_COLUMNS {
        if full || fields.contains(field) {
            columns.push(column(record, base, field, options.delimiter));
        }
    }

    let policy = record.text(FieldType::Policy);
    let policy_name = record.policy_name();
    if full {
        columns.push(policy);
        columns.push(policy_name);
    } else {
        let named = !policy_name.is_empty();
        if fields.contains(FieldType::Policy) {
            columns.push(if named { String::new() } else { policy });
        }
        if fields.contains(FieldType::PolicyName) {
            columns.push(policy_name);
        }
    }

    for field in TRAILING_COLUMNS {
        if full || fields.contains(field) {
            columns.push(column(record, base, field, options.delimiter));
        }
    }

    columns.join(&options.separator.to_string())
}

/// Column header matching [`text_line`] for the same options.
#[must_use]
pub fn text_header(options: &ExportOptions) -> String {
    let fields = options.fields;
    let full = fields.is_all();
    let mut names: Vec<&str> = Vec::with_capacity(32);
    match (full || fields.contains(FieldType::Group), full || fields.contains(FieldType::Title)) {
        (true, true) => names.push(FieldType::GroupTitle.name()),
        (true, false) => names.push(FieldType::Group.name()),
        (false, true) => names.push(FieldType::Title.name()),
        (false, false) => {}
    }
    let middle = [FieldType::Policy, FieldType::PolicyName];
    for field in LEADING_COLUMNS.iter().chain(&middle).chain(&TRAILING_COLUMNS) {
        if full || fields.contains(*field) {
            names.push(field.name());
        }
    }
    names.join(&options.separator.to_string())
}

/// Header plus one line per record, each terminated by a newline.
#[must_use]
pub fn export_text(store: &RecordStore, options: &ExportOptions) -> String {
    let mut out = text_header(options);
    out.push('\n');
    for record in store {
        out.push_str(&text_line(record, store.base_of(record), options));
        out.push('\n');
    }
    out
}

fn xml_error(e: impl std::fmt::Display) -> CoreError {
    CoreError::xml(e.to_string())
}

struct XmlOut<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> XmlOut<W> {
    fn new(inner: W) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b'\t', 1),
        }
    }

    fn event(&mut self, event: Event<'_>) -> CoreResult<()> {
        self.writer.write_event(event).map_err(xml_error)
    }

    fn start(&mut self, start: BytesStart<'_>) -> CoreResult<()> {
        self.event(Event::Start(start))
    }

    fn end(&mut self, name: &str) -> CoreResult<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    /// Element holding arbitrary text, as CDATA where possible.
    fn field(&mut self, name: &str, value: &str) -> CoreResult<()> {
        self.start(BytesStart::new(name))?;
        if value.contains("]]>") {
            self.event(Event::Text(BytesText::new(value)))?;
        } else {
            self.event(Event::CData(BytesCData::new(value)))?;
        }
        self.end(name)
    }

    /// Element holding a number or date.
    fn value(&mut self, name: &str, value: impl ToString) -> CoreResult<()> {
        self.start(BytesStart::new(name))?;
        self.event(Event::Text(BytesText::new(&value.to_string())))?;
        self.end(name)
    }

    fn optional_field(&mut self, selected: bool, name: &str, value: &str) -> CoreResult<()> {
        if selected && !value.is_empty() {
            self.field(name, value)?;
        }
        Ok(())
    }

    fn time(&mut self, selected: bool, name: &str, t: i64) -> CoreResult<()> {
        if selected && t != 0 {
            self.value(name, timefmt::format_xml(t))?;
        }
        Ok(())
    }

    fn entry(
        &mut self,
        id: usize,
        record: &Record,
        base: Option<&Record>,
        options: &ExportOptions,
    ) -> CoreResult<()> {
        let fields = options.fields;
        let has = |f: FieldType| fields.contains(f);

        let id = id.to_string();
        self.start(BytesStart::new("entry").with_attributes([("id", id.as_str())]))?;

        self.optional_field(has(FieldType::Group), "group", &record.group())?;
        self.field("title", &record.title())?;
        self.optional_field(has(FieldType::User), "username", &record.user())?;
        self.field("password", &resolver::display_password(record, base))?;

        if record.is_totp_active() {
            let key = FieldType::TwoFactorKey;
            self.optional_field(has(key), &key.xml_name(), &record.two_factor_key())?;
            if record.totp_config() != 0 && has(FieldType::TotpConfig) {
                self.value(&FieldType::TotpConfig.xml_name(), record.totp_config())?;
            }
            self.time(
                has(FieldType::TotpStartTime),
                &FieldType::TotpStartTime.xml_name(),
                record.totp_start_time(),
            )?;
            if record.totp_time_step() != DEFAULT_TOTP_TIME_STEP && has(FieldType::TotpTimeStep) {
                self.value(&FieldType::TotpTimeStep.xml_name(), record.totp_time_step())?;
            }
            if record.totp_length() != DEFAULT_TOTP_LENGTH && has(FieldType::TotpLength) {
                self.value(&FieldType::TotpLength.xml_name(), record.totp_length())?;
            }
        }

        self.optional_field(has(FieldType::Url), "url", &record.url())?;
        self.optional_field(has(FieldType::Autotype), "autotype", &record.autotype())?;
        self.optional_field(has(FieldType::Notes), "notes", &notes(record, options.delimiter))?;

        self.field("uuid", &record.uuid().simple().to_string())?;

        self.time(has(FieldType::CTime), "ctimex", record.ctime())?;
        self.time(has(FieldType::ATime), "atimex", record.atime())?;
        self.time(has(FieldType::XTime), "xtimex", record.xtime())?;
        let interval = record.xtime_interval();
        if has(FieldType::XTimeInterval) && (1..=MAX_XTIME_INTERVAL).contains(&interval) {
            self.value("xtime_interval", interval)?;
        }
        self.time(has(FieldType::PmTime), "pmtimex", record.pmtime())?;
        self.time(has(FieldType::RmTime), "rmtimex", record.rmtime())?;

        self.policy(record, fields)?;
        if has(FieldType::PwHistory) {
            self.history(record)?;
        }

        self.optional_field(has(FieldType::RunCommand), "runcommand", &record.run_command())?;
        if let Some(dca) = record.dca().filter(|_| has(FieldType::Dca)) {
            self.value("dca", dca.as_i16())?;
        }
        if let Some(dca) = record.shift_dca().filter(|_| has(FieldType::ShiftDca)) {
            self.value("shiftdca", dca.as_i16())?;
        }
        self.optional_field(has(FieldType::Email), "email", &record.email())?;
        if has(FieldType::Protected) && record.is_protected() {
            self.value("protected", 1)?;
        }
        self.optional_field(has(FieldType::Symbols), "symbols", &record.symbols())?;
        let shortcut = record.kb_shortcut().to_string();
        self.optional_field(has(FieldType::KbShortcut), "kbshortcut", &shortcut)?;

        self.end("entry")
    }

    fn policy(&mut self, record: &Record, fields: FieldSet) -> CoreResult<()> {
        let name = record.policy_name();
        if !name.is_empty() {
            if fields.contains(FieldType::Policy) || fields.contains(FieldType::PolicyName) {
                self.field("PasswordPolicyName", &name)?;
            }
            return Ok(());
        }
        let Some(policy) = record.policy().filter(|p| !p.is_empty()) else {
            return Ok(());
        };
        if !fields.contains(FieldType::Policy) {
            return Ok(());
        }

        self.start(BytesStart::new("PasswordPolicy"))?;
        self.value("PWLength", policy.length)?;
        let flags = [
            (policy_flags::USE_LOWERCASE, "PWUseLowercase"),
            (policy_flags::USE_UPPERCASE, "PWUseUppercase"),
            (policy_flags::USE_DIGITS, "PWUseDigits"),
            (policy_flags::USE_SYMBOLS, "PWUseSymbols"),
            (policy_flags::USE_HEX_DIGITS, "PWUseHexDigits"),
            (policy_flags::USE_EASY_VISION, "PWUseEasyVision"),
            (policy_flags::MAKE_PRONOUNCEABLE, "PWMakePronounceable"),
        ];
        for (flag, name) in flags {
            if policy.has(flag) {
                self.value(name, 1)?;
            }
        }
        let minimums = [
            (policy.lower_min, "PWLowercaseMinLength"),
            (policy.upper_min, "PWUppercaseMinLength"),
            (policy.digit_min, "PWDigitMinLength"),
            (policy.symbol_min, "PWSymbolMinLength"),
        ];
        for (min, name) in minimums {
            if min > 0 {
                self.value(name, min)?;
            }
        }
        self.end("PasswordPolicy")
    }

    fn history(&mut self, record: &Record) -> CoreResult<()> {
        let history = PasswordHistory::parse(&record.pw_history()).unwrap_or_default();
        if !history.enabled && history.max == 0 && history.entries.is_empty() {
            return Ok(());
        }
        self.start(BytesStart::new("pwhistory"))?;
        self.value("status", u8::from(history.enabled))?;
        self.value("max", history.max)?;
        self.value("num", history.entries.len())?;
        if !history.entries.is_empty() {
            self.start(BytesStart::new("history_entries"))?;
            for (i, entry) in history.entries.iter().enumerate() {
                let num = (i + 1).to_string();
                self.start(
                    BytesStart::new("history_entry").with_attributes([("num", num.as_str())]),
                )?;
                let changed = match timefmt::format_xml(entry.changed) {
                    s if s.is_empty() => "1970-01-01T00:00:00".to_owned(),
                    s => s,
                };
                self.value("changedx", changed)?;
                self.field("oldpassword", &entry.password)?;
                self.end("history_entry")?;
            }
            self.end("history_entries")?;
        }
        self.end("pwhistory")
    }

    fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

/// XML fragment holding a single `<entry>` element.
///
/// # Errors
///
/// Fails only if the XML writer fails.
pub fn xml_entry(
    id: usize,
    record: &Record,
    base: Option<&Record>,
    options: &ExportOptions,
) -> CoreResult<String> {
    let mut out = XmlOut::new(Vec::new());
    out.entry(id, record, base, options)?;
    String::from_utf8(out.into_inner()).map_err(|e| CoreError::xml(e.to_string()))
}

/// XML document with one `<entry>` per record under a `<passwordsafe>`
/// root. Entries are numbered from 1.
///
/// # Errors
///
/// Fails only if the XML writer fails.
pub fn export_xml(store: &RecordStore, options: &ExportOptions) -> CoreResult<String> {
    let mut out = XmlOut::new(Vec::new());
    out.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    out.start(BytesStart::new("passwordsafe"))?;
    for (i, record) in store.iter().enumerate() {
        out.entry(i + 1, record, store.base_of(record), options)?;
    }
    out.end("passwordsafe")?;
    String::from_utf8(out.into_inner()).map_err(|e| CoreError::xml(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{EntryType, PasswordPolicy};

    fn sample() -> Record {
        let mut r = Record::new().unwrap();
        r.set_group("Web.Mail").unwrap();
        r.set_title("example.com").unwrap();
        r.set_user("alice").unwrap();
        r.set_password("hunter2").unwrap();
        r.set_notes("line one\r\nline two").unwrap();
        r
    }

    fn subset(fields: &[FieldType]) -> ExportOptions {
        ExportOptions::new(fields.iter().copied().collect()).separator(',')
    }

    #[test]
    fn field_set_membership() {
        let set = FieldSet::empty().with(FieldType::Title).with(FieldType::End);
        assert!(set.contains(FieldType::Title));
        assert!(!set.contains(FieldType::End));
        assert_eq!(set.len(), 1);
        assert!(FieldSet::all().is_all());
        let mut most = FieldSet::all();
        most.remove(FieldType::Email);
        assert!(!most.is_all());
    }

    #[test]
    fn group_title_uses_delimiter_or_quotes() {
        let r = sample();
        let opts = subset(&[FieldType::Group, FieldType::Title]);
        assert_eq!(text_line(&r, None, &opts), "Web.Mail.example\u{bb}com");
        let quoted = opts.delimiter(None);
        assert_eq!(text_line(&r, None, &quoted), "Web.Mail.\"example.com\"");
    }

    #[test]
    fn subset_line_drops_trailing_separator() {
        let r = sample();
        let opts = subset(&[FieldType::Title, FieldType::User, FieldType::Password]);
        assert_eq!(text_line(&r, None, &opts), "example.com,alice,hunter2");
        assert_eq!(text_header(&opts), "Title,Username,Password");
    }

    #[test]
    fn notes_are_quoted_and_flattened() {
        let r = sample();
        let opts = subset(&[FieldType::Title, FieldType::Notes]).delimiter(Some('|'));
        assert_eq!(text_line(&r, None, &opts), "example.com,\"line one|line two\"");
    }

    #[test]
    fn policy_name_replaces_policy() {
        let mut r = sample();
        r.set_policy(Some(PasswordPolicy {
            flags: policy_flags::USE_DIGITS,
            length: 12,
            ..PasswordPolicy::default()
        }))
        .unwrap();
        let opts = subset(&[FieldType::User, FieldType::Policy, FieldType::PolicyName]);
        assert_eq!(text_line(&r, None, &opts), "alice,200000c000000000000,");
        r.set_policy_name("Strict").unwrap();
        assert_eq!(text_line(&r, None, &opts), "alice,,Strict");
    }

    #[test]
    fn history_column() {
        let mut r = sample();
        r.set_pw_history("103016553f1000003abc").unwrap();
        let opts = subset(&[FieldType::PwHistory]);
        assert_eq!(text_line(&r, None, &opts), "10301 2023/11/14 22:13:20 0003 abc");
    }

    #[test]
    fn full_line_has_every_column() {
        let r = sample();
        let opts = ExportOptions::default().separator(',').delimiter(Some('|'));
        let line = text_line(&r, None, &opts);
        let header = text_header(&opts);
        assert_eq!(line.split(',').count(), header.split(',').count());
        assert!(line.starts_with("Web.Mail.example|com,alice,hunter2,"));
        assert!(line.ends_with(",N,,,\"line one|line two\""));
    }

    #[test]
    fn dependent_shows_placeholder() {
        let base = sample();
        let mut alias = Record::new().unwrap();
        alias.set_title("alias").unwrap();
        alias.set_entry_type(EntryType::Alias).unwrap();
        alias.set_base_uuid(Some(base.uuid())).unwrap();
        let opts = subset(&[FieldType::Title, FieldType::Password]);
        assert_eq!(
            text_line(&alias, Some(&base), &opts),
            "alias,[[Web.Mail:example.com:alice]]"
        );
        let xml = xml_entry(1, &alias, Some(&base), &ExportOptions::default()).unwrap();
        assert!(xml.contains("<![CDATA[[[Web.Mail:example.com:alice]]]]>"));
        assert!(!xml.contains("hunter2"));
    }

    #[test]
    fn xml_entry_elements() {
        let mut r = sample();
        r.set_ctime(1_700_000_000).unwrap();
        r.set_protected(true).unwrap();
        let xml = xml_entry(7, &r, None, &ExportOptions::default()).unwrap();
        assert!(xml.starts_with("<entry id=\"7\">"));
        assert!(xml.contains("<title><![CDATA[example.com]]></title>"));
        assert!(xml.contains("<username><![CDATA[alice]]></username>"));
        assert!(xml.contains(&format!("<uuid><![CDATA[{}]]></uuid>", r.uuid().simple())));
        assert!(xml.contains("<ctimex>2023-11-14T22:13:20</ctimex>"));
        assert!(xml.contains("<protected>1</protected>"));
        assert!(!xml.contains("<atimex>"));
        assert!(xml.trim_end().ends_with("</entry>"));
    }

    #[test]
    fn xml_unselected_fields_are_skipped() {
        let r = sample();
        let opts = ExportOptions::new(FieldSet::empty());
        let xml = xml_entry(1, &r, None, &opts).unwrap();
        assert!(xml.contains("<title>"));
        assert!(xml.contains("<password>"));
        assert!(!xml.contains("<username>"));
        assert!(!xml.contains("<notes>"));
    }

    #[test]
    fn xml_cdata_terminator_is_escaped() {
        let mut r = sample();
        r.set_title("a]]>b").unwrap();
        let xml = xml_entry(1, &r, None, &ExportOptions::default()).unwrap();
        assert!(xml.contains("<title>a]]&gt;b</title>"));
    }

    #[test]
    fn xml_policy_block() {
        let mut r = sample();
        r.set_policy(Some(PasswordPolicy {
            flags: policy_flags::USE_LOWERCASE | policy_flags::USE_DIGITS,
            length: 16,
            digit_min: 2,
            ..PasswordPolicy::default()
        }))
        .unwrap();
        let xml = xml_entry(1, &r, None, &ExportOptions::default()).unwrap();
        assert!(xml.contains("<PWLength>16</PWLength>"));
        assert!(xml.contains("<PWUseLowercase>1</PWUseLowercase>"));
        assert!(xml.contains("<PWUseDigits>1</PWUseDigits>"));
        assert!(!xml.contains("<PWUseSymbols>"));
        assert!(xml.contains("<PWDigitMinLength>2</PWDigitMinLength>"));
        assert!(!xml.contains("<PWLowercaseMinLength>"));

        r.set_policy_name("Named").unwrap();
        let xml = xml_entry(1, &r, None, &ExportOptions::default()).unwrap();
        assert!(xml.contains("<PasswordPolicyName><![CDATA[Named]]></PasswordPolicyName>"));
        assert!(!xml.contains("<PasswordPolicy>"));
    }

    #[test]
    fn xml_history_block() {
        let mut r = sample();
        r.set_pw_history("103016553f1000003abc").unwrap();
        let xml = xml_entry(1, &r, None, &ExportOptions::default()).unwrap();
        assert!(xml.contains("<status>1</status>"));
        assert!(xml.contains("<max>3</max>"));
        assert!(xml.contains("<num>1</num>"));
        assert!(xml.contains("<history_entry num=\"1\">"));
        assert!(xml.contains("<changedx>2023-11-14T22:13:20</changedx>"));
        assert!(xml.contains("<oldpassword><![CDATA[abc]]></oldpassword>"));
    }

    #[test]
    fn whole_store_exports() {
        let mut store = RecordStore::new();
        store.insert(sample()).unwrap();
        let opts = subset(&[FieldType::Title]);
        assert_eq!(export_text(&store, &opts), "Title\nexample.com\n");
        let xml = export_xml(&store, &ExportOptions::default()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<passwordsafe>"));
        assert!(xml.contains("<entry id=\"1\">"));
    }
}
