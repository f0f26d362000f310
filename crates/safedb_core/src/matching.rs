//! Single-field predicates used by search and filtering.
//!
//! Every criterion names one value of a record and an [`Operator`].
//! [`Operator::Present`] and [`Operator::NotPresent`] only look at whether
//! the value is set. Integer and date rules fail on an unset value; text
//! rules compare it as the empty string.

use crate::config::Preferences;
use crate::record::{DoubleClickAction, EntryStatus, EntryType, Record};
use crate::timefmt::{self, SECONDS_PER_DAY};
use safedb_codec::FieldType;
use serde::{Deserialize, Serialize};

/// Presence test or a family-specific rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator<R> {
    /// The value is set.
    Present,
    /// The value is not set.
    NotPresent,
    /// The value satisfies the rule.
    Rule(R),
}

/// Text comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextRule {
    /// Whole value equals the operand.
    Equals,
    /// Negation of `Equals`.
    NotEquals,
    /// Operand occurs in the value.
    Contains,
    /// Negation of `Contains`.
    NotContains,
    /// Value starts with the operand.
    BeginsWith,
    /// Negation of `BeginsWith`.
    NotBeginsWith,
    /// Value ends with the operand.
    EndsWith,
    /// Negation of `EndsWith`.
    NotEndsWith,
}

/// A text rule with its operand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMatch {
    /// Comparison.
    pub rule: TextRule,
    /// Operand.
    pub value: String,
    /// Compare case-sensitively.
    pub case_sensitive: bool,
}

/// Integer comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntRule {
    /// `==`
    Equals,
    /// `!=`
    NotEquals,
    /// `<`
    LessThan,
    /// `<=`
    LessOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterOrEqual,
    /// Inclusive range between both operands.
    Between,
}

/// An integer rule with its operands. `upper` is only read by `Between`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntMatch {
    /// Comparison.
    pub rule: IntRule,
    /// First operand.
    pub value: i64,
    /// Upper bound for `Between`.
    pub upper: i64,
}

/// Integer-valued properties of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntField {
    /// Password expiry interval in days.
    XTimeInterval,
    /// Total plaintext size of the record.
    EntrySize,
    /// Password length.
    PasswordLength,
    /// Packed keyboard shortcut.
    KbShortcut,
}

/// Date comparisons, at UTC day granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRule {
    /// Same day.
    Equals,
    /// Different day.
    NotEquals,
    /// Strictly earlier day.
    Before,
    /// Strictly later day.
    After,
    /// Inclusive range between both operands.
    Between,
}

/// A date operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOperand {
    /// Seconds since the epoch.
    Absolute(i64),
    /// Days relative to the match time; negative values are in the past.
    RelativeDays(i64),
}

impl DateOperand {
    fn resolve(self, now: i64) -> i64 {
        match self {
            Self::Absolute(t) => t,
            Self::RelativeDays(days) => now.saturating_add(days.saturating_mul(SECONDS_PER_DAY)),
        }
    }
}

/// A date rule with its operands. `upper` is only read by `Between`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateMatch {
    /// Comparison.
    pub rule: DateRule,
    /// First operand.
    pub value: DateOperand,
    /// Upper bound for `Between`.
    pub upper: DateOperand,
}

/// Enumerated comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumRule {
    /// Equal to the operand.
    Is,
    /// Different from the operand.
    IsNot,
}

/// An enumerated rule with its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMatch<T> {
    /// Comparison.
    pub rule: EnumRule,
    /// Operand.
    pub value: T,
}

impl<T: PartialEq> EnumMatch<T> {
    fn test(&self, actual: &T) -> bool {
        match self.rule {
            EnumRule::Is => *actual == self.value,
            EnumRule::IsNot => *actual != self.value,
        }
    }
}

/// One predicate over a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// A text field, or [`FieldType::GroupTitle`] for `group.title`.
    Text {
        /// Field compared.
        field: FieldType,
        /// Operator applied.
        op: Operator<TextMatch>,
    },
    /// An integer property.
    Integer {
        /// Property compared.
        field: IntField,
        /// Operator applied.
        op: Operator<IntMatch>,
    },
    /// One of the time fields.
    Date {
        /// Field compared.
        field: FieldType,
        /// Operator applied.
        op: Operator<DateMatch>,
    },
    /// The entry type.
    EntryType(Operator<EnumMatch<EntryType>>),
    /// The entry status.
    Status(Operator<EnumMatch<EntryStatus>>),
    /// The double-click action, or shift + double-click with `shift`.
    DoubleClick {
        /// Compare the shift + double-click action.
        shift: bool,
        /// Operator applied.
        op: Operator<EnumMatch<DoubleClickAction>>,
    },
}

/// Inputs a match needs besides the record.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    /// Supplies default double-click actions.
    pub prefs: &'a Preferences,
    /// Reference time for relative dates.
    pub now: i64,
}

impl<'a> MatchContext<'a> {
    /// Creates a context.
    #[must_use]
    pub const fn new(prefs: &'a Preferences, now: i64) -> Self {
        Self { prefs, now }
    }
}

/// Returns true if `record` satisfies `criterion`.
#[must_use]
pub fn matches(record: &Record, criterion: &Criterion, ctx: &MatchContext<'_>) -> bool {
    match criterion {
        Criterion::Text { field, op } => {
            let actual = text_value(record, *field);
            presence(op, !actual.is_empty()).unwrap_or_else(|| match op {
                Operator::Rule(m) => match_text(&actual, m),
                _ => false,
            })
        }
        Criterion::Integer { field, op } => {
            let actual = int_value(record, *field);
            presence(op, actual != 0).unwrap_or_else(|| match op {
                Operator::Rule(m) if actual != 0 => match_int(actual, m),
                _ => false,
            })
        }
        Criterion::Date { field, op } => {
            let actual = date_value(record, *field);
            presence(op, actual != 0).unwrap_or_else(|| match op {
                Operator::Rule(m) if actual != 0 => match_date(actual, m, ctx.now),
                _ => false,
            })
        }
        Criterion::EntryType(op) => presence(op, true).unwrap_or_else(|| match op {
            Operator::Rule(m) => m.test(&record.entry_type()),
            _ => false,
        }),
        Criterion::Status(op) => presence(op, true).unwrap_or_else(|| match op {
            Operator::Rule(m) => m.test(&record.status()),
            _ => false,
        }),
        Criterion::DoubleClick { shift, op } => {
            let own = if *shift {
                record.shift_dca()
            } else {
                record.dca()
            };
            presence(op, own.is_some()).unwrap_or_else(|| match op {
                Operator::Rule(m) => {
                    let fallback = if *shift {
                        ctx.prefs.shift_double_click_action
                    } else {
                        ctx.prefs.double_click_action
                    };
                    m.test(&own.unwrap_or(fallback))
                }
                _ => false,
            })
        }
    }
}

fn presence<R>(op: &Operator<R>, is_set: bool) -> Option<bool> {
    match op {
        Operator::Present => Some(is_set),
        Operator::NotPresent => Some(!is_set),
        Operator::Rule(_) => None,
    }
}

fn text_value(record: &Record, field: FieldType) -> String {
    if field == FieldType::GroupTitle {
        format!("{}.{}", record.group(), record.title())
    } else {
        record.text(field)
    }
}

fn int_value(record: &Record, field: IntField) -> i64 {
    match field {
        IntField::XTimeInterval => i64::from(record.xtime_interval()),
        IntField::EntrySize => i64::try_from(record.entry_size()).unwrap_or(i64::MAX),
        IntField::PasswordLength => i64::try_from(record.password_length()).unwrap_or(i64::MAX),
        IntField::KbShortcut => i64::from(record.kb_shortcut().0),
    }
}

fn date_value(record: &Record, field: FieldType) -> i64 {
    match field {
        FieldType::CTime
        | FieldType::PmTime
        | FieldType::ATime
        | FieldType::XTime
        | FieldType::RmTime => record.time(field),
        _ => 0,
    }
}

fn match_text(actual: &str, m: &TextMatch) -> bool {
    let (actual, value) = if m.case_sensitive {
        (actual.to_owned(), m.value.clone())
    } else {
        (actual.to_lowercase(), m.value.to_lowercase())
    };
    match m.rule {
        TextRule::Equals => actual == value,
        TextRule::NotEquals => actual != value,
        TextRule::Contains => actual.contains(&value),
        TextRule::NotContains => !actual.contains(&value),
        TextRule::BeginsWith => actual.starts_with(&value),
        TextRule::NotBeginsWith => !actual.starts_with(&value),
        TextRule::EndsWith => actual.ends_with(&value),
        TextRule::NotEndsWith => !actual.ends_with(&value),
    }
}

fn match_int(actual: i64, m: &IntMatch) -> bool {
    match m.rule {
        IntRule::Equals => actual == m.value,
        IntRule::NotEquals => actual != m.value,
        IntRule::LessThan => actual < m.value,
        IntRule::LessOrEqual => actual <= m.value,
        IntRule::GreaterThan => actual > m.value,
        IntRule::GreaterOrEqual => actual >= m.value,
        IntRule::Between => (m.value..=m.upper).contains(&actual),
    }
}

fn match_date(actual: i64, m: &DateMatch, now: i64) -> bool {
    let day = timefmt::day_start(actual);
    let lower = timefmt::day_start(m.value.resolve(now));
    match m.rule {
        DateRule::Equals => day == lower,
        DateRule::NotEquals => day != lower,
        DateRule::Before => day < lower,
        DateRule::After => day > lower,
        DateRule::Between => {
            let upper = timefmt::day_start(m.upper.resolve(now));
            (lower..=upper).contains(&day)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::KbShortcut;

    const DAY: i64 = SECONDS_PER_DAY;

    fn ctx(prefs: &Preferences) -> MatchContext<'_> {
        MatchContext::new(prefs, 100 * DAY + 3600)
    }

    fn text(field: FieldType, rule: TextRule, value: &str, case_sensitive: bool) -> Criterion {
        Criterion::Text {
            field,
            op: Operator::Rule(TextMatch {
                rule,
                value: value.to_owned(),
                case_sensitive,
            }),
        }
    }

    fn record() -> Record {
        let mut r = Record::new().unwrap();
        r.set_group("Work").unwrap();
        r.set_title("Mail Server").unwrap();
        r.set_password("abcdef").unwrap();
        r.set_ctime(90 * DAY + 7200).unwrap();
        r
    }

    #[test]
    fn text_rules() {
        let prefs = Preferences::default();
        let r = record();
        let c = ctx(&prefs);
        assert!(matches(&r, &text(FieldType::Title, TextRule::Contains, "server", false), &c));
        assert!(!matches(&r, &text(FieldType::Title, TextRule::Contains, "server", true), &c));
        assert!(matches(&r, &text(FieldType::Title, TextRule::BeginsWith, "Mail", true), &c));
        assert!(matches(&r, &text(FieldType::Title, TextRule::NotEndsWith, "x", true), &c));
        assert!(matches(
            &r,
            &text(FieldType::GroupTitle, TextRule::Equals, "work.mail server", false),
            &c
        ));
        assert!(matches(&r, &text(FieldType::Url, TextRule::NotEquals, "x", true), &c));
    }

    #[test]
    fn presence_short_circuits() {
        let prefs = Preferences::default();
        let r = record();
        let c = ctx(&prefs);
        let present = |field| Criterion::Text {
            field,
            op: Operator::Present,
        };
        assert!(matches(&r, &present(FieldType::Title), &c));
        assert!(!matches(&r, &present(FieldType::Url), &c));
        assert!(matches(
            &r,
            &Criterion::Integer {
                field: IntField::XTimeInterval,
                op: Operator::NotPresent
            },
            &c
        ));
        assert!(matches(
            &r,
            &Criterion::Date {
                field: FieldType::XTime,
                op: Operator::NotPresent
            },
            &c
        ));
        assert!(matches(
            &r,
            &Criterion::DoubleClick {
                shift: false,
                op: Operator::NotPresent
            },
            &c
        ));
    }

    #[test]
    fn integer_rules() {
        let prefs = Preferences::default();
        let mut r = record();
        let c = ctx(&prefs);
        let int = |field, rule, value, upper| Criterion::Integer {
            field,
            op: Operator::Rule(IntMatch { rule, value, upper }),
        };
        assert!(matches(&r, &int(IntField::PasswordLength, IntRule::Equals, 6, 0), &c));
        assert!(matches(&r, &int(IntField::PasswordLength, IntRule::Between, 5, 7), &c));
        assert!(!matches(&r, &int(IntField::PasswordLength, IntRule::GreaterThan, 6, 0), &c));
        // Unset values fail every comparison, even a negated one.
        assert!(!matches(&r, &int(IntField::KbShortcut, IntRule::NotEquals, 5, 0), &c));
        r.set_kb_shortcut(KbShortcut::new(1, 0x41)).unwrap();
        assert!(matches(&r, &int(IntField::KbShortcut, IntRule::NotEquals, 5, 0), &c));
        assert!(matches(&r, &int(IntField::EntrySize, IntRule::GreaterThan, 0, 0), &c));
    }

    #[test]
    fn date_rules_ignore_time_of_day() {
        let prefs = Preferences::default();
        let r = record();
        let c = ctx(&prefs);
        let date = |rule, value, upper| Criterion::Date {
            field: FieldType::CTime,
            op: Operator::Rule(DateMatch { rule, value, upper }),
        };
        let none = DateOperand::Absolute(0);
        assert!(matches(&r, &date(DateRule::Equals, DateOperand::Absolute(90 * DAY + 80_000), none), &c));
        assert!(matches(&r, &date(DateRule::Equals, DateOperand::RelativeDays(-10), none), &c));
        assert!(matches(&r, &date(DateRule::Before, DateOperand::RelativeDays(-9), none), &c));
        assert!(!matches(&r, &date(DateRule::After, DateOperand::RelativeDays(-10), none), &c));
        assert!(matches(
            &r,
            &date(
                DateRule::Between,
                DateOperand::RelativeDays(-10),
                DateOperand::RelativeDays(0)
            ),
            &c
        ));
        let unset = Criterion::Date {
            field: FieldType::XTime,
            op: Operator::Rule(DateMatch {
                rule: DateRule::NotEquals,
                value: DateOperand::Absolute(DAY),
                upper: none,
            }),
        };
        assert!(!matches(&r, &unset, &c));
    }

    #[test]
    fn enum_rules() {
        let prefs = Preferences::default();
        let mut r = record();
        let c = ctx(&prefs);
        let is_type = |value| {
            Criterion::EntryType(Operator::Rule(EnumMatch {
                rule: EnumRule::Is,
                value,
            }))
        };
        assert!(matches(&r, &is_type(EntryType::Normal), &c));
        assert!(!matches(&r, &is_type(EntryType::Alias), &c));

        r.set_status(EntryStatus::Modified);
        let status = Criterion::Status(Operator::Rule(EnumMatch {
            rule: EnumRule::IsNot,
            value: EntryStatus::Clean,
        }));
        assert!(matches(&r, &status, &c));
    }

    #[test]
    fn dca_falls_back_to_preferences() {
        let prefs = Preferences::default().double_click_action(DoubleClickAction::Browse);
        let mut r = record();
        let c = ctx(&prefs);
        let is = |value| Criterion::DoubleClick {
            shift: false,
            op: Operator::Rule(EnumMatch {
                rule: EnumRule::Is,
                value,
            }),
        };
        assert!(matches(&r, &is(DoubleClickAction::Browse), &c));
        r.set_dca(Some(DoubleClickAction::Run)).unwrap();
        assert!(matches(&r, &is(DoubleClickAction::Run), &c));
        assert!(!matches(&r, &is(DoubleClickAction::Browse), &c));
    }
}
