//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random records and command
//! sequences that maintain the record store's invariants.

use proptest::prelude::*;
use safedb_codec::{FormatVersion, RawField};
use safedb_core::{DoubleClickAction, EntryType, Record};
use uuid::Uuid;

/// Strategy for generating UUIDs that are never nil.
pub fn uuid_strategy() -> impl Strategy<Value = Uuid> {
    prop::array::uniform16(any::<u8>())
        .prop_map(Uuid::from_bytes)
        .prop_filter("UUID must not be nil", |u| !u.is_nil())
}

/// Strategy for generating short single-line text, including non-ASCII.
pub fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 ._\\-@\u{e9}\u{df}\u{4e2d}]{0,24}").expect("Invalid regex")
}

/// Strategy for generating passwords that cannot be mistaken for a V3
/// dependency marker.
pub fn password_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9!#%&*+=?]{0,32}").expect("Invalid regex")
}

/// Strategy for generating timestamps representable in `version`.
///
/// Zero means unset and is generated too.
pub fn timestamp_strategy(version: FormatVersion) -> impl Strategy<Value = i64> {
    let max = match version {
        FormatVersion::V3 => i64::from(u32::MAX),
        FormatVersion::V4 => (1i64 << 40) - 1,
    };
    prop_oneof![1 => Just(0i64), 4 => 1..=max]
}

/// Strategy for generating unknown fields: type bytes no version assigns.
pub fn unknown_field_strategy() -> impl Strategy<Value = RawField> {
    (0x50u8..0xff, prop::collection::vec(any::<u8>(), 0..16))
        .prop_map(|(type_byte, data)| RawField::new(type_byte, data))
}

/// Strategy for generating double-click actions, including unset.
pub fn dca_strategy() -> impl Strategy<Value = Option<DoubleClickAction>> {
    (-1i16..=DoubleClickAction::MAX).prop_map(DoubleClickAction::from_i16)
}

/// Text-valued parts of a generated record.
#[derive(Debug, Clone)]
pub struct RecordText {
    /// Group path.
    pub group: String,
    /// Title.
    pub title: String,
    /// User name.
    pub user: String,
    /// Password.
    pub password: String,
    /// Notes.
    pub notes: String,
    /// URL.
    pub url: String,
    /// E-mail address.
    pub email: String,
}

fn record_text_strategy() -> impl Strategy<Value = RecordText> {
    (
        text_strategy(),
        text_strategy(),
        text_strategy(),
        password_strategy(),
        text_strategy(),
        text_strategy(),
        text_strategy(),
    )
        .prop_map(|(group, title, user, password, notes, url, email)| RecordText {
            group,
            title,
            user,
            password,
            notes,
            url,
            email,
        })
}

/// Strategy for generating normal records that `version` can hold
/// completely.
pub fn record_strategy(version: FormatVersion) -> impl Strategy<Value = Record> {
    (
        uuid_strategy(),
        record_text_strategy(),
        prop::array::uniform3(timestamp_strategy(version)),
        0i32..=3650,
        any::<bool>(),
        dca_strategy(),
        prop::collection::vec(unknown_field_strategy(), 0..3),
    )
        .prop_map(|(uuid, text, times, interval, protected, dca, unknown)| {
            let mut record = Record::empty().expect("Failed to create record");
            record.set_uuid(uuid).expect("Failed to set UUID");
            record.set_group(&text.group).expect("Failed to set group");
            record.set_title(&text.title).expect("Failed to set title");
            record.set_user(&text.user).expect("Failed to set user");
            record.set_password(&text.password).expect("Failed to set password");
            record.set_notes(&text.notes).expect("Failed to set notes");
            record.set_url(&text.url).expect("Failed to set URL");
            record.set_email(&text.email).expect("Failed to set e-mail");
            record.set_ctime(times[0]).expect("Failed to set ctime");
            record.set_pmtime(times[1]).expect("Failed to set pmtime");
            record.set_xtime(times[2]).expect("Failed to set xtime");
            record.set_xtime_interval(interval).expect("Failed to set interval");
            record.set_protected(protected).expect("Failed to set protected");
            record.set_dca(dca).expect("Failed to set DCA");
            for field in unknown {
                record.add_unknown_field(field);
            }
            record
        })
}

/// Strategy for generating a dependent type.
pub fn dependent_type_strategy() -> impl Strategy<Value = EntryType> {
    prop_oneof![Just(EntryType::Alias), Just(EntryType::Shortcut)]
}

/// An operation against a database, resolved against its live records.
///
/// Indices pick a record modulo the number of records present, so every
/// sequence is applicable to any database.
#[derive(Debug, Clone)]
pub enum RecordOperation {
    /// Add a normal record.
    Add {
        /// Title of the new record.
        title: String,
        /// Password of the new record.
        password: String,
    },
    /// Add an alias or shortcut of a normal-family record.
    AddDependent {
        /// Picks the base.
        base: usize,
        /// Alias or shortcut.
        kind: EntryType,
    },
    /// Change a title.
    Retitle {
        /// Picks the record.
        target: usize,
        /// New title.
        title: String,
    },
    /// Change a password.
    ChangePassword {
        /// Picks the record.
        target: usize,
        /// New password.
        password: String,
    },
    /// Turn a dependent back into a normal record.
    Unlink {
        /// Picks the dependent.
        target: usize,
    },
    /// Delete a record.
    Delete {
        /// Picks the record.
        target: usize,
    },
}

/// Strategy for generating record operations.
pub fn record_operation_strategy() -> impl Strategy<Value = RecordOperation> {
    prop_oneof![
        3 => (text_strategy(), password_strategy())
            .prop_map(|(title, password)| RecordOperation::Add { title, password }),
        2 => (any::<usize>(), dependent_type_strategy())
            .prop_map(|(base, kind)| RecordOperation::AddDependent { base, kind }),
        2 => (any::<usize>(), text_strategy())
            .prop_map(|(target, title)| RecordOperation::Retitle { target, title }),
        2 => (any::<usize>(), password_strategy())
            .prop_map(|(target, password)| RecordOperation::ChangePassword { target, password }),
        1 => any::<usize>().prop_map(|target| RecordOperation::Unlink { target }),
        1 => any::<usize>().prop_map(|target| RecordOperation::Delete { target }),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<RecordOperation>> {
    prop::collection::vec(record_operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use safedb_core::resolver;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn generated_records_are_normal(record in record_strategy(FormatVersion::V4)) {
            prop_assert!(!record.uuid().is_nil());
            prop_assert_eq!(record.entry_type(), EntryType::Normal);
            prop_assert!(resolver::decode_v3_marker(&record.password()).is_none());
        }

        #[test]
        fn unknown_fields_are_unassigned(field in unknown_field_strategy()) {
            prop_assert!(safedb_codec::FieldType::from_byte(field.type_byte).is_none());
        }

        #[test]
        fn v3_times_fit_four_bytes(t in timestamp_strategy(FormatVersion::V3)) {
            prop_assert!((0..=i64::from(u32::MAX)).contains(&t));
        }
    }
}
