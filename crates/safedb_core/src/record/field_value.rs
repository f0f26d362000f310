//! Text rendering and parsing of individual fields.

use super::{DoubleClickAction, KbShortcut, PasswordPolicy, Record};
use crate::error::{CoreError, CoreResult};
use crate::timefmt;
use safedb_codec::{FieldKind, FieldType};

fn parse_digits<T: std::str::FromStr>(field: FieldType, value: &str) -> CoreResult<T> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::invalid_value(field, format!("'{value}' is not a number")));
    }
    value
        .parse()
        .map_err(|_| CoreError::invalid_value(field, format!("'{value}' is out of range")))
}

impl Record {
    /// Human-readable value of `field`.
    ///
    /// Secrets that are never shown (attachment content, passkey private
    /// key) render as the empty string.
    #[must_use]
    pub fn field_value(&self, field: FieldType) -> String {
        match field {
            FieldType::GroupTitle => format!("{}.{}", self.group(), self.title()),
            FieldType::Uuid => self.uuid().hyphenated().to_string(),
            FieldType::AttRef | FieldType::BaseUuid | FieldType::AliasUuid | FieldType::ShortcutUuid => self
                .uuid_field(field)
                .map(|u| u.hyphenated().to_string())
                .unwrap_or_default(),
            FieldType::XTime => {
                let mut s = timefmt::format_export(self.xtime());
                if self.xtime_interval() != 0 {
                    s.push_str(" *");
                }
                s
            }
            FieldType::XTimeInterval => match self.xtime_interval() {
                0 => String::new(),
                days => days.to_string(),
            },
            FieldType::Dca => self.dca().map(|d| d.as_i16().to_string()).unwrap_or_default(),
            FieldType::ShiftDca => self
                .shift_dca()
                .map(|d| d.as_i16().to_string())
                .unwrap_or_default(),
            FieldType::Protected => {
                if self.is_protected() {
                    "Yes".to_owned()
                } else {
                    String::new()
                }
            }
            FieldType::KbShortcut => self.kb_shortcut().to_string(),
            FieldType::TotpConfig => self.totp_config().to_string(),
            FieldType::TotpLength => self.totp_length().to_string(),
            FieldType::TotpTimeStep => self.totp_time_step().to_string(),
            FieldType::PasskeyCredId | FieldType::PasskeyUserHandle => {
                self.binary(field).map(|b| hex::encode(&*b)).unwrap_or_default()
            }
            FieldType::PasskeyAlgoId if self.has_passkey() => self.passkey_algorithm_id().to_string(),
            FieldType::PasskeySignCount if self.has_passkey() => self.passkey_sign_count().to_string(),
            FieldType::PasskeyAlgoId
            | FieldType::PasskeySignCount
            | FieldType::PasskeyPrivateKey
            | FieldType::DataAttContent
            | FieldType::Reserved
            | FieldType::End => String::new(),
            _ => match field.kind() {
                FieldKind::Text => self.text(field),
                FieldKind::Time => timefmt::format_export(self.time(field)),
                _ => String::new(),
            },
        }
    }

    /// Sets `field` from its text form.
    ///
    /// Times accept the empty string, `now` (taken as `now`), and the
    /// `YYYY/MM/DD hh:mm:ss` and `YYYY-MM-DDThh:mm:ss` forms.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the record unchanged, if the text does not
    /// parse for the field or the field cannot be set from text.
    pub fn set_field_value(&mut self, field: FieldType, value: &str, now: i64) -> CoreResult<()> {
        match field {
            FieldType::PwHistory => self.set_pw_history(value),
            FieldType::Policy => {
                if value.is_empty() {
                    return self.set_policy(None);
                }
                let policy = PasswordPolicy::parse(value)
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| CoreError::invalid_value(field, "malformed password policy"))?;
                self.set_policy(Some(policy))
            }
            FieldType::XTimeInterval => {
                let days = if value.is_empty() {
                    0
                } else {
                    parse_digits::<i32>(field, value)?
                };
                self.set_xtime_interval(days)
            }
            FieldType::Dca | FieldType::ShiftDca => {
                let dca = if value.is_empty() {
                    None
                } else {
                    let raw = parse_digits::<i16>(field, value)?;
                    Some(DoubleClickAction::from_i16(raw).ok_or_else(|| {
                        CoreError::invalid_value(field, format!("{raw} is not a double-click action"))
                    })?)
                };
                if field == FieldType::Dca {
                    self.set_dca(dca)
                } else {
                    self.set_shift_dca(dca)
                }
            }
            FieldType::Protected => {
                self.set_protected(value == "1" || value.eq_ignore_ascii_case("yes"))
            }
            FieldType::KbShortcut => {
                let shortcut = KbShortcut::parse(value)
                    .ok_or_else(|| CoreError::invalid_value(field, "malformed keyboard shortcut"))?;
                self.set_kb_shortcut(shortcut)
            }
            FieldType::TotpConfig | FieldType::TotpLength | FieldType::TotpTimeStep => {
                let byte = if value.is_empty() {
                    0
                } else {
                    parse_digits::<u8>(field, value)?
                };
                self.set_byte(field, byte)
            }
            FieldType::GroupTitle | FieldType::Reserved | FieldType::End => Err(
                CoreError::invalid_operation(format!("{field} cannot be set from text")),
            ),
            _ => match field.kind() {
                FieldKind::Text => self.set_text(field, value),
                FieldKind::Time => {
                    let t = timefmt::parse(value, now)
                        .ok_or_else(|| CoreError::invalid_value(field, format!("bad date '{value}'")))?;
                    self.set_time(field, t)
                }
                _ => Err(CoreError::invalid_operation(format!(
                    "{field} cannot be set from text"
                ))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_group_title() {
        let mut r = Record::new().unwrap();
        r.set_field_value(FieldType::Group, "Work.Mail", 0).unwrap();
        r.set_field_value(FieldType::Title, "Inbox", 0).unwrap();
        assert_eq!(r.field_value(FieldType::GroupTitle), "Work.Mail.Inbox");
        assert!(r.set_field_value(FieldType::GroupTitle, "x", 0).is_err());
    }

    #[test]
    fn times() {
        let mut r = Record::new().unwrap();
        r.set_field_value(FieldType::CTime, "1970/01/02 01:01:01", 0).unwrap();
        assert_eq!(r.ctime(), 90_061);
        assert_eq!(r.field_value(FieldType::CTime), "1970/01/02 01:01:01");
        r.set_field_value(FieldType::ATime, "now", 1234).unwrap();
        assert_eq!(r.atime(), 1234);
        assert!(r.set_field_value(FieldType::ATime, "garbage", 0).is_err());
        assert_eq!(r.atime(), 1234);
        r.set_field_value(FieldType::ATime, "", 0).unwrap();
        assert_eq!(r.atime(), 0);
    }

    #[test]
    fn xtime_marks_interval() {
        let mut r = Record::new().unwrap();
        r.set_xtime(86_400).unwrap();
        r.set_field_value(FieldType::XTimeInterval, "30", 0).unwrap();
        assert_eq!(r.field_value(FieldType::XTime), "1970/01/02 00:00:00 *");
        assert!(r.set_field_value(FieldType::XTimeInterval, "-3", 0).is_err());
        assert!(r.set_field_value(FieldType::XTimeInterval, "4000", 0).is_err());
    }

    #[test]
    fn dca_and_protected() {
        let mut r = Record::new().unwrap();
        r.set_field_value(FieldType::Dca, "5", 0).unwrap();
        assert_eq!(r.dca(), Some(DoubleClickAction::ViewEdit));
        assert!(r.set_field_value(FieldType::Dca, "12", 0).is_err());
        r.set_field_value(FieldType::Dca, "", 0).unwrap();
        assert_eq!(r.dca(), None);

        r.set_field_value(FieldType::Protected, "Yes", 0).unwrap();
        assert!(r.is_protected());
        assert_eq!(r.field_value(FieldType::Protected), "Yes");
        r.set_field_value(FieldType::Protected, "0", 0).unwrap();
        assert!(!r.is_protected());
    }

    #[test]
    fn policy_and_shortcut() {
        let mut r = Record::new().unwrap();
        r.set_field_value(FieldType::Policy, "a00000c001000002000", 0).unwrap();
        assert_eq!(r.policy().unwrap().length, 12);
        assert!(r.set_field_value(FieldType::Policy, "junk", 0).is_err());
        r.set_field_value(FieldType::KbShortcut, "CS:0070", 0).unwrap();
        assert_eq!(r.field_value(FieldType::KbShortcut), "CS:0070");
    }

    #[test]
    fn passkey_values() {
        let mut r = Record::new().unwrap();
        assert_eq!(r.field_value(FieldType::PasskeyAlgoId), "");
        r.set_binary(FieldType::PasskeyCredId, &[0xde, 0xad]).unwrap();
        r.set_binary(FieldType::PasskeyPrivateKey, &[1; 8]).unwrap();
        r.set_passkey_algorithm_id(-7).unwrap();
        assert_eq!(r.field_value(FieldType::PasskeyCredId), "dead");
        assert_eq!(r.field_value(FieldType::PasskeyAlgoId), "-7");
        assert_eq!(r.field_value(FieldType::PasskeyPrivateKey), "");
    }

    #[test]
    fn totp_bytes() {
        let mut r = Record::new().unwrap();
        assert_eq!(r.field_value(FieldType::TotpLength), "6");
        r.set_field_value(FieldType::TotpLength, "8", 0).unwrap();
        assert_eq!(r.totp_length(), 8);
        assert!(r.set_field_value(FieldType::TotpLength, "300", 0).is_err());
    }
}
