//! User preferences read by the core.

use crate::history::{HistorySettings, MAX_HISTORY_ENTRIES};
use crate::record::DoubleClickAction;
use serde::{Deserialize, Serialize};

/// Preferences consulted by history tracking and matching.
///
/// Passed explicitly wherever it is needed; the core keeps no global
/// preference state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Keep password history for records that have none yet.
    pub save_password_history: bool,

    /// Default history length for records that have none yet.
    pub password_history_default_max: usize,

    /// Double-click action for entries without their own.
    pub double_click_action: DoubleClickAction,

    /// Shift + double-click action for entries without their own.
    pub shift_double_click_action: DoubleClickAction,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            save_password_history: true,
            password_history_default_max: 3,
            double_click_action: DoubleClickAction::CopyPassword,
            shift_double_click_action: DoubleClickAction::AutoType,
        }
    }
}

impl Preferences {
    /// Creates preferences with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether password history is kept by default.
    #[must_use]
    pub const fn save_password_history(mut self, value: bool) -> Self {
        self.save_password_history = value;
        self
    }

    /// Sets the default history length.
    #[must_use]
    pub const fn password_history_default_max(mut self, max: usize) -> Self {
        self.password_history_default_max = max;
        self
    }

    /// Sets the default double-click action.
    #[must_use]
    pub const fn double_click_action(mut self, action: DoubleClickAction) -> Self {
        self.double_click_action = action;
        self
    }

    /// Sets the default shift + double-click action.
    #[must_use]
    pub const fn shift_double_click_action(mut self, action: DoubleClickAction) -> Self {
        self.shift_double_click_action = action;
        self
    }

    /// History settings for records without a history blob.
    #[must_use]
    pub fn history_settings(&self) -> HistorySettings {
        HistorySettings {
            enabled: self.save_password_history,
            max: self.password_history_default_max.min(MAX_HISTORY_ENTRIES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preferences() {
        let prefs = Preferences::default();
        assert!(prefs.save_password_history);
        assert_eq!(prefs.password_history_default_max, 3);
        assert_eq!(prefs.double_click_action, DoubleClickAction::CopyPassword);
        assert_eq!(prefs.shift_double_click_action, DoubleClickAction::AutoType);
    }

    #[test]
    fn builder_pattern() {
        let prefs = Preferences::new()
            .save_password_history(false)
            .password_history_default_max(1000)
            .double_click_action(DoubleClickAction::Browse);
        assert!(!prefs.save_password_history);
        assert_eq!(prefs.double_click_action, DoubleClickAction::Browse);
        assert_eq!(prefs.history_settings().max, MAX_HISTORY_ENTRIES);
        assert!(!prefs.history_settings().enabled);
    }

    #[test]
    fn json_with_missing_fields() {
        let prefs: Preferences =
            serde_json::from_str(r#"{"double_click_action":"view_edit"}"#).unwrap();
        assert_eq!(prefs.double_click_action, DoubleClickAction::ViewEdit);
        assert!(prefs.save_password_history);
        let text = serde_json::to_string(&prefs).unwrap();
        assert_eq!(serde_json::from_str::<Preferences>(&text).unwrap(), prefs);
    }
}
