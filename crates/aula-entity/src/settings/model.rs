//! Security setting entity model.

use serde::{Deserialize, Serialize};

/// Key used for the session inactivity timeout setting.
pub const SESSION_TIMEOUT_MINUTES_KEY: &str = "session_timeout_minutes";

/// A single key/value security setting maintained by administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuritySetting {
    /// Setting key, e.g. `session_timeout_minutes`.
    pub setting_key: String,
    /// Raw setting value; interpretation depends on the key.
    pub setting_value: String,
}

impl SecuritySetting {
    /// Look up a setting by key.
    pub fn find<'a>(settings: &'a [SecuritySetting], key: &str) -> Option<&'a SecuritySetting> {
        settings.iter().find(|s| s.setting_key == key)
    }

    /// Parse the session timeout in minutes, if present and valid.
    pub fn session_timeout_minutes(settings: &[SecuritySetting]) -> Option<u64> {
        Self::find(settings, SESSION_TIMEOUT_MINUTES_KEY)
            .and_then(|s| s.setting_value.trim().parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setting(key: &str, value: &str) -> SecuritySetting {
        SecuritySetting {
            setting_key: key.to_string(),
            setting_value: value.to_string(),
        }
    }

    #[test]
    fn test_session_timeout_parsed() {
        let settings = vec![
            setting("password_min_length", "12"),
            setting("session_timeout_minutes", "45"),
        ];
        assert_eq!(SecuritySetting::session_timeout_minutes(&settings), Some(45));
    }

    #[test]
    fn test_session_timeout_absent_or_invalid() {
        assert_eq!(SecuritySetting::session_timeout_minutes(&[]), None);

        let settings = vec![setting("session_timeout_minutes", "soon")];
        assert_eq!(SecuritySetting::session_timeout_minutes(&settings), None);
    }
}
