use std::fmt;

use crate::settings::{SettingName, SettingValue};

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// Value does not fit the setting's type or domain.
    InvalidSettingValue {
        setting: SettingName,
        value: String,
        reason: String,
    },
    /// A settings file names a setting the engine does not know.
    UnknownSetting(String),
    /// TOML / JSON parse or serialization error.
    Parse(String),
    /// IO error (file read, write, rename).
    Io(String),
}

impl SettingsError {
    pub(crate) fn invalid_value(setting: SettingName, value: &SettingValue, reason: String) -> Self {
        Self::InvalidSettingValue {
            setting,
            value: value.to_string(),
            reason,
        }
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSettingValue { setting, value, reason } => {
                write!(f, "invalid value '{value}' for setting '{}': {reason}", setting.key())
            }
            Self::UnknownSetting(key) => write!(f, "unknown setting: {key}"),
            Self::Parse(msg) => write!(f, "settings parse error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {}
