//! Settings files (load/save)
//!
//! A settings file is a flat map of setting key to boolean, integer or
//! string, in TOML or JSON. Only explicitly set values are written, so a
//! saved file never pins defaults.
//!
//! The engine-wide file lives at `~/.config/stencil/settings.toml`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::settings::{SettingName, SettingValue, SettingsTable};

/// One value as it appears in a settings file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSetting {
    Bool(bool),
    Int(i64),
    Text(String),
    Null,
}

impl From<RawSetting> for SettingValue {
    fn from(raw: RawSetting) -> Self {
        match raw {
            RawSetting::Bool(b) => SettingValue::Bool(b),
            RawSetting::Int(n) => SettingValue::Int(n),
            RawSetting::Text(s) => SettingValue::Text(s),
            RawSetting::Null => SettingValue::Null,
        }
    }
}

impl From<SettingValue> for RawSetting {
    fn from(value: SettingValue) -> Self {
        match value {
            SettingValue::Bool(b) => RawSetting::Bool(b),
            SettingValue::Int(n) => RawSetting::Int(n),
            SettingValue::ClassicCompatibility(c) => RawSetting::Int(c.as_int()),
            // TOML has no null; blank text reads back as "none" for optional settings
            SettingValue::Null => RawSetting::Text(String::new()),
            other => RawSetting::Text(other.to_string()),
        }
    }
}

/// Get the path to the engine settings file
pub fn engine_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("stencil").join("settings.toml"))
}

fn table_from_raw(raw: BTreeMap<String, RawSetting>) -> Result<SettingsTable, SettingsError> {
    let mut table = SettingsTable::new();
    for (key, value) in raw {
        let name = SettingName::from_key(&key).ok_or(SettingsError::UnknownSetting(key))?;
        table.set(name, SettingValue::from(value))?;
    }
    Ok(table)
}

fn table_to_raw(table: &SettingsTable) -> BTreeMap<String, RawSetting> {
    table
        .explicit_settings()
        .into_iter()
        .filter_map(|name| {
            table
                .get(name)
                .map(|value| (name.key().to_string(), RawSetting::from(value)))
        })
        .collect()
}

pub fn parse_toml(content: &str) -> Result<SettingsTable, SettingsError> {
    let raw: BTreeMap<String, RawSetting> =
        toml::from_str(content).map_err(|e| SettingsError::Parse(e.to_string()))?;
    table_from_raw(raw)
}

pub fn parse_json(content: &str) -> Result<SettingsTable, SettingsError> {
    let raw: BTreeMap<String, RawSetting> =
        serde_json::from_str(content).map_err(|e| SettingsError::Parse(e.to_string()))?;
    table_from_raw(raw)
}

pub fn to_toml_string(table: &SettingsTable) -> Result<String, SettingsError> {
    toml::to_string_pretty(&table_to_raw(table)).map_err(|e| SettingsError::Parse(e.to_string()))
}

pub fn to_json_string(table: &SettingsTable) -> Result<String, SettingsError> {
    serde_json::to_string_pretty(&table_to_raw(table)).map_err(|e| SettingsError::Parse(e.to_string()))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Load a settings file; `.json` is read as JSON, anything else as TOML
pub fn load_table(path: &Path) -> Result<SettingsTable, SettingsError> {
    let content = fs::read_to_string(path)
        .map_err(|e| SettingsError::Io(format!("{}: {e}", path.display())))?;
    if is_json(path) {
        parse_json(&content)
    } else {
        parse_toml(&content)
    }
}

/// Save explicitly set values (atomic write)
///
/// Writes to a temp file next to the target, then renames over it.
/// Creates the parent directory if it doesn't exist.
pub fn save_table(path: &Path, table: &SettingsTable) -> Result<(), SettingsError> {
    let content = if is_json(path) {
        to_json_string(table)?
    } else {
        to_toml_string(table)?
    };

    let io_err = |e: std::io::Error| SettingsError::Io(format!("{}: {e}", path.display()));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    fs::write(&temp, content).map_err(io_err)?;
    fs::rename(&temp, path).map_err(|e| {
        let _ = fs::remove_file(&temp);
        io_err(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_values_are_validated() {
        let table = parse_toml(
            r#"
            locale = "de_DE"
            auto_flush = false
            classic_compatible = 2
            "#,
        )
        .unwrap();
        assert_eq!(
            table.explicit_settings(),
            vec![SettingName::AutoFlush, SettingName::ClassicCompatible, SettingName::Locale]
        );

        let err = parse_toml("locale = \"not a locale\"").unwrap_err();
        assert!(matches!(err, SettingsError::InvalidSettingValue { setting: SettingName::Locale, .. }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_json(r#"{ "colour_scheme": "dark" }"#).unwrap_err();
        assert_eq!(err, SettingsError::UnknownSetting("colour_scheme".to_string()));
    }

    #[test]
    fn json_null_clears_optional_setting() {
        let table = parse_json(r#"{ "output_encoding": null }"#).unwrap();
        assert!(table.is_output_encoding_set());
        assert_eq!(table.output_encoding().as_value(), Some(&None));
    }

    #[test]
    fn only_explicit_values_are_written() {
        let mut table = SettingsTable::new();
        table.set(SettingName::NumberFormat, "0.00").unwrap();
        let text = to_toml_string(&table).unwrap();
        assert_eq!(text.trim(), "number_format = \"0.00\"");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        assert!(matches!(parse_toml("locale = "), Err(SettingsError::Parse(_))));
        assert!(matches!(parse_json("{ \"locale\": 1.5 }"), Err(SettingsError::Parse(_))));
    }
}
