//! Pushing a settings table onto a compiled unit
//!
//! Parse-time settings only matter while a template is being compiled.
//! Once compiled, they are skipped without error and reported back.

use crate::settings::{ResolvedSettings, SettingCategory, SettingName, SettingsTable};

/// Something settings can be applied to (a template).
pub trait ConfigTarget {
    /// True once the source has been parsed; parse-time settings are frozen
    fn is_compiled(&self) -> bool;

    fn settings_mut(&mut self) -> &mut ResolvedSettings;

    /// Name used in log messages
    fn label(&self) -> &str {
        "<unnamed>"
    }
}

/// What `configure` did with each explicitly set setting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigureReport {
    pub applied: Vec<SettingName>,
    /// Parse-time settings ignored because the target was already compiled
    pub skipped: Vec<SettingName>,
}

impl ConfigureReport {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty() && self.skipped.is_empty()
    }
}

/// Apply every explicitly set setting of `table` to `target`.
pub fn configure<T: ConfigTarget + ?Sized>(table: &SettingsTable, target: &mut T) -> ConfigureReport {
    let compiled = target.is_compiled();
    let mut report = ConfigureReport::default();

    target.settings_mut().overlay_with(table, |name| {
        if compiled && name.category() == SettingCategory::ParseTime {
            report.skipped.push(name);
            false
        } else {
            report.applied.push(name);
            true
        }
    });

    for name in &report.skipped {
        log::debug!(
            "{}: parse-time setting '{}' ignored, template already compiled",
            target.label(),
            name.key()
        );
    }
    report
}
