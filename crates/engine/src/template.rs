//! Templates: a named source plus its private copy of the effective settings

use stencil_config::{configure, ConfigTarget, ConfigureReport, Configuration, ResolvedSettings, SettingsTable};

#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    source: String,
    settings: ResolvedSettings,
    compiled: bool,
}

impl Template {
    /// Create a template whose settings come from `config` (engine table
    /// plus every overlay matching `name`).
    pub fn new(name: impl Into<String>, source: impl Into<String>, config: &Configuration) -> Self {
        let name = name.into();
        let settings = config.resolve_for(&name);
        Self {
            name,
            source: source.into(),
            settings,
            compiled: false,
        }
    }

    /// Like `new`, with an instance-level table on top of the chain
    pub fn with_settings(
        name: impl Into<String>,
        source: impl Into<String>,
        config: &Configuration,
        instance: &SettingsTable,
    ) -> Self {
        let name = name.into();
        let settings = config.chain_for(&name, Some(instance)).resolve();
        Self {
            name,
            source: source.into(),
            settings,
            compiled: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn settings(&self) -> &ResolvedSettings {
        &self.settings
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Freeze the parse-time settings. Calling it again has no effect.
    pub fn compile(&mut self) {
        if self.compiled {
            return;
        }
        log::debug!(
            "compiled {} (encoding {}, tag syntax {}, naming {}, whitespace stripping {})",
            self.name,
            self.settings.encoding,
            self.settings.tag_syntax,
            self.settings.naming_convention,
            self.settings.whitespace_stripping
        );
        self.compiled = true;
    }

    /// Apply a settings table; see [`stencil_config::configure`]
    pub fn configure(&mut self, table: &SettingsTable) -> ConfigureReport {
        configure(table, self)
    }
}

impl ConfigTarget for Template {
    fn is_compiled(&self) -> bool {
        self.compiled
    }

    fn settings_mut(&mut self) -> &mut ResolvedSettings {
        &mut self.settings
    }

    fn label(&self) -> &str {
        &self.name
    }
}
