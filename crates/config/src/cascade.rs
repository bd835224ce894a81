//! Scope chains and settings resolution
//!
//! Resolution order, most specific first:
//! 1. Template instance table
//! 2. Overlays whose matcher accepts the template name (last added wins)
//! 3. Engine table (`Configuration`)
//! 4. Hard-coded defaults

use std::path::Path;

use crate::error::SettingsError;
use crate::persistence::{engine_settings_path, load_table};
use crate::settings::{ResolvedSettings, SettingName, SettingValue, SettingsTable};

/// Merge tables with right-most-wins precedence.
///
/// For each setting, the value comes from the highest-indexed table that has
/// it explicitly set; settings set nowhere stay unset. Inputs are untouched.
pub fn merge(tables: &[&SettingsTable]) -> SettingsTable {
    tables.iter().fold(SettingsTable::new(), |mut merged, table| {
        merged.merge_from(table);
        merged
    })
}

/// Which scope of a chain supplied a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeLevel {
    Engine,
    /// Index into `Configuration::overlays`
    Overlay(usize),
    Instance,
    /// No scope set it; the hard-coded default applies
    Default,
}

/// An ordered chain of scopes, root first, ending in the most specific one.
#[derive(Debug, Clone)]
pub struct ScopeChain<'a> {
    defaults: &'a ResolvedSettings,
    scopes: Vec<(ScopeLevel, &'a SettingsTable)>,
}

impl<'a> ScopeChain<'a> {
    pub fn new(defaults: &'a ResolvedSettings) -> Self {
        Self {
            defaults,
            scopes: Vec::new(),
        }
    }

    /// Append a scope more specific than every scope already in the chain
    pub fn push(&mut self, level: ScopeLevel, table: &'a SettingsTable) -> &mut Self {
        self.scopes.push((level, table));
        self
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn levels(&self) -> impl Iterator<Item = ScopeLevel> + '_ {
        self.scopes.iter().map(|(level, _)| *level)
    }

    /// First explicitly set value walking from the most specific scope to the
    /// root, else the root's default.
    pub fn resolve_effective(&self, name: SettingName) -> SettingValue {
        self.scopes
            .iter()
            .rev()
            .find_map(|(_, table)| table.get(name))
            .unwrap_or_else(|| self.defaults.get(name))
    }

    /// Scope the effective value of `name` comes from
    pub fn origin(&self, name: SettingName) -> ScopeLevel {
        self.scopes
            .iter()
            .rev()
            .find(|(_, table)| table.is_set(name))
            .map(|(level, _)| *level)
            .unwrap_or(ScopeLevel::Default)
    }

    /// Every setting resolved to a concrete value
    pub fn resolve(&self) -> ResolvedSettings {
        let mut resolved = self.defaults.clone();
        for (_, table) in &self.scopes {
            resolved.overlay(table);
        }
        resolved
    }
}

/// Free-function form of [`ScopeChain::resolve_effective`]
pub fn resolve_effective(chain: &ScopeChain<'_>, name: SettingName) -> SettingValue {
    chain.resolve_effective(name)
}

// ============================================================================
// Engine scope
// ============================================================================

/// Selects which templates an overlay applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameMatcher {
    Any,
    /// File extension without the dot, compared case-insensitively
    Extension(String),
    Prefix(String),
}

impl NameMatcher {
    pub fn matches(&self, template_name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Extension(ext) => Path::new(template_name)
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ext)),
            Self::Prefix(prefix) => template_name.starts_with(prefix.as_str()),
        }
    }
}

/// A settings table bound to the templates its matcher accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub matcher: NameMatcher,
    pub table: SettingsTable,
}

/// The engine (root) scope.
///
/// Owns its table, its defaults and its overlays. Any number can coexist;
/// nothing is shared between instances.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    table: SettingsTable,
    defaults: ResolvedSettings,
    overlays: Vec<Overlay>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::with_defaults(ResolvedSettings::defaults())
    }

    pub fn with_defaults(defaults: ResolvedSettings) -> Self {
        Self {
            table: SettingsTable::new(),
            defaults,
            overlays: Vec::new(),
        }
    }

    pub fn from_table(table: SettingsTable) -> Self {
        Self {
            table,
            ..Self::new()
        }
    }

    /// Build from a settings file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        load_table(path).map(Self::from_table)
    }

    /// Build from the user's engine settings file.
    ///
    /// Falls back to defaults when the file is missing or invalid; a broken
    /// settings file must not stop the engine from starting.
    pub fn load_default() -> Self {
        let Some(path) = engine_settings_path() else {
            return Self::new();
        };
        if !path.exists() {
            return Self::new();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring settings file {}: {e}", path.display());
                Self::new()
            }
        }
    }

    pub fn table(&self) -> &SettingsTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut SettingsTable {
        &mut self.table
    }

    pub fn defaults(&self) -> &ResolvedSettings {
        &self.defaults
    }

    pub fn add_overlay(&mut self, matcher: NameMatcher, table: SettingsTable) {
        self.overlays.push(Overlay { matcher, table });
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    /// Chain engine → matching overlays → `instance` (if any)
    pub fn chain_for<'a>(
        &'a self,
        template_name: &str,
        instance: Option<&'a SettingsTable>,
    ) -> ScopeChain<'a> {
        let mut chain = ScopeChain::new(&self.defaults);
        chain.push(ScopeLevel::Engine, &self.table);
        for (i, overlay) in self.overlays.iter().enumerate() {
            if overlay.matcher.matches(template_name) {
                log::debug!("overlay {i} ({:?}) applies to {template_name}", overlay.matcher);
                chain.push(ScopeLevel::Overlay(i), &overlay.table);
            }
        }
        if let Some(instance) = instance {
            chain.push(ScopeLevel::Instance, instance);
        }
        chain
    }

    /// Effective settings for a template with this name
    pub fn resolve_for(&self, template_name: &str) -> ResolvedSettings {
        self.chain_for(template_name, None).resolve()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
