//! Settings cascade for the stencil template engine
//!
//! Tables are assigned per scope (engine, overlay, template instance),
//! merged with right-most-wins precedence, resolved against hard-coded
//! defaults, and applied to templates with parse-time settings frozen
//! after compilation.

pub mod apply;
pub mod cascade;
pub mod error;
pub mod persistence;
pub mod settings;

pub use apply::{configure, ConfigTarget, ConfigureReport};
pub use cascade::{
    merge, resolve_effective, Configuration, NameMatcher, Overlay, ScopeChain, ScopeLevel,
};
pub use error::SettingsError;
pub use persistence::{engine_settings_path, load_table, save_table};
pub use settings::{
    ResolvedSettings, Setting, SettingCategory, SettingName, SettingValue, SettingsTable,
};
