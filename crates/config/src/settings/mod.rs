//! Settings for stencil templates
//!
//! This module provides a strongly-typed settings registry with:
//! - `SettingName`: every recognized setting, its file key and category
//! - `SettingsTable`: the settings assigned at one scope
//! - `ResolvedSettings`: concrete values after the cascade (what a template owns)
//!
//! Key design decisions:
//! - All table slots use `Setting<T>` for explicit two-state semantics (Inherit/Value)
//! - Settings are declared in one place (`table.rs`); the registry, the table
//!   and the resolved view are generated from that declaration
//! - Values are validated on assignment, never on read

mod formats;
mod locale;
mod table;
mod types;
mod value;

pub use formats::*;
pub use locale::*;
pub use table::*;
pub use types::*;
pub use value::*;
