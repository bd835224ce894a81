//! Built-in dispatch (`value?name`)
//!
//! Each built-in name maps to implementations keyed by capability. A call
//! picks the implementation for the first capability of the value, in
//! `Capabilities::PRECEDENCE` order, that has one registered.

mod collections;
mod scalar;
mod tree;

use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use stencil_config::ResolvedSettings;

use crate::dom::NodeRef;
use crate::error::EngineError;
use crate::model::{Capabilities, Value};

/// One built-in call: the name it was invoked under, its target and the
/// settings of the template being rendered.
pub struct Invocation<'a> {
    pub name: &'a str,
    pub target: &'a Value,
    pub settings: &'a ResolvedSettings,
}

impl Invocation<'_> {
    pub fn unsupported(&self) -> EngineError {
        EngineError::UnsupportedBuiltin {
            builtin: self.name.to_string(),
            type_name: self.target.type_name(),
        }
    }

    pub fn node(&self) -> Result<&NodeRef, EngineError> {
        self.target.as_node().ok_or_else(|| self.unsupported())
    }

    pub fn text(&self) -> Result<String, EngineError> {
        self.target.scalar_text().ok_or_else(|| self.unsupported())
    }

    pub fn number(&self) -> Result<f64, EngineError> {
        match self.target {
            Value::Number(n) => Ok(*n),
            _ => Err(self.unsupported()),
        }
    }

    pub fn boolean(&self) -> Result<bool, EngineError> {
        match self.target {
            Value::Boolean(b) => Ok(*b),
            _ => Err(self.unsupported()),
        }
    }

    pub fn items(&self) -> Result<Vec<Value>, EngineError> {
        self.target.items().ok_or_else(|| self.unsupported())
    }
}

/// A built-in implementation. `Ok(None)` means "no value" (e.g. no sibling).
pub type BuiltinFn = fn(&Invocation<'_>) -> Result<Option<Value>, EngineError>;

#[derive(Clone, Default)]
pub struct BuiltinRegistry {
    table: FxHashMap<&'static str, Vec<(Capabilities, BuiltinFn)>>,
}

impl std::fmt::Debug for BuiltinRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.table.keys().collect();
        names.sort();
        f.debug_struct("BuiltinRegistry").field("names", &names).finish()
    }
}

impl BuiltinRegistry {
    /// A registry with nothing registered
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every built-in the engine ships with
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        tree::register(&mut registry);
        scalar::register(&mut registry);
        collections::register(&mut registry);
        registry
    }

    /// Register `f` for values with `capability`, replacing a previous
    /// registration of the same name and capability.
    pub fn register(&mut self, name: &'static str, capability: Capabilities, f: BuiltinFn) {
        let impls = self.table.entry(name).or_default();
        impls.retain(|(cap, _)| *cap != capability);
        impls.push((capability, f));
    }

    pub fn register_aliases(&mut self, names: &[&'static str], capability: Capabilities, f: BuiltinFn) {
        for name in names {
            self.register(name, capability, f);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Implementation a value with `capabilities` would get for `name`
    pub fn resolve(&self, name: &str, capabilities: Capabilities) -> Option<(Capabilities, BuiltinFn)> {
        let impls = self.table.get(name)?;
        capabilities.by_precedence().find_map(|wanted| {
            impls
                .iter()
                .find(|(cap, _)| *cap == wanted)
                .map(|(cap, f)| (*cap, *f))
        })
    }

    pub fn dispatch(
        &self,
        name: &str,
        target: &Value,
        settings: &ResolvedSettings,
    ) -> Result<Option<Value>, EngineError> {
        let invocation = Invocation { name, target, settings };
        let Some((capability, f)) = self.resolve(name, target.capabilities()) else {
            log::trace!("?{name}: no implementation for {}", target.type_name());
            return Err(invocation.unsupported());
        };
        log::trace!("?{name}: {} dispatched as {capability}", target.type_name());
        f(&invocation)
    }
}

/// Shared instance of [`BuiltinRegistry::standard`]
pub fn standard_registry() -> &'static BuiltinRegistry {
    static STANDARD: OnceLock<BuiltinRegistry> = OnceLock::new();
    STANDARD.get_or_init(BuiltinRegistry::standard)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn which(inv: &Invocation<'_>) -> Result<Option<Value>, EngineError> {
        Ok(Some(Value::Text(format!("scalar:{}", inv.text()?))))
    }

    #[test]
    fn unknown_name_is_unsupported() {
        let registry = BuiltinRegistry::standard();
        let err = registry
            .dispatch("no_such_builtin", &Value::from("x"), &ResolvedSettings::defaults())
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::UnsupportedBuiltin {
                builtin: "no_such_builtin".into(),
                type_name: "string"
            }
        );
    }

    #[test]
    fn register_replaces_same_capability() {
        let mut registry = BuiltinRegistry::empty();
        registry.register("probe", Capabilities::SCALAR, |_| Ok(None));
        registry.register("probe", Capabilities::SCALAR, which);

        let out = registry
            .dispatch("probe", &Value::from("v"), &ResolvedSettings::defaults())
            .unwrap();
        assert_eq!(out, Some(Value::from("scalar:v")));
        assert!(registry.contains("probe"));
    }

    #[test]
    fn standard_registry_is_shared() {
        assert!(std::ptr::eq(standard_registry(), standard_registry()));
        assert!(standard_registry().contains("previousSibling"));
        assert!(standard_registry().contains("previous_sibling"));
    }
}
