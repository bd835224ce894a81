//! Expression evaluation against a data model
//!
//! `Expr` trees are built programmatically:
//!
//! ```
//! use stencil_engine::Expr;
//! // doc.person.name?previousSibling
//! let expr = Expr::var("doc").key("person").key("name").builtin("previousSibling");
//! assert_eq!(expr.to_string(), "doc.person.name?previousSibling");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use stencil_config::settings::{ClassicCompatibility, ExceptionHandler};

use crate::builtins::{standard_registry, BuiltinRegistry};
use crate::dom::NodeRef;
use crate::error::EngineError;
use crate::format;
use crate::model::Value;
use crate::template::Template;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Variable(String),
    /// `target.key`; on nodes, `@name` reads an attribute and `@@...` keys
    /// are node queries
    Key { target: Box<Expr>, key: String },
    /// `target?name`
    Builtin { target: Box<Expr>, name: String },
    /// `target??`
    Exists(Box<Expr>),
}

impl Expr {
    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn key(self, key: impl Into<String>) -> Self {
        Expr::Key {
            target: Box::new(self),
            key: key.into(),
        }
    }

    pub fn builtin(self, name: impl Into<String>) -> Self {
        Expr::Builtin {
            target: Box::new(self),
            name: name.into(),
        }
    }

    pub fn exists(self) -> Self {
        Expr::Exists(Box::new(self))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(Value::Text(s)) => write!(f, "{s:?}"),
            Expr::Literal(Value::Number(n)) => f.write_str(&format::computer_number(*n)),
            Expr::Literal(Value::Boolean(b)) => write!(f, "{b}"),
            Expr::Literal(other) => write!(f, "<{}>", other.type_name()),
            Expr::Variable(name) => f.write_str(name),
            Expr::Key { target, key } => write!(f, "{target}.{key}"),
            Expr::Builtin { target, name } => write!(f, "{target}?{name}"),
            Expr::Exists(target) => write!(f, "{target}??"),
        }
    }
}

/// Special node keys and the built-ins they stand for
const NODE_QUERY_KEYS: &[(&str, &str)] = &[
    ("@@previous_significant", "previousSignificantSibling"),
    ("@@next_significant", "nextSignificantSibling"),
    ("@@previous_sibling", "previousSibling"),
    ("@@next_sibling", "nextSibling"),
];

/// Evaluation state for rendering one template.
pub struct Environment<'a> {
    template: &'a Template,
    data_model: BTreeMap<String, Value>,
    registry: &'a BuiltinRegistry,
}

impl<'a> Environment<'a> {
    pub fn new(template: &'a Template, data_model: BTreeMap<String, Value>) -> Self {
        Self {
            template,
            data_model,
            registry: standard_registry(),
        }
    }

    /// Use a custom built-in registry instead of the standard one
    pub fn with_registry(mut self, registry: &'a BuiltinRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn template(&self) -> &Template {
        self.template
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.data_model.insert(name.into(), value.into());
    }

    /// Evaluate to a value, `Ok(None)` when it is missing
    pub fn evaluate(&self, expr: &Expr) -> Result<Option<Value>, EngineError> {
        match expr {
            Expr::Literal(value) => Ok(Some(value.clone())),
            Expr::Variable(name) => Ok(self.data_model.get(name).cloned()),
            Expr::Key { target, key } => {
                let value = self.require(target)?;
                self.lookup_key(&value, key)
            }
            Expr::Builtin { target, name } => {
                let value = self.require(target)?;
                self.registry.dispatch(name, &value, self.template.settings())
            }
            Expr::Exists(target) => match self.evaluate(target) {
                Ok(value) => Ok(Some(Value::Boolean(value.is_some()))),
                Err(EngineError::Undefined { .. }) => Ok(Some(Value::Boolean(false))),
                Err(e) => Err(e),
            },
        }
    }

    fn require(&self, expr: &Expr) -> Result<Value, EngineError> {
        self.evaluate(expr)?.ok_or_else(|| EngineError::Undefined {
            expression: expr.to_string(),
        })
    }

    fn lookup_key(&self, value: &Value, key: &str) -> Result<Option<Value>, EngineError> {
        match value {
            Value::Hash(map) => Ok(map.get(key).cloned()),
            Value::Node(node) => self.node_key(node, key),
            Value::NodeList(nodes) if nodes.len() == 1 => self.node_key(&nodes[0], key),
            Value::NodeList(nodes) if !key.starts_with('@') => {
                let mut found = Vec::new();
                for node in nodes {
                    found.extend(node.child_elements(key)?);
                }
                Ok(Some(Value::NodeList(found)))
            }
            other => Err(EngineError::UnsupportedBuiltin {
                builtin: key.to_string(),
                type_name: other.type_name(),
            }),
        }
    }

    fn node_key(&self, node: &NodeRef, key: &str) -> Result<Option<Value>, EngineError> {
        if let Some((_, builtin)) = NODE_QUERY_KEYS.iter().find(|(k, _)| *k == key) {
            let target = Value::Node(node.clone());
            return self.registry.dispatch(builtin, &target, self.template.settings());
        }
        match key {
            "@@text" => Ok(Some(Value::Text(node.text_content()))),
            _ if key.starts_with("@@") => Err(EngineError::UnsupportedBuiltin {
                builtin: key.to_string(),
                type_name: "node",
            }),
            _ => match key.strip_prefix('@') {
                Some(attr) => Ok(node.attribute(attr).map(Value::from)),
                None => Ok(Some(Value::NodeList(node.child_elements(key)?))),
            },
        }
    }

    /// Evaluate to text for `${...}` output.
    ///
    /// Failures go through the template's exception handler: `ignore`
    /// yields empty output, every other handler returns the error.
    pub fn interpolate(&self, expr: &Expr) -> Result<String, EngineError> {
        let settings = self.template.settings();
        let result = self.require(expr).and_then(|value| {
            format::interpolate(&value, settings).ok_or_else(|| EngineError::NotInterpolable {
                expression: expr.to_string(),
                type_name: value.type_name(),
            })
        });

        match result {
            Ok(text) => Ok(text),
            Err(EngineError::Undefined { .. })
                if settings.classic_compatible != ClassicCompatibility::Disabled =>
            {
                Ok(String::new())
            }
            Err(e) => {
                if settings.log_template_exceptions {
                    log::error!("{}: error evaluating ${{{expr}}}: {e}", self.template.name());
                }
                match settings.template_exception_handler {
                    ExceptionHandler::Ignore => Ok(String::new()),
                    _ => Err(e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use stencil_config::{Configuration, SettingName, SettingsTable};

    use super::*;
    use crate::dom::DocumentBuilder;

    fn doc() -> Value {
        let mut b = DocumentBuilder::new();
        b.start_element("book", vec![("lang".into(), "en".into())]);
        b.start_element("title", Vec::new());
        b.text("Dune").unwrap();
        b.end_element("title").unwrap();
        b.end_element("book").unwrap();
        Value::Node(b.finish().unwrap().into_root())
    }

    fn template_with(name: SettingName, value: &str) -> Template {
        let mut table = SettingsTable::new();
        table.set(name, value).unwrap();
        Template::with_settings("t.ftl", "", &Configuration::new(), &table)
    }

    fn env(template: &Template) -> Environment<'_> {
        let mut env = Environment::new(template, BTreeMap::new());
        env.set_variable("doc", doc());
        env.set_variable("n", 1234.5);
        env
    }

    #[test]
    fn node_keys_and_attributes() {
        let t = Template::new("t.ftl", "", &Configuration::new());
        let env = env(&t);
        let book = Expr::var("doc").key("book");

        assert_eq!(env.interpolate(&book.clone().key("title")).unwrap(), "Dune");
        assert_eq!(env.interpolate(&book.clone().key("@lang")).unwrap(), "en");
        assert_eq!(env.interpolate(&book.clone().key("@@text")).unwrap(), "Dune");
        assert_eq!(
            env.evaluate(&book.clone().key("@missing").exists()).unwrap(),
            Some(Value::Boolean(false))
        );
        assert_eq!(
            env.interpolate(&book.key("chapter").builtin("size")).unwrap(),
            "0"
        );
    }

    #[test]
    fn missing_values() {
        let t = Template::new("t.ftl", "", &Configuration::new());
        let env = env(&t);

        assert_eq!(
            env.evaluate(&Expr::var("nope").key("x").exists()).unwrap(),
            Some(Value::Boolean(false))
        );
        let err = env.interpolate(&Expr::var("nope")).unwrap_err();
        assert_eq!(err, EngineError::Undefined { expression: "nope".into() });
    }

    #[test]
    fn ignore_handler_swallows_errors() {
        let t = template_with(SettingName::TemplateExceptionHandler, "ignore");
        let env = env(&t);
        assert_eq!(env.interpolate(&Expr::var("n").builtin("upper_case")).unwrap(), "");
        assert_eq!(env.interpolate(&Expr::var("nope")).unwrap(), "");
    }

    #[test]
    fn debug_handlers_return_the_error() {
        for handler in ["rethrow", "debug", "html_debug"] {
            let t = template_with(SettingName::TemplateExceptionHandler, handler);
            let err = env(&t).interpolate(&Expr::var("nope")).unwrap_err();
            assert_eq!(err, EngineError::Undefined { expression: "nope".into() }, "{handler}");
        }
    }

    #[test]
    fn classic_compatible_prints_missing_as_empty() {
        let t = template_with(SettingName::ClassicCompatible, "1");
        let env = env(&t);
        assert_eq!(env.interpolate(&Expr::var("nope")).unwrap(), "");
        assert!(env.interpolate(&Expr::var("n").builtin("upper_case")).is_err());
    }

    #[test]
    fn numbers_follow_number_format() {
        let t = template_with(SettingName::NumberFormat, "0.00");
        assert_eq!(env(&t).interpolate(&Expr::var("n")).unwrap(), "1234.50");
    }

    #[test]
    fn hashes_are_not_interpolable() {
        let t = Template::new("t.ftl", "", &Configuration::new());
        let mut env = Environment::new(&t, BTreeMap::new());
        env.set_variable("h", Value::Hash(BTreeMap::new()));
        assert!(matches!(
            env.interpolate(&Expr::var("h")),
            Err(EngineError::NotInterpolable { type_name: "hash", .. })
        ));
    }

    #[test]
    fn display_round_trips_shape() {
        let expr = Expr::var("doc")
            .key("person")
            .key("@@next_significant")
            .builtin("size")
            .exists();
        assert_eq!(expr.to_string(), "doc.person.@@next_significant?size??");
        assert_eq!(Expr::literal("a").to_string(), "\"a\"");
    }
}
