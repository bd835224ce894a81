use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// No implementation of the built-in for any capability of the value.
    UnsupportedBuiltin { builtin: String, type_name: &'static str },
    /// A node's parent does not list it as a child, or a child names another parent.
    MalformedDocumentReference { node: String, reason: String },
    /// Expression evaluated to nothing where a value was required.
    Undefined { expression: String },
    /// Value has no text form (hash, sequence, several nodes).
    NotInterpolable { expression: String, type_name: &'static str },
    /// Document construction error (unbalanced tags, text outside the root).
    Document(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedBuiltin { builtin, type_name } => {
                write!(f, "built-in '{builtin}' is not supported for {type_name} values")
            }
            Self::MalformedDocumentReference { node, reason } => {
                write!(f, "malformed document reference at {node}: {reason}")
            }
            Self::Undefined { expression } => {
                write!(f, "the following has evaluated to null or missing: {expression}")
            }
            Self::NotInterpolable { expression, type_name } => {
                write!(f, "cannot interpolate {expression}: {type_name} has no text form")
            }
            Self::Document(msg) => write!(f, "document error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
