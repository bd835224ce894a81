use std::fmt;

use stencil_engine::EngineError;

#[derive(Debug, Clone, PartialEq)]
pub enum XmlError {
    /// Malformed XML (syntax, bad entity, bad attribute).
    Parse { position: usize, message: String },
    /// Well-formed events that do not make a document (unbalanced tags, text outside the root).
    Structure(String),
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for XmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { position, message } => {
                write!(f, "XML parse error at byte {position}: {message}")
            }
            Self::Structure(msg) => write!(f, "XML structure error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for XmlError {}

impl From<EngineError> for XmlError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Document(msg) => Self::Structure(msg),
            other => Self::Structure(other.to_string()),
        }
    }
}
