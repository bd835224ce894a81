//! Template engine core: templates, the data model, tree nodes and built-ins
//!
//! Settings live in `stencil-config`; this crate consumes the resolved view.

pub mod builtins;
pub mod dom;
pub mod error;
pub mod eval;
pub mod format;
pub mod model;
pub mod template;

pub use builtins::{standard_registry, BuiltinFn, BuiltinRegistry, Invocation};
pub use dom::{Document, DocumentBuilder, ForeignTree, NodeId, NodeKind, NodeRef, Significance};
pub use error::EngineError;
pub use eval::{Environment, Expr};
pub use model::{Capabilities, Value};
pub use template::Template;
