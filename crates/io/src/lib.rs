//! Document loading for stencil templates
//!
//! Parses XML into the engine's in-memory `Document`, keeping every text,
//! CDATA, comment and processing-instruction node so templates can walk
//! siblings exactly as they appear in the source.

pub mod error;
pub mod xml;

pub use error::XmlError;
pub use xml::{decode_bytes, load_document, load_document_with, parse_document};
