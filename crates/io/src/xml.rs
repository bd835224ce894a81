//! XML → `Document`
//!
//! Whitespace is preserved (`trim_text(false)`): blank text between elements
//! becomes text nodes, which is what sibling navigation must see. Entity
//! references are resolved and merged into the surrounding text.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use encoding_rs::Encoding;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use stencil_config::settings::Charset;
use stencil_engine::{Document, DocumentBuilder, NodeRef};

use crate::error::XmlError;

/// Parse XML text into a document
pub fn parse_document(xml: &str) -> Result<Document, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut builder = DocumentBuilder::new();

    let parse_err = |reader: &Reader<&[u8]>, message: String| XmlError::Parse {
        position: reader.buffer_position() as usize,
        message,
    };

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let (name, attributes) = element_parts(e).map_err(|m| parse_err(&reader, m))?;
                builder.start_element(&name, attributes);
            }
            Ok(Event::Empty(ref e)) => {
                let (name, attributes) = element_parts(e).map_err(|m| parse_err(&reader, m))?;
                builder.start_element(&name, attributes);
                builder.end_element(&name)?;
            }
            Ok(Event::End(ref e)) => {
                builder.end_element(&String::from_utf8_lossy(e.name().as_ref()))?;
            }
            Ok(Event::Text(ref e)) => {
                let content = e.decode().map_err(|err| parse_err(&reader, err.to_string()))?;
                builder.text(&content)?;
            }
            Ok(Event::GeneralRef(ref e)) => {
                let raw = e.decode().map_err(|err| parse_err(&reader, err.to_string()))?;
                let content = resolve_entity(&raw).map_err(|m| parse_err(&reader, m))?;
                builder.text(&content)?;
            }
            Ok(Event::CData(ref e)) => {
                builder.cdata(&String::from_utf8_lossy(e))?;
            }
            Ok(Event::Comment(ref e)) => {
                builder.comment(&String::from_utf8_lossy(e));
            }
            Ok(Event::PI(ref e)) => {
                let target = String::from_utf8_lossy(e.target()).into_owned();
                let content = String::from_utf8_lossy(e.content());
                builder.processing_instruction(&target, content.trim_start());
            }
            Ok(Event::Decl(_)) | Ok(Event::DocType(_)) => {}
            Ok(Event::Eof) => break,
            Err(e) => return Err(parse_err(&reader, e.to_string())),
        }
        buf.clear();
    }

    let document = builder.finish()?;
    log::debug!("parsed XML document with {} nodes", document.len());
    Ok(document)
}

fn element_parts(e: &BytesStart<'_>) -> Result<(String, Vec<(String, String)>), String> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|err| err.to_string())?.into_owned();
        attributes.push((key, value));
    }
    Ok((name, attributes))
}

/// Named (`amp`, `lt`, ...) or numeric (`#10`, `#x9`) entity to its text
fn resolve_entity(raw: &str) -> Result<String, String> {
    if let Some(resolved) = resolve_xml_entity(raw) {
        return Ok(resolved.to_string());
    }
    let Some(rest) = raw.strip_prefix('#') else {
        return Err(format!("unknown entity &{raw};"));
    };
    let code = match rest.strip_prefix('x').or_else(|| rest.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => rest.parse::<u32>(),
    }
    .map_err(|_| format!("invalid numeric entity &{raw};"))?;
    char::from_u32(code)
        .map(|c| c.to_string())
        .ok_or_else(|| format!("invalid code point {code} in &{raw};"))
}

/// Decode raw bytes to text.
///
/// A byte-order mark wins; otherwise `fallback` is used. Malformed sequences
/// are replaced and logged.
pub fn decode_bytes<'a>(bytes: &'a [u8], fallback: &'static Encoding) -> Cow<'a, str> {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((fallback, 0));
    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
    if had_errors {
        log::warn!("malformed {} input, invalid sequences replaced", encoding.name());
    }
    text
}

/// Load an XML file (UTF-8 unless it carries a byte-order mark) and return
/// its document node.
pub fn load_document(path: &Path) -> Result<NodeRef, XmlError> {
    load_document_with(path, &Charset::utf8())
}

/// Load an XML file, decoding input without a byte-order mark as `charset`
pub fn load_document_with(path: &Path, charset: &Charset) -> Result<NodeRef, XmlError> {
    let bytes = fs::read(path).map_err(|e| XmlError::Io(format!("{}: {e}", path.display())))?;
    let text = decode_bytes(&bytes, charset.encoding());
    Ok(parse_document(&text)?.into_root())
}
