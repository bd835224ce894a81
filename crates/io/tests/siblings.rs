//! Sibling navigation over a parsed XML document.
//!
//! The fixture mixes whitespace text, a comment, a blank CDATA section and a
//! non-blank one between elements of `<person>`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use stencil_config::settings::Charset;
use stencil_config::Configuration;
use stencil_engine::{EngineError, Environment, Expr, Template, Value};
use stencil_io::{load_document, load_document_with, parse_document};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn sibling_template() -> Template {
    Template::new("sibling.ftl", "", &Configuration::new())
}

fn environment(template: &Template) -> Environment<'_> {
    let doc = load_document(&fixture_path("sibling_data_model.xml"))
        .unwrap_or_else(|e| panic!("cannot load fixture: {e}"));
    let mut data = BTreeMap::new();
    data.insert("doc".to_string(), Value::Node(doc));
    Environment::new(template, data)
}

/// `doc.person.<child>`
fn child(name: &str) -> Expr {
    Expr::var("doc").key("person").key(name)
}

fn render(env: &Environment<'_>, expr: &Expr) -> String {
    env.interpolate(expr)
        .unwrap_or_else(|e| panic!("${{{expr}}} failed: {e}"))
}

#[test]
fn test_previous_sibling_is_whitespace() {
    let t = sibling_template();
    let env = environment(&t);
    assert_eq!(render(&env, &child("name").builtin("previousSibling")), "\n    ");
}

#[test]
fn test_previous_sibling_without_whitespace() {
    let t = sibling_template();
    let env = environment(&t);
    assert_eq!(render(&env, &child("address").builtin("previousSibling")), "12th August");
}

#[test]
fn test_next_sibling() {
    let t = sibling_template();
    let env = environment(&t);
    assert_eq!(render(&env, &child("name").builtin("nextSibling")), "\n    ");
    assert_eq!(render(&env, &child("dob").builtin("next_sibling")), "Chennai, India");
}

#[test]
fn test_root_element_has_no_previous_sibling() {
    let t = sibling_template();
    let env = environment(&t);
    let expr = Expr::var("doc").key("person").builtin("previousSibling").exists();
    assert_eq!(env.evaluate(&expr).unwrap(), Some(Value::Boolean(false)));
}

#[test]
fn test_first_child_without_leading_whitespace() {
    let doc = parse_document("<person><name>pradeep</name><dob/></person>").unwrap();
    let t = sibling_template();
    let mut env = Environment::new(&t, BTreeMap::new());
    env.set_variable("doc", doc.into_root());

    let name = Expr::var("doc").key("person").key("name");
    assert_eq!(
        env.evaluate(&name.clone().builtin("previousSibling").exists()).unwrap(),
        Some(Value::Boolean(false))
    );
    assert_eq!(
        env.evaluate(&name.builtin("nextSibling").builtin("node_name")).unwrap(),
        Some(Value::from("dob"))
    );
}

#[test]
fn test_significant_siblings() {
    let t = sibling_template();
    let env = environment(&t);
    assert_eq!(render(&env, &child("name").key("@@previous_significant")), "male");
    assert_eq!(render(&env, &child("name").key("@@next_significant")), "12th August");
}

#[test]
fn test_significant_sibling_skips_comment() {
    let t = sibling_template();
    let env = environment(&t);
    assert_eq!(
        render(&env, &child("profession").key("@@previous_significant")),
        "Chennai, India"
    );
}

#[test]
fn test_significant_sibling_skips_blank_cdata() {
    let t = sibling_template();
    let env = environment(&t);
    assert_eq!(
        render(&env, &child("hobby").key("@@previous_significant")),
        "Software Engineer"
    );
    assert_eq!(
        render(&env, &child("profession").builtin("nextSignificantSibling")),
        "gardening"
    );
}

#[test]
fn test_non_blank_cdata_is_significant() {
    let t = sibling_template();
    let env = environment(&t);
    assert_eq!(
        render(&env, &child("phone").key("@@previous_significant")),
        "\n    this is a valid cdata\n    "
    );
    assert_eq!(
        render(&env, &child("phone").key("@@previous_significant").builtin("node_type")),
        "cdata"
    );
}

#[test]
fn test_exhausted_significant_sibling_is_empty() {
    let t = sibling_template();
    let env = environment(&t);
    assert_eq!(render(&env, &child("phone").key("@@next_significant").builtin("size")), "0");
    assert_eq!(render(&env, &child("gender").key("@@previous_significant").builtin("size")), "0");

    let err = env
        .interpolate(&child("phone").key("@@next_significant"))
        .unwrap_err();
    assert!(matches!(err, EngineError::NotInterpolable { .. }), "{err}");
}

#[test]
fn test_sibling_builtin_on_text_is_unsupported() {
    let t = sibling_template();
    let mut env = environment(&t);
    env.set_variable("s", "plain");
    let err = env.interpolate(&Expr::var("s").builtin("previousSibling")).unwrap_err();
    assert_eq!(
        err,
        EngineError::UnsupportedBuiltin {
            builtin: "previousSibling".into(),
            type_name: "string",
        }
    );
}

#[test]
fn test_data_charset_drives_loading() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.xml");
    // "café" in windows-1252, no byte-order mark
    std::fs::write(&path, b"<p>caf\xE9</p>").unwrap();

    let charset: Charset = "windows-1252".parse().unwrap();
    let doc = load_document_with(&path, &charset).unwrap();
    // the template's own source encoding plays no part
    let t = Template::new("latin1.ftl", "", &Configuration::new());
    assert_eq!(t.settings().encoding, Charset::utf8());
    let mut env = Environment::new(&t, BTreeMap::new());
    env.set_variable("doc", doc);
    assert_eq!(render(&env, &Expr::var("doc").key("p")), "café");
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_document(&fixture_path("does_not_exist.xml")).unwrap_err();
    assert!(matches!(err, stencil_io::XmlError::Io(_)));
}
