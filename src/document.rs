//! Document assembly: one draft-04 document holding a definition per named type.
use serde::Serialize;
use serde_json::{Map, Value};
use serde_json::ser::PrettyFormatter;

use crate::error::TranslateError;
use crate::idl::Schema;
use crate::registry::TypeRegistry;
use crate::translate::{Diagnostic, TranslateOptions, Translator};

pub const DRAFT_04: &str = "http://json-schema.org/draft-04/schema#";

#[derive(Debug, Clone)]
pub struct Document {
    pub body: Value,
    /// Advisories gathered along the way, in declaration order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Translate every declared type. `definitions` is only present when at least
/// one type produced a fragment.
pub fn generate(schema: &Schema, options: &TranslateOptions) -> Result<Document, TranslateError> {
    if let Some(base_path) = options.base_path.as_deref() {
        tracing::debug!(base_path, "base path accepted; references stay document-local");
    }
    let registry = TypeRegistry::new(schema);
    let mut translator = Translator::new(&registry);

    let mut definitions = Map::new();
    for t in &schema.types {
        match translator.translate(t)? {
            Some(fragment) => {
                definitions.insert(t.name().to_string(), Value::Object(fragment));
            }
            None => tracing::debug!(name = t.name(), "no definition emitted"),
        }
    }

    let mut body = Map::new();
    body.insert("$schema".into(), DRAFT_04.into());
    if !definitions.is_empty() {
        body.insert("definitions".into(), Value::Object(definitions));
    }
    tracing::info!(schema = %schema.name, types = schema.types.len(), "translated schema");
    Ok(Document { body: Value::Object(body), diagnostics: translator.into_diagnostics() })
}

/// Four-space indentation, trailing newline.
pub fn render(document: &Value) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    document.serialize(&mut ser)?;
    out.push(b'\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema(v: Value) -> Schema {
        serde_json::from_value(v).unwrap()
    }

    fn rendered(schema: &Schema) -> String {
        let doc = generate(schema, &TranslateOptions::default()).unwrap();
        String::from_utf8(render(&doc.body).unwrap()).unwrap()
    }

    #[test]
    fn empty_schema_is_just_the_draft() {
        let s = schema(json!({"name": "Empty", "types": []}));
        assert_eq!(rendered(&s), "{\n    \"$schema\": \"http://json-schema.org/draft-04/schema#\"\n}\n");
    }

    #[test]
    fn definitions_follow_declaration_order_and_skip_empty_fragments() {
        let s = schema(json!({"name": "Zoo", "types": [
            {"type": "Struct", "name": "Zebra", "fields": [{"name": "age", "type": "Age"}]},
            {"type": "Int32", "name": "Age"},
            {"type": "Enum", "name": "Color", "elements": [{"symbol": "BLACK"}, {"symbol": "WHITE"}]},
            {"type": "Struct", "name": "Aardvark", "fields": []}
        ]}));
        let doc = generate(&s, &TranslateOptions::default()).unwrap();
        let names: Vec<&String> = doc.body["definitions"].as_object().unwrap().keys().collect();
        assert_eq!(names, ["Zebra", "Color", "Aardvark"]);
        assert_eq!(doc.body["definitions"]["Zebra"], json!({
            "properties": {"age": {"type": "integer"}},
            "required": ["age"]
        }));
    }

    #[test]
    fn only_empty_fragments_means_no_definitions() {
        let s = schema(json!({"name": "Ages", "types": [{"type": "Int32", "name": "Age"}]}));
        let doc = generate(&s, &TranslateOptions::default()).unwrap();
        assert_eq!(doc.body, json!({"$schema": DRAFT_04}));
    }

    #[test]
    fn unions_surface_as_diagnostics() {
        let s = schema(json!({"name": "U", "types": [
            {"type": "Union", "name": "Shape", "variants": ["Int32", "String"]},
            {"type": "Struct", "name": "Box", "fields": [{"name": "shape", "type": "Shape"}]}
        ]}));
        let doc = generate(&s, &TranslateOptions { base_path: Some("/api".into()) }).unwrap();
        assert_eq!(doc.diagnostics.len(), 1);
        assert_eq!(doc.diagnostics[0].to_string(), "[Shape: Unions not supported]");
        assert!(doc.body["definitions"].get("Shape").is_none());
        assert_eq!(doc.body["definitions"]["Box"]["properties"]["shape"], json!({"type": "_Shape_"}));
    }

    #[test]
    fn rendering_is_indented_and_stable() {
        let s = schema(json!({"name": "P", "types": [
            {"type": "Struct", "name": "Point", "fields": [{"name": "x", "type": "Int32"}]}
        ]}));
        let first = rendered(&s);
        assert_eq!(first, rendered(&s));
        assert!(first.ends_with("}\n"));
        assert!(first.contains("\n    \"definitions\": {\n        \"Point\": {\n"));
    }

    #[test]
    fn fatal_types_abort_the_document() {
        let s = schema(json!({"name": "Bad", "types": [{"type": "Timestamp", "name": "When"}]}));
        assert!(generate(&s, &TranslateOptions::default()).is_err());
    }
}
