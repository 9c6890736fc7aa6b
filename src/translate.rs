//! Type-mapping engine: IDL type → JSON Schema (draft-04) fragment.
//!
//! One call maps one named type. A `None` result means the type has no
//! definition worth emitting (plain numeric and unconstrained string aliases,
//! unions); references to such types are inlined by their users instead.
//!
//! Two lookups happen per reference and must not be conflated:
//! - the *declared* type decides whether a `$ref` is possible;
//! - the *base* type decides which shape family applies.
use std::fmt;

use serde_json::{Map, Value};

use crate::error::{RegistryError, TranslateError};
use crate::idl::{
    ANY, AliasTypeDef, ArrayTypeDef, BaseType, EnumTypeDef, Field, MapTypeDef, StringTypeDef,
    StructTypeDef, Type,
};
use crate::registry::TypeRegistry;

pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// A JSON Schema object, keys in insertion order.
pub type Fragment = Map<String, Value>;

#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    /// Base path for references. Accepted for compatibility; references stay
    /// document-local (`#/definitions/<Name>`).
    pub base_path: Option<String>,
}

/// Advisory raised while translating; never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    UnionNotSupported { name: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnionNotSupported { name } => write!(f, "[{name}: Unions not supported]"),
        }
    }
}

/// Whether integer collection elements also carry a `format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntegerFormat {
    Omit,
    Include,
}

// ————————————————————————————————————————————————————————————————————————————
// ENGINE
// ————————————————————————————————————————————————————————————————————————————

pub struct Translator<'r, 'a> {
    registry: &'r TypeRegistry<'a>,
    diagnostics: Vec<Diagnostic>,
}

impl<'r, 'a> Translator<'r, 'a> {
    pub fn new(registry: &'r TypeRegistry<'a>) -> Self {
        Self { registry, diagnostics: Vec::new() }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn translate(&mut self, t: &Type) -> Result<Option<Fragment>, TranslateError> {
        match t {
            Type::Struct(def) => self.struct_def(def).map(Some),
            Type::Array(def) => self.array_def(def).map(Some),
            Type::Map(def) => self.map_def(def).map(Some),
            Type::Enum(def) => Ok(Some(enum_def(def))),
            Type::String(def) => Ok(string_def(def)),
            Type::Union(def) => {
                tracing::debug!(union = %def.name, variants = ?def.variants, "skipping union");
                self.diagnostics.push(Diagnostic::UnionNotSupported { name: def.name.clone() });
                Ok(None)
            }
            Type::Alias(def) => self.alias_def(def),
            Type::Base(base) => Err(TranslateError::UnsupportedType {
                name: base.to_string(),
                base: *base,
            }),
        }
    }

    fn struct_def(&self, def: &StructTypeDef) -> Result<Fragment, TranslateError> {
        let mut out = Fragment::new();
        describe(&mut out, def.comment.as_deref());

        let mut properties = Fragment::new();
        let mut required = Vec::<Value>::new();
        for field in &def.fields {
            if !field.optional {
                required.push(Value::from(field.name.clone()));
            }
            properties.insert(field.name.clone(), Value::Object(self.field_property(field)?));
        }
        out.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            out.insert("required".into(), Value::Array(required));
        }
        Ok(out)
    }

    fn field_property(&self, field: &Field) -> Result<Fragment, TranslateError> {
        let declared = self.registry.find_type(&field.type_ref)?;
        let base = self.registry.base_type(declared)?;

        let mut prop = Fragment::new();
        describe(&mut prop, field.comment());
        match base {
            BaseType::Array => {
                prop.insert("type".into(), "array".into());
                // an array alias already knows its element type
                let items = field.items().or(match declared {
                    Type::Array(alias) => Some(alias.items.as_str()),
                    _ => None,
                });
                if let Some(items) = items.filter(|items| *items != ANY) {
                    let items = self.element(items, IntegerFormat::Omit)?;
                    prop.insert("items".into(), Value::Object(items));
                }
            }
            BaseType::String => prop.extend(self.string_ref(&field.type_ref)?),
            BaseType::Int16 | BaseType::Int32 | BaseType::Int64 => {
                // struct fields never carry an integer `format`
                prop.insert("type".into(), "integer".into());
            }
            BaseType::Int8 => prop.extend(byte_string()),
            BaseType::Struct | BaseType::Enum => prop.extend(definition_ref(&field.type_ref)),
            BaseType::Map => {
                prop.insert("type".into(), "object".into());
                let items = field.items().or(match declared {
                    Type::Map(alias) => Some(alias.items.as_str()),
                    _ => None,
                });
                if let Some(items) = items.filter(|items| *items != ANY) {
                    let items = self.element(items, IntegerFormat::Include)?;
                    prop.insert("additionalProperties".into(), Value::Object(items));
                }
            }
            _ => prop.extend(unmapped(&field.type_ref)),
        }
        Ok(prop)
    }

    fn array_def(&self, def: &ArrayTypeDef) -> Result<Fragment, TranslateError> {
        let base = self.registry.find_base_type(&def.supertype)?;
        let mut out = Fragment::new();
        describe(&mut out, def.comment.as_deref());
        out.insert("type".into(), base.as_str().to_lowercase().into());
        if def.items != ANY {
            let items = self.element(&def.items, IntegerFormat::Include)?;
            out.insert("items".into(), Value::Object(items));
        }
        Ok(out)
    }

    fn map_def(&self, def: &MapTypeDef) -> Result<Fragment, TranslateError> {
        let mut out = Fragment::new();
        describe(&mut out, def.comment.as_deref());
        out.insert("type".into(), "object".into());
        if def.items != ANY {
            let items = self.element(&def.items, IntegerFormat::Include)?;
            out.insert("additionalProperties".into(), Value::Object(items));
        }
        Ok(out)
    }

    fn alias_def(&self, def: &AliasTypeDef) -> Result<Option<Fragment>, TranslateError> {
        let base = self.registry.find_base_type(&def.supertype)?;
        match base {
            // users of the alias inline it
            base if base.is_numeric() => Ok(None),
            BaseType::String => Ok(None),
            BaseType::Struct => {
                let mut out = Fragment::new();
                describe(&mut out, def.comment.as_deref());
                out.insert("type".into(), "object".into());
                Ok(Some(out))
            }
            base => Err(TranslateError::UnsupportedType { name: def.name.clone(), base }),
        }
    }

    /// Schema for one element of a collection.
    fn element(&self, reference: &str, format: IntegerFormat) -> Result<Fragment, TranslateError> {
        let base = self.registry.find_base_type(reference)?;
        match base {
            BaseType::String => self.string_ref(reference),
            BaseType::Int8 => Ok(byte_string()),
            base if base.is_wide_integer() => {
                let mut out = Fragment::new();
                out.insert("type".into(), "integer".into());
                if format == IntegerFormat::Include {
                    out.insert("format".into(), reference.to_lowercase().into());
                }
                Ok(out)
            }
            _ => self.nearest_ref(reference),
        }
    }

    /// `$ref` to the nearest type on the alias chain of `reference` that
    /// produces a definition; built-in names end the chain. A union on the
    /// chain yields the unmapped sentinel.
    fn nearest_ref(&self, reference: &str) -> Result<Fragment, TranslateError> {
        let mut current = reference;
        for _ in 0..=self.registry.len() {
            let declared = self.registry.find_type(current)?;
            let defined = match declared {
                Type::Struct(_) | Type::Array(_) | Type::Map(_) | Type::Enum(_) | Type::Base(_) => true,
                Type::String(def) => def.has_constraints(),
                Type::Alias(def) => self.registry.find_base_type(&def.supertype)? == BaseType::Struct,
                Type::Union(_) => return Ok(unmapped(reference)),
            };
            match declared.supertype() {
                Some(next) if !defined => current = next,
                _ => return Ok(definition_ref(current)),
            }
        }
        Err(RegistryError::AliasCycle(reference.to_string()).into())
    }

    /// A string-valued reference refers to the nearest type on its alias chain
    /// that produces a definition, or is inlined once the chain reaches `String`.
    fn string_ref(&self, reference: &str) -> Result<Fragment, TranslateError> {
        let mut current = reference;
        for _ in 0..=self.registry.len() {
            let declared = self.registry.find_type(current)?;
            if let Type::String(def) = declared {
                if def.has_constraints() {
                    return Ok(definition_ref(current));
                }
            }
            match declared.supertype() {
                Some(next) => current = next,
                None => {
                    let mut out = Fragment::new();
                    out.insert("type".into(), "string".into());
                    return Ok(out);
                }
            }
        }
        Err(RegistryError::AliasCycle(reference.to_string()).into())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// LEAF SHAPES
// ————————————————————————————————————————————————————————————————————————————

fn enum_def(def: &EnumTypeDef) -> Fragment {
    let mut out = Fragment::new();
    describe(&mut out, def.comment.as_deref());
    let symbols = def.elements.iter().map(|el| Value::from(el.symbol.clone())).collect();
    out.insert("enum".into(), Value::Array(symbols));
    out
}

fn string_def(def: &StringTypeDef) -> Option<Fragment> {
    if !def.has_constraints() {
        return None;
    }
    let mut out = Fragment::new();
    describe(&mut out, def.comment.as_deref());
    out.insert("type".into(), "string".into());
    if let Some(max) = def.max_size {
        out.insert("maxLength".into(), max.into());
    }
    if let Some(min) = def.min_size {
        out.insert("minLength".into(), min.into());
    }
    if let Some(pattern) = def.pattern.as_deref().filter(|p| !p.is_empty()) {
        out.insert("pattern".into(), pattern.into());
    }
    if !def.values.is_empty() {
        let values = def.values.iter().cloned().map(Value::from).collect();
        out.insert("enum".into(), Value::Array(values));
    }
    Some(out)
}

pub fn definition_ref(name: &str) -> Fragment {
    let mut out = Fragment::new();
    out.insert("$ref".into(), format!("{DEFINITIONS_PREFIX}{name}").into());
    out
}

/// Not a valid type: marks an unmapped reference for human inspection.
fn unmapped(name: &str) -> Fragment {
    let mut out = Fragment::new();
    out.insert("type".into(), format!("_{name}_").into());
    out
}

fn byte_string() -> Fragment {
    let mut out = Fragment::new();
    out.insert("type".into(), "string".into());
    out.insert("format".into(), "byte".into());
    out
}

fn describe(out: &mut Fragment, comment: Option<&str>) {
    if let Some(comment) = comment.filter(|c| !c.is_empty()) {
        out.insert("description".into(), comment.into());
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
