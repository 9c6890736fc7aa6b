//! Strongly-typed IDL schema model, as streamed by the upstream parser.
//!
//! Type entries arrive as plain objects; the variant is recognized from the
//! keys that are present (see `RawType`). Keys with no JSON Schema
//! counterpart (map key types, enum symbol comments) are read past.

use std::fmt;
use serde::Deserialize;

pub type TypeRef = String;

/// Element type that means "anything"; collections over it carry no element schema.
pub const ANY: &str = "Any";

#[derive(Debug, Clone, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub types: Vec<Type>,
}

// ————————————————————————————————————————————————————————————————————————————
// BASE TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Bool,
    Timestamp,
    UUID,
    Symbol,
    Array,
    Map,
    Struct,
    Enum,
    Union,
    Any,
}

impl BaseType {
    pub const ALL: [BaseType; 17] = [
        BaseType::Int8,
        BaseType::Int16,
        BaseType::Int32,
        BaseType::Int64,
        BaseType::Float32,
        BaseType::Float64,
        BaseType::String,
        BaseType::Bool,
        BaseType::Timestamp,
        BaseType::UUID,
        BaseType::Symbol,
        BaseType::Array,
        BaseType::Map,
        BaseType::Struct,
        BaseType::Enum,
        BaseType::Union,
        BaseType::Any,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BaseType::Int8 => "Int8",
            BaseType::Int16 => "Int16",
            BaseType::Int32 => "Int32",
            BaseType::Int64 => "Int64",
            BaseType::Float32 => "Float32",
            BaseType::Float64 => "Float64",
            BaseType::String => "String",
            BaseType::Bool => "Bool",
            BaseType::Timestamp => "Timestamp",
            BaseType::UUID => "UUID",
            BaseType::Symbol => "Symbol",
            BaseType::Array => "Array",
            BaseType::Map => "Map",
            BaseType::Struct => "Struct",
            BaseType::Enum => "Enum",
            BaseType::Union => "Union",
            BaseType::Any => "Any",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|base| base.as_str() == name)
    }

    /// Int16, Int32 and Int64; the integer widths JSON Schema can carry as `integer`.
    pub fn is_wide_integer(self) -> bool {
        matches!(self, BaseType::Int16 | BaseType::Int32 | BaseType::Int64)
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            BaseType::Int8
                | BaseType::Int16
                | BaseType::Int32
                | BaseType::Int64
                | BaseType::Float32
                | BaseType::Float64
        )
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TYPE DEFINITIONS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawType")]
pub enum Type {
    Struct(StructTypeDef),
    Array(ArrayTypeDef),
    Map(MapTypeDef),
    Enum(EnumTypeDef),
    String(StringTypeDef),
    Union(UnionTypeDef),
    Alias(AliasTypeDef),
    /// Built-in primitive; only ever produced by the registry.
    Base(BaseType),
}

#[derive(Debug, Clone)]
pub struct StructTypeDef {
    pub supertype: TypeRef,
    pub name: String,
    pub comment: Option<String>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone)]
pub struct ArrayTypeDef {
    pub supertype: TypeRef,
    pub name: String,
    pub comment: Option<String>,
    pub items: TypeRef,
}

#[derive(Debug, Clone)]
pub struct MapTypeDef {
    pub supertype: TypeRef,
    pub name: String,
    pub comment: Option<String>,
    pub items: TypeRef,
}

#[derive(Debug, Clone)]
pub struct EnumTypeDef {
    pub supertype: TypeRef,
    pub name: String,
    pub comment: Option<String>,
    pub elements: Vec<EnumElementDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumElementDef {
    pub symbol: String,
}

/// A string alias carrying constraints.
#[derive(Debug, Clone)]
pub struct StringTypeDef {
    pub supertype: TypeRef,
    pub name: String,
    pub comment: Option<String>,
    pub pattern: Option<String>,
    pub values: Vec<String>,
    pub min_size: Option<i64>,
    pub max_size: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct UnionTypeDef {
    pub supertype: TypeRef,
    pub name: String,
    pub comment: Option<String>,
    pub variants: Vec<TypeRef>,
}

/// A bare alias: a new name for another type, with nothing added.
#[derive(Debug, Clone)]
pub struct AliasTypeDef {
    pub supertype: TypeRef,
    pub name: String,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub items: Option<TypeRef>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Field {
    pub fn items(&self) -> Option<&str> {
        non_empty(&self.items)
    }
    pub fn comment(&self) -> Option<&str> {
        non_empty(&self.comment)
    }
}

impl StringTypeDef {
    pub fn has_constraints(&self) -> bool {
        non_empty(&self.pattern).is_some()
            || !self.values.is_empty()
            || self.min_size.is_some()
            || self.max_size.is_some()
    }
}

impl Type {
    pub fn name(&self) -> &str {
        match self {
            Type::Struct(t) => &t.name,
            Type::Array(t) => &t.name,
            Type::Map(t) => &t.name,
            Type::Enum(t) => &t.name,
            Type::String(t) => &t.name,
            Type::Union(t) => &t.name,
            Type::Alias(t) => &t.name,
            Type::Base(b) => b.as_str(),
        }
    }

    /// The type this one is declared in terms of; `None` for built-ins.
    pub fn supertype(&self) -> Option<&str> {
        match self {
            Type::Struct(t) => Some(&t.supertype),
            Type::Array(t) => Some(&t.supertype),
            Type::Map(t) => Some(&t.supertype),
            Type::Enum(t) => Some(&t.supertype),
            Type::String(t) => Some(&t.supertype),
            Type::Union(t) => Some(&t.supertype),
            Type::Alias(t) => Some(&t.supertype),
            Type::Base(_) => None,
        }
    }

    pub fn comment(&self) -> Option<&str> {
        match self {
            Type::Struct(t) => non_empty(&t.comment),
            Type::Array(t) => non_empty(&t.comment),
            Type::Map(t) => non_empty(&t.comment),
            Type::Enum(t) => non_empty(&t.comment),
            Type::String(t) => non_empty(&t.comment),
            Type::Union(t) => non_empty(&t.comment),
            Type::Alias(t) => non_empty(&t.comment),
            Type::Base(_) => None,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

// ————————————————————————————————————————————————————————————————————————————
// WIRE FORMAT
// ————————————————————————————————————————————————————————————————————————————

/// Every key any type entry may carry. The variant is decided by which
/// variant-specific keys are present, most specific first.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawType {
    #[serde(rename = "type")]
    supertype: TypeRef,
    name: String,
    comment: Option<String>,
    fields: Option<Vec<Field>>,
    elements: Option<Vec<EnumElementDef>>,
    variants: Option<Vec<TypeRef>>,
    keys: Option<TypeRef>,
    items: Option<TypeRef>,
    pattern: Option<String>,
    values: Option<Vec<String>>,
    min_size: Option<i64>,
    max_size: Option<i64>,
}

impl From<RawType> for Type {
    fn from(raw: RawType) -> Self {
        let RawType { supertype, name, comment, .. } = raw;
        if let Some(fields) = raw.fields {
            return Type::Struct(StructTypeDef { supertype, name, comment, fields });
        }
        if let Some(elements) = raw.elements {
            return Type::Enum(EnumTypeDef { supertype, name, comment, elements });
        }
        if let Some(variants) = raw.variants {
            return Type::Union(UnionTypeDef { supertype, name, comment, variants });
        }
        if raw.keys.is_some() {
            let items = raw.items.unwrap_or_else(|| ANY.to_string());
            return Type::Map(MapTypeDef { supertype, name, comment, items });
        }
        if let Some(items) = raw.items {
            return Type::Array(ArrayTypeDef { supertype, name, comment, items });
        }
        if raw.pattern.is_some() || raw.values.is_some() || raw.min_size.is_some() || raw.max_size.is_some() {
            return Type::String(StringTypeDef {
                supertype,
                name,
                comment,
                pattern: raw.pattern,
                values: raw.values.unwrap_or_default(),
                min_size: raw.min_size,
                max_size: raw.max_size,
            });
        }
        Type::Alias(AliasTypeDef { supertype, name, comment })
    }
}
