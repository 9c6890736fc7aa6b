//! Error types for the translator.

use thiserror::Error;

use crate::idl::BaseType;

/// Failures reading the schema off the input stream.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read schema: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON, or JSON that is not a schema
    #[error("invalid schema at JSON path {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Lookups against the type registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("unknown type reference `{0}`")]
    UnknownType(String),

    #[error("alias chain starting at `{0}` never reaches a base type")]
    AliasCycle(String),
}

/// Contract violations found while mapping a type.
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("type `{name}` has no JSON Schema form (base type {base})")]
    UnsupportedType { name: String, base: BaseType },
}
