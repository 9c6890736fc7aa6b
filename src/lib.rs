//! Translate a parsed IDL schema into a JSON Schema (draft-04) document.
//!
//! Pipeline: stdin JSON → [`idl::Schema`] → [`registry::TypeRegistry`] →
//! [`translate::Translator`] (once per named type) → [`document::generate`] →
//! [`document::render`].
pub mod cli;
pub mod document;
pub mod error;
pub mod idl;
pub mod path_de;
pub mod registry;
pub mod translate;

pub use document::{Document, generate, render};
pub use error::{InputError, RegistryError, TranslateError};
pub use idl::{BaseType, Schema, Type};
pub use translate::{Diagnostic, Fragment, TranslateOptions, Translator};
