//! Type registry over a parsed schema.
//!
//! Answers the two questions the engine asks of any reference: what was it
//! declared as, and what base type does it reduce to once aliases are followed.
//! Built-in names (`String`, `Int32`, …) resolve to `Type::Base`.
use indexmap::IndexMap;

use crate::error::RegistryError;
use crate::idl::{BaseType, Schema, Type};

pub struct TypeRegistry<'a> {
    types: IndexMap<&'a str, &'a Type>,
    builtins: IndexMap<&'static str, Type>,
}

impl<'a> TypeRegistry<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        let types = schema.types.iter().map(|t| (t.name(), t)).collect();
        let builtins = BaseType::ALL
            .into_iter()
            .map(|base| (base.as_str(), Type::Base(base)))
            .collect();
        Self { types, builtins }
    }

    /// Number of user-declared types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The declared variant behind `reference`, user-defined or built-in.
    pub fn find_type(&self, reference: &str) -> Result<&Type, RegistryError> {
        if let Some(builtin) = self.builtins.get(reference) {
            return Ok(builtin);
        }
        self.types
            .get(reference)
            .copied()
            .ok_or_else(|| RegistryError::UnknownType(reference.to_string()))
    }

    /// Follow the alias chain from `reference` down to its base type.
    pub fn find_base_type(&self, reference: &str) -> Result<BaseType, RegistryError> {
        let mut current = reference;
        // a chain longer than the number of declared types must revisit one
        for _ in 0..=self.types.len() {
            let declared = self.find_type(current)?;
            match declared {
                Type::Base(base) => return Ok(*base),
                _ => match declared.supertype() {
                    Some(next) => current = next,
                    None => unreachable!("only built-ins lack a supertype"),
                },
            }
        }
        Err(RegistryError::AliasCycle(reference.to_string()))
    }

    /// Base type of an already-resolved type.
    pub fn base_type(&self, t: &Type) -> Result<BaseType, RegistryError> {
        match t {
            Type::Base(base) => Ok(*base),
            _ => self.find_base_type(t.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(types: serde_json::Value) -> Schema {
        serde_json::from_value(json!({"name": "Test", "types": types})).unwrap()
    }

    #[test]
    fn builtins_resolve_to_themselves() {
        let s = schema(json!([]));
        let reg = TypeRegistry::new(&s);
        assert!(reg.is_empty());
        for base in BaseType::ALL {
            assert_eq!(reg.find_base_type(base.as_str()).unwrap(), base);
            assert!(matches!(reg.find_type(base.as_str()).unwrap(), Type::Base(b) if *b == base));
        }
    }

    #[test]
    fn alias_chains_are_followed() {
        let s = schema(json!([
            {"type": "Int32", "name": "Age"},
            {"type": "Age", "name": "Years"},
            {"type": "String", "name": "Host", "maxSize": 255},
            {"type": "Host", "name": "PrimaryHost"},
            {"type": "Struct", "name": "Point", "fields": []}
        ]));
        let reg = TypeRegistry::new(&s);
        assert_eq!(reg.len(), 5);
        assert_eq!(reg.find_base_type("Years").unwrap(), BaseType::Int32);
        assert_eq!(reg.find_base_type("PrimaryHost").unwrap(), BaseType::String);
        assert_eq!(reg.find_base_type("Point").unwrap(), BaseType::Struct);
        assert!(matches!(reg.find_type("Years").unwrap(), Type::Alias(_)));
        assert!(matches!(reg.find_type("Host").unwrap(), Type::String(_)));
    }

    #[test]
    fn unknown_references_are_errors() {
        let s = schema(json!([{"type": "Missing", "name": "Broken"}]));
        let reg = TypeRegistry::new(&s);
        assert!(matches!(reg.find_type("Nope"), Err(RegistryError::UnknownType(name)) if name == "Nope"));
        assert!(matches!(reg.find_base_type("Broken"), Err(RegistryError::UnknownType(name)) if name == "Missing"));
    }

    #[test]
    fn alias_cycles_terminate() {
        let s = schema(json!([
            {"type": "B", "name": "A"},
            {"type": "A", "name": "B"}
        ]));
        let reg = TypeRegistry::new(&s);
        assert!(matches!(reg.find_base_type("A"), Err(RegistryError::AliasCycle(name)) if name == "A"));
    }
}
