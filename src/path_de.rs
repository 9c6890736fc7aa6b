use std::io::Read;

use serde::de::DeserializeOwned;

use crate::error::InputError;
use crate::idl::Schema;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, InputError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_input_error)
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, InputError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_input_error)
}

/// Drain `input` and parse it as a schema.
pub fn read_schema(mut input: impl Read) -> Result<Schema, InputError> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    from_slice_with_path(&bytes)
}

fn into_input_error(err: serde_path_to_error::Error<serde_json::Error>) -> InputError {
    let path = err.path().to_string();
    InputError::Json { path, source: err.into_inner() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_offending_path() {
        let src = r#"{"name": "S", "types": [{"type": "Struct", "name": "P", "fields": [{"name": 7, "type": "Int32"}]}]}"#;
        let err = from_str_with_path::<Schema>(src).unwrap_err();
        match err {
            InputError::Json { path, .. } => assert!(path.starts_with("types[0]"), "path was {path}"),
            other => panic!("expected a JSON error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_an_input_error() {
        let err = read_schema("{\"name\": ".as_bytes()).unwrap_err();
        assert!(matches!(err, InputError::Json { .. }));
    }

    #[test]
    fn reads_a_schema_from_a_stream() {
        let schema = read_schema(r#"{"name":"Empty","types":[]}"#.as_bytes()).unwrap();
        assert_eq!(schema.name, "Empty");
        assert!(schema.types.is_empty());
    }
}
