//! Schema normalizer. Rewrites a `schemars` JSON Schema into the subset Gemini's
//! `responseSchema` accepts.
//!
//! Gemini rejects `$ref`, `$defs`, null unions and several presentation keys, so every
//! schema goes through `normalize_schema` before it is sent:
//! 1. `$ref` → deep copy of the referenced definition (recursively normalized)
//! 2. `anyOf`/`oneOf` of `[T, null]` → `T`; `"type": ["T", "null"]` → `"type": "T"`
//! 3. decorative keys (`title`, `default`, `additionalProperties`, ...) removed
//! 4. recurse into every nested schema

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// Nesting bound for the walk. Real result schemas are well under 20 levels deep.
pub const MAX_SCHEMA_DEPTH: usize = 64;

/// Keys the Gemini schema dialect does not accept. Only stripped at schema positions.
const DECORATIVE_KEYS: &[&str] = &[
    "$schema",
    "$id",
    "title",
    "default",
    "additionalProperties",
    "examples",
];

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("unresolved schema reference: {0}")]
    UnresolvedReference(String),

    #[error("cyclic schema reference: {0}")]
    CyclicReference(String),

    #[error("union with no branches")]
    EmptyUnion,

    #[error("schema nesting exceeds {MAX_SCHEMA_DEPTH} levels")]
    TooDeep,
}

/// A result type the model can be asked to produce.
///
/// The raw `schemars` schema is generated once per type and cached for the process
/// lifetime. Implement with [`structured_output!`].
pub trait StructuredOutput: JsonSchema + DeserializeOwned + Send + 'static {
    fn output_schema() -> &'static Value;
}

/// Implements [`StructuredOutput`] for each listed type, each with its own lazy schema.
#[macro_export]
macro_rules! structured_output {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::llm_client::schema::StructuredOutput for $ty {
                fn output_schema() -> &'static ::serde_json::Value {
                    static SCHEMA: ::once_cell::sync::Lazy<::serde_json::Value> =
                        ::once_cell::sync::Lazy::new($crate::llm_client::schema::raw_schema::<$ty>);
                    &SCHEMA
                }
            }
        )+
    };
}

/// Generates the un-normalized schema for `T`.
pub fn raw_schema<T: JsonSchema>() -> Value {
    schema_for!(T).to_value()
}

/// Produces a schema with no references and no null unions.
pub fn normalize_schema(schema: &Value) -> Result<Value, SchemaError> {
    let mut root = schema.clone();

    let defs = match root.as_object_mut() {
        Some(obj) => {
            let mut defs = Map::new();
            for key in ["$defs", "definitions"] {
                if let Some(Value::Object(found)) = obj.remove(key) {
                    defs.extend(found);
                }
            }
            defs
        }
        None => Map::new(),
    };

    let mut walker = Walker {
        defs: &defs,
        resolving: Vec::new(),
    };
    walker.schema(root, 0)
}

struct Walker<'a> {
    defs: &'a Map<String, Value>,
    /// Definitions currently being expanded, innermost last.
    resolving: Vec<String>,
}

impl Walker<'_> {
    fn schema(&mut self, node: Value, depth: usize) -> Result<Value, SchemaError> {
        if depth > MAX_SCHEMA_DEPTH {
            return Err(SchemaError::TooDeep);
        }

        match node {
            Value::Object(obj) => self.object(obj, depth),
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.schema(item, depth + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Ok(other),
        }
    }

    fn object(&mut self, mut obj: Map<String, Value>, depth: usize) -> Result<Value, SchemaError> {
        if let Some(reference) = obj.remove("$ref") {
            let resolved = self.reference(&reference, depth)?;
            return self.overlay(resolved, obj, depth);
        }

        for union_key in ["anyOf", "oneOf"] {
            if let Some(union) = obj.remove(union_key) {
                let chosen = self.union(union, depth)?;
                return self.overlay(chosen, obj, depth);
            }
        }

        let flattened = obj
            .get("type")
            .and_then(Value::as_array)
            .map(|types| flatten_type_array(types));
        if let Some(flattened) = flattened {
            obj.insert("type".to_string(), flattened);
        }

        for key in DECORATIVE_KEYS {
            obj.remove(*key);
        }

        let mut out = Map::with_capacity(obj.len());
        for (key, value) in obj {
            let value = match key.as_str() {
                // Field names, not schema keywords: recurse into values only.
                "properties" | "patternProperties" => self.property_map(value, depth)?,
                // Literal data, never schemas.
                "enum" | "const" | "required" => value,
                _ => self.schema(value, depth + 1)?,
            };
            out.insert(key, value);
        }
        Ok(Value::Object(out))
    }

    fn property_map(&mut self, value: Value, depth: usize) -> Result<Value, SchemaError> {
        match value {
            Value::Object(props) => {
                let mut out = Map::with_capacity(props.len());
                for (name, prop) in props {
                    out.insert(name, self.schema(prop, depth + 1)?);
                }
                Ok(Value::Object(out))
            }
            other => Ok(other),
        }
    }

    fn reference(&mut self, reference: &Value, depth: usize) -> Result<Value, SchemaError> {
        let path = reference.as_str().unwrap_or_default();
        let name = path.rsplit('/').next().unwrap_or(path).to_string();

        let target = self
            .defs
            .get(&name)
            .cloned()
            .ok_or_else(|| SchemaError::UnresolvedReference(path.to_string()))?;

        if self.resolving.contains(&name) {
            return Err(SchemaError::CyclicReference(name));
        }

        self.resolving.push(name);
        let resolved = self.schema(target, depth + 1);
        self.resolving.pop();
        resolved
    }

    fn union(&mut self, union: Value, depth: usize) -> Result<Value, SchemaError> {
        let branches = match union {
            Value::Array(branches) if !branches.is_empty() => branches,
            _ => return Err(SchemaError::EmptyUnion),
        };

        let mut first = None;
        for branch in branches {
            let normalized = self.schema(branch, depth + 1)?;
            if !is_null_type(&normalized) {
                return Ok(normalized);
            }
            first.get_or_insert(normalized);
        }

        // All branches null: keep the first one as-is.
        first.ok_or(SchemaError::EmptyUnion)
    }

    /// Lays the sibling keys of a `$ref`/union (e.g. `description`) over the resolved node.
    fn overlay(
        &mut self,
        resolved: Value,
        siblings: Map<String, Value>,
        depth: usize,
    ) -> Result<Value, SchemaError> {
        if siblings.is_empty() {
            return Ok(resolved);
        }
        let Value::Object(mut base) = resolved else {
            return Ok(resolved);
        };
        if let Value::Object(extra) = self.object(siblings, depth)? {
            base.extend(extra);
        }
        Ok(Value::Object(base))
    }
}

fn is_null_type(schema: &Value) -> bool {
    schema.get("type").and_then(Value::as_str) == Some("null")
}

fn flatten_type_array(types: &[Value]) -> Value {
    types
        .iter()
        .find(|t| t.as_str() != Some("null"))
        .or_else(|| types.first())
        .cloned()
        .unwrap_or_else(|| Value::String("null".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn contains_key(value: &Value, key: &str) -> bool {
        match value {
            Value::Object(obj) => {
                obj.contains_key(key) || obj.values().any(|v| contains_key(v, key))
            }
            Value::Array(items) => items.iter().any(|v| contains_key(v, key)),
            _ => false,
        }
    }

    fn contains_null_union(value: &Value) -> bool {
        match value {
            Value::Object(obj) => {
                let has_union = ["anyOf", "oneOf"].iter().any(|k| obj.contains_key(*k));
                let nullable_type = obj
                    .get("type")
                    .and_then(Value::as_array)
                    .is_some_and(|types| types.iter().any(|t| t == "null"));
                has_union || nullable_type || obj.values().any(contains_null_union)
            }
            Value::Array(items) => items.iter().any(contains_null_union),
            _ => false,
        }
    }

    #[test]
    fn test_optional_union_collapses_to_inner_type() {
        let schema = json!({"anyOf": [{"type": "string"}, {"type": "null"}]});
        assert_eq!(normalize_schema(&schema).unwrap(), json!({"type": "string"}));
    }

    fn nested_arrays(levels: usize) -> Value {
        (0..levels).fold(json!({"type": "string"}), |inner, _| {
            json!({"type": "array", "items": inner})
        })
    }

    #[test]
    fn test_deeply_nested_items_are_rejected() {
        assert!(normalize_schema(&nested_arrays(MAX_SCHEMA_DEPTH)).is_ok());
        assert_eq!(
            normalize_schema(&nested_arrays(MAX_SCHEMA_DEPTH + 6)),
            Err(SchemaError::TooDeep)
        );
    }

    #[test]
    fn test_all_null_union_falls_back_to_first_branch() {
        let schema = json!({"anyOf": [{"type": "null"}]});
        assert_eq!(normalize_schema(&schema).unwrap(), json!({"type": "null"}));
    }

    #[test]
    fn test_null_first_union_picks_concrete_branch() {
        let schema = json!({"oneOf": [{"type": "null"}, {"type": "integer"}]});
        assert_eq!(normalize_schema(&schema).unwrap(), json!({"type": "integer"}));
    }

    #[test]
    fn test_empty_union_is_an_error() {
        let schema = json!({"anyOf": []});
        assert_eq!(normalize_schema(&schema), Err(SchemaError::EmptyUnion));
    }

    #[test]
    fn test_nullable_type_array_flattens() {
        let schema = json!({"type": ["string", "null"]});
        assert_eq!(normalize_schema(&schema).unwrap(), json!({"type": "string"}));
    }

    #[test]
    fn test_refs_are_inlined_through_nested_definitions() {
        let schema = json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "title": "Outer",
            "type": "object",
            "properties": {
                "inner": {"$ref": "#/$defs/Inner"},
                "maybe": {"anyOf": [{"$ref": "#/$defs/Inner"}, {"type": "null"}]}
            },
            "required": ["inner"],
            "$defs": {
                "Inner": {
                    "title": "Inner",
                    "type": "object",
                    "properties": {"leaf": {"$ref": "#/$defs/Leaf"}},
                    "additionalProperties": false
                },
                "Leaf": {"type": "number", "default": 0}
            }
        });

        let normalized = normalize_schema(&schema).unwrap();

        let expected_inner = json!({
            "type": "object",
            "properties": {"leaf": {"type": "number"}}
        });
        assert_eq!(normalized["properties"]["inner"], expected_inner);
        assert_eq!(normalized["properties"]["maybe"], expected_inner);
        assert_eq!(normalized["required"], json!(["inner"]));
        assert!(!contains_key(&normalized, "$ref"));
        assert!(!contains_key(&normalized, "$defs"));
        assert!(!contains_key(&normalized, "title"));
        assert!(!contains_null_union(&normalized));
    }

    #[test]
    fn test_ref_siblings_are_kept() {
        let schema = json!({
            "type": "object",
            "properties": {"a": {"$ref": "#/$defs/A", "description": "the a field"}},
            "$defs": {"A": {"type": "string"}}
        });
        let normalized = normalize_schema(&schema).unwrap();
        assert_eq!(
            normalized["properties"]["a"],
            json!({"type": "string", "description": "the a field"})
        );
    }

    #[test]
    fn test_property_named_title_survives() {
        let schema = json!({
            "type": "object",
            "title": "Job",
            "properties": {
                "title": {"type": "string", "title": "Title"},
                "default": {"type": "boolean"}
            }
        });
        let normalized = normalize_schema(&schema).unwrap();
        assert_eq!(
            normalized,
            json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string"},
                    "default": {"type": "boolean"}
                }
            })
        );
    }

    #[test]
    fn test_enum_values_are_not_touched() {
        let schema = json!({"type": "string", "enum": ["title", "default", "null"]});
        assert_eq!(normalize_schema(&schema).unwrap(), schema);
    }

    #[test]
    fn test_unresolved_reference_is_an_error() {
        let schema = json!({"type": "object", "properties": {"x": {"$ref": "#/$defs/Missing"}}});
        assert_eq!(
            normalize_schema(&schema),
            Err(SchemaError::UnresolvedReference("#/$defs/Missing".to_string()))
        );
    }

    #[test]
    fn test_self_reference_is_reported_not_looped() {
        let schema = json!({
            "$ref": "#/$defs/Node",
            "$defs": {
                "Node": {
                    "type": "object",
                    "properties": {"child": {"$ref": "#/$defs/Node"}}
                }
            }
        });
        assert_eq!(
            normalize_schema(&schema),
            Err(SchemaError::CyclicReference("Node".to_string()))
        );
    }

    #[test]
    fn test_same_definition_used_twice_is_not_a_cycle() {
        let schema = json!({
            "type": "object",
            "properties": {
                "a": {"$ref": "#/$defs/Leaf"},
                "b": {"type": "array", "items": {"$ref": "#/$defs/Leaf"}}
            },
            "$defs": {"Leaf": {"type": "string"}}
        });
        let normalized = normalize_schema(&schema).unwrap();
        assert_eq!(normalized["properties"]["b"]["items"], json!({"type": "string"}));
    }

    #[test]
    fn test_normalizing_twice_is_stable() {
        let schema = json!({
            "type": "object",
            "properties": {"x": {"anyOf": [{"$ref": "#/$defs/X"}, {"type": "null"}]}},
            "$defs": {"X": {"type": "array", "items": {"type": ["integer", "null"]}}}
        });
        let once = normalize_schema(&schema).unwrap();
        let twice = normalize_schema(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[derive(Debug, Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Wrapper {
        label: Option<String>,
        inner: Option<Inner>,
        items: Vec<Inner>,
    }

    #[derive(Debug, Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Inner {
        score: f64,
    }

    structured_output!(Wrapper);

    #[test]
    fn test_derived_schema_normalizes_without_refs() {
        let normalized = normalize_schema(Wrapper::output_schema()).unwrap();
        assert!(!contains_key(&normalized, "$ref"));
        assert!(!contains_null_union(&normalized));
        assert_eq!(normalized["properties"]["label"]["type"], json!("string"));
        assert_eq!(normalized["properties"]["inner"]["type"], json!("object"));
        assert_eq!(
            normalized["properties"]["items"]["items"]["properties"]["score"]["type"],
            json!("number")
        );
    }

    #[test]
    fn test_output_schema_is_cached() {
        let a = Wrapper::output_schema() as *const Value;
        let b = Wrapper::output_schema() as *const Value;
        assert_eq!(a, b);
    }
}
