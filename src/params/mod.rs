//! Request parameter schemas, the shared normalizer and typed per-operation records.

pub mod normalizer;
pub mod records;
pub mod schema;

/// Fully resolved request parameters; keys are exactly the schema's fields.
pub type NormalizedParameters = serde_json::Map<String, serde_json::Value>;

pub use records::OperationParams;
pub use schema::{builtin_schemas, FieldRule, ParameterSchema, SchemaRegistry};
