use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::proc_validator::validate_schema_definitions;
use crate::error::{NfieldError, Result};
use crate::operations::validate_catalog;

static BUILTIN_SCHEMAS_YAML: &str = include_str!("schemas.yaml");
static BUILTIN_SCHEMAS: OnceLock<Result<SchemaRegistry>> = OnceLock::new();

/// What a schema says about one field when the caller does not supply it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawFieldRule")]
pub enum FieldRule {
    /// Caller must supply a usable value.
    Required,
    /// Absent values resolve to an empty string.
    Optional,
    /// Absent values resolve to this literal.
    Default(Value),
}

/// YAML shape: `required`, `optional` or `{ default: <value> }`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawFieldRule {
    Marker(Marker),
    Default { default: Value },
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum Marker {
    Required,
    Optional,
}

impl From<RawFieldRule> for FieldRule {
    fn from(raw: RawFieldRule) -> Self {
        match raw {
            RawFieldRule::Marker(Marker::Required) => FieldRule::Required,
            RawFieldRule::Marker(Marker::Optional) => FieldRule::Optional,
            RawFieldRule::Default { default } => FieldRule::Default(default),
        }
    }
}

/// Named set of request fields for one operation kind.
#[derive(Debug, Clone)]
pub struct ParameterSchema {
    name: String,
    fields: BTreeMap<String, FieldRule>,
    /// Set only when exactly one field is required; enables the bare scalar shorthand.
    sole_required: Option<String>,
}

impl ParameterSchema {
    pub fn new(name: impl Into<String>, fields: BTreeMap<String, FieldRule>) -> Self {
        let mut required = fields
            .iter()
            .filter(|(_, rule)| **rule == FieldRule::Required)
            .map(|(key, _)| key.clone());
        let sole_required = match (required.next(), required.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        };
        Self {
            name: name.into(),
            fields,
            sole_required,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldRule> {
        &self.fields
    }

    pub fn sole_required(&self) -> Option<&str> {
        self.sole_required.as_deref()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }
}

/// Process-wide, read-only set of parameter schemas.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, ParameterSchema>,
}

impl SchemaRegistry {
    /// Build a registry from raw definitions, rejecting broken ones up front.
    pub fn from_definitions(definitions: BTreeMap<String, BTreeMap<String, FieldRule>>) -> Result<Self> {
        validate_schema_definitions(&definitions).map_err(|errors| {
            NfieldError::configuration(format!(
                "invalid schema definitions ({}): {}",
                errors.len(),
                errors.join("; ")
            ))
        })?;

        let schemas = definitions
            .into_iter()
            .map(|(name, fields)| (name.clone(), ParameterSchema::new(name, fields)))
            .collect::<HashMap<_, _>>();

        debug!("registered {} parameter schemas", schemas.len());
        Ok(Self { schemas })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let definitions: BTreeMap<String, BTreeMap<String, FieldRule>> = serde_yaml::from_str(content)
            .map_err(|e| NfieldError::configuration(format!("unreadable schema definitions: {e}")))?;
        Self::from_definitions(definitions)
    }

    pub fn get(&self, name: &str) -> Result<&ParameterSchema> {
        self.schemas
            .get(name)
            .ok_or_else(|| NfieldError::configuration(format!("no schema registered for '{name}'")))
    }

    /// Look the schema up and normalize `raw` against it.
    pub fn normalize(&self, name: &str, raw: &Value) -> Result<super::NormalizedParameters> {
        self.get(name)?.normalize(raw)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Schemas for every catalog operation, parsed and checked once per process.
pub fn builtin_schemas() -> Result<&'static SchemaRegistry> {
    BUILTIN_SCHEMAS
        .get_or_init(|| {
            let registry = SchemaRegistry::from_yaml_str(BUILTIN_SCHEMAS_YAML)?;
            validate_catalog(&registry).map_err(|errors| {
                NfieldError::configuration(format!(
                    "operation catalog does not match schemas: {}",
                    errors.join("; ")
                ))
            })?;
            Ok(registry)
        })
        .as_ref()
        .map_err(Clone::clone)
}
