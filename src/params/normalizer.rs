use serde_json::{Map, Value};

use crate::error::{NfieldError, Result};
use crate::params::schema::{FieldRule, ParameterSchema};
use crate::params::NormalizedParameters;
use crate::utils::constants::REQUEST_PARAMS_FIELD;

/// A caller value counts only when it carries something: not null, not an empty string.
pub fn is_usable(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

impl ParameterSchema {
    /// Merge caller input over the schema defaults.
    ///
    /// `raw` is either a JSON object keyed by field name, or, for schemas with
    /// exactly one required field, a bare string/number standing for that field.
    /// Fields outside the schema are dropped. Performs no I/O.
    pub fn normalize(&self, raw: &Value) -> Result<NormalizedParameters> {
        let shorthand;
        let supplied: &Map<String, Value> = match raw {
            Value::Object(map) => map,
            Value::String(_) | Value::Number(_) => match self.sole_required() {
                Some(field) => {
                    let mut map = Map::new();
                    map.insert(field.to_owned(), raw.clone());
                    shorthand = map;
                    &shorthand
                }
                None => return Err(NfieldError::missing(REQUEST_PARAMS_FIELD, raw.clone())),
            },
            _ => return Err(NfieldError::missing(REQUEST_PARAMS_FIELD, raw.clone())),
        };

        let mut resolved = Map::with_capacity(self.fields().len());
        for (key, rule) in self.fields() {
            let candidate = supplied.get(key);
            let value = if is_usable(candidate) {
                candidate.cloned().unwrap_or(Value::Null)
            } else {
                match rule {
                    FieldRule::Required => {
                        return Err(NfieldError::missing(
                            key.as_str(),
                            candidate.cloned().unwrap_or(Value::Null),
                        ))
                    }
                    FieldRule::Optional => Value::String(String::new()),
                    FieldRule::Default(default) => default.clone(),
                }
            };
            resolved.insert(key.clone(), value);
        }

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::schema::builtin_schemas;
    use serde_json::json;

    #[test]
    fn bare_survey_id_fills_the_only_required_field() {
        let params = builtin_schemas()
            .unwrap()
            .normalize("StopSurveyFieldwork", &json!("12345"))
            .unwrap();
        assert_eq!(
            Value::Object(params),
            json!({"SurveyId": "12345", "TerminateRunningInterviews": ""})
        );
    }

    #[test]
    fn numeric_shorthand_is_accepted() {
        let params = builtin_schemas()
            .unwrap()
            .normalize("GetSurveySettings", &json!(42))
            .unwrap();
        assert_eq!(params["SurveyId"], json!(42));
    }

    #[test]
    fn shorthand_leaves_other_fields_at_defaults() {
        let params = builtin_schemas()
            .unwrap()
            .normalize("RequestSurveyData", &json!("s-1"))
            .unwrap();
        assert_eq!(params["SurveyId"], json!("s-1"));
        assert_eq!(params["FileName"], json!(""));
        assert_eq!(params["IncludeOpenAnswerData"], json!(true));
        assert_eq!(params["IncludeTestData"], json!(false));
    }

    #[test]
    fn every_single_required_schema_accepts_shorthand() {
        let registry = builtin_schemas().unwrap();
        for operation in crate::operations::CATALOG {
            let schema = registry.get(operation.schema).unwrap();
            let Some(required) = schema.sole_required() else {
                continue;
            };
            let params = schema.normalize(&json!("value-1")).unwrap();
            assert_eq!(params[required], json!("value-1"), "{}", schema.name());
            for (key, rule) in schema.fields() {
                if key == required {
                    continue;
                }
                let expected = match rule {
                    FieldRule::Optional => json!(""),
                    FieldRule::Default(v) => v.clone(),
                    FieldRule::Required => unreachable!(),
                };
                assert_eq!(params[key], expected, "{}.{}", schema.name(), key);
            }
        }
    }

    #[test]
    fn every_required_field_is_reported_when_omitted() {
        let registry = builtin_schemas().unwrap();
        for operation in crate::operations::CATALOG {
            let schema = registry.get(operation.schema).unwrap();
            for (key, rule) in schema.fields() {
                if *rule != FieldRule::Required {
                    continue;
                }
                let mut input = Map::new();
                for other in schema.fields().keys().filter(|k| *k != key) {
                    input.insert(other.clone(), json!("x"));
                }
                match schema.normalize(&Value::Object(input)) {
                    Err(NfieldError::MissingParameter { name, value }) => {
                        assert_eq!(&name, key);
                        assert_eq!(value, Value::Null);
                    }
                    other => panic!("{}.{}: unexpected {other:?}", schema.name(), key),
                }
            }
        }
    }

    #[test]
    fn optional_fields_are_never_left_as_markers() {
        let registry = builtin_schemas().unwrap();
        let params = registry
            .normalize("GetSurveyTranslations", &json!({"SurveyId": "s", "LanguageId": 3}))
            .unwrap();
        assert_eq!(params["TranslationKey"], json!(""));
    }

    #[test]
    fn empty_and_null_values_do_not_count_as_supplied() {
        let registry = builtin_schemas().unwrap();
        let err = registry
            .normalize("StopSurveyFieldwork", &json!({"SurveyId": ""}))
            .unwrap_err();
        assert!(matches!(
            err,
            NfieldError::MissingParameter { ref name, ref value } if name == "SurveyId" && *value == json!("")
        ));

        let err = registry.normalize("StopSurveyFieldwork", &json!("")).unwrap_err();
        assert!(matches!(err, NfieldError::MissingParameter { ref name, .. } if name == "SurveyId"));

        let params = registry
            .normalize("UpdateSurveyPublish", &json!({"SurveyId": "s", "ForceUpgrade": null}))
            .unwrap();
        assert_eq!(params["ForceUpgrade"], json!(false));
    }

    #[test]
    fn supplied_values_override_defaults_and_extras_are_dropped() {
        let params = builtin_schemas()
            .unwrap()
            .normalize(
                "UpdateSurveyPublish",
                &json!({"SurveyId": "s", "ForceUpgrade": true, "Unexpected": 1}),
            )
            .unwrap();
        assert_eq!(
            Value::Object(params),
            json!({"SurveyId": "s", "PackageType": "Live", "ForceUpgrade": true})
        );
    }

    #[test]
    fn scalar_without_single_required_field_is_rejected() {
        let registry = builtin_schemas().unwrap();
        for (schema, raw) in [
            ("AddSurveyTranslations", json!("12345")),
            ("GetSurveys", json!("12345")),
            ("StopSurveyFieldwork", json!(null)),
            ("StopSurveyFieldwork", json!(true)),
            ("StopSurveyFieldwork", json!(["12345"])),
        ] {
            match registry.normalize(schema, &raw) {
                Err(NfieldError::MissingParameter { name, value }) => {
                    assert_eq!(name, "requestParams");
                    assert_eq!(value, raw);
                }
                other => panic!("{schema}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        let registry = builtin_schemas().unwrap();
        let once = registry
            .normalize("AddSurveys", &json!({"SurveyName": "Brand tracker"}))
            .unwrap();
        let twice = registry
            .normalize("AddSurveys", &Value::Object(once.clone()))
            .unwrap();
        assert_eq!(once, twice);
    }
}
