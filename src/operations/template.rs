use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{NfieldError, Result};
use crate::params::NormalizedParameters;

const PLACEHOLDER: &str = r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}";

static PLACEHOLDER_REGEX: OnceLock<Result<Regex>> = OnceLock::new();

/// Render a path template
/// template: "v1/Surveys/{{SurveyId}}/Fieldwork/Stop"
/// params: { "SurveyId" => "12345" }
///
/// Values are percent-encoded as single path segments, so a `/`, `?` or `#`
/// inside an id never changes the target. `.` and `..` are refused.
/// Optional parameters resolved to "" render as an empty segment,
/// which turns item lookups into collection lookups.
pub fn render_path(template: &str, params: &NormalizedParameters) -> Result<String> {
    let re = placeholder_regex()?;

    let mut unresolved: Vec<String> = Vec::new();
    let mut unusable: Option<NfieldError> = None;
    let rendered = re.replace_all(template, |caps: &regex::Captures| {
        let field = &caps[1];
        match params.get(field).map(|value| (value, segment(value))) {
            Some((_, Some(val))) if val != "." && val != ".." => urlencoding::encode(&val).into_owned(),
            Some((value, Some(_))) => {
                unusable.get_or_insert_with(|| NfieldError::missing(field, value.clone()));
                String::new()
            }
            _ => {
                unresolved.push(field.to_owned());
                String::new()
            }
        }
    });

    if !unresolved.is_empty() {
        return Err(NfieldError::configuration(format!(
            "path template '{}' has unresolved placeholders: {}",
            template,
            unresolved.join(", ")
        )));
    }
    if let Some(err) = unusable {
        return Err(err);
    }

    Ok(rendered.to_string())
}

/// Field names referenced by a template, in order of appearance.
pub fn placeholders(template: &str) -> Result<Vec<String>> {
    let re = placeholder_regex()?;
    Ok(re
        .captures_iter(template)
        .map(|caps| caps[1].to_owned())
        .collect())
}

fn placeholder_regex() -> Result<&'static Regex> {
    PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new(PLACEHOLDER).map_err(|e| NfieldError::configuration(e.to_string())))
        .as_ref()
        .map_err(Clone::clone)
}

fn segment(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
