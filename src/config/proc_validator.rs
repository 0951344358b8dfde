//! Definition-time validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Settings: base URL, refresh window bounds, refresher cadence, header syntax
//! - Schemas: names, field names, non-empty field sets

use std::collections::BTreeMap;

use http::{HeaderName, HeaderValue};
use regex::Regex;
use reqwest::Url;
use tracing::{debug, error};

use crate::config::settings::ClientSettings;
use crate::params::schema::FieldRule;
use crate::utils::constants::SERVICE_TOKEN_LIFETIME_MS;

/// Returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_settings(settings: &ClientSettings) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    match Url::parse(&settings.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(format!(
            "settings.base_url '{}' must use http or https, got '{}'",
            settings.base_url,
            url.scheme()
        )),
        Err(e) => errors.push(format!(
            "settings.base_url '{}' is not a valid URL: {}",
            settings.base_url, e
        )),
    }

    if settings.refresh_window_ms == 0 || settings.refresh_window_ms > SERVICE_TOKEN_LIFETIME_MS {
        errors.push(format!(
            "settings.refresh_window_ms ({}) must be within 1..={}",
            settings.refresh_window_ms, SERVICE_TOKEN_LIFETIME_MS
        ));
    }

    if settings.timeout_ms == Some(0) {
        errors.push("settings.timeout_ms must be greater than 0".to_string());
    }

    if settings.persistent_refresh.interval_ms == 0 {
        errors.push("settings.persistent_refresh.interval_ms must be greater than 0".to_string());
    }

    for (name, value) in &settings.headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            errors.push(format!("settings.headers: '{}' is not a valid header name", name));
        }
        if HeaderValue::from_str(value).is_err() {
            errors.push(format!(
                "settings.headers['{}']: value is not a valid header value",
                name
            ));
        }
    }

    if let Some(logging) = &settings.logging {
        if !matches!(
            logging.level.to_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            errors.push(format!(
                "settings.logging.level '{}' must be one of trace, debug, info, warn, error",
                logging.level
            ));
        }
    }

    report("settings", errors)
}

/// Validates raw schema definitions before they are registered.
pub fn validate_schema_definitions(
    schemas: &BTreeMap<String, BTreeMap<String, FieldRule>>,
) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();
    let identifier = Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").map_err(|e| vec![e.to_string()])?;

    if schemas.is_empty() {
        errors.push("schemas: at least one schema required".to_string());
    }

    for (schema_name, fields) in schemas {
        if !identifier.is_match(schema_name) {
            errors.push(format!("schema '{}': name must be an identifier", schema_name));
        }
        if fields.is_empty() {
            errors.push(format!("schema '{}': must declare at least one field", schema_name));
        }
        for field_name in fields.keys() {
            if !identifier.is_match(field_name) {
                errors.push(format!(
                    "schema '{}': field '{}' must be an identifier",
                    schema_name, field_name
                ));
            }
        }
    }

    report("schemas", errors)
}

fn report(scope: &str, errors: Vec<String>) -> Result<(), Vec<String>> {
    if errors.is_empty() {
        debug!("{} valid", scope);
        Ok(())
    } else {
        error!("{} validation errors ({}):", scope, errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        Err(errors)
    }
}
