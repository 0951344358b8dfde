use anyhow::{anyhow, Context, Result};
use regex::Regex;
use tracing::{debug, error};

use crate::config::proc_validator;
use crate::config::settings::ClientSettings;

/// Parse and validate client settings from a YAML document.
///
/// `${VAR}` and `${VAR:default}` placeholders are expanded from the
/// environment before parsing.
pub fn parse_settings(content: &str) -> Result<ClientSettings> {
    let expanded = expand_env_vars(content)?;
    let settings: ClientSettings = serde_yaml::from_str(&expanded)
        .inspect_err(|e| error!("parse settings error: {}", e))
        .context("invalid settings format")?;

    debug!("validating settings ...");
    proc_validator::validate_settings(&settings).map_err(|errors| {
        anyhow!(
            "settings are not valid, total errors: {}\n{}",
            errors.len(),
            errors.join("\n")
        )
    })?;

    Ok(settings)
}

fn expand_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}")?;
    Ok(re
        .replace_all(input, |caps: &regex::Captures| {
            let var = &caps[1];
            let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            std::env::var(var).unwrap_or_else(|_| default.to_string())
        })
        .to_string())
}
