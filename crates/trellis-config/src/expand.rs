//! Environment variable expansion for string config values.
//!
//! Supports `${VAR}` (errors when unset) and `${VAR:-default}` (falls back
//! to the default when unset).

use crate::ConfigError;

/// Expand environment variables in a config string.
///
/// # Errors
///
/// Returns `ConfigError::EnvVar` when a `${VAR}` without a default
/// references an unset variable.
pub(crate) fn expand_str(value: &str, field: &str) -> Result<String, ConfigError> {
    let expanded = shellexpand::env_with_context(value, |name: &str| {
        if let Some((var, default)) = name.split_once(":-") {
            match std::env::var(var) {
                Ok(found) => Ok(Some(found)),
                Err(_) => Ok(Some(default.to_owned())),
            }
        } else {
            match std::env::var(name) {
                Ok(found) => Ok(Some(found)),
                Err(_) => Err(format!("${{{name}}} not set")),
            }
        }
    })
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: e.cause,
    })?;
    Ok(expanded.into_owned())
}
