//! Configuration management for Trellis.
//!
//! Parses `trellis.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Programmatic settings can be applied during load via [`Overrides`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `cms.origin`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct Overrides {
    /// Override CMS origin URL.
    pub origin: Option<String>,
    /// Override the CORS proxy enabled flag.
    pub cors_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "trellis.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upstream CMS configuration.
    pub cms: CmsConfig,
    /// Proxy configuration.
    pub proxy: ProxyConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Upstream CMS configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    /// Base URL of the origin CMS. Trailing slashes are trimmed on load.
    pub origin: String,
    /// Path prefix of the CMS uploads directory.
    pub uploads_path: String,
    /// Path prefix of the CMS REST API.
    pub rest_prefix: String,
    /// Path of the CMS admin-ajax endpoint.
    pub admin_ajax_path: String,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            origin: String::new(),
            uploads_path: "/wp-content/uploads".to_owned(),
            rest_prefix: "/wp-json".to_owned(),
            admin_ajax_path: "/wp-admin/admin-ajax.php".to_owned(),
        }
    }
}

/// Proxy configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Whether the CORS proxy middleware is installed.
    pub cors_enabled: bool,
    /// Path prefix the CORS proxy answers under.
    pub cors_prefix: String,
    /// When set, import-map URLs pointing at the CMS origin are rewritten to
    /// this prefix so module fetches stay same-origin.
    pub script_module_prefix: Option<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            cors_enabled: false,
            cors_prefix: "/proxy".to_owned(),
            script_module_prefix: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`cms.origin`").
        field: String,
        /// Error message (e.g., "${`CMS_ORIGIN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Require a path field to start with `/`.
fn require_path_prefix(path: &str, field: &str) -> Result<(), ConfigError> {
    if !path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "{field} must start with /"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional overrides.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `trellis.toml` in the current directory and parents.
    ///
    /// Overrides are applied after loading, then environment variables are
    /// expanded and the result validated.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist, parsing
    /// fails, expansion references an unset variable, or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        overrides: Option<&Overrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(overrides) = overrides {
            config.apply_overrides(overrides);
        }

        config.cms.origin = expand::expand_str(&config.cms.origin, "cms.origin")?;
        config.cms.origin = config.cms.origin.trim_end_matches('/').to_owned();
        config.validate()?;

        Ok(config)
    }

    /// Parse a single TOML file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Search for `trellis.toml` in the current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let candidate = dir.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Apply overrides to the configuration.
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(origin) = &overrides.origin {
            self.cms.origin.clone_from(origin);
        }
        if let Some(cors_enabled) = overrides.cors_enabled {
            self.proxy.cors_enabled = cors_enabled;
        }
    }

    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a field is empty or malformed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.cms.origin, "cms.origin")?;
        require_http_url(&self.cms.origin, "cms.origin")?;
        require_path_prefix(&self.cms.uploads_path, "cms.uploads_path")?;
        require_path_prefix(&self.cms.rest_prefix, "cms.rest_prefix")?;
        require_path_prefix(&self.cms.admin_ajax_path, "cms.admin_ajax_path")?;
        if self.proxy.cors_enabled {
            require_path_prefix(&self.proxy.cors_prefix, "proxy.cors_prefix")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(toml_text: &str) -> Config {
        toml::from_str(toml_text).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse("");
        assert_eq!(config.cms.uploads_path, "/wp-content/uploads");
        assert_eq!(config.cms.rest_prefix, "/wp-json");
        assert_eq!(config.cms.admin_ajax_path, "/wp-admin/admin-ajax.php");
        assert!(!config.proxy.cors_enabled);
        assert_eq!(config.proxy.cors_prefix, "/proxy");
        assert_eq!(config.proxy.script_module_prefix, None);
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse(
            r#"
            [cms]
            origin = "https://cms.example.com"
            uploads_path = "/media"
            rest_prefix = "/api/cms"

            [proxy]
            cors_enabled = true
            cors_prefix = "/cors"
            script_module_prefix = "/modules"
            "#,
        );
        assert_eq!(config.cms.origin, "https://cms.example.com");
        assert_eq!(config.cms.uploads_path, "/media");
        assert!(config.proxy.cors_enabled);
        assert_eq!(
            config.proxy.script_module_prefix.as_deref(),
            Some("/modules")
        );
        config.validate().unwrap();
    }

    #[test]
    fn test_validation_rejects_missing_origin() {
        let config = parse("");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validation_rejects_non_http_origin() {
        let mut config = parse("");
        config.cms.origin = "ftp://cms.example.com".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_relative_prefixes() {
        let mut config = parse("[cms]\norigin = \"https://cms.example.com\"");
        config.cms.uploads_path = "uploads".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_missing_path_is_not_found() {
        let result = Config::load(Some(Path::new("/nonexistent/trellis.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = parse("[cms]\norigin = \"https://old.example.com\"");
        config.apply_overrides(&Overrides {
            origin: Some("https://new.example.com".to_owned()),
            cors_enabled: Some(true),
        });
        assert_eq!(config.cms.origin, "https://new.example.com");
        assert!(config.proxy.cors_enabled);
    }
}
