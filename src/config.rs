//! Configuration handling for layercake template roots and extensions.
//! The template root may carry a `layercake.json`/`layercake.yml`/`layercake.yaml`
//! file; every extension may carry a `config.json` descriptor.

use crate::constants::{BASE_DIR, CONFIG_FILES};
use crate::error::{Error, Result};
use log::debug;
use serde::Deserialize;
use std::path::Path;

/// Template-root configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayercakeConfig {
    /// Name of the base layer directory
    pub base_dir: String,
    /// Globs (relative to the base layer) copied verbatim in development mode
    pub dev_verbatim: Vec<String>,
    /// Install command, program first
    pub install: Vec<String>,
    /// Format command, program first
    pub format: Vec<String>,
    /// Primary branch created after `git init`
    pub branch: String,
    /// Message of the first commit
    pub commit_message: String,
}

impl Default for LayercakeConfig {
    fn default() -> Self {
        Self {
            base_dir: BASE_DIR.to_string(),
            dev_verbatim: vec![
                "**/yarn.lock".to_string(),
                "packages/nextjs/generated/**".to_string(),
            ],
            install: vec!["yarn".to_string(), "install".to_string()],
            format: vec!["yarn".to_string(), "format".to_string()],
            branch: "main".to_string(),
            commit_message: "Initial commit with layercake".to_string(),
        }
    }
}

/// Contents of an extension's `config.json`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ExtensionConfig {
    /// Display name; defaults to the directory name
    pub name: Option<String>,
    /// Identifier of the parent extension
    pub extends: Option<String>,
}

/// Parses raw configuration content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if neither format accepts the content
pub fn parse_config(content: &str) -> Result<LayercakeConfig> {
    match serde_json::from_str(content) {
        Ok(config) => Ok(config),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {e}"))),
    }
}

/// Loads the template-root configuration, returning defaults when no file exists.
///
/// # Arguments
/// * `template_root` - Directory containing `base/` and `extensions/`
///
/// # Returns
/// * `Result<LayercakeConfig>` - Parsed configuration
pub fn load_config<P: AsRef<Path>>(template_root: P) -> Result<LayercakeConfig> {
    for file in CONFIG_FILES {
        let config_path = template_root.as_ref().join(file);
        if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            let content = std::fs::read_to_string(&config_path)?;
            return parse_config(&content);
        }
    }

    debug!("No configuration file found (tried: {}), using defaults", CONFIG_FILES.join(", "));
    Ok(LayercakeConfig::default())
}

/// Reads the `config.json` of one extension.
///
/// A missing file yields the default (empty) config; a file that exists but
/// fails to parse is an error naming both the extension and the path.
pub fn read_extension_config(extension: &str, config_path: &Path) -> Result<ExtensionConfig> {
    if !config_path.is_file() {
        return Ok(ExtensionConfig::default());
    }

    let parse_error = |reason: String| Error::ExtensionConfigError {
        extension: extension.to_string(),
        config_path: config_path.display().to_string(),
        reason,
    };
    let content = std::fs::read_to_string(config_path).map_err(|e| parse_error(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_json_partial() {
        let config = parse_config(r#"{"branch": "trunk"}"#).unwrap();
        assert_eq!(config.branch, "trunk");
        assert_eq!(config.base_dir, "base");
        assert_eq!(config.install, vec!["yarn", "install"]);
    }

    #[test]
    fn test_parse_config_yaml() {
        let config = parse_config("base_dir: core\nformat: [npm, run, fmt]\n").unwrap();
        assert_eq!(config.base_dir, "core");
        assert_eq!(config.format, vec!["npm", "run", "fmt"]);
    }

    #[test]
    fn test_parse_config_invalid() {
        assert!(matches!(parse_config("branch: [unclosed"), Err(Error::ConfigError(_))));
    }
}
