//! Engine configuration loading and validation

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::types::{CompletionError, CompletionResult};

/// Default target of the open-documentation command
pub const DEFAULT_DOCUMENTATION_URL: &str = "https://frappeframework.com/docs/user/en/api";

/// Engine settings, read once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Send one informational message after the host initialises
    pub show_welcome_message: bool,
    pub documentation_url: String,
    /// Append a link to `documentation_url` to every item's documentation
    pub append_doc_link: bool,
    /// Render templates as snippets; plain text otherwise
    pub snippet_support: bool,
}

impl EngineConfig {
    /// Link the formatter should append, if any
    pub fn doc_link(&self) -> Option<&str> {
        if self.append_doc_link {
            Some(&self.documentation_url)
        } else {
            None
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            show_welcome_message: true,
            documentation_url: DEFAULT_DOCUMENTATION_URL.to_string(),
            append_doc_link: false,
            snippet_support: true,
        }
    }
}

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Format implied by a file extension (`yaml`, `yml`, `json`)
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load engine configuration from a YAML file
    pub fn load_from_yaml(path: &Path) -> CompletionResult<EngineConfig> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_yaml::from_str(&content)?;
        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Load engine configuration from a JSON file
    pub fn load_from_json(path: &Path) -> CompletionResult<EngineConfig> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Load engine configuration from a string
    pub fn load_from_string(content: &str, format: ConfigFormat) -> CompletionResult<EngineConfig> {
        let config = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Load a file, picking the format from its extension
    pub fn load_from_file(path: &Path) -> CompletionResult<EngineConfig> {
        let config = match ConfigFormat::from_path(path) {
            Some(ConfigFormat::Yaml) => Self::load_from_yaml(path)?,
            Some(ConfigFormat::Json) => Self::load_from_json(path)?,
            None => {
                return Err(CompletionError::ConfigError(format!(
                    "Unsupported configuration file extension: {}",
                    path.display()
                )))
            }
        };
        info!("Loaded engine configuration from {}", path.display());
        debug!("Engine configuration: {:?}", config);
        Ok(config)
    }

    /// Load `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> CompletionResult<EngineConfig> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                debug!("No configuration file given, using defaults");
                Ok(EngineConfig::default())
            }
        }
    }

    /// Validate engine configuration
    pub fn validate_config(config: &EngineConfig) -> CompletionResult<()> {
        let url = config.documentation_url.trim();
        if url.is_empty() {
            return Err(CompletionError::ConfigError(
                "Documentation URL cannot be empty".to_string(),
            ));
        }

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CompletionError::ConfigError(format!(
                "Documentation URL must be http(s): {}",
                config.documentation_url
            )));
        }

        Ok(())
    }
}
