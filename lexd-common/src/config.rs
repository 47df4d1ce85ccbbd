//! Configuration loading and resolution
//!
//! Settings resolve with CLI argument → environment variable → TOML
//! config file → compiled default priority. The TOML file lives at
//! `~/.config/lexd/config.toml` (or `/etc/lexd/config.toml` system-wide
//! on Linux).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// TOML config file contents (all fields optional; absent fields fall
/// through to compiled defaults)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub bind_address: Option<String>,
    pub database_path: Option<String>,
    pub completion_url: Option<String>,
    pub completion_model: Option<String>,
    pub completion_api_key: Option<String>,
    pub phonetic_url: Option<String>,
}

impl TomlConfig {
    /// Load the TOML config file if one exists, otherwise defaults
    pub fn load() -> Self {
        let Some(path) = find_config_file() else {
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    tracing::debug!("Loaded config file: {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Ignoring malformed config file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Generative completion endpoint settings
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_address: String,
    pub database_path: PathBuf,
    pub completion: CompletionConfig,
    pub phonetic_base_url: String,
}

impl ServiceConfig {
    /// Resolve configuration from CLI overrides, environment, TOML file
    /// and compiled defaults (in that priority order)
    pub fn resolve(
        cli_bind: Option<&str>,
        cli_database: Option<&str>,
        cli_config: Option<&str>,
    ) -> Result<Self> {
        let toml_config = match cli_config {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| Error::Config(format!("Read config file failed: {}", e)))?;
                toml::from_str(&content)
                    .map_err(|e| Error::Config(format!("Parse config file failed: {}", e)))?
            }
            None => TomlConfig::load(),
        };

        let bind_address = resolve_setting(
            cli_bind,
            "LEXD_BIND",
            toml_config.bind_address.as_deref(),
            "127.0.0.1:5760",
        );

        let database_path = resolve_setting(
            cli_database,
            "LEXD_DATABASE",
            toml_config.database_path.as_deref(),
            "",
        );
        let database_path = if database_path.is_empty() {
            default_database_path()
        } else {
            PathBuf::from(database_path)
        };

        let completion = CompletionConfig {
            base_url: resolve_setting(
                None,
                "LEXD_COMPLETION_URL",
                toml_config.completion_url.as_deref(),
                "https://api.openai.com/v1/completions",
            ),
            model: resolve_setting(
                None,
                "LEXD_COMPLETION_MODEL",
                toml_config.completion_model.as_deref(),
                "gpt-3.5-turbo-instruct",
            ),
            api_key: std::env::var("LEXD_COMPLETION_API_KEY")
                .ok()
                .or(toml_config.completion_api_key),
        };

        let phonetic_base_url = resolve_setting(
            None,
            "LEXD_PHONETIC_URL",
            toml_config.phonetic_url.as_deref(),
            "https://api.dictionaryapi.dev/api/v2/entries/en",
        );

        Ok(Self {
            bind_address,
            database_path,
            completion,
            phonetic_base_url,
        })
    }
}

/// Resolve one setting with CLI → ENV → TOML → default priority
fn resolve_setting(cli: Option<&str>, env_var: &str, toml: Option<&str>, default: &str) -> String {
    if let Some(value) = cli {
        return value.to_string();
    }

    if let Ok(value) = std::env::var(env_var) {
        if !value.trim().is_empty() {
            return value;
        }
    }

    if let Some(value) = toml {
        return value.to_string();
    }

    default.to_string()
}

/// Locate the config file for the platform
fn find_config_file() -> Option<PathBuf> {
    if let Some(path) = dirs::config_dir().map(|d| d.join("lexd").join("config.toml")) {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/lexd/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default database location
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("lexd").join("lexd.db"))
        .unwrap_or_else(|| PathBuf::from("./lexd.db"))
}
