use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs::File, io::BufReader, path::Path, path::PathBuf};
use thiserror::Error;

use crate::{
    eval::context::ContextError,
    response::{UnrecognizedPolicy, DEFAULT_RESPONSE_TAG},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Agent requires either a program path or inline code")]
    MissingProgram,
    #[error("Invalid binding: {0}")]
    Binding(#[from] ContextError),
    #[error("Failed to load config: {0}")]
    Load(String),
}

/// Agent settings as read from a config file.
///
/// Bindings to host functions cannot be expressed here; they are added on the
/// builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub include_paths: Vec<PathBuf>,

    /// Program run into every fresh context before the message is bound.
    #[serde(default)]
    pub prelude: Option<String>,

    #[serde(default = "default_response_tag")]
    pub response_tag: String,

    #[serde(default)]
    pub unrecognized: UnrecognizedPolicy,

    /// Number of most recent history entries exposed to dialog programs.
    #[serde(default)]
    pub history_window: Option<usize>,

    #[serde(default)]
    pub enrichment: Option<EnrichmentSettings>,

    #[serde(default)]
    pub llm: CommonConfig,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            path: None,
            code: None,
            include_paths: Vec::new(),
            prelude: None,
            response_tag: default_response_tag(),
            unrecognized: UnrecognizedPolicy::default(),
            history_window: None,
            enrichment: None,
            llm: CommonConfig::default(),
        }
    }
}

impl AgentSettings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        from_file(path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichmentSettings {
    /// Tag of the payloads whose identifiers are looked up.
    #[serde(default = "default_lookup_tag")]
    pub lookup_tag: String,

    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            lookup_tag: default_lookup_tag(),
            system_prompt: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommonConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            model: default_model(),
        }
    }
}

/// Provider secrets, usually kept in secret.json
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SecretConfig {
    pub providers: HashMap<String, ProviderSecretConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderSecretConfig {
    pub api_key: String,
    #[serde(default = "HashMap::new")]
    pub additional_auth: HashMap<String, String>,
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let file = File::open(path.as_ref()).map_err(|e| {
        ConfigError::Load(format!(
            "Failed to open {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .map_err(|e| ConfigError::Load(format!("Failed to parse config file: {}", e)))?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, ConfigError> {
    let config = serde_json::from_str(s)
        .map_err(|e| ConfigError::Load(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

fn default_response_tag() -> String {
    DEFAULT_RESPONSE_TAG.to_string()
}

fn default_lookup_tag() -> String {
    "ontology_term".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> usize {
    1000
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
