//! Configuration loading
//!
//! Settings come from an optional TOML file merged with `AGRI_*` environment
//! variables (e.g. `AGRI_LLM__API_KEY` overrides `[llm] api_key`).

use crate::error::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// LLM chat endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Provider name: "groq" or "openai", or any OpenAI-compatible service
    /// when `base_url` is set explicitly
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    pub base_url: Option<String>,
    /// Kept low for consistent, factual responses
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
            model: default_model(),
            base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Market dataset storage
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Directory holding the CSV datasets
    #[serde(default = "default_data_dir")]
    pub dir: String,
    #[serde(default = "default_region")]
    pub default_region: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            default_region: default_region(),
        }
    }
}

impl DataConfig {
    /// Data directory with `~` expanded
    pub fn dir_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.dir).into_owned())
    }
}

/// Advisory response cache storage
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_dir")]
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

impl CacheConfig {
    pub fn dir_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.dir).into_owned())
    }
}

/// JSON API server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_provider() -> String {
    "groq".to_string()
}

fn default_model() -> String {
    "llama3-70b-8192".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_region() -> String {
    "midwest".to_string()
}

fn default_cache_dir() -> String {
    "cache".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load configuration from a TOML file (if present) plus environment
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("AGRI").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
