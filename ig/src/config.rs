//! ideagen configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ideas::{CountBounds, MAX_TEMPERATURE, MIN_TEMPERATURE, Style, Tone};
use crate::llm::LlmError;

/// Main ideagen configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Generation defaults and limits
    pub generation: GenerationConfig,

    /// Export configuration
    pub export: ExportConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        let g = &self.generation;
        if g.min_count == 0 || g.min_count > g.max_count {
            return Err(eyre::eyre!(
                "generation.min-count ({}) must be at least 1 and no greater than generation.max-count ({})",
                g.min_count,
                g.max_count
            ));
        }

        if !g.count_bounds().contains(g.default_count) {
            return Err(eyre::eyre!(
                "generation.default-count ({}) must be within {}-{}",
                g.default_count,
                g.min_count,
                g.max_count
            ));
        }

        if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&g.temperature) {
            return Err(eyre::eyre!(
                "generation.temperature ({}) must be within {}-{}",
                g.temperature,
                MIN_TEMPERATURE,
                MAX_TEMPERATURE
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(eyre::eyre!("llm.max-tokens must be greater than zero"));
        }

        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .ideagen.yml
        let local_config = PathBuf::from(".ideagen.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/ideagen/ideagen.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("ideagen").join("ideagen.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("openai" or "anthropic")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 600,
            timeout_ms: 60_000,
        }
    }
}

impl LlmConfig {
    /// Resolve the API key: a runtime-supplied value wins over the environment
    ///
    /// Blank values count as missing.
    pub fn resolve_api_key(&self, override_key: Option<&str>) -> Result<String, LlmError> {
        if let Some(key) = override_key.map(str::trim).filter(|k| !k.is_empty()) {
            tracing::debug!("resolve_api_key: using runtime-supplied key");
            return Ok(key.to_string());
        }

        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => {
                tracing::debug!(env = %self.api_key_env, "resolve_api_key: using key from environment");
                Ok(key.trim().to_string())
            }
            _ => Err(LlmError::MissingApiKey {
                env: self.api_key_env.clone(),
            }),
        }
    }
}

/// Generation defaults and limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Fewest ideas a single request may ask for
    #[serde(rename = "min-count")]
    pub min_count: u32,

    /// Most ideas a single request may ask for
    #[serde(rename = "max-count")]
    pub max_count: u32,

    /// Ideas per generation when not specified
    #[serde(rename = "default-count")]
    pub default_count: u32,

    /// Default sampling temperature
    pub temperature: f32,

    /// Default content style
    pub style: Style,

    /// Default tone
    pub tone: Tone,

    /// Directory with prompt template overrides (`ideas-system.pmt`, `ideas-user.pmt`)
    #[serde(rename = "prompts-dir")]
    pub prompts_dir: Option<PathBuf>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        let bounds = CountBounds::default();
        Self {
            min_count: bounds.min,
            max_count: bounds.max,
            default_count: 5,
            temperature: 0.7,
            style: Style::default(),
            tone: Tone::default(),
            prompts_dir: dirs::config_dir().map(|d| d.join("ideagen").join("prompts")),
        }
    }
}

impl GenerationConfig {
    pub fn count_bounds(&self) -> CountBounds {
        CountBounds {
            min: self.min_count,
            max: self.max_count,
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory export files are written to
    pub dir: PathBuf,

    /// Write an "idea" header row in CSV exports
    #[serde(rename = "csv-header")]
    pub csv_header: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            csv_header: true,
        }
    }
}
