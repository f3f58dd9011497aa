use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read config: {0}")]
    ReadError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration for SlideGen
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SlideGenConfig {
    /// Primary and fallback text-generation models
    #[serde(default)]
    pub llm: LlmConfig,

    /// Output allowances per generation task
    #[serde(default)]
    pub generation: GenerationSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmConfig {
    #[serde(default = "default_primary_model")]
    pub primary: ModelConfig,

    /// Tried once when the primary fails or returns blank text
    #[serde(default = "default_fallback_model")]
    pub fallback: ModelConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_model(),
            fallback: default_fallback_model(),
        }
    }
}

/// One model endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// Provider: "gemini" or "openai-compatible"
    #[serde(default = "default_provider")]
    pub provider: String,

    pub model: String,

    /// Overrides the provider's default API base URL
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ModelConfig {
    pub fn gemini(model: impl Into<String>) -> Self {
        Self {
            provider: default_provider(),
            model: model.into(),
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Maximum output tokens requested for each generation task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationSettings {
    #[serde(default = "default_outline_max_tokens")]
    pub outline_max_tokens: usize,

    #[serde(default = "default_layouts_max_tokens")]
    pub layouts_max_tokens: usize,

    #[serde(default = "default_image_description_max_tokens")]
    pub image_description_max_tokens: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            outline_max_tokens: default_outline_max_tokens(),
            layouts_max_tokens: default_layouts_max_tokens(),
            image_description_max_tokens: default_image_description_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "pretty", "json", "compact"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_primary_model() -> ModelConfig {
    ModelConfig::gemini("gemini-1.5-pro")
}
fn default_fallback_model() -> ModelConfig {
    ModelConfig::gemini("gemini-2.0-flash-exp")
}
fn default_provider() -> String {
    "gemini".to_string()
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_outline_max_tokens() -> usize {
    4000
}
fn default_layouts_max_tokens() -> usize {
    6000
}
fn default_image_description_max_tokens() -> usize {
    500
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

pub const LOCAL_CONFIG_FILE: &str = ".slidegen.toml";

/// Loads configuration from dotenv, a TOML file and environment overrides.
pub struct ConfigManager {
    config: SlideGenConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with the following precedence:
    /// 1. Environment variables (.env file included)
    /// 2. Config file (.slidegen.toml, then ~/.slidegen/config.toml)
    /// 3. Defaults
    pub fn load() -> Result<Self, ConfigError> {
        info!("Loading SlideGen configuration");

        Self::load_dotenv();

        let (config, config_path) = Self::load_config_file()?;
        let config = Self::apply_env_overrides(config);
        Self::validate_config(&config)?;

        match config_path {
            Some(ref path) => info!("Config file: {}", path.display()),
            None => info!("Config file: none, using defaults"),
        }
        info!(
            primary = %config.llm.primary.model,
            fallback = %config.llm.fallback.model,
            "Configuration loaded"
        );

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Load an explicit config file, still applying env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        Self::load_dotenv();
        let config = Self::apply_env_overrides(Self::read_toml_file(path)?);
        Self::validate_config(&config)?;
        Ok(Self {
            config,
            config_path: Some(path.to_path_buf()),
        })
    }

    fn load_dotenv() {
        if Path::new(".env").exists() {
            if let Err(e) = dotenv::from_filename(".env") {
                warn!("Failed to load .env file: {}", e);
            } else {
                debug!("Loaded .env file from current directory");
            }
            return;
        }

        if let Some(home) = dirs::home_dir() {
            let home_env = home.join(".slidegen.env");
            if home_env.exists() {
                if let Err(e) = dotenv::from_path(&home_env) {
                    warn!("Failed to load .slidegen.env: {}", e);
                }
            }
        }
    }

    fn load_config_file() -> Result<(SlideGenConfig, Option<PathBuf>), ConfigError> {
        let local_config = Path::new(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            let config = Self::read_toml_file(local_config)?;
            return Ok((config, Some(local_config.to_path_buf())));
        }

        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                let config = Self::read_toml_file(&user_config)?;
                return Ok((config, Some(user_config)));
            }
        }

        Ok((SlideGenConfig::default(), None))
    }

    /// `~/.slidegen/config.toml`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".slidegen").join("config.toml"))
    }

    fn read_toml_file(path: &Path) -> Result<SlideGenConfig, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn apply_env_overrides(config: SlideGenConfig) -> SlideGenConfig {
        Self::apply_overrides_from(config, |key| std::env::var(key).ok())
    }

    /// Apply overrides using `lookup` in place of the process environment.
    pub fn apply_overrides_from<F>(mut config: SlideGenConfig, lookup: F) -> SlideGenConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        // One key serves both models unless a model already carries its own.
        if let Some(key) = lookup("GOOGLE_GENERATIVE_AI_API_KEY") {
            for model in [&mut config.llm.primary, &mut config.llm.fallback] {
                if model.provider == "gemini" && model.api_key.is_none() {
                    model.api_key = Some(key.clone());
                }
            }
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            for model in [&mut config.llm.primary, &mut config.llm.fallback] {
                if model.provider == "openai-compatible" && model.api_key.is_none() {
                    model.api_key = Some(key.clone());
                }
            }
        }

        if let Some(model) = lookup("SLIDEGEN_PRIMARY_MODEL") {
            config.llm.primary.model = model;
        }
        if let Some(model) = lookup("SLIDEGEN_FALLBACK_MODEL") {
            config.llm.fallback.model = model;
        }
        if let Some(provider) = lookup("SLIDEGEN_PROVIDER") {
            config.llm.primary.provider = provider.clone();
            config.llm.fallback.provider = provider;
        }
        if let Some(url) = lookup("SLIDEGEN_BASE_URL") {
            config.llm.primary.base_url = Some(url.clone());
            config.llm.fallback.base_url = Some(url);
        }
        if let Some(timeout) = lookup("SLIDEGEN_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                config.llm.primary.timeout_secs = secs;
                config.llm.fallback.timeout_secs = secs;
            }
        }
        if let Some(tokens) = lookup("SLIDEGEN_LAYOUTS_MAX_TOKENS") {
            if let Ok(n) = tokens.parse() {
                config.generation.layouts_max_tokens = n;
            }
        }

        if let Some(level) = lookup("RUST_LOG") {
            config.logging.level = level;
        }

        config
    }

    pub fn validate_config(config: &SlideGenConfig) -> Result<(), ConfigError> {
        for (role, model) in [("primary", &config.llm.primary), ("fallback", &config.llm.fallback)] {
            match model.provider.as_str() {
                "gemini" | "openai-compatible" => {}
                other => {
                    return Err(ConfigError::ValidationError(format!(
                        "Invalid {} provider: {}. Must be one of: gemini, openai-compatible",
                        role, other
                    )))
                }
            }
            if model.model.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{} model name must not be empty",
                    role
                )));
            }
            if model.timeout_secs == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{} timeout must be greater than zero",
                    role
                )));
            }
        }

        let generation = &config.generation;
        if generation.outline_max_tokens == 0
            || generation.layouts_max_tokens == 0
            || generation.image_description_max_tokens == 0
        {
            return Err(ConfigError::ValidationError(
                "Token allowances must be greater than zero".to_string(),
            ));
        }

        // RUST_LOG may carry directives like "slidegen_ai=debug"; only bare levels are checked.
        let level = config.logging.level.to_ascii_lowercase();
        if !level.contains('=') && !level.contains(',') {
            match level.as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => {}
                other => {
                    return Err(ConfigError::ValidationError(format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        other
                    )))
                }
            }
        }

        match config.logging.format.as_str() {
            "pretty" | "json" | "compact" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {}. Must be one of: pretty, json, compact",
                    other
                )))
            }
        }

        Ok(())
    }

    pub fn config(&self) -> &SlideGenConfig {
        &self.config
    }

    pub fn into_config(self) -> SlideGenConfig {
        self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Write a default config file, creating parent directories.
    pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        let config = SlideGenConfig::default();
        let toml_str =
            toml::to_string_pretty(&config).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::ReadError(e.to_string()))?;
        }

        std::fs::write(path, toml_str).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Ok(())
    }
}
