use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

use crate::processing::{ExtractionFailurePolicy, PipelineSettings, ResubmissionPolicy};

const DEFAULT_SUMMARY_MAX_LENGTH: usize = 200;
const DEFAULT_MAX_KEYWORDS: usize = 10;
const DEFAULT_PREVIEW_CHARS: usize = 1000;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the document processing service.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Default character bound for extractive summaries.
    pub summary_max_length: usize,
    /// Default number of keywords returned per document.
    pub max_keywords: usize,
    /// Number of characters of extracted text echoed back in results.
    pub preview_chars: usize,
    /// Behavior when a document is re-submitted while a run for the same id is in flight.
    pub resubmission_policy: ResubmissionPolicy,
    /// Behavior when text extraction fails.
    pub extraction_failure: ExtractionFailurePolicy,
    /// Optional retention window for terminal statuses, in seconds.
    pub status_ttl_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: None,
            summary_max_length: DEFAULT_SUMMARY_MAX_LENGTH,
            max_keywords: DEFAULT_MAX_KEYWORDS,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            resubmission_policy: ResubmissionPolicy::default(),
            extraction_failure: ExtractionFailurePolicy::default(),
            status_ttl_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    ///
    /// Every variable is optional; absent values fall back to [`Config::default`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            server_port: parse_optional("SERVER_PORT")?,
            summary_max_length: parse_positive("DOCPROC_SUMMARY_MAX_LENGTH")?
                .unwrap_or(defaults.summary_max_length),
            max_keywords: parse_positive("DOCPROC_MAX_KEYWORDS")?
                .unwrap_or(defaults.max_keywords),
            preview_chars: parse_positive("DOCPROC_PREVIEW_CHARS")?
                .unwrap_or(defaults.preview_chars),
            resubmission_policy: load_env_optional("DOCPROC_RESUBMISSION_POLICY")
                .map(|value| {
                    value.parse().map_err(|()| {
                        ConfigError::InvalidValue("DOCPROC_RESUBMISSION_POLICY".into())
                    })
                })
                .transpose()?
                .unwrap_or(defaults.resubmission_policy),
            extraction_failure: load_env_optional("DOCPROC_EXTRACTION_FAILURE")
                .map(|value| {
                    value.parse().map_err(|()| {
                        ConfigError::InvalidValue("DOCPROC_EXTRACTION_FAILURE".into())
                    })
                })
                .transpose()?
                .unwrap_or(defaults.extraction_failure),
            status_ttl_secs: parse_optional("DOCPROC_STATUS_TTL_SECS")?,
        })
    }

    /// Derive the settings handed to the processing pipeline.
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            summary_max_length: self.summary_max_length,
            max_keywords: self.max_keywords,
            preview_chars: self.preview_chars,
            resubmission_policy: self.resubmission_policy,
            extraction_failure: self.extraction_failure,
            status_ttl: self.status_ttl_secs.map(Duration::from_secs),
        }
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

fn parse_positive(key: &str) -> Result<Option<usize>, ConfigError> {
    match parse_optional::<usize>(key)? {
        Some(0) => Err(ConfigError::InvalidValue(key.to_string())),
        other => Ok(other),
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        server_port = ?config.server_port,
        summary_max_length = config.summary_max_length,
        max_keywords = config.max_keywords,
        resubmission_policy = ?config.resubmission_policy,
        extraction_failure = ?config.extraction_failure,
        status_ttl_secs = ?config.status_ttl_secs,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
