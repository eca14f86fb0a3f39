use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::types::TrustedSourceRecord;

const DEFAULT_INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_ZERO_SHOT_MODEL: &str = "facebook/bart-large-mnli";
const DEFAULT_SENTIMENT_MODEL: &str = "cardiffnlp/twitter-xlm-roberta-base-sentiment";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; EducationAI/1.0)";

/// Application configuration loaded from environment variables.
/// Secrets stay in the environment; the trusted-source seed list lives in a
/// TOML file referenced by `TRUSTED_SOURCES_PATH`.
#[derive(Debug, Clone)]
pub struct Config {
    // Inference API (optional: absence disables the classifier)
    pub hf_api_key: Option<String>,
    pub inference_base_url: String,
    pub zero_shot_model: String,
    pub sentiment_model: String,
    pub classifier_timeout: Duration,

    // Page fetching
    pub fetch_timeout: Duration,
    pub user_agent: String,

    // Trusted sources
    pub trusted_sources_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hf_api_key: None,
            inference_base_url: DEFAULT_INFERENCE_BASE_URL.to_string(),
            zero_shot_model: DEFAULT_ZERO_SHOT_MODEL.to_string(),
            sentiment_model: DEFAULT_SENTIMENT_MODEL.to_string(),
            classifier_timeout: Duration::from_secs(15),
            fetch_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            trusted_sources_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            hf_api_key: std::env::var("HF_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            inference_base_url: std::env::var("INFERENCE_BASE_URL")
                .unwrap_or(defaults.inference_base_url),
            zero_shot_model: std::env::var("ZERO_SHOT_MODEL").unwrap_or(defaults.zero_shot_model),
            sentiment_model: std::env::var("SENTIMENT_MODEL").unwrap_or(defaults.sentiment_model),
            classifier_timeout: secs_from_env("CLASSIFIER_TIMEOUT_SECS")?
                .unwrap_or(defaults.classifier_timeout),
            fetch_timeout: secs_from_env("FETCH_TIMEOUT_SECS")?.unwrap_or(defaults.fetch_timeout),
            user_agent: std::env::var("FETCH_USER_AGENT").unwrap_or(defaults.user_agent),
            trusted_sources_path: std::env::var("TRUSTED_SOURCES_PATH").ok().map(PathBuf::from),
        };

        config.log_keys();
        Ok(config)
    }

    pub fn classifier_enabled(&self) -> bool {
        self.hf_api_key.is_some()
    }

    fn log_keys(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  HF_API_KEY: {}", preview_opt(&self.hf_api_key));
        tracing::info!("  INFERENCE_BASE_URL: {}", self.inference_base_url);
        tracing::info!("  FETCH_TIMEOUT_SECS: {}", self.fetch_timeout.as_secs());
        tracing::info!(
            "  TRUSTED_SOURCES_PATH: {}",
            self.trusted_sources_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<not set>".to_string())
        );
    }
}

/// First five characters of a secret and its length.
fn preview_opt(val: &Option<String>) -> String {
    match val {
        Some(v) if !v.is_empty() => {
            let head: String = v.chars().take(5).collect();
            format!("{}...({} chars)", head, v.chars().count())
        }
        _ => "<not set>".to_string(),
    }
}

fn secs_from_env(key: &str) -> Result<Option<Duration>> {
    match std::env::var(key) {
        Ok(raw) => {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{key} must be a whole number of seconds"))?;
            Ok(Some(Duration::from_secs(secs)))
        }
        Err(_) => Ok(None),
    }
}

/// TOML seed file for the trusted-source store.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrustedSourcesFile {
    #[serde(default)]
    pub sources: Vec<TrustedSourceRecord>,
}

/// Load and parse a trusted-source seed file.
pub fn load_trusted_sources(path: &Path) -> Result<Vec<TrustedSourceRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read trusted sources file: {}", path.display()))?;
    parse_trusted_sources(&content)
        .with_context(|| format!("Failed to parse trusted sources file: {}", path.display()))
}

pub fn parse_trusted_sources(content: &str) -> Result<Vec<TrustedSourceRecord>> {
    let file: TrustedSourcesFile = toml::from_str(content)?;
    Ok(file.sources)
}
