use anyhow::{bail, Context};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::gemini::http::DEFAULT_BASE_URL;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default)]
    pub text: TextConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    #[serde(default = "default_text_model")]
    pub default_model: String,
    /// Used when the registry answers but lists nothing usable.
    #[serde(default = "default_empty_listing_model")]
    pub empty_listing_model: String,
    #[serde(default = "default_preferred_models")]
    pub preferred_models: Vec<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Tried in order; the first model that returns audio wins.
    #[serde(default = "default_speech_candidates")]
    pub candidates: Vec<String>,
    #[serde(default = "default_local_fallback")]
    pub local_fallback: bool,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        if let Some(path) = Self::project_path() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        if let Ok(path) = Self::default_path() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config at {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("parse config at {}", path.display()))?;
        Ok(config)
    }

    pub fn init_default() -> anyhow::Result<PathBuf> {
        let path = Self::default_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let config = Self::default();
        fs::write(&path, serde_json::to_string_pretty(&config)?)?;
        Ok(path)
    }

    pub fn default_path() -> anyhow::Result<PathBuf> {
        let base = BaseDirs::new().context("unable to resolve home directory")?;
        Ok(base.config_dir().join("vibepitch").join("config.json"))
    }

    /// Environment wins over the config file.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .or_else(|| self.api_key.clone())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }

    /// Copy safe to print.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.api_key.is_some() {
            config.api_key = Some("<redacted>".to_string());
        }
        config
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=1.0).contains(&self.volume) {
            bail!("volume must be between 0.0 and 1.0");
        }

        if self.timeout_seconds == 0 {
            bail!("timeout_seconds must be greater than 0");
        }

        if self.api_base_url.trim().is_empty() {
            bail!("api_base_url must not be empty");
        }

        if self.text.default_model.trim().is_empty() {
            bail!("text.default_model must not be empty");
        }

        if self.text.empty_listing_model.trim().is_empty() {
            bail!("text.empty_listing_model must not be empty");
        }

        if !(0.0..=2.0).contains(&self.text.temperature) {
            bail!("text.temperature must be between 0.0 and 2.0");
        }

        if !(self.text.top_p > 0.0 && self.text.top_p <= 1.0) {
            bail!("text.top_p must be in (0.0, 1.0]");
        }

        if self.speech.candidates.is_empty() {
            bail!("speech.candidates must list at least one model");
        }

        if self.speech.candidates.iter().any(|c| c.trim().is_empty()) {
            bail!("speech.candidates must not contain empty model names");
        }

        if self.resolved_api_key().is_none() {
            tracing::warn!("no API key set; export {API_KEY_ENV} or set api_key in the config");
        }

        Ok(())
    }

    fn project_path() -> Option<PathBuf> {
        Some(PathBuf::from("vibepitch.json"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            volume: default_volume(),
            text: TextConfig::default(),
            speech: SpeechConfig::default(),
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            default_model: default_text_model(),
            empty_listing_model: default_empty_listing_model(),
            preferred_models: default_preferred_models(),
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            candidates: default_speech_candidates(),
            local_fallback: default_local_fallback(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_volume() -> f32 {
    0.8
}

fn default_text_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_empty_listing_model() -> String {
    "gemini-pro".to_string()
}

fn default_preferred_models() -> Vec<String> {
    ["gemini-1.5-flash", "gemini-1.5-flash-latest", "gemini-pro", "gemini-1.0-pro"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_temperature() -> f32 {
    0.8
}

fn default_top_p() -> f32 {
    0.95
}

fn default_speech_candidates() -> Vec<String> {
    [
        "gemini-2.0-flash-exp",
        "gemini-1.5-flash",
        "gemini-1.5-flash-latest",
        "gemini-1.5-pro",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_local_fallback() -> bool {
    true
}
