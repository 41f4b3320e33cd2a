// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub primary: PrimaryProviderConfig,
    pub secondary: SecondaryProviderConfig,
    pub pipeline: PipelineConfig,
    pub knowledge: KnowledgeConfig,
    pub transcript: TranscriptConfig,
}

/// Generative model used for extraction, simple chat and simulated critique.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PrimaryProviderConfig {
    pub base_url: String,
    pub model: String,
    pub extraction_temperature: f32,
    pub chat_temperature: f32,
    pub critique_temperature: f32,
    pub api_key: Option<String>,
}

/// Chat-completions endpoint used for the remote reasoning stage.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecondaryProviderConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub narration_interval_ms: u64,
    pub context_budget_chars: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub documents_dir: Option<PathBuf>,
    pub include_samples: bool,
    pub max_file_size_mb: usize,
    pub skip_patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TranscriptConfig {
    pub path: PathBuf,
}

impl Default for PrimaryProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            extraction_temperature: 0.2,
            chat_temperature: 0.3,
            critique_temperature: 0.5,
            api_key: None,
        }
    }
}

impl Default for SecondaryProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepseek.com".to_string(),
            model: "deepseek-chat".to_string(),
            temperature: 0.8,
            max_tokens: 4096,
            api_key: None,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            narration_interval_ms: 1500,
            context_budget_chars: None,
        }
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            documents_dir: None,
            include_samples: true,
            max_file_size_mb: 10,
            skip_patterns: vec![".git/".to_string(), "*.tmp".to_string()],
        }
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/transcript.json"),
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new("config/default.toml")).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("FINSIGHT")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("primary.base_url", &self.primary.base_url),
            ("secondary.base_url", &self.secondary.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(PipelineError::Config(format!(
                    "{} must be an http(s) URL, got {}",
                    name, url
                )));
            }
        }

        for (name, value) in [
            ("primary.extraction_temperature", self.primary.extraction_temperature),
            ("primary.chat_temperature", self.primary.chat_temperature),
            ("primary.critique_temperature", self.primary.critique_temperature),
            ("secondary.temperature", self.secondary.temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(PipelineError::Config(format!(
                    "{} must be within [0, 2], got {}",
                    name, value
                )));
            }
        }

        if self.secondary.max_tokens == 0 {
            return Err(PipelineError::Config(
                "secondary.max_tokens must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.narration_interval_ms == 0 {
            return Err(PipelineError::Config(
                "narration_interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.context_budget_chars == Some(0) {
            return Err(PipelineError::Config(
                "context_budget_chars must be greater than 0 when set".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.primary.model, "gemini-2.5-flash");
        assert!(config.secondary.temperature > config.primary.extraction_temperature);
    }

    #[test]
    fn test_rejects_out_of_range_temperature() {
        let mut config = Config::default_config();
        config.primary.extraction_temperature = 3.5;
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_rejects_zero_budget() {
        let mut config = Config::default_config();
        config.pipeline.context_budget_chars = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("finsight.toml");
        fs::write(
            &path,
            "[secondary]\nmodel = \"deepseek-reasoner\"\n\n[pipeline]\nnarration_interval_ms = 250\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.secondary.model, "deepseek-reasoner");
        assert_eq!(config.secondary.max_tokens, 4096);
        assert_eq!(config.pipeline.narration_interval_ms, 250);
        assert_eq!(config.primary.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[primary]\nbase_url = \"ftp://example\"\n").unwrap();

        assert!(Config::load(Some(&path)).is_err());
    }
}
