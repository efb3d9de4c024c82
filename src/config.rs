use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, RevoiceError};

fn default_show_progress() -> bool {
    true
}

fn default_request_timeout_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub media: MediaConfig,
    pub transcriber: TranscriberConfig,
    pub translate: TranslateConfig,
    pub synthesis: SynthesisConfig,
    pub pipeline: PipelineConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Path to ffprobe binary
    pub probe_binary_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriberConfig {
    /// Path to the whisper command-line tool
    pub binary_path: String,
    /// Whisper model name (tiny, base, small, medium, large)
    pub model: String,
    /// Spoken language hint; detected automatically when unset
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Inference endpoint; the model id is appended as a path segment
    pub endpoint: String,
    /// Bearer token for the inference endpoint
    pub api_token: Option<String>,
    /// Language of the spoken source; targeting it skips translation
    pub source_language: String,
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Text-to-speech endpoint
    pub endpoint: String,
    /// Speech code used for every target language without a dedicated voice
    pub default_language_code: String,
    /// Longest text chunk sent in one request
    pub max_chunk_chars: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Videos at or below this duration (seconds) are processed whole
    pub segment_threshold_secs: f64,
    /// Length of each chunk (seconds) when a video is split
    pub segment_length_secs: f64,
    /// Draw a progress bar while segments are processed
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Uploaded videos, segment files and transient audio
    pub upload_dir: PathBuf,
    /// Final videos handed to the serving layer
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            media: MediaConfig {
                binary_path: "ffmpeg".to_string(),
                probe_binary_path: "ffprobe".to_string(),
            },
            transcriber: TranscriberConfig {
                binary_path: "whisper".to_string(),
                model: "base".to_string(),
                language: None,
            },
            translate: TranslateConfig {
                endpoint: "https://api-inference.huggingface.co/models".to_string(),
                api_token: None,
                source_language: "English".to_string(),
                timeout_secs: default_request_timeout_secs(),
            },
            synthesis: SynthesisConfig {
                endpoint: "https://translate.google.com/translate_tts".to_string(),
                default_language_code: "en".to_string(),
                max_chunk_chars: 100,
                timeout_secs: default_request_timeout_secs(),
            },
            pipeline: PipelineConfig {
                segment_threshold_secs: 15.0,
                segment_length_secs: 15.0,
                show_progress: default_show_progress(),
            },
            storage: StorageConfig {
                upload_dir: PathBuf::from("uploads"),
                output_dir: PathBuf::from("output"),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RevoiceError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| RevoiceError::Config(format!("Failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RevoiceError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| RevoiceError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let pipeline = &self.pipeline;
        if !(pipeline.segment_length_secs > 0.0) {
            return Err(RevoiceError::Config(format!(
                "pipeline.segment_length_secs must be positive, got {}",
                pipeline.segment_length_secs
            )));
        }
        if !(pipeline.segment_threshold_secs >= 0.0) {
            return Err(RevoiceError::Config(format!(
                "pipeline.segment_threshold_secs must not be negative, got {}",
                pipeline.segment_threshold_secs
            )));
        }
        if self.synthesis.max_chunk_chars == 0 {
            return Err(RevoiceError::Config("synthesis.max_chunk_chars must be at least 1".to_string()));
        }
        Ok(())
    }
}
