use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RevoiceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request rejected before any pipeline work began
    #[error("{0}")]
    Upload(String),

    #[error("Could not extract video duration. Please check the video file format. Error: {0}")]
    MediaProbe(String),

    #[error("Video segmentation failed: {0}")]
    Segmentation(String),

    #[error("Segment {index} ({}) failed: {source}", segment.display())]
    SegmentProcessing {
        index: usize,
        segment: PathBuf,
        #[source]
        source: Box<RevoiceError>,
    },

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Remux failed: {0}")]
    Remux(String),

    #[error("Transcription error: {0}")]
    Transcriber(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RevoiceError {
    /// Stable taxonomy name used in logs and JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "IoError",
            Self::Json(_) => "JsonError",
            Self::Toml(_) => "TomlError",
            Self::Http(_) => "HttpError",
            Self::Upload(_) => "UploadError",
            Self::MediaProbe(_) => "MediaProbeError",
            Self::Segmentation(_) => "SegmentationError",
            Self::SegmentProcessing { .. } => "SegmentProcessingError",
            Self::Synthesis(_) => "SynthesisError",
            Self::Remux(_) => "RemuxError",
            Self::Transcriber(_) => "TranscriberError",
            Self::Translation(_) => "TranslationError",
            Self::Media(_) => "MediaError",
            Self::Config(_) => "ConfigError",
        }
    }

    /// Wrap a collaborator failure with the identity of the segment it hit
    pub fn in_segment(self, index: usize, segment: impl Into<PathBuf>) -> Self {
        Self::SegmentProcessing {
            index,
            segment: segment.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, RevoiceError>;
