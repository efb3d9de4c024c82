// Media tool collaborator
//
// Every container/codec operation the pipeline performs goes through
// MediaProcessorTrait:
// - Commands: MediaCommand builder and process execution
// - Probe: parsing of the duration probe output
// - Processor: ffmpeg/ffprobe backed implementation

pub mod commands;
pub mod probe;
pub mod processor;

use async_trait::async_trait;
use std::path::Path;

pub use commands::*;
pub use processor::*;

use crate::config::MediaConfig;
use crate::error::Result;

/// Main trait for media processing operations
#[async_trait]
pub trait MediaProcessorTrait: Send + Sync {
    /// Total duration of a video in seconds
    async fn probe_duration(&self, video_path: &Path) -> Result<f64>;

    /// Split a video into consecutive fixed-length chunks named after `output_pattern`
    /// (a printf-style pattern such as `job_segment_%03d.mp4`), copying streams
    async fn split_segments(
        &self,
        video_path: &Path,
        output_pattern: &Path,
        segment_length_secs: f64,
    ) -> Result<()>;

    /// Extract the audio track of a video to a transient audio file
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()>;

    /// Combine the video track of `video_path` with the audio of `audio_path`
    async fn replace_audio(
        &self,
        video_path: &Path,
        audio_path: &Path,
        output_path: &Path,
    ) -> Result<()>;

    /// Check if media processor is available
    async fn check_availability(&self) -> Result<()>;
}

/// Factory for creating media processor instances
pub struct MediaProcessorFactory;

impl MediaProcessorFactory {
    /// Create the default media processor implementation (FFmpeg-based)
    pub fn create_processor(config: MediaConfig) -> Box<dyn MediaProcessorTrait> {
        Box::new(processor::MediaProcessorImpl::new(config))
    }
}
