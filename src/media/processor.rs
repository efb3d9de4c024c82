use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info};

use crate::config::MediaConfig;
use crate::error::Result;
use super::probe::parse_duration;
use super::{MediaCommandBuilder, MediaProcessorTrait};

/// Concrete implementation of media processor (FFmpeg-based)
pub struct MediaProcessorImpl {
    command_builder: MediaCommandBuilder,
}

impl MediaProcessorImpl {
    /// Create a new media processor implementation
    pub fn new(config: MediaConfig) -> Self {
        let command_builder = MediaCommandBuilder::new(config.binary_path, config.probe_binary_path);

        Self { command_builder }
    }
}

#[async_trait]
impl MediaProcessorTrait for MediaProcessorImpl {
    async fn probe_duration(&self, video_path: &Path) -> Result<f64> {
        debug!("Probing duration of {}", video_path.display());

        let output = self.command_builder.probe_duration(video_path).execute().await?;
        let duration = parse_duration(&output)?;

        info!("Video duration: {:.3}s", duration);
        Ok(duration)
    }

    async fn split_segments(
        &self,
        video_path: &Path,
        output_pattern: &Path,
        segment_length_secs: f64,
    ) -> Result<()> {
        info!(
            "Splitting {} into {}s segments -> {}",
            video_path.display(),
            segment_length_secs,
            output_pattern.display()
        );

        self.command_builder
            .split_segments(video_path, output_pattern, segment_length_secs)
            .execute()
            .await?;

        info!("Segmentation completed");
        Ok(())
    }

    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()> {
        info!("Extracting audio from {} to {}", video_path.display(), audio_path.display());

        self.command_builder.extract_audio(video_path, audio_path).execute().await?;

        info!("Audio extraction completed");
        Ok(())
    }

    async fn replace_audio(
        &self,
        video_path: &Path,
        audio_path: &Path,
        output_path: &Path,
    ) -> Result<()> {
        info!(
            "Replacing audio of {} with {} -> {}",
            video_path.display(),
            audio_path.display(),
            output_path.display()
        );

        self.command_builder
            .replace_audio(video_path, audio_path, output_path)
            .execute()
            .await?;

        info!("Audio replacement completed successfully");
        Ok(())
    }

    async fn check_availability(&self) -> Result<()> {
        for command in [
            self.command_builder.version_check(),
            self.command_builder.probe_version_check(),
        ] {
            let output = command.execute().await?;
            let version = output.stdout.lines().next().unwrap_or("Unknown version");
            info!("{} is available: {}", command.binary_path, version);
        }
        Ok(())
    }
}
