use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;

use crate::artifacts::ArtifactScope;
use crate::error::Result;
use crate::media::MediaProcessorTrait;
use crate::segmenter::Segment;
use crate::transcribe::TranscriberTrait;
use crate::translate::{translate_unit, TranslationPlan, TranslatorTrait};

/// Transcript Unit and Translation Unit produced for one segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentResult {
    pub transcript: String,
    pub translation: String,
}

/// Runs extract -> transcribe -> translate for a single segment
pub struct SegmentProcessor<'a> {
    pub media: &'a dyn MediaProcessorTrait,
    pub transcriber: &'a dyn TranscriberTrait,
    pub translator: &'a dyn TranslatorTrait,
    /// Directory for the transient audio file
    pub scratch_dir: PathBuf,
}

impl SegmentProcessor<'_> {
    /// Process one segment. The extracted audio is always removed before this
    /// returns, and so is the segment file itself unless it is the source video.
    /// Failures carry the segment's index and path.
    pub async fn process(
        &self,
        segment: &Segment,
        plan: TranslationPlan,
        target_language: &str,
    ) -> Result<SegmentResult> {
        let mut scope = ArtifactScope::new(format!("segment {}", segment.index));
        if !segment.is_source {
            scope.register(&segment.path);
        }

        let result = self.run(segment, plan, target_language, &mut scope).await;
        scope.cleanup();
        result.map_err(|e| e.in_segment(segment.index, &segment.path))
    }

    async fn run(
        &self,
        segment: &Segment,
        plan: TranslationPlan,
        target_language: &str,
        scope: &mut ArtifactScope,
    ) -> Result<SegmentResult> {
        let audio_path = self
            .scratch_dir
            .join(format!("audio_{}.wav", Uuid::new_v4().simple()));
        scope.register(&audio_path);

        self.media.extract_audio(&segment.path, &audio_path).await?;

        let transcript = self.transcriber.transcribe(&audio_path).await?.text.trim().to_string();
        debug!("Segment {} transcript: {:?}", segment.index, transcript);

        let translation = translate_unit(self.translator, plan, &transcript, target_language).await?;
        debug!("Segment {} translation: {:?}", segment.index, translation);

        info!(
            "Segment {} processed ({} -> {} characters)",
            segment.index,
            transcript.len(),
            translation.len()
        );
        Ok(SegmentResult {
            transcript,
            translation,
        })
    }
}
