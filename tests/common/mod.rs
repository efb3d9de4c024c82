#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use revoice::config::Config;
use revoice::error::{Result, RevoiceError};
use revoice::media::MediaProcessorTrait;
use revoice::synthesize::SynthesizerTrait;
use revoice::transcribe::{TranscriberTrait, Transcription};
use revoice::translate::TranslatorTrait;

mock! {
    pub Translator {}

    #[async_trait]
    impl TranslatorTrait for Translator {
        async fn translate(&self, text: &str, model_id: &str, target_language: &str) -> Result<String>;
    }
}

mock! {
    pub Synthesizer {}

    #[async_trait]
    impl SynthesizerTrait for Synthesizer {
        async fn synthesize(&self, text: &str, language_code: &str, output_path: &Path) -> Result<()>;
    }
}

/// Synthesizer expecting exactly one call with `code`, writing a small MP3 placeholder
pub fn synthesizer_expecting(code: &'static str) -> MockSynthesizer {
    let mut synthesizer = MockSynthesizer::new();
    synthesizer
        .expect_synthesize()
        .withf(move |_, language_code, _| language_code.to_string() == code)
        .times(1)
        .returning(|_, _, output_path| {
            std::fs::write(output_path, b"ID3 speech")?;
            Ok(())
        });
    synthesizer
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Probe,
    /// Writes one segment file, then fails
    Split,
    Remux,
}

/// Media tool stand-in operating on real files in the test's directories
#[derive(Clone, Default)]
pub struct FakeMedia {
    pub duration: f64,
    pub segment_count: usize,
    pub fail_at: Option<FailAt>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FakeMedia {
    pub fn new(duration: f64, segment_count: usize) -> Self {
        Self {
            duration,
            segment_count,
            ..Self::default()
        }
    }

    pub fn failing_at(mut self, stage: FailAt) -> Self {
        self.fail_at = Some(stage);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

fn numbered(pattern: &Path, index: usize) -> PathBuf {
    PathBuf::from(pattern.to_string_lossy().replace("%03d", &format!("{:03}", index)))
}

#[async_trait]
impl MediaProcessorTrait for FakeMedia {
    async fn probe_duration(&self, _video_path: &Path) -> Result<f64> {
        self.record("probe");
        if self.fail_at == Some(FailAt::Probe) {
            return Err(RevoiceError::MediaProbe("FFprobe error: moov atom not found".to_string()));
        }
        Ok(self.duration)
    }

    async fn split_segments(&self, _video_path: &Path, output_pattern: &Path, _len: f64) -> Result<()> {
        self.record("split");
        if self.fail_at == Some(FailAt::Split) {
            std::fs::write(numbered(output_pattern, 0), "part 0")?;
            return Err(RevoiceError::Segmentation("Segmentation failed: broken pipe".to_string()));
        }
        // Written out of order on purpose; the segmenter must sort them
        for index in (0..self.segment_count).rev() {
            std::fs::write(numbered(output_pattern, index), format!("part {}", index))?;
        }
        Ok(())
    }

    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()> {
        self.record("extract");
        std::fs::copy(video_path, audio_path)?;
        Ok(())
    }

    async fn replace_audio(&self, video_path: &Path, audio_path: &Path, output_path: &Path) -> Result<()> {
        self.record("remux");
        assert!(video_path.exists(), "source video missing at remux time");
        assert!(audio_path.exists(), "synthesized audio missing at remux time");
        std::fs::write(output_path, b"final video")?;
        if self.fail_at == Some(FailAt::Remux) {
            return Err(RevoiceError::Remux("Audio replacement failed: codec not supported".to_string()));
        }
        Ok(())
    }

    async fn check_availability(&self) -> Result<()> {
        Ok(())
    }
}

/// Transcriber returning the audio file's contents, padded with whitespace
#[derive(Default)]
pub struct FakeTranscriber {
    pub fail_on_call: Option<usize>,
    pub calls: AtomicUsize,
}

impl FakeTranscriber {
    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::default()
        }
    }
}

#[async_trait]
impl TranscriberTrait for FakeTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_call == Some(call) {
            return Err(RevoiceError::Transcriber("Whisper failed: out of memory".to_string()));
        }
        let heard = std::fs::read_to_string(audio_path)?;
        Ok(Transcription::from_text(format!(" {} ", heard)))
    }

    async fn check_availability(&self) -> Result<()> {
        Ok(())
    }
}

/// Default configuration pointed at fresh directories under `root`
pub fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.storage.upload_dir = root.join("uploads");
    config.storage.output_dir = root.join("output");
    config.pipeline.show_progress = false;
    std::fs::create_dir_all(&config.storage.upload_dir).unwrap();
    std::fs::create_dir_all(&config.storage.output_dir).unwrap();
    config
}

pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
