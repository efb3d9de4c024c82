// Text-to-speech collaborator

pub mod google;

use async_trait::async_trait;
use std::path::Path;

use crate::config::SynthesisConfig;
use crate::error::Result;

/// Speech code for the only target language with a dedicated voice
pub const HINDI_SPEECH_CODE: &str = "hi";

/// Pick the synthesis voice for a target language: Hindi gets its own code,
/// every other language (recognized or not) the default one.
pub fn speech_code_for<'a>(target_language: &str, default_code: &'a str) -> &'a str {
    if target_language == "Hindi" {
        HINDI_SPEECH_CODE
    } else {
        default_code
    }
}

/// Main trait for speech synthesis operations
#[async_trait]
pub trait SynthesizerTrait: Send + Sync {
    /// Speak `text` in the voice for `language_code`, writing audio to `output_path`
    async fn synthesize(&self, text: &str, language_code: &str, output_path: &Path) -> Result<()>;
}

/// Factory for creating synthesizer instances
pub struct SynthesizerFactory;

impl SynthesizerFactory {
    pub fn create_default(config: SynthesisConfig) -> Result<Box<dyn SynthesizerTrait>> {
        Ok(Box::new(google::GoogleSynthesizer::new(config)?))
    }
}
