use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::config::SynthesisConfig;
use crate::error::{Result, RevoiceError};
use super::SynthesizerTrait;

/// Synthesizer backed by the Google Translate text-to-speech endpoint (MP3 output)
pub struct GoogleSynthesizer {
    client: Client,
    config: SynthesisConfig,
}

impl GoogleSynthesizer {
    pub fn new(config: SynthesisConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (compatible; revoice/0.1.0)")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    async fn fetch_chunk(&self, chunk: &str, language_code: &str, idx: usize, total: usize) -> Result<Vec<u8>> {
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", language_code),
                ("client", "tw-ob"),
                ("ttsspeed", "1"),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| RevoiceError::Synthesis(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RevoiceError::Synthesis(format!(
                "TTS endpoint returned {} for language '{}': {}",
                status,
                language_code,
                body.trim()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RevoiceError::Synthesis(format!("Failed to read audio: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SynthesizerTrait for GoogleSynthesizer {
    async fn synthesize(&self, text: &str, language_code: &str, output_path: &Path) -> Result<()> {
        let chunks = split_text(text, self.config.max_chunk_chars);
        if chunks.is_empty() {
            return Err(RevoiceError::Synthesis("No text to speak".to_string()));
        }

        info!(
            "Synthesizing {} characters ({} requests, voice '{}') -> {}",
            text.len(),
            chunks.len(),
            language_code,
            output_path.display()
        );

        let mut file = tokio::fs::File::create(output_path).await?;
        for (idx, chunk) in chunks.iter().enumerate() {
            debug!("TTS chunk {}/{}: {:?}", idx + 1, chunks.len(), chunk);
            let audio = self.fetch_chunk(chunk, language_code, idx, chunks.len()).await?;
            file.write_all(&audio).await?;
        }
        file.flush().await?;

        info!("Speech synthesis completed");
        Ok(())
    }
}

/// Split text into pieces of at most `max_chars` characters, breaking on
/// whitespace where possible and hard-splitting words longer than the limit.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            chunks.push(word.into_iter().collect());
            word = rest;
        }

        let separator = usize::from(!current.is_empty());
        if current_len + separator + word.len() > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
