use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::TranslateConfig;
use crate::error::{Result, RevoiceError};
use super::TranslatorTrait;

#[derive(Debug, Clone, Serialize)]
pub struct InferenceRequest<'a> {
    pub inputs: &'a str,
    pub options: InferenceOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct InferenceOptions {
    /// Block until a cold model is loaded instead of failing with 503
    pub wait_for_model: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationOutput {
    #[serde(alias = "generated_text")]
    pub translation_text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InferenceResponse {
    Translations(Vec<TranslationOutput>),
    Failure { error: String },
}

/// Translator backed by a hosted inference API (`POST <endpoint>/<model-id>`)
pub struct HuggingFaceTranslator {
    client: Client,
    config: TranslateConfig,
}

impl HuggingFaceTranslator {
    pub fn new(config: TranslateConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn model_url(&self, model_id: &str) -> String {
        format!("{}/{}", self.config.endpoint.trim_end_matches('/'), model_id)
    }
}

#[async_trait]
impl TranslatorTrait for HuggingFaceTranslator {
    async fn translate(&self, text: &str, model_id: &str, target_language: &str) -> Result<String> {
        let url = self.model_url(model_id);
        info!("Translating {} characters to {} with {}", text.len(), target_language, model_id);
        debug!("Sending translation request to: {}", url);

        let request = InferenceRequest {
            inputs: text,
            options: InferenceOptions { wait_for_model: true },
        };

        let mut builder = self.client.post(&url).json(&request);
        if let Some(token) = &self.config.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RevoiceError::Translation(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RevoiceError::Translation(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(RevoiceError::Translation(format!(
                "Inference API error {}: {}",
                status,
                body.trim()
            )));
        }

        parse_response(&body)
    }
}

fn parse_response(body: &str) -> Result<String> {
    let response: InferenceResponse = serde_json::from_str(body)
        .map_err(|e| RevoiceError::Translation(format!("Failed to parse response: {}", e)))?;

    match response {
        InferenceResponse::Translations(outputs) => {
            let text = outputs
                .into_iter()
                .map(|output| output.translation_text.trim().to_string())
                .collect::<Vec<_>>()
                .join(" ");
            if text.is_empty() {
                Err(RevoiceError::Translation("Empty translation received".to_string()))
            } else {
                Ok(text)
            }
        }
        InferenceResponse::Failure { error } => Err(RevoiceError::Translation(error)),
    }
}
