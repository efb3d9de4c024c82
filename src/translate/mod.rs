// Machine translation collaborator
//
// - Models: static language -> model table and the per-job translation plan
// - Huggingface: hosted inference implementation of TranslatorTrait

pub mod huggingface;
pub mod models;

use async_trait::async_trait;

pub use models::*;
use crate::config::TranslateConfig;
use crate::error::Result;

/// Main trait for translation operations
#[async_trait]
pub trait TranslatorTrait: Send + Sync {
    /// Translate text with the given hosted model
    async fn translate(&self, text: &str, model_id: &str, target_language: &str) -> Result<String>;
}

/// Apply a job's translation plan to one Transcript Unit
pub async fn translate_unit(
    translator: &dyn TranslatorTrait,
    plan: TranslationPlan,
    text: &str,
    target_language: &str,
) -> Result<String> {
    match plan {
        TranslationPlan::PassThrough | TranslationPlan::Translate(TranslationModel::Identity) => {
            Ok(text.to_string())
        }
        TranslationPlan::Translate(TranslationModel::Named(_)) if text.trim().is_empty() => {
            Ok(String::new())
        }
        TranslationPlan::Translate(TranslationModel::Named(model_id)) => {
            translator.translate(text, model_id, target_language).await
        }
    }
}

/// Factory for creating translator instances
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Create the default translator (hosted inference endpoint)
    pub fn create_default(config: TranslateConfig) -> Result<Box<dyn TranslatorTrait>> {
        Ok(Box::new(huggingface::HuggingFaceTranslator::new(config)?))
    }
}
