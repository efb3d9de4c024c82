use std::fmt;

/// Target languages with a dedicated translation model, in display order
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "English",
    "Hindi",
    "French",
    "Spanish",
    "German",
    "Italian",
    "Dutch",
    "Portuguese",
    "Russian",
    "Swedish",
    "Chinese (Simplified)",
    "Arabic",
];

/// Translation model resolved from the target language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationModel {
    /// Returns the text unchanged
    Identity,
    /// Hosted model identified by its hub id
    Named(&'static str),
}

impl TranslationModel {
    /// Look up the model for a human-readable language name.
    /// Unlisted languages resolve to [`TranslationModel::Identity`].
    pub fn for_language(language: &str) -> Self {
        match language {
            "Hindi" => Self::Named("Helsinki-NLP/opus-mt-en-hi"),
            "French" => Self::Named("Helsinki-NLP/opus-mt-en-fr"),
            "Spanish" => Self::Named("Helsinki-NLP/opus-mt-en-es"),
            "German" => Self::Named("Helsinki-NLP/opus-mt-en-de"),
            "Italian" => Self::Named("Helsinki-NLP/opus-mt-en-it"),
            "Dutch" => Self::Named("Helsinki-NLP/opus-mt-en-nl"),
            "Portuguese" => Self::Named("Helsinki-NLP/opus-mt-en-pt"),
            "Russian" => Self::Named("Helsinki-NLP/opus-mt-en-ru"),
            "Swedish" => Self::Named("Helsinki-NLP/opus-mt-en-sv"),
            "Chinese (Simplified)" => Self::Named("Helsinki-NLP/opus-mt-en-zh"),
            "Arabic" => Self::Named("Helsinki-NLP/opus-mt-en-ar"),
            // English is the source language; the en-en placeholder is a no-op
            _ => Self::Identity,
        }
    }
}

impl fmt::Display for TranslationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "identity"),
            Self::Named(id) => write!(f, "{}", id),
        }
    }
}

/// How a job turns Transcript Units into Translation Units, decided once per job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationPlan {
    /// Target equals the source language: units are copied verbatim
    PassThrough,
    Translate(TranslationModel),
}

impl TranslationPlan {
    pub fn resolve(target_language: &str, source_language: &str) -> Self {
        if target_language == source_language {
            Self::PassThrough
        } else {
            Self::Translate(TranslationModel::for_language(target_language))
        }
    }
}
