//! Revoice - video localization pipeline
//!
//! Takes one uploaded video, transcribes its speech segment by segment,
//! translates the transcript, synthesizes the translation as speech and
//! remuxes that speech into the original video. External engines (ffmpeg,
//! whisper, translation and text-to-speech services) sit behind traits so the
//! workflow can run against substitutes.

pub mod artifacts;
pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod segment;
pub mod segmenter;
pub mod setup;
pub mod synthesize;
pub mod transcribe;
pub mod translate;
pub mod upload;
pub mod workflow;
