use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::artifacts::ArtifactScope;
use crate::config::Config;
use crate::error::{Result, RevoiceError};
use crate::media::{MediaProcessorFactory, MediaProcessorTrait};
use crate::segment::SegmentProcessor;
use crate::segmenter::{Segment, SegmentPlan, Segmenter};
use crate::synthesize::{speech_code_for, SynthesizerFactory, SynthesizerTrait};
use crate::transcribe::{TranscriberFactory, TranscriberTrait};
use crate::translate::{TranslationPlan, TranslatorFactory, TranslatorTrait};
use crate::upload::{self, Upload, VideoPayload};

const VIDEO_EXTENSIONS: [&str; 7] = ["mp4", "avi", "mov", "mkv", "wmv", "flv", "webm"];

/// Where a job is in its run; `Failed` is reachable from every non-terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobState {
    Received,
    Probing,
    Segmenting,
    ProcessingSegments,
    Synthesizing,
    Remuxing,
    Done,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One upload-to-output run
#[derive(Debug)]
pub struct Job {
    pub id: Uuid,
    pub target_language: String,
    pub source: Option<PathBuf>,
    pub segments: Vec<Segment>,
    pub transcript: Vec<String>,
    pub translation: Vec<String>,
    pub output: Option<PathBuf>,
    state: JobState,
}

impl Job {
    fn new(target_language: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            target_language: target_language.to_string(),
            source: None,
            segments: Vec::new(),
            transcript: Vec::new(),
            translation: Vec::new(),
            output: None,
            state: JobState::Received,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    fn transition(&mut self, next: JobState) {
        info!("Job {}: {} -> {}", self.id.simple(), self.state, next);
        self.state = next;
    }

    /// Text computed before a late-stage failure, if every segment finished
    fn partial_text(&self) -> Option<PartialText> {
        let complete = !self.segments.is_empty() && self.transcript.len() == self.segments.len();
        let late = matches!(self.state, JobState::Synthesizing | JobState::Remuxing);
        (complete && late).then(|| PartialText {
            transcript: self.transcript.join(" "),
            translation: self.translation.join(" "),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PartialText {
    pub transcript: String,
    pub translation: String,
}

/// What a successful job hands back to the caller
#[derive(Debug, Clone, Serialize)]
pub struct JobResult {
    pub job_id: Uuid,
    pub target_language: String,
    pub transcript: String,
    pub translation: String,
    pub transcript_units: Vec<String>,
    pub translation_units: Vec<String>,
    pub segment_count: usize,
    pub output_path: PathBuf,
    /// Reference the serving layer resolves to the final video
    pub video_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// A failed job: the error, the state it failed in, and any text computed before it
#[derive(Debug, Error)]
#[error("{}", failure_message(.error))]
pub struct JobFailure {
    pub job_id: Uuid,
    pub stage: JobState,
    #[source]
    pub error: RevoiceError,
    pub partial: Option<PartialText>,
}

/// Upload rejections are shown as-is; everything else is a processing error
fn failure_message(error: &RevoiceError) -> String {
    match error {
        RevoiceError::Upload(_) => error.to_string(),
        _ => format!("Error processing video: {}", error),
    }
}

/// Re-label a collaborator failure as the stage's error kind unless it already is one
fn at_stage(stage: fn(String) -> RevoiceError) -> impl Fn(RevoiceError) -> RevoiceError {
    move |err| {
        if std::mem::discriminant(&err) == std::mem::discriminant(&stage(String::new())) {
            err
        } else {
            stage(err.to_string())
        }
    }
}

/// The localization pipeline: one upload in, one re-voiced video out
pub struct Workflow {
    config: Config,
    media: Box<dyn MediaProcessorTrait>,
    transcriber: Box<dyn TranscriberTrait>,
    translator: Box<dyn TranslatorTrait>,
    synthesizer: Box<dyn SynthesizerTrait>,
}

impl Workflow {
    /// Assemble a workflow from already-initialized collaborators
    pub fn new(
        config: Config,
        media: Box<dyn MediaProcessorTrait>,
        transcriber: Box<dyn TranscriberTrait>,
        translator: Box<dyn TranslatorTrait>,
        synthesizer: Box<dyn SynthesizerTrait>,
    ) -> Self {
        Self {
            config,
            media,
            transcriber,
            translator,
            synthesizer,
        }
    }

    /// Build the default collaborators and check that the local tools respond
    pub async fn from_config(config: Config) -> Result<Self> {
        let media = MediaProcessorFactory::create_processor(config.media.clone());
        let transcriber = TranscriberFactory::create_default(config.transcriber.clone());
        let translator = TranslatorFactory::create_default(config.translate.clone())?;
        let synthesizer = SynthesizerFactory::create_default(config.synthesis.clone())?;

        // Check dependencies
        media.check_availability().await?;
        transcriber.check_availability().await?;

        Ok(Self::new(config, media, transcriber, translator, synthesizer))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Probe a video and report how it would be segmented
    pub async fn probe(&self, video_path: &Path) -> Result<(f64, SegmentPlan)> {
        let duration = self.media.probe_duration(video_path).await?;
        Ok((duration, Segmenter::from_config(&self.config.pipeline).plan(duration)))
    }

    /// Run one job to completion. Every transient file the job created is gone
    /// by the time this returns, whatever the outcome.
    pub async fn submit(&self, upload: Upload) -> std::result::Result<JobResult, JobFailure> {
        let started_at = Utc::now();

        let (video, target_language) = match upload.validate() {
            Ok(valid) => valid,
            Err(error) => {
                warn!("Rejected upload: {}", error);
                return Err(JobFailure {
                    job_id: Uuid::nil(),
                    stage: JobState::Received,
                    error,
                    partial: None,
                });
            }
        };

        let mut job = Job::new(target_language);
        info!("Job {} received, target language {}", job.id.simple(), job.target_language);

        let mut artifacts = ArtifactScope::new(format!("job {}", job.id.simple()));
        let outcome = self.run(&mut job, video, &mut artifacts).await;

        let removed = artifacts.cleanup();
        info!("Job {} cleanup removed {} files", job.id.simple(), removed);

        match outcome {
            Ok(output_path) => {
                job.transition(JobState::Done);
                let video_url = format!(
                    "/output/{}",
                    output_path.file_name().unwrap_or_default().to_string_lossy()
                );
                Ok(JobResult {
                    job_id: job.id,
                    transcript: job.transcript.join(" "),
                    translation: job.translation.join(" "),
                    segment_count: job.segments.len(),
                    transcript_units: job.transcript,
                    translation_units: job.translation,
                    target_language: job.target_language,
                    output_path,
                    video_url,
                    started_at,
                    finished_at: Utc::now(),
                })
            }
            Err(error) => {
                let stage = job.state();
                let partial = job.partial_text();
                error!("Job {} failed during {} ({}): {}", job.id.simple(), stage, error.kind(), error);
                job.transition(JobState::Failed);
                Err(JobFailure {
                    job_id: job.id,
                    stage,
                    error,
                    partial,
                })
            }
        }
    }

    async fn run(
        &self,
        job: &mut Job,
        video: &VideoPayload,
        artifacts: &mut ArtifactScope,
    ) -> Result<PathBuf> {
        let storage = &self.config.storage;
        let job_tag = job.id.simple().to_string();

        let source = upload::persist(video, &storage.upload_dir, &job.id, artifacts).await?;
        job.source = Some(source.clone());

        job.transition(JobState::Probing);
        let duration = self
            .media
            .probe_duration(&source)
            .await
            .map_err(at_stage(RevoiceError::MediaProbe))?;

        job.transition(JobState::Segmenting);
        let segmenter = Segmenter::from_config(&self.config.pipeline);
        job.segments = segmenter
            .segment(&*self.media, &source, duration, &job_tag, artifacts)
            .await
            .map_err(at_stage(RevoiceError::Segmentation))?;

        job.transition(JobState::ProcessingSegments);
        self.process_segments(job).await?;

        job.transition(JobState::Synthesizing);
        let translation = job.translation.join(" ");
        let speech_code = speech_code_for(
            &job.target_language,
            &self.config.synthesis.default_language_code,
        );
        let speech_path = storage.upload_dir.join(format!("new_audio_{}.mp3", job_tag));
        artifacts.register(&speech_path);
        self.synthesizer
            .synthesize(&translation, speech_code, &speech_path)
            .await
            .map_err(at_stage(RevoiceError::Synthesis))?;

        job.transition(JobState::Remuxing);
        let output_path = storage.output_dir.join(format!("final_{}.mp4", job_tag));
        artifacts.register(&output_path);
        self.media
            .replace_audio(&source, &speech_path, &output_path)
            .await
            .map_err(at_stage(RevoiceError::Remux))?;
        artifacts.persist(&output_path);
        job.output = Some(output_path.clone());

        Ok(output_path)
    }

    async fn process_segments(&self, job: &mut Job) -> Result<()> {
        let plan = TranslationPlan::resolve(&job.target_language, &self.config.translate.source_language);
        info!("Job {} translation plan: {:?}", job.id.simple(), plan);

        let processor = SegmentProcessor {
            media: &*self.media,
            transcriber: &*self.transcriber,
            translator: &*self.translator,
            scratch_dir: self.config.storage.upload_dir.clone(),
        };

        let progress = self.progress_bar(job.segments.len());
        for segment in &job.segments {
            progress.set_message(format!("segment {}", segment.index));
            let result = processor.process(segment, plan, &job.target_language).await;
            let result = match result {
                Ok(result) => result,
                Err(e) => {
                    progress.abandon();
                    return Err(e);
                }
            };
            job.transcript.push(result.transcript);
            job.translation.push(result.translation);
            progress.inc(1);
        }
        progress.finish_and_clear();
        Ok(())
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.config.pipeline.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total as u64);
        pb.set_style(ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"));
        pb
    }

    /// Run one job per video file found under `input_dir`, sequentially.
    /// Failed jobs are logged and reported; they do not stop the batch.
    pub async fn process_directory(
        &self,
        input_dir: &Path,
        target_language: &str,
    ) -> Result<Vec<(PathBuf, std::result::Result<JobResult, JobFailure>)>> {
        info!("Processing directory: {}", input_dir.display());

        if !input_dir.is_dir() {
            return Err(RevoiceError::Config("Input path is not a directory".to_string()));
        }

        let mut video_files: Vec<PathBuf> = WalkDir::new(input_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            })
            .collect();
        video_files.sort();

        info!("Found {} video files to process", video_files.len());

        let mut outcomes = Vec::with_capacity(video_files.len());
        for video_path in video_files {
            let upload = Upload::new(VideoPayload::File(video_path.clone()), target_language);
            let outcome = self.submit(upload).await;
            match &outcome {
                Ok(result) => info!(
                    "Successfully processed: {} -> {}",
                    video_path.display(),
                    result.output_path.display()
                ),
                Err(e) => warn!("Failed to process {}: {}", video_path.display(), e),
            }
            outcomes.push((video_path, outcome));
        }

        Ok(outcomes)
    }
}
