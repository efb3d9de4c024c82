//! Job submission payload and its persistence into the upload directory.

use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::artifacts::ArtifactScope;
use crate::error::{Result, RevoiceError};

const FALLBACK_FILENAME: &str = "upload.mp4";
const UPLOAD_MARKER: &str = "_upload_";

/// Video payload handed over by the submitting layer
#[derive(Debug, Clone)]
pub enum VideoPayload {
    /// A file already on local disk; it is copied, never moved
    File(PathBuf),
    /// Raw bytes with the client-supplied file name
    Bytes { filename: String, data: Vec<u8> },
}

impl VideoPayload {
    fn client_filename(&self) -> String {
        let raw = match self {
            Self::File(path) => path.to_string_lossy().into_owned(),
            Self::Bytes { filename, .. } => filename.clone(),
        };
        sanitize_filename(&raw)
    }
}

/// One job submission: a video and the language to localize it into
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub video: Option<VideoPayload>,
    pub target_language: Option<String>,
}

impl Upload {
    pub fn new(video: VideoPayload, target_language: impl Into<String>) -> Self {
        Self {
            video: Some(video),
            target_language: Some(target_language.into()),
        }
    }

    /// Reject submissions missing a video or a target language
    pub fn validate(&self) -> Result<(&VideoPayload, &str)> {
        let video = self
            .video
            .as_ref()
            .ok_or_else(|| RevoiceError::Upload("No video file uploaded".to_string()))?;

        let language = self
            .target_language
            .as_deref()
            .map(str::trim)
            .filter(|language| !language.is_empty())
            .ok_or_else(|| RevoiceError::Upload("No target language selected".to_string()))?;

        if let VideoPayload::File(path) = video {
            if !path.is_file() {
                return Err(RevoiceError::Upload(format!(
                    "Video file not found: {}",
                    path.display()
                )));
            }
        }

        Ok((video, language))
    }
}

/// Where the payload of job `job_id` is stored: `<job-id>_upload_<client file name>`.
///
/// The marker keeps uploads out of the `<job-id>_segment_` namespace whatever
/// the client called the file.
pub fn destination(video: &VideoPayload, upload_dir: &Path, job_id: &Uuid) -> PathBuf {
    upload_dir.join(format!(
        "{}{}{}",
        job_id.simple(),
        UPLOAD_MARKER,
        video.client_filename()
    ))
}

/// Write the payload into `upload_dir`. The destination is registered with
/// `artifacts` before the first byte is written, so a failed copy leaves
/// nothing behind once the scope is cleaned up.
pub async fn persist(
    video: &VideoPayload,
    upload_dir: &Path,
    job_id: &Uuid,
    artifacts: &mut ArtifactScope,
) -> Result<PathBuf> {
    let destination = destination(video, upload_dir, job_id);
    artifacts.register(&destination);

    match video {
        VideoPayload::File(source) => {
            tokio::fs::copy(source, &destination).await?;
        }
        VideoPayload::Bytes { data, .. } => {
            tokio::fs::write(&destination, data).await?;
        }
    }

    info!("Stored upload at {}", destination.display());
    Ok(destination)
}

/// Keep only the final path component of a client-supplied name
pub fn sanitize_filename(raw: &str) -> String {
    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .trim_start_matches('.');

    if name.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        name.to_string()
    }
}
