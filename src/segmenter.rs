//! Splitting a video into the time slices the pipeline processes one by one.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::artifacts::ArtifactScope;
use crate::config::PipelineConfig;
use crate::error::{Result, RevoiceError};
use crate::media::MediaProcessorTrait;

const SEGMENT_MARKER: &str = "_segment_";

/// A contiguous time slice of the source video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Position in the sequence; determines concatenation order
    pub index: usize,
    pub path: PathBuf,
    /// The slice is the uploaded video itself rather than a split file
    pub is_source: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentPlan {
    /// Duration at or below the threshold: the source is the only segment
    Whole,
    /// Split into chunks of `segment_length_secs`, `expected_count` of them
    Split {
        segment_length_secs: f64,
        expected_count: usize,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Segmenter {
    threshold_secs: f64,
    segment_length_secs: f64,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(15.0, 15.0)
    }
}

impl Segmenter {
    pub fn new(threshold_secs: f64, segment_length_secs: f64) -> Self {
        Self {
            threshold_secs,
            segment_length_secs,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.segment_threshold_secs, config.segment_length_secs)
    }

    pub fn plan(&self, duration_secs: f64) -> SegmentPlan {
        if duration_secs <= self.threshold_secs {
            SegmentPlan::Whole
        } else {
            SegmentPlan::Split {
                segment_length_secs: self.segment_length_secs,
                expected_count: (duration_secs / self.segment_length_secs).ceil() as usize,
            }
        }
    }

    /// Produce the ordered segment list for `video_path`.
    ///
    /// Split files are written next to the video as `<prefix>_segment_NNN.<ext>`
    /// and registered with `artifacts` as soon as they are found, including
    /// the ones a failed split left behind.
    pub async fn segment(
        &self,
        media: &dyn MediaProcessorTrait,
        video_path: &Path,
        duration_secs: f64,
        prefix: &str,
        artifacts: &mut ArtifactScope,
    ) -> Result<Vec<Segment>> {
        let (segment_length_secs, expected_count) = match self.plan(duration_secs) {
            SegmentPlan::Whole => {
                info!("Duration {:.2}s within threshold, processing as a single segment", duration_secs);
                return Ok(vec![Segment {
                    index: 0,
                    path: video_path.to_path_buf(),
                    is_source: true,
                }]);
            }
            SegmentPlan::Split {
                segment_length_secs,
                expected_count,
            } => (segment_length_secs, expected_count),
        };

        let scratch_dir = video_path.parent().unwrap_or_else(|| Path::new("."));
        let extension = video_path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mp4".to_string());
        let pattern = scratch_dir.join(format!("{}{}%03d.{}", prefix, SEGMENT_MARKER, extension));

        info!(
            "Duration {:.2}s exceeds {}s, splitting into ~{} segments of {}s",
            duration_secs, self.threshold_secs, expected_count, segment_length_secs
        );

        let split = media.split_segments(video_path, &pattern, segment_length_secs).await;

        let mut found = match collect_segment_files(scratch_dir, prefix) {
            Ok(found) => found,
            Err(e) if split.is_err() => {
                warn!("Could not list partial segments after failed split: {}", e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        // the source is never a split file, even when its name looks like one
        found.retain(|path| path != video_path);
        for path in &found {
            artifacts.register(path);
        }
        split?;

        if found.is_empty() {
            return Err(RevoiceError::Segmentation(format!(
                "no segment files were produced for {}",
                video_path.display()
            )));
        }
        if found.len() != expected_count {
            warn!("Expected {} segments, media tool produced {}", expected_count, found.len());
        }

        Ok(found
            .into_iter()
            .enumerate()
            .map(|(index, path)| Segment {
                index,
                path,
                is_source: false,
            })
            .collect())
    }
}

/// List `<prefix>_segment_NNN.*` files in `dir`, in ascending numeric order
pub fn collect_segment_files(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let marker = format!("{}{}", prefix, SEGMENT_MARKER);
    let mut numbered = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| {
        RevoiceError::Segmentation(format!("cannot read segment directory {}: {}", dir.display(), e))
    })?;
    for entry in entries {
        let path = entry?.path();
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let Some(rest) = name.strip_prefix(&marker) else {
            continue;
        };
        let digits = rest.split('.').next().unwrap_or_default();
        if let Ok(number) = digits.parse::<u32>() {
            numbered.push((number, path));
        }
    }

    numbered.sort_by_key(|(number, _)| *number);
    Ok(numbered.into_iter().map(|(_, path)| path).collect())
}
