//! Scoped ownership of the files one job creates.
//!
//! Every transient file is registered as soon as it exists (or is about to).
//! When the scope ends, normally or by unwinding, each registered file that is
//! still on disk is removed. Files handed to the serving layer are taken out
//! of the scope with [`ArtifactScope::persist`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct ArtifactScope {
    label: String,
    tracked: Vec<PathBuf>,
}

impl ArtifactScope {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tracked: Vec::new(),
        }
    }

    /// Track a file for removal at scope end. Registering the same path twice is a no-op.
    pub fn register(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.tracked.contains(&path) {
            debug!("[{}] tracking artifact {}", self.label, path.display());
            self.tracked.push(path);
        }
    }

    /// Stop tracking a file so it survives the scope. Returns whether it was tracked.
    pub fn persist(&mut self, path: &Path) -> bool {
        let before = self.tracked.len();
        self.tracked.retain(|tracked| tracked != path);
        before != self.tracked.len()
    }

    pub fn tracked(&self) -> &[PathBuf] {
        &self.tracked
    }

    /// Remove every tracked file that still exists. Safe to call repeatedly;
    /// files already removed by earlier stages are skipped silently.
    pub fn cleanup(&mut self) -> usize {
        let mut removed = 0;
        for path in self.tracked.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    debug!("[{}] removed {}", self.label, path.display());
                    removed += 1;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!("[{}] failed to remove {}: {}", self.label, path.display(), e),
            }
        }
        removed
    }
}

impl Drop for ArtifactScope {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_registered_files_on_drop() {
        let dir = tempfile::TempDir::new().unwrap();
        let upload = dir.path().join("upload.mp4");
        let segment = dir.path().join("segment_000.mp4");
        std::fs::write(&upload, b"video").unwrap();
        std::fs::write(&segment, b"segment").unwrap();

        {
            let mut scope = ArtifactScope::new("job");
            scope.register(&upload);
            scope.register(&segment);
        }

        assert!(!upload.exists());
        assert!(!segment.exists());
    }

    #[test]
    fn persisted_files_survive() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("final.mp4");
        std::fs::write(&output, b"final").unwrap();

        let mut scope = ArtifactScope::new("job");
        scope.register(&output);
        assert!(scope.persist(&output));
        drop(scope);

        assert!(output.exists());
    }

    #[test]
    fn cleanup_is_idempotent() {
        let dir = tempfile::TempDir::new().unwrap();
        let audio = dir.path().join("audio.wav");
        std::fs::write(&audio, b"pcm").unwrap();

        let mut scope = ArtifactScope::new("job");
        scope.register(&audio);
        scope.register(dir.path().join("never-created.wav"));

        assert_eq!(scope.cleanup(), 1);
        assert_eq!(scope.cleanup(), 0);
        assert!(scope.tracked().is_empty());
    }

    #[test]
    fn files_removed_by_others_are_ignored() {
        let dir = tempfile::TempDir::new().unwrap();
        let segment = dir.path().join("segment_001.mp4");
        std::fs::write(&segment, b"segment").unwrap();

        let mut scope = ArtifactScope::new("job");
        scope.register(&segment);
        std::fs::remove_file(&segment).unwrap();

        assert_eq!(scope.cleanup(), 0);
    }

    #[test]
    fn duplicate_registration_tracks_once() {
        let mut scope = ArtifactScope::new("job");
        scope.register("a.wav");
        scope.register("a.wav");
        assert_eq!(scope.tracked().len(), 1);
    }
}
