use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use tracing::info;

use crate::config::Config;
use crate::error::{Result, RevoiceError};

/// Process-wide preparation performed once before any job is accepted
pub struct SetupManager {
    revoice_dir: PathBuf,
}

impl SetupManager {
    pub fn new() -> Result<Self> {
        let revoice_dir = PathBuf::from(".revoice");
        std::fs::create_dir_all(revoice_dir.join("log"))?;

        Ok(Self { revoice_dir })
    }

    pub fn revoice_dir(&self) -> &Path {
        &self.revoice_dir
    }

    /// Create the upload and output directories the workflow writes into
    pub async fn initialize(&self, config: &Config) -> Result<()> {
        info!("Initializing storage...");
        for (label, dir) in [
            ("upload", &config.storage.upload_dir),
            ("output", &config.storage.output_dir),
        ] {
            async_fs::create_dir_all(dir).await.map_err(|e| {
                RevoiceError::Config(format!("Failed to create {} directory {}: {}", label, dir.display(), e))
            })?;
            info!("Using {} directory {}", label, dir.display());
        }
        Ok(())
    }
}
