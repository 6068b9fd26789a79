//! Working-directory lifecycle.
//!
//! The preview and receipts directories are recreated empty at run start and
//! removed at run end. Removal is also wired into `Drop` so a failed run does
//! not leave stale directories behind for the next one.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;

/// Scoped handle over the run's scratch directories.
pub struct Workspace {
    preview_dir: PathBuf,
    receipts_dir: PathBuf,
    cleaned: bool,
}

impl Workspace {
    /// Delete any previous archive and recreate both working directories empty.
    pub fn setup(config: &Config) -> Result<Self> {
        info!("🧹 Preparing workspace");

        let zip_path = Path::new(&config.zip_path);
        if zip_path.exists() {
            fs::remove_file(zip_path)?;
            debug!("removed previous archive: {}", zip_path.display());
        }
        if let Some(parent) = zip_path.parent() {
            fs::create_dir_all(parent)?;
        }

        recreate_directory(Path::new(&config.preview_dir))?;
        recreate_directory(Path::new(&config.receipts_dir))?;

        Ok(Self {
            preview_dir: PathBuf::from(&config.preview_dir),
            receipts_dir: PathBuf::from(&config.receipts_dir),
            cleaned: false,
        })
    }

    pub fn preview_dir(&self) -> &Path {
        &self.preview_dir
    }

    pub fn receipts_dir(&self) -> &Path {
        &self.receipts_dir
    }

    /// Remove both working directories. Idempotent.
    pub fn cleanup(&mut self) -> Result<()> {
        if self.cleaned {
            return Ok(());
        }
        info!("🗑️ Removing working directories");
        remove_directory(&self.preview_dir)?;
        remove_directory(&self.receipts_dir)?;
        self.cleaned = true;
        Ok(())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.cleaned {
            return;
        }
        // Best effort only; errors here must not panic an unwinding thread.
        if let Err(e) = remove_directory(&self.preview_dir) {
            warn!("failed to remove {}: {}", self.preview_dir.display(), e);
        }
        if let Err(e) = remove_directory(&self.receipts_dir) {
            warn!("failed to remove {}: {}", self.receipts_dir.display(), e);
        }
    }
}

/// Delete-then-create, so a leftover directory from an aborted run is reset.
fn recreate_directory(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

fn remove_directory(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    Ok(())
}
