use std::path::PathBuf;

use anyhow::Context;
use tokio::fs as async_fs;
use tracing::{debug, warn};

use crate::core::wizard::WizardState;

/// On-disk wizard progress: the application identifier and the
/// step-completion map, stored as one JSON document.
///
/// Loaded once at startup; every write is awaited by the caller before any
/// navigation that depends on it.
#[derive(Debug, Clone)]
pub struct ProgressCache {
    path: PathBuf,
}

impl ProgressCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Read cached progress. A missing file means no progress yet; an
    /// unreadable file is treated the same way rather than blocking startup.
    pub fn load(&self) -> WizardState {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return WizardState::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read progress cache");
                return WizardState::default();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(state) => {
                debug!(path = %self.path.display(), "loaded progress cache");
                state
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "progress cache is corrupt, starting fresh");
                WizardState::default()
            }
        }
    }

    /// Persist the given progress. Completes only once the bytes have been
    /// written, so callers can sequence navigation after it.
    pub async fn save(&self, state: &WizardState) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("failed to create cache dir {:?}", parent))?;
            }
        }
        let bytes = serde_json::to_vec_pretty(state)?;
        async_fs::write(&self.path, bytes)
            .await
            .with_context(|| format!("failed to write progress cache {:?}", self.path))?;
        debug!(path = %self.path.display(), "saved progress cache");
        Ok(())
    }

    /// Drop all cached progress, as on explicit exit or a new application.
    pub fn clear(&self) -> anyhow::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("failed to clear progress cache {:?}", self.path))
            }
        }
    }
}
