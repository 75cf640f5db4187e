//! Batch progress checkpoint
//!
//! `progress.json` records how far through the product URL list the
//! batch runner has progressed: every URL before `last_index` has been
//! attempted. The checkpoint is overwritten at each save; a missing or
//! unreadable file simply means "start from the beginning".

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Persisted batch checkpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default)]
    pub last_index: usize,
    #[serde(default)]
    pub failed_urls: Vec<String>,
    #[serde(default)]
    pub timestamp: String,
}

/// Loads the checkpoint, defaulting to index zero when absent or corrupt
pub fn load_progress(path: &Path) -> Progress {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(progress) => progress,
            Err(e) => {
                tracing::warn!("Ignoring corrupt checkpoint {}: {}", path.display(), e);
                Progress::default()
            }
        },
        Err(_) => Progress::default(),
    }
}

/// Overwrites the checkpoint, stamping it with the current time
pub fn save_progress(path: &Path, progress: &Progress) -> crate::Result<()> {
    let stamped = Progress {
        last_index: progress.last_index,
        failed_urls: progress.failed_urls.clone(),
        timestamp: Utc::now().to_rfc3339(),
    };
    let json = serde_json::to_string(&stamped).map_err(|source| crate::ScrapeError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json)?;
    Ok(())
}
