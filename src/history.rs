use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{BrandShare, RunMode, SovError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SovSnapshot {
    pub recorded_at: DateTime<Utc>,
    pub mode: RunMode,
    pub sov_percentage: Vec<BrandShare>,
}

impl SovSnapshot {
    pub fn share_of(&self, brand: &str) -> Option<f64> {
        self.sov_percentage
            .iter()
            .find(|share| share.brand.eq_ignore_ascii_case(brand))
            .map(|share| share.weighted_sov)
    }
}

/// Newest-first log of overall SoV per run, used as the forecaster's series.
pub struct HistoryStore {
    path: PathBuf,
    limit: usize,
    snapshots: Vec<SovSnapshot>,
}

impl HistoryStore {
    pub async fn load(path: PathBuf, limit: usize) -> Result<Self, SovError> {
        let snapshots = if path.exists() {
            let data = tokio::fs::read_to_string(&path).await?;
            if data.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&data)?
            }
        } else {
            Vec::new()
        };

        Ok(Self {
            path,
            limit: limit.max(1),
            snapshots,
        })
    }

    /// A corrupt history file should not block a run; start over instead.
    pub async fn load_or_empty(path: PathBuf, limit: usize) -> Self {
        match Self::load(path.clone(), limit).await {
            Ok(store) => store,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable SoV history");
                Self {
                    path,
                    limit: limit.max(1),
                    snapshots: Vec::new(),
                }
            }
        }
    }

    pub fn snapshots(&self) -> &[SovSnapshot] {
        &self.snapshots
    }

    pub async fn append(&mut self, snapshot: SovSnapshot) -> Result<(), SovError> {
        self.snapshots.insert(0, snapshot);
        if self.snapshots.len() > self.limit {
            self.snapshots.truncate(self.limit);
        }
        self.persist().await
    }

    async fn persist(&self) -> Result<(), SovError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent).await?;
        }
        let payload = serde_json::to_string_pretty(&self.snapshots)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, payload).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

async fn ensure_dir(path: &Path) -> Result<(), SovError> {
    if path.as_os_str().is_empty() || path.exists() {
        return Ok(());
    }
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}
