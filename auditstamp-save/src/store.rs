//! JsonStore - file-per-record persistence with a JSONL change trail.
//!
//! Records live under `root/<record_type>/<id>.json`, written atomically via
//! a temp file and rename. Tracked writes append a [`TrailEntry`] to
//! `root/trail/current.jsonl`; writes made while a record's tracking is
//! suppressed touch only the record file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{Result, SaveError};
use crate::record::{AuditedRecord, RecordStore, TrackingToggle};
use crate::scope::RequestScope;
use crate::trail::{TrailEntry, TrailOp};

/// File-backed record store.
///
/// A store instance is cheap to construct; handlers typically build one per
/// request with `with_scope` so trail entries carry the request's actor and
/// session.
pub struct JsonStore {
    root: PathBuf,
    scope: Option<RequestScope>,
}

impl JsonStore {
    /// Create a store rooted at the given data directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            scope: None,
        }
    }

    /// Attribute trail entries to the given request scope.
    pub fn with_scope(mut self, scope: RequestScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// The root data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to a record's JSON file.
    pub fn record_path(&self, record_type: &str, id: &str) -> PathBuf {
        self.root.join(record_type).join(format!("{id}.json"))
    }

    /// Path to the current change trail.
    pub fn trail_path(&self) -> PathBuf {
        self.root.join("trail").join("current.jsonl")
    }

    /// Check whether a record exists on disk.
    pub fn exists(&self, record_type: &str, id: &str) -> bool {
        self.record_path(record_type, id).exists()
    }

    /// Read a record file.
    pub async fn read<R: DeserializeOwned>(&self, record_type: &str, id: &str) -> Result<R> {
        let path = self.record_path(record_type, id);
        if !path.exists() {
            return Err(SaveError::NotFound {
                record_type: record_type.to_string(),
                id: id.to_string(),
            });
        }

        let content = fs::read_to_string(&path).await?;
        let record: R = serde_json::from_str(&content)?;
        Ok(record)
    }

    /// Read trail entries, newest first.
    pub async fn trail(&self, limit: Option<usize>) -> Result<Vec<TrailEntry>> {
        let path = self.trail_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).await?;
        let mut entries: Vec<TrailEntry> = content
            .lines()
            .filter(|line| !line.is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();

        entries.reverse();

        if let Some(limit) = limit {
            entries.truncate(limit);
        }

        Ok(entries)
    }

    /// Append a trail entry to the JSONL trail.
    async fn append_trail(&self, entry: &TrailEntry) -> Result<()> {
        let path = self.trail_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }

    fn attribute(&self, mut entry: TrailEntry) -> TrailEntry {
        if let Some(scope) = &self.scope {
            if let Some(actor) = &scope.actor {
                entry = entry.with_actor(actor.to_string());
            }
            if let Some(session) = &scope.session {
                entry = entry.with_session(session.to_string());
            }
        }
        entry
    }
}

#[async_trait]
impl<R> RecordStore<R> for JsonStore
where
    R: AuditedRecord + TrackingToggle + Serialize + Send + Sync,
{
    async fn write(&self, record: &R) -> Result<()> {
        let path = self.record_path(record.record_type(), record.record_id());
        let op = if path.exists() {
            TrailOp::Updated
        } else {
            TrailOp::Created
        };

        let content = serde_json::to_string_pretty(record)?;
        atomic_write(&path, content.as_bytes()).await?;

        if record.tracking_enabled() {
            let entry = self.attribute(TrailEntry::new(
                op,
                record.record_type(),
                record.record_id(),
            ));
            self.append_trail(&entry).await?;
        } else {
            debug!(
                record_type = record.record_type(),
                record_id = record.record_id(),
                "trail suppressed for write"
            );
        }

        Ok(())
    }
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;

    // Rename (atomic on same filesystem)
    fs::rename(&temp_path, path).await?;

    Ok(())
}
