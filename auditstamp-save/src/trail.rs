//! Change-trail entry types.
//!
//! Every tracked write appends one entry to a JSONL trail. The pipeline's
//! second creation write runs with tracking suppressed so a creation shows
//! up as a single entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// What a trail entry records about the write.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TrailOp {
    Created,
    Updated,
}

/// A change-trail entry for one persisted write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailEntry {
    /// Unique ID for this entry
    pub id: Ulid,

    /// When the write occurred
    pub timestamp: DateTime<Utc>,

    /// Owner type of the written record
    pub record_type: String,

    /// ID of the written record
    pub record_id: String,

    /// Whether the write created or updated the record
    pub op: TrailOp,

    /// Who performed the write, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// Session the write happened under, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
}

impl TrailEntry {
    /// Create a new trail entry, unattributed.
    pub fn new(op: TrailOp, record_type: impl Into<String>, record_id: impl Into<String>) -> Self {
        Self {
            id: Ulid::new(),
            timestamp: Utc::now(),
            record_type: record_type.into(),
            record_id: record_id.into(),
            op,
            actor: None,
            session: None,
        }
    }

    /// Set the actor
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Set the session
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }
}
