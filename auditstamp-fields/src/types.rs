//! Core types for the field registry.
//!
//! Marker categories name the role an audited field plays. Owner types
//! identify the record type declaring the field. Both are known at
//! definition time and never change while the application serves requests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The role an audited field plays — a closed set, one variant per marker.
///
/// Using an enum makes "lookup on an unknown category" unrepresentable:
/// there is no way to query the registry for a category that does not exist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerCategory {
    /// Records who last wrote the record.
    LastActor,
    /// Records the session key of the last write.
    LastSession,
    /// Records who created the record. Stamped once, after the creating write.
    CreatingActor,
    /// Records the session key active when the record was created.
    CreatingSession,
}

impl MarkerCategory {
    /// All categories, in a stable order.
    pub const ALL: [MarkerCategory; 4] = [
        MarkerCategory::LastActor,
        MarkerCategory::LastSession,
        MarkerCategory::CreatingActor,
        MarkerCategory::CreatingSession,
    ];

    /// Stable index for table storage.
    pub(crate) fn index(self) -> usize {
        match self {
            MarkerCategory::LastActor => 0,
            MarkerCategory::LastSession => 1,
            MarkerCategory::CreatingActor => 2,
            MarkerCategory::CreatingSession => 3,
        }
    }

    /// Canonical name, matching the serde form.
    pub fn as_str(self) -> &'static str {
        match self {
            MarkerCategory::LastActor => "last-actor",
            MarkerCategory::LastSession => "last-session",
            MarkerCategory::CreatingActor => "creating-actor",
            MarkerCategory::CreatingSession => "creating-session",
        }
    }

    /// True for the categories stamped after a creating write rather than
    /// before every write.
    pub fn is_creation_only(self) -> bool {
        matches!(
            self,
            MarkerCategory::CreatingActor | MarkerCategory::CreatingSession
        )
    }
}

impl fmt::Display for MarkerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of the record type that declares audited fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct OwnerType(String);

impl OwnerType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for OwnerType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A registered audited field: which record type owns it, what it is called,
/// and the marker category it was registered under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub owner: OwnerType,
    pub field: String,
    pub category: MarkerCategory,
}

impl FieldDescriptor {
    pub fn new(
        category: MarkerCategory,
        owner: impl Into<OwnerType>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            field: field.into(),
            category,
        }
    }
}
