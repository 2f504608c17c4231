//! Request-scoped identity: who is writing, under which session.
//!
//! A `RequestScope` is captured once per request by whatever handles
//! authentication and carried into the save pipeline. An unauthenticated
//! request carries no actor; audited actor fields are then stamped null.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of the authenticated actor performing a write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque session key for the request. Absent when the request has no
/// established session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The actor and session attached to the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestScope {
    /// `None` for unauthenticated requests — audited actor fields are
    /// stamped null rather than skipped.
    pub actor: Option<ActorId>,
    pub session: Option<SessionKey>,
}

impl RequestScope {
    /// Scope for an authenticated actor, no session yet.
    pub fn authenticated(actor: impl Into<ActorId>) -> Self {
        Self {
            actor: Some(actor.into()),
            session: None,
        }
    }

    /// Scope for an unauthenticated request.
    pub fn anonymous() -> Self {
        Self {
            actor: None,
            session: None,
        }
    }

    /// Attach the request's session key.
    pub fn with_session(mut self, session: impl Into<SessionKey>) -> Self {
        self.session = Some(session.into());
        self
    }
}

/// Whether a request can write. Hooks attach only to mutating requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    ReadOnly,
    Mutating,
}

impl AccessKind {
    /// Classify an HTTP method. GET, HEAD, OPTIONS and TRACE never write;
    /// everything else is treated as mutating.
    pub fn from_method(method: &str) -> Self {
        match method.to_ascii_uppercase().as_str() {
            "GET" | "HEAD" | "OPTIONS" | "TRACE" => AccessKind::ReadOnly,
            _ => AccessKind::Mutating,
        }
    }

    pub fn is_mutating(self) -> bool {
        matches!(self, AccessKind::Mutating)
    }
}
