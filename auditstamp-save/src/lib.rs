//! Save pipeline with audit-field stamping
//!
//! This crate persists records and stamps their audited fields on the way to
//! disk: before any write, "last actor" and "last session" fields take the
//! identity of the current request; after a write that created the record,
//! "creating" fields are filled and persisted with a second, trail-suppressed
//! write.
//!
//! ## Overview
//!
//! - **Per-request hooks** - `AuditHooks` exist only for the lifetime of one
//!   mutating request; read-only requests get no hooks at all
//! - **Explicit seams** - Records implement [`AuditedRecord`] and
//!   [`TrackingToggle`]; there is no reflection and no global dispatcher
//! - **File-per-record** - [`JsonStore`] writes one JSON file per record and
//!   appends a JSONL change trail, unless the record's trail tracking is
//!   suppressed
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use auditstamp_fields::{FieldRegistry, MarkerCategory};
//! use auditstamp_save::{AccessKind, AuditConfig, AuditHooks, JsonStore, RecordStore, RequestScope};
//! # use auditstamp_save::{ActorId, AuditedRecord, SessionKey, TrackingToggle};
//! # #[derive(serde::Serialize)] struct Invoice;
//! # impl AuditedRecord for Invoice {
//! #     fn record_type(&self) -> &str { "Invoice" }
//! #     fn record_id(&self) -> &str { "inv-1" }
//! #     fn set_actor_field(&mut self, _: &str, _: Option<&ActorId>) {}
//! #     fn set_session_field(&mut self, _: &str, _: Option<&SessionKey>) {}
//! # }
//! # impl TrackingToggle for Invoice {
//! #     fn disable_tracking(&mut self) {}
//! #     fn enable_tracking(&mut self) {}
//! #     fn tracking_enabled(&self) -> bool { true }
//! # }
//!
//! # async fn example(registry: Arc<FieldRegistry>, mut invoice: Invoice) -> Result<(), Box<dyn std::error::Error>> {
//! let scope = RequestScope::authenticated("user-42").with_session("sess-abc");
//! let store = JsonStore::new("/path/to/data").with_scope(scope.clone());
//!
//! if let Some(hooks) = AuditHooks::for_request(
//!     registry,
//!     scope,
//!     AccessKind::from_method("POST"),
//!     &AuditConfig::from_env(),
//! ) {
//!     hooks.before_write(&mut invoice);
//!     store.write(&invoice).await?;
//!     hooks.after_create(&mut invoice, &store).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage Structure
//!
//! ```text
//! data/
//! ├── Invoice/
//! │   ├── {id}.json        # Record state
//! ├── Payment/
//! │   ├── {id}.json
//! └── trail/
//!     └── current.jsonl    # Change trail (one JSON object per line)
//! ```

pub mod config;
mod error;
pub mod hooks;
pub mod record;
pub mod scope;
pub mod store;
pub mod trail;

pub use config::AuditConfig;
pub use error::{Result, SaveError};
pub use hooks::AuditHooks;
pub use record::{AuditedRecord, RecordStore, TrackingToggle};
pub use scope::{AccessKind, ActorId, RequestScope, SessionKey};
pub use store::JsonStore;
pub use trail::{TrailEntry, TrailOp};
