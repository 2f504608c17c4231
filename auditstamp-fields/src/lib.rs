//! Field registry for audit stamping
//!
//! `auditstamp-fields` is a standalone, schema-only crate that maps marker
//! categories ("records the last actor", "records the creating session", …)
//! to the audited fields each record type declares. It knows nothing about
//! persistence or request handling — the save pipeline consults it at write
//! time to decide which fields to stamp.
//!
//! # Architecture
//!
//! - **Schema-only**: Owns (owner type, field name) declarations, not field values
//! - **Two-phase**: A builder collects registrations at startup, then freezes
//!   into an immutable registry safe to share across worker threads
//! - **O(1) lookup**: `contains` and `fields_for` are direct map lookups,
//!   invoked on every save of every record

pub mod error;
pub mod registry;
pub mod types;

pub use error::{RegistryError, Result};
pub use registry::{FieldRegistry, FieldRegistryBuilder};
pub use types::{FieldDescriptor, MarkerCategory, OwnerType};
