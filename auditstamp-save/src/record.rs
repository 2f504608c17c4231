//! Seams between the save pipeline and the records it stamps.
//!
//! The pipeline never inspects record internals. A record type declares its
//! audited fields in the `FieldRegistry` at startup and implements these
//! traits so the pipeline can stamp and persist it through a statically
//! checked contract.

use async_trait::async_trait;

use crate::error::Result;
use crate::scope::{ActorId, SessionKey};

/// A record whose audited fields the pipeline can stamp.
///
/// `record_type()` must match the owner type the record's fields were
/// registered under. Setters receive the field name exactly as registered;
/// a record that registered a field it cannot set is a definition bug.
pub trait AuditedRecord {
    /// Owner type identifier, as registered in the field registry.
    fn record_type(&self) -> &str;

    /// Stable identifier of this record instance.
    fn record_id(&self) -> &str;

    /// Assign an actor identity (or null, for unauthenticated writes) to the
    /// named audited field.
    fn set_actor_field(&mut self, field: &str, actor: Option<&ActorId>);

    /// Assign a session key (or null) to the named audited field.
    fn set_session_field(&mut self, field: &str, session: Option<&SessionKey>);
}

/// Capability to suppress change-trail tracking around a write.
///
/// The pipeline's second creation write goes through this: trail tracking is
/// disabled, the stamped fields are persisted, and tracking is re-enabled —
/// so the creation produces exactly one trail entry, not two.
pub trait TrackingToggle {
    fn disable_tracking(&mut self);
    fn enable_tracking(&mut self);
    fn tracking_enabled(&self) -> bool;
}

/// Persistence seam the pipeline writes through.
#[async_trait]
pub trait RecordStore<R>: Send + Sync {
    /// Persist the record's current state.
    async fn write(&self, record: &R) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use serde::{Deserialize, Serialize};

    /// Minimal audited record used by unit tests across this crate.
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub struct TestInvoice {
        pub id: String,
        pub amount: i64,
        pub created_by: Option<ActorId>,
        pub created_session: Option<SessionKey>,
        pub modified_by: Option<ActorId>,
        pub session_key: Option<SessionKey>,
        #[serde(skip, default = "default_tracking")]
        pub tracking: bool,
    }

    fn default_tracking() -> bool {
        true
    }

    impl TestInvoice {
        pub fn new(id: impl Into<String>, amount: i64) -> Self {
            Self {
                id: id.into(),
                amount,
                created_by: None,
                created_session: None,
                modified_by: None,
                session_key: None,
                tracking: true,
            }
        }
    }

    impl AuditedRecord for TestInvoice {
        fn record_type(&self) -> &str {
            "Invoice"
        }

        fn record_id(&self) -> &str {
            &self.id
        }

        fn set_actor_field(&mut self, field: &str, actor: Option<&ActorId>) {
            match field {
                "created_by" => self.created_by = actor.cloned(),
                "modified_by" => self.modified_by = actor.cloned(),
                _ => panic!("unregistered actor field: {field}"),
            }
        }

        fn set_session_field(&mut self, field: &str, session: Option<&SessionKey>) {
            match field {
                "created_session" => self.created_session = session.cloned(),
                "session_key" => self.session_key = session.cloned(),
                _ => panic!("unregistered session field: {field}"),
            }
        }
    }

    impl TrackingToggle for TestInvoice {
        fn disable_tracking(&mut self) {
            self.tracking = false;
        }

        fn enable_tracking(&mut self) {
            self.tracking = true;
        }

        fn tracking_enabled(&self) -> bool {
            self.tracking
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::TestInvoice;
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        let mut invoice = TestInvoice::new("inv-1", 100);
        assert!(invoice.tracking_enabled());

        invoice.disable_tracking();
        assert!(!invoice.tracking_enabled());

        invoice.enable_tracking();
        assert!(invoice.tracking_enabled());
    }

    #[test]
    fn test_actor_field_assignment() {
        let mut invoice = TestInvoice::new("inv-1", 100);
        let actor = ActorId::new("user-42");

        invoice.set_actor_field("modified_by", Some(&actor));
        assert_eq!(invoice.modified_by, Some(actor));

        invoice.set_actor_field("modified_by", None);
        assert!(invoice.modified_by.is_none());
    }
}
