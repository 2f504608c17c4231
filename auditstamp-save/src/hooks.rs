//! Per-request audit hooks.
//!
//! The save pipeline calls the hooks directly and synchronously at two
//! points per write: `before_write` just before persisting, and
//! `after_create` once a write that created the record has completed. The
//! hook value exists only for the lifetime of one mutating request — there
//! is no global dispatcher to connect to or disconnect from.

use std::sync::Arc;

use tracing::debug;

use auditstamp_fields::{FieldRegistry, MarkerCategory, OwnerType};

use crate::config::AuditConfig;
use crate::error::Result;
use crate::record::{AuditedRecord, RecordStore, TrackingToggle};
use crate::scope::{AccessKind, RequestScope};

/// Audit stamping hooks for a single mutating request.
pub struct AuditHooks {
    registry: Arc<FieldRegistry>,
    scope: RequestScope,
}

impl AuditHooks {
    /// Create hooks for a request, or `None` when nothing should be stamped:
    /// the request is read-only, or stamping is disabled by configuration.
    pub fn for_request(
        registry: Arc<FieldRegistry>,
        scope: RequestScope,
        access: AccessKind,
        config: &AuditConfig,
    ) -> Option<Self> {
        if config.disabled {
            return None;
        }
        if !access.is_mutating() {
            return None;
        }
        Some(Self { registry, scope })
    }

    /// The scope these hooks stamp with.
    pub fn scope(&self) -> &RequestScope {
        &self.scope
    }

    /// Stamp "last actor" and "last session" fields before the record is
    /// persisted. Fields are stamped in registration order. Records with no
    /// registered fields pass through untouched.
    pub fn before_write<R: AuditedRecord>(&self, record: &mut R) {
        let owner = OwnerType::new(record.record_type());

        if self.registry.contains(MarkerCategory::LastActor, &owner) {
            for desc in self.registry.fields_for(MarkerCategory::LastActor, &owner) {
                record.set_actor_field(&desc.field, self.scope.actor.as_ref());
            }
        }

        if self.registry.contains(MarkerCategory::LastSession, &owner) {
            for desc in self.registry.fields_for(MarkerCategory::LastSession, &owner) {
                record.set_session_field(&desc.field, self.scope.session.as_ref());
            }
        }
    }

    /// Stamp "creating" fields after a write that created the record, then
    /// persist them with one additional tracking-suppressed write.
    ///
    /// The caller invokes this only when the completed write was a creation.
    /// No-op for records with no creation-only fields. Tracking is re-enabled
    /// even if the write fails.
    pub async fn after_create<R, S>(&self, record: &mut R, store: &S) -> Result<()>
    where
        R: AuditedRecord + TrackingToggle,
        S: RecordStore<R>,
    {
        let owner = OwnerType::new(record.record_type());

        let has_actor = self.registry.contains(MarkerCategory::CreatingActor, &owner);
        let has_session = self
            .registry
            .contains(MarkerCategory::CreatingSession, &owner);
        if !has_actor && !has_session {
            return Ok(());
        }

        for desc in self
            .registry
            .fields_for(MarkerCategory::CreatingActor, &owner)
        {
            record.set_actor_field(&desc.field, self.scope.actor.as_ref());
        }
        for desc in self
            .registry
            .fields_for(MarkerCategory::CreatingSession, &owner)
        {
            record.set_session_field(&desc.field, self.scope.session.as_ref());
        }

        debug!(
            record_type = record.record_type(),
            record_id = record.record_id(),
            "persisting creation stamps"
        );

        record.disable_tracking();
        let result = store.write(record).await;
        record.enable_tracking();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_support::TestInvoice;
    use crate::scope::{ActorId, SessionKey};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn test_registry() -> Arc<FieldRegistry> {
        let mut builder = FieldRegistry::builder();
        builder
            .register(MarkerCategory::LastActor, "Invoice", "modified_by")
            .unwrap();
        builder
            .register(MarkerCategory::LastSession, "Invoice", "session_key")
            .unwrap();
        builder
            .register(MarkerCategory::CreatingActor, "Invoice", "created_by")
            .unwrap();
        builder
            .register(MarkerCategory::CreatingSession, "Invoice", "created_session")
            .unwrap();
        Arc::new(builder.build())
    }

    /// Store that records the tracking state of each write it receives.
    #[derive(Default)]
    struct RecordingStore {
        tracking_states: Mutex<Vec<bool>>,
    }

    #[async_trait]
    impl RecordStore<TestInvoice> for RecordingStore {
        async fn write(&self, record: &TestInvoice) -> Result<()> {
            self.tracking_states
                .lock()
                .unwrap()
                .push(record.tracking_enabled());
            Ok(())
        }
    }

    fn hooks(scope: RequestScope) -> AuditHooks {
        AuditHooks::for_request(
            test_registry(),
            scope,
            AccessKind::Mutating,
            &AuditConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_read_only_request_gets_no_hooks() {
        let result = AuditHooks::for_request(
            test_registry(),
            RequestScope::anonymous(),
            AccessKind::ReadOnly,
            &AuditConfig::default(),
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_disabled_config_gets_no_hooks() {
        let result = AuditHooks::for_request(
            test_registry(),
            RequestScope::authenticated("user-42"),
            AccessKind::Mutating,
            &AuditConfig { disabled: true },
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_before_write_stamps_last_fields() {
        let hooks = hooks(RequestScope::authenticated("user-42").with_session("sess-1"));
        let mut invoice = TestInvoice::new("inv-1", 100);

        hooks.before_write(&mut invoice);

        assert_eq!(invoice.modified_by, Some(ActorId::new("user-42")));
        assert_eq!(invoice.session_key, Some(SessionKey::new("sess-1")));
        // Creation fields are not touched before the write.
        assert!(invoice.created_by.is_none());
        assert!(invoice.created_session.is_none());
    }

    #[test]
    fn test_before_write_anonymous_stamps_null() {
        let hooks = hooks(RequestScope::anonymous().with_session("sess-1"));
        let mut invoice = TestInvoice::new("inv-1", 100);
        invoice.modified_by = Some(ActorId::new("previous-writer"));

        hooks.before_write(&mut invoice);

        // The previous writer is overwritten with null, not preserved.
        assert!(invoice.modified_by.is_none());
        assert_eq!(invoice.session_key, Some(SessionKey::new("sess-1")));
    }

    #[test]
    fn test_before_write_unregistered_type_untouched() {
        let registry = Arc::new(FieldRegistry::builder().build());
        let hooks = AuditHooks::for_request(
            registry,
            RequestScope::authenticated("user-42"),
            AccessKind::Mutating,
            &AuditConfig::default(),
        )
        .unwrap();

        let mut invoice = TestInvoice::new("inv-1", 100);
        hooks.before_write(&mut invoice);
        assert!(invoice.modified_by.is_none());
        assert!(invoice.session_key.is_none());
    }

    #[tokio::test]
    async fn test_after_create_stamps_and_writes_suppressed() {
        let hooks = hooks(RequestScope::authenticated("user-42").with_session("sess-1"));
        let mut invoice = TestInvoice::new("inv-1", 100);
        let store = RecordingStore::default();

        hooks.after_create(&mut invoice, &store).await.unwrap();

        assert_eq!(invoice.created_by, Some(ActorId::new("user-42")));
        assert_eq!(invoice.created_session, Some(SessionKey::new("sess-1")));

        // Exactly one write, with tracking suppressed during it.
        let states = store.tracking_states.lock().unwrap();
        assert_eq!(*states, vec![false]);
        drop(states);

        // Tracking is back on afterwards.
        assert!(invoice.tracking_enabled());
    }

    #[tokio::test]
    async fn test_after_create_no_creation_fields_skips_write() {
        let mut builder = FieldRegistry::builder();
        builder
            .register(MarkerCategory::LastActor, "Invoice", "modified_by")
            .unwrap();
        let hooks = AuditHooks::for_request(
            Arc::new(builder.build()),
            RequestScope::authenticated("user-42"),
            AccessKind::Mutating,
            &AuditConfig::default(),
        )
        .unwrap();

        let mut invoice = TestInvoice::new("inv-1", 100);
        let store = RecordingStore::default();

        hooks.after_create(&mut invoice, &store).await.unwrap();

        assert!(invoice.created_by.is_none());
        assert!(store.tracking_states.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_after_create_reenables_tracking_on_error() {
        struct FailingStore;

        #[async_trait]
        impl RecordStore<TestInvoice> for FailingStore {
            async fn write(&self, _record: &TestInvoice) -> Result<()> {
                Err(crate::error::SaveError::NotFound {
                    record_type: "Invoice".into(),
                    id: "inv-1".into(),
                })
            }
        }

        let hooks = hooks(RequestScope::authenticated("user-42"));
        let mut invoice = TestInvoice::new("inv-1", 100);

        let result = hooks.after_create(&mut invoice, &FailingStore).await;
        assert!(result.is_err());
        assert!(invoice.tracking_enabled());
    }
}
