//! Audit event ingestion.
//!
//! One call is one linear pass: read caller input, stamp identity and time,
//! resolve database credentials, insert once. Nothing is retried and nothing
//! is retained between calls.

use std::sync::Arc;

use auditrail_core::{AppResult, NonEmptyString};
use auditrail_domain::{AuditEvent, AuditEventId, AuditEventInput, RequestContext};

use crate::{AuditEventStore, EventClock, SecretProvider};

/// Application service recording audit events.
#[derive(Clone)]
pub struct AuditIngestService {
    secret_provider: Arc<dyn SecretProvider>,
    store: Arc<dyn AuditEventStore>,
    clock: Arc<dyn EventClock>,
    secret_reference: NonEmptyString,
}

impl AuditIngestService {
    /// Creates a service from its collaborators and the database secret reference.
    #[must_use]
    pub fn new(
        secret_provider: Arc<dyn SecretProvider>,
        store: Arc<dyn AuditEventStore>,
        clock: Arc<dyn EventClock>,
        secret_reference: NonEmptyString,
    ) -> Self {
        Self {
            secret_provider,
            store,
            clock,
            secret_reference,
        }
    }

    /// Returns the reference used to locate database credentials.
    #[must_use]
    pub fn secret_reference(&self) -> &str {
        self.secret_reference.as_str()
    }

    /// Records one audit event from a raw request body and its context.
    ///
    /// The body never causes a failure; secret resolution and the insert do.
    /// On success the persisted record is returned.
    pub async fn ingest(&self, body: &[u8], context: RequestContext) -> AppResult<AuditEvent> {
        let input = AuditEventInput::from_json_slice(body);
        let event = AuditEvent::record(AuditEventId::new(), self.clock.now(), input, context);

        let credentials = self
            .secret_provider
            .resolve(self.secret_reference.as_str())
            .await?;

        self.store.insert(&credentials, &event).await?;

        Ok(event)
    }
}
