use async_trait::async_trait;
use auditrail_application::{AuditEventStore, DatabaseCredentials};
use auditrail_core::StoreError;
use auditrail_domain::AuditEvent;
use tokio::sync::RwLock;

/// In-memory audit store used by tests and local runs.
///
/// Rejects a second event with the same id, matching the primary key of the
/// relational table.
#[derive(Default)]
pub struct InMemoryAuditEventStore {
    events: RwLock<Vec<AuditEvent>>,
}

impl InMemoryAuditEventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every stored event in insertion order.
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl AuditEventStore for InMemoryAuditEventStore {
    async fn insert(
        &self,
        _credentials: &DatabaseCredentials,
        event: &AuditEvent,
    ) -> Result<(), StoreError> {
        let mut events = self.events.write().await;
        if events.iter().any(|stored| stored.id() == event.id()) {
            return Err(StoreError::ConstraintViolation(format!(
                "audit event '{}' already exists",
                event.id()
            )));
        }

        events.push(event.clone());
        Ok(())
    }
}
