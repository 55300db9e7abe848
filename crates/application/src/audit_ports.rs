use async_trait::async_trait;
use auditrail_core::{SecretError, StoreError};
use auditrail_domain::AuditEvent;
use chrono::{DateTime, Utc};

mod credentials;

pub use credentials::DatabaseCredentials;

/// Port resolving a credential reference to database connection parameters.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Resolves one secret reference.
    async fn resolve(&self, reference: &str) -> Result<DatabaseCredentials, SecretError>;
}

/// Port for persisting append-only audit events.
#[async_trait]
pub trait AuditEventStore: Send + Sync {
    /// Inserts one audit event using the supplied connection parameters.
    async fn insert(
        &self,
        credentials: &DatabaseCredentials,
        event: &AuditEvent,
    ) -> Result<(), StoreError>;
}

/// Source of ingestion instants.
pub trait EventClock: Send + Sync {
    /// Returns the instant to stamp on the next event.
    fn now(&self) -> DateTime<Utc>;
}
