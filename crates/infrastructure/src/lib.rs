//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod file_secret_provider;
mod in_memory_audit_event_store;
mod postgres_audit_event_store;
mod vault_secret_provider;

pub use file_secret_provider::FileSecretProvider;
pub use in_memory_audit_event_store::InMemoryAuditEventStore;
pub use postgres_audit_event_store::{PostgresAuditEventStore, PostgresPoolSettings};
pub use vault_secret_provider::{VaultSecretProvider, VaultSecretProviderConfig};
