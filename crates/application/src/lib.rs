//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_ingest_service;
mod audit_ports;
mod caching_secret_provider;
mod system_event_clock;

pub use audit_ingest_service::AuditIngestService;
pub use audit_ports::{AuditEventStore, DatabaseCredentials, EventClock, SecretProvider};
pub use caching_secret_provider::CachingSecretProvider;
pub use system_event_clock::SystemEventClock;
