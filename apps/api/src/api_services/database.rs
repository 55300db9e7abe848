use std::sync::Arc;

use auditrail_application::SecretProvider;
use auditrail_core::AppError;
use auditrail_infrastructure::{PostgresAuditEventStore, PostgresPoolSettings};

use crate::api_config::ApiConfig;

pub fn build_audit_event_store(config: &ApiConfig) -> Arc<PostgresAuditEventStore> {
    Arc::new(PostgresAuditEventStore::new(PostgresPoolSettings {
        max_connections: config.db_max_connections,
        acquire_timeout: config.db_acquire_timeout,
        statement_timeout: config.db_statement_timeout,
    }))
}

pub async fn run_migrations(
    config: &ApiConfig,
    secret_provider: &dyn SecretProvider,
    store: &PostgresAuditEventStore,
) -> Result<(), AppError> {
    let credentials = secret_provider
        .resolve(config.secret_reference.as_str())
        .await?;
    store.run_migrations(&credentials).await?;

    Ok(())
}
