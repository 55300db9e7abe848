use std::time::Duration;

use async_trait::async_trait;
use auditrail_application::{AuditEventStore, DatabaseCredentials};
use auditrail_core::StoreError;
use auditrail_domain::AuditEvent;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tokio::sync::Mutex;
use tracing::info;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Pool settings applied to every credential set.
#[derive(Debug, Clone, Copy)]
pub struct PostgresPoolSettings {
    /// Maximum open connections per pool.
    pub max_connections: u32,
    /// How long an insert waits for a free connection.
    pub acquire_timeout: Duration,
    /// Server-side statement timeout.
    pub statement_timeout: Duration,
}

impl Default for PostgresPoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
            statement_timeout: Duration::from_secs(5),
        }
    }
}

/// PostgreSQL-backed append-only audit store.
///
/// Keeps one lazily connected pool for the most recently seen credentials and
/// replaces it when the resolved credentials change.
pub struct PostgresAuditEventStore {
    settings: PostgresPoolSettings,
    current: Mutex<Option<(DatabaseCredentials, PgPool)>>,
}

impl PostgresAuditEventStore {
    /// Creates a store with the provided pool settings.
    #[must_use]
    pub fn new(settings: PostgresPoolSettings) -> Self {
        Self {
            settings,
            current: Mutex::new(None),
        }
    }

    /// Applies pending schema migrations with the given credentials.
    pub async fn run_migrations(&self, credentials: &DatabaseCredentials) -> Result<(), StoreError> {
        let pool = self.pool_for(credentials).await;
        MIGRATOR
            .run(&pool)
            .await
            .map_err(|error| StoreError::Connection(format!("failed to run migrations: {error}")))
    }

    async fn pool_for(&self, credentials: &DatabaseCredentials) -> PgPool {
        let mut current = self.current.lock().await;
        if let Some((known, pool)) = current.as_ref()
            && known == credentials
        {
            return pool.clone();
        }

        let pool = PgPoolOptions::new()
            .max_connections(self.settings.max_connections)
            .acquire_timeout(self.settings.acquire_timeout)
            .connect_lazy_with(connect_options(credentials, self.settings.statement_timeout));

        // A retired pool closes once the last in-flight clone is dropped.
        if current
            .replace((credentials.clone(), pool.clone()))
            .is_some()
        {
            info!(host = %credentials.host, "database credentials changed, replacing pool");
        }

        pool
    }
}

fn connect_options(credentials: &DatabaseCredentials, statement_timeout: Duration) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(credentials.host.as_str())
        .port(credentials.port)
        .username(credentials.username.as_str())
        .password(credentials.password.as_str())
        .database(credentials.database.as_str())
        .application_name("auditrail")
        .options([(
            "statement_timeout",
            format!("{}ms", statement_timeout.as_millis()),
        )])
}

fn classify_store_error(error: sqlx::Error) -> StoreError {
    match &error {
        sqlx::Error::PoolTimedOut => {
            StoreError::Timeout("timed out waiting for a database connection".to_owned())
        }
        sqlx::Error::Database(database_error) => {
            let code = database_error.code().map(|code| code.into_owned());
            match code.as_deref() {
                Some(code) if code.starts_with("22") || code.starts_with("23") => {
                    StoreError::ConstraintViolation(format!(
                        "failed to insert audit event: {error}"
                    ))
                }
                Some("57014") => {
                    StoreError::Timeout(format!("audit event insert was cancelled: {error}"))
                }
                _ => StoreError::Connection(format!("failed to insert audit event: {error}")),
            }
        }
        _ => StoreError::Connection(format!("failed to insert audit event: {error}")),
    }
}

#[async_trait]
impl AuditEventStore for PostgresAuditEventStore {
    async fn insert(
        &self,
        credentials: &DatabaseCredentials,
        event: &AuditEvent,
    ) -> Result<(), StoreError> {
        let pool = self.pool_for(credentials).await;

        sqlx::query(
            r#"
            INSERT INTO audit_events (
                id,
                ts,
                actor,
                action,
                resource,
                note,
                source_ip,
                request_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(event.id().as_uuid())
        .bind(event.timestamp())
        .bind(event.actor())
        .bind(event.action())
        .bind(event.resource())
        .bind(event.note())
        .bind(event.source_ip())
        .bind(event.request_id())
        .execute(&pool)
        .await
        .map_err(classify_store_error)?;

        Ok(())
    }
}
