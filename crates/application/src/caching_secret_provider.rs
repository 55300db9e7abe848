use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use auditrail_core::SecretError;
use tokio::sync::Mutex;

use crate::{DatabaseCredentials, SecretProvider};

struct CachedCredentials {
    credentials: DatabaseCredentials,
    fetched_at: Instant,
}

/// Secret provider decorator that reuses resolved credentials for a fixed TTL.
///
/// A zero TTL disables caching so every call reaches the inner provider.
/// Failures are never cached.
pub struct CachingSecretProvider {
    inner: Arc<dyn SecretProvider>,
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedCredentials>>,
}

impl CachingSecretProvider {
    /// Wraps a provider with the given cache TTL.
    #[must_use]
    pub fn new(inner: Arc<dyn SecretProvider>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SecretProvider for CachingSecretProvider {
    async fn resolve(&self, reference: &str) -> Result<DatabaseCredentials, SecretError> {
        if self.ttl.is_zero() {
            return self.inner.resolve(reference).await;
        }

        {
            let entries = self.entries.lock().await;
            if let Some(entry) = entries.get(reference)
                && entry.fetched_at.elapsed() < self.ttl
            {
                return Ok(entry.credentials.clone());
            }
        }

        let credentials = self.inner.resolve(reference).await?;
        self.entries.lock().await.insert(
            reference.to_owned(),
            CachedCredentials {
                credentials: credentials.clone(),
                fetched_at: Instant::now(),
            },
        );

        Ok(credentials)
    }
}
