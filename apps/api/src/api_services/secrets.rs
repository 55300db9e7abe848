use std::sync::Arc;

use auditrail_application::{CachingSecretProvider, SecretProvider};
use auditrail_core::AppError;
use auditrail_infrastructure::{FileSecretProvider, VaultSecretProvider, VaultSecretProviderConfig};
use tracing::info;

use crate::api_config::{ApiConfig, SecretProviderConfig};

pub fn build_secret_provider(config: &ApiConfig) -> Result<Arc<dyn SecretProvider>, AppError> {
    let provider: Arc<dyn SecretProvider> = match &config.secret_provider {
        SecretProviderConfig::Vault(vault) => {
            let http_client = reqwest::Client::builder()
                .timeout(config.secret_request_timeout)
                .build()
                .map_err(|error| {
                    AppError::Internal(format!("failed to build secret store client: {error}"))
                })?;

            Arc::new(VaultSecretProvider::new(
                http_client,
                VaultSecretProviderConfig {
                    address: vault.address.clone(),
                    token: vault.token.clone(),
                    mount: vault.mount.clone(),
                },
            )?)
        }
        SecretProviderConfig::File { root } => Arc::new(FileSecretProvider::new(root.clone())),
    };

    if config.secret_cache_ttl.is_zero() {
        return Ok(provider);
    }

    info!(
        ttl_seconds = config.secret_cache_ttl.as_secs(),
        "database credential caching enabled"
    );
    Ok(Arc::new(CachingSecretProvider::new(
        provider,
        config.secret_cache_ttl,
    )))
}
