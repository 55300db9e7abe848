//! HashiCorp Vault KV v2 secret provider.

use async_trait::async_trait;
use auditrail_application::{DatabaseCredentials, SecretProvider};
use auditrail_core::{AppError, AppResult, SecretError};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Connection settings for a Vault KV v2 mount.
#[derive(Debug, Clone)]
pub struct VaultSecretProviderConfig {
    /// Vault base address, e.g. `https://vault.internal:8200`.
    pub address: String,
    /// Token sent as `X-Vault-Token`.
    pub token: String,
    /// KV v2 mount name.
    pub mount: String,
}

#[derive(Debug, Deserialize)]
struct KvReadResponse {
    data: KvReadData,
}

#[derive(Debug, Deserialize)]
struct KvReadData {
    data: Value,
}

/// Secret provider reading database credentials from Vault KV v2.
pub struct VaultSecretProvider {
    http_client: reqwest::Client,
    base_url: Url,
    token: String,
    mount: String,
}

impl VaultSecretProvider {
    /// Creates a provider from an HTTP client and Vault settings.
    pub fn new(http_client: reqwest::Client, config: VaultSecretProviderConfig) -> AppResult<Self> {
        let mut base_url = Url::parse(config.address.as_str()).map_err(|error| {
            AppError::Validation(format!("invalid VAULT_ADDR '{}': {error}", config.address))
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(path.as_str());
        }

        let mount = config.mount.trim_matches('/').to_owned();
        if mount.is_empty() {
            return Err(AppError::Validation(
                "VAULT_KV_MOUNT must not be empty".to_owned(),
            ));
        }

        Ok(Self {
            http_client,
            base_url,
            token: config.token,
            mount,
        })
    }

    fn secret_url(&self, reference: &str) -> Result<Url, SecretError> {
        let path = format!("v1/{}/data/{}", self.mount, reference.trim_matches('/'));
        self.base_url.join(path.as_str()).map_err(|error| {
            SecretError::Malformed(format!("invalid secret reference '{reference}': {error}"))
        })
    }
}

#[async_trait]
impl SecretProvider for VaultSecretProvider {
    async fn resolve(&self, reference: &str) -> Result<DatabaseCredentials, SecretError> {
        let url = self.secret_url(reference)?;
        debug!(reference, "resolving database secret from vault");

        let response = self
            .http_client
            .get(url)
            .header("X-Vault-Token", self.token.as_str())
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    SecretError::Unavailable(format!("vault request for '{reference}' timed out"))
                } else {
                    SecretError::Unavailable(format!(
                        "vault request for '{reference}' failed: {error}"
                    ))
                }
            })?;

        match response.status() {
            status if status.is_success() => {
                let body = response.json::<KvReadResponse>().await.map_err(|error| {
                    SecretError::Malformed(format!(
                        "vault response for '{reference}' is not a KV v2 document: {error}"
                    ))
                })?;
                DatabaseCredentials::from_secret_value(reference, body.data.data)
            }
            StatusCode::NOT_FOUND => Err(SecretError::NotFound(reference.to_owned())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(SecretError::AccessDenied(reference.to_owned()))
            }
            status => Err(SecretError::Unavailable(format!(
                "vault returned status {status} for '{reference}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use auditrail_application::SecretProvider;
    use auditrail_core::SecretError;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{VaultSecretProvider, VaultSecretProviderConfig};

    fn provider(address: String) -> VaultSecretProvider {
        match VaultSecretProvider::new(
            reqwest::Client::new(),
            VaultSecretProviderConfig {
                address,
                token: "test-token".to_owned(),
                mount: "secret".to_owned(),
            },
        ) {
            Ok(provider) => provider,
            Err(error) => panic!("vault provider should build: {error}"),
        }
    }

    fn kv_document(data: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "data": {
                "data": data,
                "metadata": { "version": 3 }
            }
        })
    }

    #[tokio::test]
    async fn resolves_credentials_from_kv_v2() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/secret/data/audit/db"))
            .and(header("X-Vault-Token", "test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(kv_document(
                serde_json::json!({
                    "engine": "postgres",
                    "host": "db.internal",
                    "port": 5432,
                    "username": "audit_writer",
                    "password": "pw",
                    "dbname": "audit"
                }),
            )))
            .expect(1)
            .mount(&server)
            .await;

        let credentials = provider(server.uri()).resolve("audit/db").await;

        assert!(matches!(
            credentials,
            Ok(ref value) if value.host == "db.internal" && value.username == "audit_writer"
        ));
    }

    #[tokio::test]
    async fn maps_status_codes_to_secret_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/secret/data/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/secret/data/forbidden"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/secret/data/sealed"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let provider = provider(server.uri());

        assert!(matches!(
            provider.resolve("missing").await,
            Err(SecretError::NotFound(_))
        ));
        assert!(matches!(
            provider.resolve("forbidden").await,
            Err(SecretError::AccessDenied(_))
        ));
        assert!(matches!(
            provider.resolve("sealed").await,
            Err(SecretError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn incomplete_secret_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/secret/data/audit/db"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(kv_document(serde_json::json!({ "host": "db" }))),
            )
            .mount(&server)
            .await;

        let result = provider(server.uri()).resolve("audit/db").await;
        assert!(matches!(result, Err(SecretError::Malformed(_))));
    }

    #[test]
    fn rejects_invalid_address() {
        let result = VaultSecretProvider::new(
            reqwest::Client::new(),
            VaultSecretProviderConfig {
                address: "not a url".to_owned(),
                token: "t".to_owned(),
                mount: "secret".to_owned(),
            },
        );
        assert!(result.is_err());
    }
}
