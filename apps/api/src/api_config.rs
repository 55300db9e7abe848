use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use auditrail_core::{AppError, NonEmptyString};
use axum::http::HeaderName;
use ipnet::IpNet;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultRuntimeConfig {
    pub address: String,
    pub token: String,
    pub mount: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretProviderConfig {
    Vault(VaultRuntimeConfig),
    File { root: Option<PathBuf> },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub secret_reference: NonEmptyString,
    pub secret_provider: SecretProviderConfig,
    pub secret_request_timeout: Duration,
    pub secret_cache_ttl: Duration,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub db_statement_timeout: Duration,
    pub api_host: String,
    pub api_port: u16,
    pub trusted_proxies: Vec<IpNet>,
    pub request_id_header: HeaderName,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    pub fn from_lookup<F>(migrate_only: bool, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String, AppError> {
            let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{name} must not be empty")));
            }

            Ok(value)
        };
        let seconds = |name: &str, default: u64| -> Result<Duration, AppError> {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .map(|value| {
                    value.trim().parse::<u64>().map_err(|error| {
                        AppError::Validation(format!("invalid {name}: {error}"))
                    })
                })
                .transpose()
                .map(|value| Duration::from_secs(value.unwrap_or(default)))
        };

        let secret_reference = NonEmptyString::new(required("AUDIT_DB_SECRET_REF")?)?;

        let secret_provider = match lookup("SECRET_PROVIDER")
            .unwrap_or_else(|| "vault".to_owned())
            .as_str()
        {
            "vault" => SecretProviderConfig::Vault(VaultRuntimeConfig {
                address: required("VAULT_ADDR")?,
                token: required("VAULT_TOKEN")?,
                mount: lookup("VAULT_KV_MOUNT").unwrap_or_else(|| "secret".to_owned()),
            }),
            "file" => SecretProviderConfig::File {
                root: lookup("SECRET_FILE_ROOT")
                    .filter(|value| !value.trim().is_empty())
                    .map(PathBuf::from),
            },
            other => {
                return Err(AppError::Validation(format!(
                    "SECRET_PROVIDER must be either 'vault' or 'file', got '{other}'"
                )));
            }
        };

        let db_max_connections = lookup("DB_MAX_CONNECTIONS")
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                value
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|value| *value > 0)
                    .ok_or_else(|| {
                        AppError::Validation(
                            "DB_MAX_CONNECTIONS must be a positive integer".to_owned(),
                        )
                    })
            })
            .transpose()?
            .unwrap_or(5);

        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = lookup("API_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let trusted_proxies = lookup("TRUSTED_PROXY_CIDRS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| {
                IpNet::from_str(value).map_err(|error| {
                    AppError::Validation(format!("invalid TRUSTED_PROXY_CIDRS entry '{value}': {error}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let request_id_header = lookup("REQUEST_ID_HEADER")
            .unwrap_or_else(|| "x-request-id".to_owned());
        let request_id_header = HeaderName::from_str(request_id_header.trim()).map_err(|error| {
            AppError::Validation(format!("invalid REQUEST_ID_HEADER: {error}"))
        })?;

        Ok(Self {
            migrate_only,
            secret_reference,
            secret_provider,
            secret_request_timeout: seconds("SECRET_REQUEST_TIMEOUT_SECONDS", 5)?,
            secret_cache_ttl: seconds("SECRET_CACHE_TTL_SECONDS", 0)?,
            db_max_connections,
            db_acquire_timeout: seconds("DB_ACQUIRE_TIMEOUT_SECONDS", 5)?,
            db_statement_timeout: seconds("DB_STATEMENT_TIMEOUT_SECONDS", 5)?,
            api_host,
            api_port,
            trusted_proxies,
            request_id_header,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::{ApiConfig, SecretProviderConfig};

    fn load(pairs: &[(&str, &str)]) -> Result<ApiConfig, auditrail_core::AppError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        ApiConfig::from_lookup(false, |name| values.get(name).cloned())
    }

    #[test]
    fn secret_reference_is_required() {
        assert!(load(&[("SECRET_PROVIDER", "file")]).is_err());
        assert!(load(&[("SECRET_PROVIDER", "file"), ("AUDIT_DB_SECRET_REF", "  ")]).is_err());
    }

    #[test]
    fn file_provider_uses_defaults() {
        let Ok(config) = load(&[
            ("AUDIT_DB_SECRET_REF", "db.json"),
            ("SECRET_PROVIDER", "file"),
        ]) else {
            panic!("config should load");
        };

        assert_eq!(config.secret_reference.as_str(), "db.json");
        assert_eq!(config.secret_provider, SecretProviderConfig::File { root: None });
        assert_eq!(config.secret_cache_ttl, Duration::ZERO);
        assert_eq!(config.secret_request_timeout, Duration::from_secs(5));
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.api_port, 3001);
        assert!(config.trusted_proxies.is_empty());
        assert_eq!(config.request_id_header.as_str(), "x-request-id");
    }

    #[test]
    fn vault_provider_requires_address_and_token() {
        assert!(load(&[("AUDIT_DB_SECRET_REF", "audit/db")]).is_err());

        let Ok(config) = load(&[
            ("AUDIT_DB_SECRET_REF", "audit/db"),
            ("VAULT_ADDR", "http://127.0.0.1:8200"),
            ("VAULT_TOKEN", "root"),
        ]) else {
            panic!("config should load");
        };
        assert!(matches!(
            config.secret_provider,
            SecretProviderConfig::Vault(ref vault) if vault.mount == "secret"
        ));
    }

    #[test]
    fn rejects_invalid_values() {
        let base = [("AUDIT_DB_SECRET_REF", "db.json"), ("SECRET_PROVIDER", "file")];

        for extra in [
            ("SECRET_PROVIDER", "aws"),
            ("TRUSTED_PROXY_CIDRS", "10.0.0.0/8,not-a-cidr"),
            ("DB_MAX_CONNECTIONS", "0"),
            ("SECRET_CACHE_TTL_SECONDS", "soon"),
        ] {
            let mut pairs = base.to_vec();
            pairs.retain(|(key, _)| *key != extra.0);
            pairs.push(extra);
            assert!(load(&pairs).is_err(), "{extra:?}");
        }
    }

    #[test]
    fn parses_trusted_proxies_and_cache_ttl() {
        let Ok(config) = load(&[
            ("AUDIT_DB_SECRET_REF", "db.json"),
            ("SECRET_PROVIDER", "file"),
            ("TRUSTED_PROXY_CIDRS", "10.0.0.0/8, 192.168.1.0/24"),
            ("SECRET_CACHE_TTL_SECONDS", "60"),
        ]) else {
            panic!("config should load");
        };

        assert_eq!(config.trusted_proxies.len(), 2);
        assert_eq!(config.secret_cache_ttl, Duration::from_secs(60));
    }
}
