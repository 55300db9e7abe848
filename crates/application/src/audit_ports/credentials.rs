use std::fmt::{Debug, Formatter};

use auditrail_core::SecretError;
use serde::Deserialize;
use serde_json::Value;

const SUPPORTED_ENGINES: &[&str] = &["postgres", "postgresql"];

/// Connection parameters resolved from a database secret.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DatabaseCredentials {
    /// Database host name or address.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Login role.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Database name.
    pub database: String,
}

impl Debug for DatabaseCredentials {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("DatabaseCredentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PortValue {
    Number(u64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct SecretPayload {
    engine: Option<String>,
    host: String,
    port: PortValue,
    username: String,
    password: String,
    #[serde(alias = "database")]
    dbname: String,
}

impl DatabaseCredentials {
    /// Parses the JSON document stored in a database secret.
    ///
    /// Accepts `port` as a number or numeric string and `dbname` or
    /// `database` for the database name. When `engine` is present it must
    /// name PostgreSQL.
    pub fn from_secret_json(reference: &str, payload: &str) -> Result<Self, SecretError> {
        let value = serde_json::from_str::<Value>(payload).map_err(|error| {
            SecretError::Malformed(format!("secret '{reference}' is not valid JSON: {error}"))
        })?;

        Self::from_secret_value(reference, value)
    }

    /// Parses an already decoded secret document.
    pub fn from_secret_value(reference: &str, value: Value) -> Result<Self, SecretError> {
        let payload = serde_json::from_value::<SecretPayload>(value).map_err(|error| {
            SecretError::Malformed(format!(
                "secret '{reference}' lacks database connection fields: {error}"
            ))
        })?;

        if let Some(engine) = payload.engine.as_deref()
            && !SUPPORTED_ENGINES.contains(&engine.to_ascii_lowercase().as_str())
        {
            return Err(SecretError::Malformed(format!(
                "secret '{reference}' names unsupported engine '{engine}'"
            )));
        }

        let port = match payload.port {
            PortValue::Number(port) => u16::try_from(port).ok(),
            PortValue::Text(port) => port.trim().parse::<u16>().ok(),
        }
        .filter(|port| *port != 0)
        .ok_or_else(|| {
            SecretError::Malformed(format!("secret '{reference}' has an invalid port"))
        })?;

        for (name, field) in [
            ("host", &payload.host),
            ("username", &payload.username),
            ("dbname", &payload.dbname),
        ] {
            if field.trim().is_empty() {
                return Err(SecretError::Malformed(format!(
                    "secret '{reference}' has an empty {name}"
                )));
            }
        }

        Ok(Self {
            host: payload.host,
            port,
            username: payload.username,
            password: payload.password,
            database: payload.dbname,
        })
    }
}
