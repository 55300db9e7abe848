use thiserror::Error;

/// Failures raised while resolving a credential reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    /// The reference does not name an existing secret.
    #[error("secret not found: {0}")]
    NotFound(String),

    /// The caller is not allowed to read the secret.
    #[error("access denied to secret: {0}")]
    AccessDenied(String),

    /// The secret exists but its payload is not usable connection data.
    #[error("malformed secret payload: {0}")]
    Malformed(String),

    /// The secret store could not be reached or answered unexpectedly.
    #[error("secret store unavailable: {0}")]
    Unavailable(String),
}

/// Failures raised by the durable audit store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Connecting to or talking with the store failed.
    #[error("store connection failure: {0}")]
    Connection(String),

    /// The store rejected the record.
    #[error("store constraint violation: {0}")]
    ConstraintViolation(String),

    /// The store did not answer in time.
    #[error("store timeout: {0}")]
    Timeout(String),
}
