use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use auditrail_application::{DatabaseCredentials, SecretProvider};
use auditrail_core::SecretError;
use tracing::debug;

/// Secret provider treating the reference as a path to a JSON secret document.
///
/// Relative references resolve against the configured root directory.
#[derive(Debug, Clone, Default)]
pub struct FileSecretProvider {
    root: Option<PathBuf>,
}

impl FileSecretProvider {
    /// Creates a provider resolving relative references against `root`.
    #[must_use]
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    fn secret_path(&self, reference: &str) -> PathBuf {
        let path = PathBuf::from(reference);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path,
        }
    }
}

#[async_trait]
impl SecretProvider for FileSecretProvider {
    async fn resolve(&self, reference: &str) -> Result<DatabaseCredentials, SecretError> {
        let path = self.secret_path(reference);
        debug!(path = %path.display(), "resolving database secret from file");

        let payload = tokio::fs::read_to_string(&path)
            .await
            .map_err(|error| match error.kind() {
                ErrorKind::NotFound => SecretError::NotFound(reference.to_owned()),
                ErrorKind::PermissionDenied => SecretError::AccessDenied(reference.to_owned()),
                ErrorKind::InvalidData => SecretError::Malformed(format!(
                    "secret file '{reference}' is not valid UTF-8"
                )),
                _ => SecretError::Unavailable(format!(
                    "failed to read secret file '{reference}': {error}"
                )),
            })?;

        DatabaseCredentials::from_secret_json(reference, payload.as_str())
    }
}
