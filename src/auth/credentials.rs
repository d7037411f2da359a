//! Credential management for tao.app API authentication.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::error::TaoError;

/// Header carrying the API key on every upstream request.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Default environment variable holding the API key.
pub const API_KEY_ENV_VAR: &str = "TAO_API_KEY";

/// API credentials: the static tao.app key.
#[derive(Clone)]
pub struct Credentials {
    api_key: SecretString,
}

impl Credentials {
    /// Create new credentials from an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
        }
    }

    /// Get the API key for the request header.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Whether the key is non-empty.
    pub fn is_configured(&self) -> bool {
        !self.api_key.expose_secret().trim().is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Trait for providing API credentials.
///
/// Implement this trait to customize how the key is retrieved,
/// for example from a secrets manager.
pub trait CredentialsProvider: Send + Sync {
    /// Get the credentials.
    fn get_credentials(&self) -> &Credentials;
}

/// Static credentials provider that holds the key directly.
#[derive(Clone)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    /// Create a new static credentials provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(api_key),
        }
    }

    /// Wrap already loaded credentials.
    pub fn from_credentials(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialsProvider for StaticCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

impl CredentialsProvider for Arc<StaticCredentials> {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Credentials provider that reads the key from an environment variable.
///
/// By default, reads from `TAO_API_KEY`.
pub struct EnvCredentials {
    credentials: Credentials,
}

impl EnvCredentials {
    /// Read the key from `TAO_API_KEY`.
    pub fn from_env() -> Result<Self, TaoError> {
        Self::from_env_var(API_KEY_ENV_VAR)
    }

    /// Read the key from a custom environment variable.
    ///
    /// Fails with [`TaoError::MissingCredentials`] if the variable is unset or blank.
    pub fn from_env_var(key_var: &str) -> Result<Self, TaoError> {
        Self::try_from_env_var(key_var).ok_or(TaoError::MissingCredentials)
    }

    /// Try to read the key from `TAO_API_KEY`.
    pub fn try_from_env() -> Option<Self> {
        Self::try_from_env_var(API_KEY_ENV_VAR)
    }

    /// Try to read the key from a custom environment variable.
    ///
    /// Returns `None` if the variable is unset or blank.
    pub fn try_from_env_var(key_var: &str) -> Option<Self> {
        let api_key = std::env::var(key_var).ok()?;
        let credentials = Credentials::new(api_key);
        credentials.is_configured().then_some(Self { credentials })
    }
}

impl CredentialsProvider for EnvCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacted() {
        let creds = Credentials::new("super_secret_key");
        let debug_str = format!("{:?}", creds);
        assert!(!debug_str.contains("super_secret_key"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_static_credentials() {
        let provider = StaticCredentials::new("key");
        let creds = provider.get_credentials();
        assert_eq!(creds.expose_key(), "key");
        assert!(creds.is_configured());
    }

    #[test]
    fn test_blank_key_is_not_configured() {
        assert!(!Credentials::new("   ").is_configured());
    }

    #[test]
    fn test_missing_env_var() {
        let result = EnvCredentials::from_env_var("TAO_INCOME_TEST_KEY_THAT_IS_NEVER_SET");
        assert!(matches!(result, Err(TaoError::MissingCredentials)));
    }
}
