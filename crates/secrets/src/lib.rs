//! Secret-store abstraction for envsync
//!
//! Provides the [`SecretStore`] trait that remote key/value secret stores
//! implement, together with the types that cross that boundary:
//!
//! - [`SecretPath`] - where a bundle lives (mount point plus project,
//!   environment and application segments)
//! - [`SecretBundle`] - the key/value set read from one path
//! - [`SecureSecret`] - a single value that is zeroed on drop and redacted
//!   in `Debug`/`Display`
//!
//! Store implementations live in separate crates:
//! - envsync-vault: `VaultStore` (HashiCorp Vault KV v2)

mod path;
mod types;

pub use path::SecretPath;
pub use types::{SecretBundle, SecureSecret};

use async_trait::async_trait;
use thiserror::Error;

/// Error types for secret-store access
#[derive(Debug, Error)]
pub enum SecretError {
    /// The store rejected the supplied credentials
    #[error("Secret store '{provider}' rejected the credentials: {message}")]
    Unauthenticated {
        /// Store provider name (e.g. "vault")
        provider: String,
        /// Message reported by the store
        message: String,
    },

    /// Nothing exists at the requested path
    #[error("No secret found at '{path}'")]
    NotFound {
        /// Full path that was read
        path: String,
    },

    /// Transport or protocol failure talking to the store
    #[error("Secret store '{provider}' request failed: {message}")]
    Remote {
        /// Store provider name
        provider: String,
        /// Error message from the client
        message: String,
    },

    /// The store client could not be built from the supplied settings
    #[error("Invalid secret store configuration: {message}")]
    InvalidConfig {
        /// What was wrong
        message: String,
    },
}

impl SecretError {
    /// Create an authentication failure for `provider`
    #[must_use]
    pub fn unauthenticated(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a transport/protocol failure for `provider`
    #[must_use]
    pub fn remote(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

/// A remote key/value secret store.
///
/// Implementors must provide:
/// - [`authenticate`](SecretStore::authenticate) - verify the configured
///   credentials before anything is read
/// - [`read`](SecretStore::read) - fetch the latest version of the bundle at a path
/// - [`provider_name`](SecretStore::provider_name) - identifier used in logs and errors
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Get the provider name for this store.
    ///
    /// Examples: `"vault"`, `"memory"`
    fn provider_name(&self) -> &'static str;

    /// Check that the store accepts the configured credentials.
    ///
    /// Returns [`SecretError::Unauthenticated`] when the store rejects them.
    /// Callers must not read or write anything after an error here.
    async fn authenticate(&self) -> Result<(), SecretError>;

    /// Read the latest version of the bundle at `path`.
    ///
    /// Returns [`SecretError::NotFound`] when the path does not exist.
    async fn read(&self, path: &SecretPath) -> Result<SecretBundle, SecretError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticStore {
        accept: bool,
    }

    #[async_trait]
    impl SecretStore for StaticStore {
        fn provider_name(&self) -> &'static str {
            "static"
        }

        async fn authenticate(&self) -> Result<(), SecretError> {
            if self.accept {
                Ok(())
            } else {
                Err(SecretError::unauthenticated("static", "permission denied"))
            }
        }

        async fn read(&self, _path: &SecretPath) -> Result<SecretBundle, SecretError> {
            Ok(SecretBundle::from_iter([("KEY", "value")]))
        }
    }

    #[test]
    fn test_unauthenticated_message() {
        let err = SecretError::unauthenticated("vault", "permission denied");
        let msg = err.to_string();
        assert!(msg.contains("vault"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_not_found_message() {
        let err = SecretError::NotFound {
            path: "secret/data/app".to_string(),
        };
        assert_eq!(err.to_string(), "No secret found at 'secret/data/app'");
    }

    #[test]
    fn test_remote_message() {
        let err = SecretError::remote("vault", "connection refused");
        let msg = err.to_string();
        assert!(msg.contains("request failed"));
        assert!(msg.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_store_through_trait_object() {
        let store: Box<dyn SecretStore> = Box::new(StaticStore { accept: true });
        assert_eq!(store.provider_name(), "static");
        store.authenticate().await.unwrap();

        let bundle = store.read(&SecretPath::new("p", "e", "a")).await.unwrap();
        assert_eq!(bundle.get("KEY").map(SecureSecret::expose), Some("value"));
    }

    #[tokio::test]
    async fn test_store_rejects_credentials() {
        let store = StaticStore { accept: false };
        let err = store.authenticate().await.unwrap_err();
        assert!(matches!(err, SecretError::Unauthenticated { .. }));
    }
}
