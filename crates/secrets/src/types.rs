//! Secure secret types with automatic memory zeroing
//!
//! - [`SecureSecret`]: A wrapper around `secrecy::SecretString` that auto-zeros on drop
//! - [`SecretBundle`]: The key/value set read from one store path

use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;

/// A secret value with automatic memory zeroing on drop.
///
/// This type wraps `secrecy::SecretString` to ensure:
/// - Secret values are zeroed from memory when dropped
/// - Debug output shows `[REDACTED]` instead of the actual value
/// - Explicit `.expose()` call required to access the value
#[derive(Clone)]
pub struct SecureSecret {
    inner: SecretString,
}

impl SecureSecret {
    /// Create a new secure secret from a string.
    #[must_use]
    pub fn new(value: String) -> Self {
        Self {
            inner: SecretString::from(value),
        }
    }

    /// Expose the secret value for use.
    ///
    /// The caller must not log the exposed value.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.inner.expose_secret()
    }
}

impl From<&str> for SecureSecret {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl From<String> for SecureSecret {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Debug for SecureSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl std::fmt::Display for SecureSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Key/value secrets read from a single store path.
///
/// Iteration is in key order regardless of the order the store returned
/// them in. Values are zeroed when the bundle is dropped.
#[derive(Clone, Default)]
pub struct SecretBundle {
    secrets: BTreeMap<String, SecureSecret>,
}

impl SecretBundle {
    /// Create an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a secret, replacing any previous value for `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SecureSecret>) {
        self.secrets.insert(name.into(), value.into());
    }

    /// Get a secret by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SecureSecret> {
        self.secrets.get(name)
    }

    /// Check if the bundle contains a secret.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.secrets.contains_key(name)
    }

    /// Check if the bundle is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    /// Get the number of secrets in the bundle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// Iterate over secret names in key order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.secrets.keys().map(String::as_str)
    }

    /// Iterate over `(name, secret)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SecureSecret)> {
        self.secrets.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for SecretBundle
where
    K: Into<String>,
    V: Into<SecureSecret>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bundle = Self::new();
        for (name, value) in iter {
            bundle.insert(name, value);
        }
        bundle
    }
}

impl std::fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretBundle")
            .field("count", &self.secrets.len())
            .field("names", &self.secrets.keys().collect::<Vec<_>>())
            .finish()
    }
}
