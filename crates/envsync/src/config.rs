//! Run configuration, read once from the process environment

use crate::error::{Result, SyncError};
use envsync_secrets::SecretPath;
use envsync_vault::VaultSettings;
use std::path::PathBuf;

/// Project segment of the secret path
pub const PROJECT_NAME: &str = "ai-assistant";

/// Env file written when no other path is configured
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Vault server address
pub const VAULT_ADDR: &str = "VAULT_ADDR";
/// Vault client token
pub const VAULT_TOKEN: &str = "VAULT_TOKEN";
/// Vault namespace; may be empty for the root namespace
pub const VAULT_NAMESPACE: &str = "VAULT_NAMESPACE";
/// Application segment of the secret path
pub const APPLICATION: &str = "APPLICATION";
/// Environment segment of the secret path
pub const ENVIRONMENT: &str = "ENVIRONMENT";

/// Variables that must be present before a run starts
pub const REQUIRED_VARS: [&str; 5] = [
    VAULT_ADDR,
    VAULT_TOKEN,
    VAULT_NAMESPACE,
    APPLICATION,
    ENVIRONMENT,
];

/// Everything a sync run needs, built once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection settings for the secret store
    pub vault: VaultSettings,
    /// Bundle to read
    pub secret_path: SecretPath,
    /// Env file to merge into
    pub env_file: PathBuf,
}

impl Config {
    /// Read the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Configuration`] naming every missing variable.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// `VAULT_NAMESPACE` must be present but may be empty. The other
    /// variables must be present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Configuration`] naming every missing variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut missing = Vec::new();
        let mut require = |name: &'static str, allow_empty: bool| match lookup(name) {
            Some(value) if allow_empty || !value.is_empty() => value,
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let address = require(VAULT_ADDR, false);
        let token = require(VAULT_TOKEN, false);
        let namespace = require(VAULT_NAMESPACE, true);
        let application = require(APPLICATION, false);
        let environment = require(ENVIRONMENT, false);

        if !missing.is_empty() {
            return Err(SyncError::configuration_with_help(
                format!(
                    "required environment variable(s) not set: {}",
                    missing.join(", ")
                ),
                format!("Export {} before running envsync", REQUIRED_VARS.join(", ")),
            ));
        }

        Ok(Self {
            vault: VaultSettings::new(address, token).with_namespace(namespace),
            secret_path: SecretPath::new(PROJECT_NAME, environment, application),
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
        })
    }

    /// Merge into a different env file
    #[must_use]
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            (VAULT_ADDR, "https://vault.example.com:8200"),
            (VAULT_TOKEN, "s.abc123"),
            (VAULT_NAMESPACE, "platform"),
            (APPLICATION, "api"),
            (ENVIRONMENT, "staging"),
        ])
    }

    fn lookup_in<'a>(
        env: &'a HashMap<&'static str, &'static str>,
    ) -> impl Fn(&str) -> Option<String> + 'a {
        |name| env.get(name).map(|v| (*v).to_string())
    }

    #[test]
    fn test_from_lookup_complete() {
        let env = full_env();
        let config = Config::from_lookup(lookup_in(&env)).unwrap();

        assert_eq!(config.vault.address, "https://vault.example.com:8200");
        assert_eq!(config.vault.namespace.as_deref(), Some("platform"));
        assert_eq!(
            config.secret_path.to_string(),
            "secret/data/ai-assistant/staging/api/"
        );
        assert_eq!(config.env_file, PathBuf::from(".env"));
    }

    #[test]
    fn test_from_lookup_reports_every_missing_variable() {
        let mut env = full_env();
        env.remove(VAULT_TOKEN);
        env.remove(ENVIRONMENT);

        let err = Config::from_lookup(lookup_in(&env)).unwrap_err();
        assert!(err.is_configuration());
        let msg = err.to_string();
        assert!(msg.contains("VAULT_TOKEN"));
        assert!(msg.contains("ENVIRONMENT"));
        assert!(!msg.contains("VAULT_ADDR"));
    }

    #[test]
    fn test_from_lookup_nothing_set() {
        let err = Config::from_lookup(|_| None).unwrap_err();
        let msg = err.to_string();
        for name in REQUIRED_VARS {
            assert!(msg.contains(name), "{name} missing from {msg}");
        }
    }

    #[test]
    fn test_empty_namespace_is_root() {
        let mut env = full_env();
        env.insert(VAULT_NAMESPACE, "");

        let config = Config::from_lookup(lookup_in(&env)).unwrap();
        assert_eq!(config.vault.namespace, None);
    }

    #[test]
    fn test_empty_application_is_missing() {
        let mut env = full_env();
        env.insert(APPLICATION, "");

        let err = Config::from_lookup(lookup_in(&env)).unwrap_err();
        assert!(err.to_string().contains("APPLICATION"));
    }

    #[test]
    fn test_debug_hides_token() {
        let env = full_env();
        let config = Config::from_lookup(lookup_in(&env)).unwrap();
        assert!(!format!("{config:?}").contains("s.abc123"));
    }

    #[test]
    fn test_with_env_file() {
        let env = full_env();
        let config = Config::from_lookup(lookup_in(&env))
            .unwrap()
            .with_env_file("/tmp/app/.env.local");
        assert_eq!(config.env_file, PathBuf::from("/tmp/app/.env.local"));
    }

    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                (VAULT_ADDR, Some("http://127.0.0.1:8200")),
                (VAULT_TOKEN, Some("s.env-token")),
                (VAULT_NAMESPACE, Some("")),
                (APPLICATION, Some("worker")),
                (ENVIRONMENT, Some("prod")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.vault.address, "http://127.0.0.1:8200");
                assert_eq!(
                    config.secret_path.relative(),
                    "data/ai-assistant/prod/worker/"
                );
            },
        );
    }

    #[test]
    fn test_from_env_missing() {
        temp_env::with_vars_unset(REQUIRED_VARS, || {
            let err = Config::from_env().unwrap_err();
            assert!(err.is_configuration());
        });
    }
}
