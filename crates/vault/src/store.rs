//! `HashiCorp` Vault secret store over the HTTP API

use async_trait::async_trait;
use envsync_secrets::{SecretBundle, SecretError, SecretPath, SecretStore};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, instrument};
use vaultrs::client::{VaultClient, VaultClientSettingsBuilder};
use vaultrs::error::ClientError;

const PROVIDER: &str = "vault";

/// Connection settings for a Vault server
#[derive(Debug, Clone)]
pub struct VaultSettings {
    /// Server address (e.g. `https://vault.example.com:8200`)
    pub address: String,
    /// Client token sent as `X-Vault-Token`
    pub token: SecretString,
    /// Enterprise namespace sent as `X-Vault-Namespace`, if any
    pub namespace: Option<String>,
}

impl VaultSettings {
    /// Create settings without a namespace
    #[must_use]
    pub fn new(address: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            token: SecretString::from(token.into()),
            namespace: None,
        }
    }

    /// Set the namespace. An empty string means the root namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.namespace = (!namespace.is_empty()).then_some(namespace);
        self
    }
}

/// Reads secret bundles from a Vault KV v2 engine
pub struct VaultStore {
    client: VaultClient,
    address: String,
}

impl std::fmt::Debug for VaultStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultStore")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl VaultStore {
    /// Build a client for the given settings.
    ///
    /// No request is made here; call
    /// [`authenticate`](SecretStore::authenticate) to check the token.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::InvalidConfig`] if the address is not a valid
    /// URL or the client cannot be constructed.
    pub fn new(settings: &VaultSettings) -> Result<Self, SecretError> {
        url::Url::parse(&settings.address).map_err(|e| SecretError::InvalidConfig {
            message: format!("VAULT_ADDR '{}' is not a valid URL: {e}", settings.address),
        })?;

        let client_settings = VaultClientSettingsBuilder::default()
            .address(&settings.address)
            .token(settings.token.expose_secret())
            .namespace(settings.namespace.clone())
            .build()
            .map_err(|e| SecretError::InvalidConfig {
                message: format!("Failed to build Vault client settings: {e}"),
            })?;

        let client = VaultClient::new(client_settings).map_err(|e| SecretError::InvalidConfig {
            message: format!("Failed to create Vault client: {e}"),
        })?;

        Ok(Self {
            client,
            address: settings.address.clone(),
        })
    }
}

#[async_trait]
impl SecretStore for VaultStore {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    #[instrument(skip_all, fields(address = %self.address))]
    async fn authenticate(&self) -> Result<(), SecretError> {
        match vaultrs::token::lookup_self(&self.client).await {
            Ok(token) => {
                debug!(
                    display_name = %token.display_name,
                    policies = ?token.policies,
                    "Vault token accepted"
                );
                Ok(())
            }
            Err(ClientError::APIError { code, errors }) if code == 401 || code == 403 => Err(
                SecretError::unauthenticated(PROVIDER, describe_api_error(code, &errors)),
            ),
            Err(e) => Err(SecretError::remote(PROVIDER, format!("token lookup failed: {e}"))),
        }
    }

    #[instrument(skip_all, fields(path = %path))]
    async fn read(&self, path: &SecretPath) -> Result<SecretBundle, SecretError> {
        let data: HashMap<String, Value> =
            vaultrs::kv2::read(&self.client, path.mount(), &path.relative())
                .await
                .map_err(|e| match e {
                    ClientError::APIError { code: 404, .. } => SecretError::NotFound {
                        path: path.to_string(),
                    },
                    ClientError::APIError { code, errors } if code == 401 || code == 403 => {
                        SecretError::unauthenticated(PROVIDER, describe_api_error(code, &errors))
                    }
                    other => SecretError::remote(PROVIDER, format!("KV read failed: {other}")),
                })?;

        let bundle: SecretBundle = data
            .into_iter()
            .map(|(key, value)| (key, value_to_string(value)))
            .collect();
        debug!(count = bundle.len(), "Read secret bundle");
        Ok(bundle)
    }
}

fn describe_api_error(code: u16, errors: &[String]) -> String {
    if errors.is_empty() {
        format!("HTTP {code}")
    } else {
        format!("HTTP {code}: {}", errors.join("; "))
    }
}

/// KV v2 values are arbitrary JSON; strings pass through, everything else
/// is written as compact JSON text and `null` becomes empty.
fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
