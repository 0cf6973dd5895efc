//! `HashiCorp` Vault integration for envsync
//!
//! Provides [`VaultStore`], a [`SecretStore`](envsync_secrets::SecretStore)
//! backed by the Vault HTTP API:
//! - token validation via `auth/token/lookup-self`
//! - bundle reads via the KV v2 "read latest version" endpoint

pub mod store;

pub use store::{VaultSettings, VaultStore};
