// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

//! envsync - merge Vault secrets into a local `.env` file
//!
//! A run is one linear sequence:
//!
//! 1. read the existing env file (missing means empty)
//! 2. check the token against the secret store
//! 3. fetch the latest secret bundle for project/environment/application
//! 4. merge it (remote values win, local-only keys stay)
//! 5. atomically replace the env file
//!
//! ```ignore
//! let config = envsync::Config::from_env()?;
//! let report = envsync::run(&config).await?;
//! ```
//!
//! [`sync()`] takes any [`SecretStore`](envsync_secrets::SecretStore), so the
//! whole sequence can run against an in-memory store.

// CLI helpers write diagnostics to stderr - this is intentional
#![allow(clippy::print_stderr)]

/// CLI argument parsing and exit codes.
pub mod cli;
/// Configuration read from the process environment.
pub mod config;
/// Error taxonomy.
pub mod error;
/// The sync operation.
pub mod sync;
/// Tracing and logging configuration.
pub mod tracing;

pub use config::Config;
pub use error::{Result, SyncError};
pub use sync::{SyncReport, merge, run, sync};
