//! Merge a remote secret bundle into the local env file

use crate::config::Config;
use crate::error::Result;
use envsync_envfile::{EnvFile, EnvFileError};
use envsync_secrets::{SecretBundle, SecretStore};
use envsync_vault::VaultStore;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// What a successful run did to the env file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Env file that was merged into
    pub path: PathBuf,
    /// Remote keys that were not in the file before
    pub added: Vec<String>,
    /// Remote keys whose local value was replaced
    pub updated: Vec<String>,
    /// Remote keys whose local value already matched
    pub unchanged: Vec<String>,
    /// Local-only keys that were kept as they were
    pub retained: Vec<String>,
    /// Whether the file on disk was replaced
    pub written: bool,
}

impl SyncReport {
    /// Number of keys that came from the remote bundle
    #[must_use]
    pub fn remote_count(&self) -> usize {
        self.added.len() + self.updated.len() + self.unchanged.len()
    }
}

/// Run a sync against the Vault server described by `config`.
///
/// # Errors
///
/// See [`sync`]. Also returns a configuration error if the Vault client
/// cannot be built from `config`.
pub async fn run(config: &Config) -> Result<SyncReport> {
    let store = VaultStore::new(&config.vault)?;
    sync(config, &store).await
}

/// Merge the bundle at `config.secret_path` into `config.env_file`.
///
/// The file is read first (missing or unreadable means empty). Then the
/// store must accept the credentials and the bundle is fetched. Remote
/// values replace local ones and local-only keys are kept. The result
/// replaces the file atomically. The write is skipped when the content
/// would not change.
///
/// # Errors
///
/// Returns an error if authentication, the fetch, entry validation or the
/// write fails. In every error case the file on disk is left untouched.
#[instrument(
    skip_all,
    fields(provider = store.provider_name(), env_file = %config.env_file.display())
)]
pub async fn sync<S>(config: &Config, store: &S) -> Result<SyncReport>
where
    S: SecretStore + ?Sized,
{
    let mut env_file = load_existing(&config.env_file);

    store.authenticate().await?;
    info!("Authenticated with secret store");

    let bundle = store.read(&config.secret_path).await?;
    info!(
        secret_path = %config.secret_path,
        count = bundle.len(),
        "Fetched secret bundle"
    );

    let mut report = merge(&mut env_file, &bundle)?;
    report.path.clone_from(&config.env_file);

    if env_file.matches_source() {
        info!("Env file already up to date");
    } else {
        env_file.write_atomic(&config.env_file)?;
        report.written = true;
        info!(
            added = report.added.len(),
            updated = report.updated.len(),
            retained = report.retained.len(),
            "Env file updated"
        );
    }

    Ok(report)
}

/// Apply `bundle` on top of `env_file`: remote values win, local-only keys stay.
///
/// # Errors
///
/// Returns [`EnvFileError::InvalidEntry`] for a remote entry that cannot be
/// written as a `KEY=VALUE` line. `env_file` may be partly merged by then
/// and must not be persisted.
pub fn merge(
    env_file: &mut EnvFile,
    bundle: &SecretBundle,
) -> std::result::Result<SyncReport, EnvFileError> {
    let mut report = SyncReport {
        retained: env_file
            .keys()
            .filter(|key| !bundle.contains(key))
            .map(str::to_string)
            .collect(),
        ..SyncReport::default()
    };

    for (key, secret) in bundle.iter() {
        match env_file.insert(key, secret.expose())? {
            None => report.added.push(key.to_string()),
            Some(previous) if previous == secret.expose() => {
                report.unchanged.push(key.to_string());
            }
            Some(_) => report.updated.push(key.to_string()),
        }
    }

    debug!(
        added = ?report.added,
        updated = ?report.updated,
        retained = report.retained.len(),
        "Merged secret bundle"
    );
    Ok(report)
}

fn load_existing(path: &Path) -> EnvFile {
    match EnvFile::load(path) {
        Ok(file) => file,
        Err(e) if e.is_not_found() => {
            debug!(path = %path.display(), "No existing env file, starting empty");
            EnvFile::new()
        }
        Err(e) => {
            warn!(error = %e, "Could not read existing env file, starting empty");
            EnvFile::new()
        }
    }
}
