//! Error taxonomy for a sync run

use envsync_envfile::EnvFileError;
use envsync_secrets::SecretError;
use miette::Diagnostic;
use thiserror::Error;

/// Everything that can end a sync run.
///
/// Every variant is fatal. Except where noted, the env file on disk is left
/// exactly as it was before the run.
#[derive(Error, Debug, Diagnostic)]
pub enum SyncError {
    /// Required configuration is missing or invalid. Raised before any
    /// network or file work.
    #[error("Configuration error: {message}")]
    #[diagnostic(code(envsync::config))]
    Configuration {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },

    /// The secret store rejected the token or namespace
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(envsync::auth),
        help("Check VAULT_TOKEN and VAULT_NAMESPACE; the token may have expired")
    )]
    Authentication {
        /// Message reported by the store
        message: String,
    },

    /// Nothing exists at the configured secret path
    #[error("No secrets found at '{path}'")]
    #[diagnostic(
        code(envsync::not_found),
        help("Check ENVIRONMENT and APPLICATION; the path is data/ai-assistant/<ENVIRONMENT>/<APPLICATION>/")
    )]
    SecretNotFound {
        /// Full path that was read
        path: String,
    },

    /// Transport or protocol failure talking to the secret store
    #[error("Secret store error: {message}")]
    #[diagnostic(code(envsync::remote), help("Check VAULT_ADDR and network connectivity"))]
    Remote {
        /// Error message from the client
        message: String,
    },

    /// A remote key or value cannot be stored as a `KEY=VALUE` line
    #[error("Secret cannot be written to the env file: {source}")]
    #[diagnostic(code(envsync::invalid_secret))]
    InvalidSecret {
        /// The rejected entry
        #[source]
        source: EnvFileError,
    },

    /// The env file could not be written
    #[error("Failed to update env file: {source}")]
    #[diagnostic(
        code(envsync::io),
        help("Check file permissions and free disk space")
    )]
    Io {
        /// The underlying file error
        #[source]
        source: EnvFileError,
    },
}

impl SyncError {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            help: None,
        }
    }

    /// Create a configuration error with help text
    #[must_use]
    pub fn configuration_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Whether this is a configuration error
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

impl From<SecretError> for SyncError {
    fn from(err: SecretError) -> Self {
        match err {
            SecretError::Unauthenticated { message, .. } => Self::Authentication { message },
            SecretError::NotFound { path } => Self::SecretNotFound { path },
            SecretError::Remote { message, .. } => Self::Remote { message },
            SecretError::InvalidConfig { message } => Self::configuration_with_help(
                message,
                "VAULT_ADDR must be a full URL such as https://vault.example.com:8200",
            ),
        }
    }
}

impl From<EnvFileError> for SyncError {
    fn from(err: EnvFileError) -> Self {
        match err {
            EnvFileError::InvalidEntry { .. } => Self::InvalidSecret { source: err },
            EnvFileError::Io { .. } => Self::Io { source: err },
        }
    }
}

/// Result type for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
