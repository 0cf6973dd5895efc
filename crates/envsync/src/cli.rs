use crate::error::SyncError;
use crate::sync::SyncReport;
use crate::tracing::{LogLevel, TracingFormat};
use clap::Parser;
use miette::Report;
use std::io::{self, Write};

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// Configuration error exit code (also used by clap for bad flags)
pub const EXIT_CONFIG: i32 = 2;
/// Authentication, remote or file error exit code
pub const EXIT_SYNC: i32 = 3;

/// Merge secrets from HashiCorp Vault into the local `.env` file.
///
/// Reads VAULT_ADDR, VAULT_TOKEN, VAULT_NAMESPACE, APPLICATION and
/// ENVIRONMENT from the environment, fetches
/// `secret/data/ai-assistant/<ENVIRONMENT>/<APPLICATION>/` and writes the
/// merged result to `.env` in the current directory.
#[derive(Parser, Debug)]
#[command(name = "envsync")]
#[command(version)]
pub struct Cli {
    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    /// Log output format.
    #[arg(
        long = "log-format",
        help = "Set log output format",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,
}

/// Parse command-line arguments, exiting on `--help`, `--version` or bad flags
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Map a sync error to the process exit code
#[must_use]
pub const fn exit_code_for(err: &SyncError) -> i32 {
    match err {
        SyncError::Configuration { .. } => EXIT_CONFIG,
        SyncError::Authentication { .. }
        | SyncError::SecretNotFound { .. }
        | SyncError::Remote { .. }
        | SyncError::InvalidSecret { .. }
        | SyncError::Io { .. } => EXIT_SYNC,
    }
}

/// Render an error as a miette report on stderr
pub fn render_error(err: SyncError) {
    let report = Report::new(err);
    eprintln!("{report:?}");
    // Ensure output is flushed before process exit
    let _ = io::stderr().flush();
}

/// One-line summary of a successful run
#[must_use]
pub fn summary(report: &SyncReport) -> String {
    let path = report.path.display();
    if report.written {
        format!(
            "Synced {} secret(s) into {path} ({} added, {} updated, {} local kept)",
            report.remote_count(),
            report.added.len(),
            report.updated.len(),
            report.retained.len()
        )
    } else {
        format!("{path} is up to date ({} secret(s))", report.remote_count())
    }
}
