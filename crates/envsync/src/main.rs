//! envsync CLI Application
//!
//! Merges the Vault secret bundle for the configured project, environment
//! and application into `.env` in the current directory.

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

use envsync::cli::{self, EXIT_OK, EXIT_SYNC, exit_code_for, render_error, summary};
use envsync::tracing::{TracingConfig, init_tracing};
use envsync::{Config, SyncReport};
use tracing::instrument;

/// Main entry point
fn main() {
    // NOTE: Using eprintln! in panic hook is intentional - tracing infrastructure
    // may be corrupted during a panic, so we use the most reliable output method.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();

    let tracing_config = TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("Warning: {e}");
    }

    let exit_code = run_with_tokio();
    std::process::exit(exit_code);
}

/// Create tokio runtime and run the sync
fn run_with_tokio() -> i32 {
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Fatal error: Failed to create tokio runtime: {e}");
            return EXIT_SYNC;
        }
    };

    rt.block_on(run())
}

#[instrument(name = "envsync")]
async fn run() -> i32 {
    match execute().await {
        Ok(report) => {
            println!("{}", summary(&report));
            EXIT_OK
        }
        Err(err) => {
            tracing::debug!(error = ?err, "Sync failed");
            let code = exit_code_for(&err);
            render_error(err);
            code
        }
    }
}

async fn execute() -> envsync::Result<SyncReport> {
    // Configuration is checked before any file or network access
    let config = Config::from_env()?;
    envsync::run(&config).await
}
