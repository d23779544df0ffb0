//! Storesync CLI entrypoint.
//!
//! This is the main entrypoint for the storesync command-line tool.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use storesync::cli::{Cli, Commands, DiffArgs, OutputFormatter};
use storesync::config::{ConfigParser, DiffOptions, find_config_file};
use storesync::diff::SectionSelection;
use storesync::error::Result;
use storesync::reconciler::Reconciler;
use storesync::source::{
    FileConfigurationStore, HttpRemoteAccessor, RemoteAccessor, SnapshotFileAccessor,
};

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit status when `--fail-on-changes` is set and changes were found.
const CHANGES_FOUND: u8 = 2;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_json);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<ExitCode> {
    let formatter = OutputFormatter::new(cli.output);
    let config_file = resolve_config_path(cli.config.as_ref())?;

    let store = FileConfigurationStore::new(&config_file);
    store.load_dotenv()?;

    let (args, introspect) = match cli.command {
        Commands::Diff(args) => (args, false),
        Commands::Introspect(args) => (args, true),
    };

    let options = build_options(&args)?;
    let remote = build_remote(&args)?;
    let reconciler = Reconciler::new(&store, &remote, options);

    let summary = if introspect {
        reconciler.compare_for_introspect().await?
    } else {
        reconciler.compare().await?
    };

    let output = if introspect {
        formatter.format_introspect(&summary)?
    } else {
        formatter.format_diff(&summary)?
    };
    println!("{output}");

    if args.fail_on_changes && summary.has_changes() {
        return Ok(ExitCode::from(CHANGES_FOUND));
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Resolves the configuration file path.
fn resolve_config_path(config_path: Option<&PathBuf>) -> Result<PathBuf> {
    config_path.map_or_else(|| find_config_file("."), |path| Ok(path.clone()))
}

/// Builds run options from the environment and command-line arguments.
fn build_options(args: &DiffArgs) -> Result<DiffOptions> {
    let selection = SectionSelection::new(args.include.clone(), args.exclude.clone())?;
    let mut options = DiffOptions::default()
        .with_env_overrides()?
        .with_selection(selection);

    if let Some(limit) = args.concurrency {
        options = options.with_concurrency_limit(limit);
    }
    if let Some(secs) = args.timeout_secs {
        options = options.with_remote_timeout(Duration::from_secs(secs));
    }

    debug!(
        "Options: concurrency {}, timeout {:?}",
        options.concurrency_limit, options.remote_timeout
    );
    Ok(options)
}

/// Creates the observed-side accessor.
fn build_remote(args: &DiffArgs) -> Result<Box<dyn RemoteAccessor>> {
    if let Some(path) = args.observed.as_deref() {
        return Ok(Box::new(SnapshotFileAccessor::new(path)));
    }

    let (url, token) = ConfigParser::remote_credentials(args.url.clone(), args.token.clone())?;
    Ok(Box::new(HttpRemoteAccessor::new(url, token)?))
}
