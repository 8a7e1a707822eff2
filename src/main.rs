//! Sesh CLI entry point.
//!
//! This binary provides the `sesh` command for launching a tmux session
//! from a spec file.

use clap::Parser;
use sesh::cli::Cli;
use sesh::error::Result;
use sesh::{SessionBuilder, Tmux, loader};
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default: warnings only).
fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
}

/// Main application logic.
fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.list {
        for name in loader::list_specs() {
            println!("{}", name);
        }
        return Ok(());
    }

    // clap enforces SPEC unless --list was given.
    let Some(ref arg) = cli.spec else {
        return Ok(());
    };

    let path = loader::resolve_spec_path(arg);
    let spec = loader::load_spec(&path)?;

    let tmux = Tmux::new()
        .socket(cli.socket.clone())
        .verbose(cli.verbose)
        .dry_run(cli.dry_run);
    SessionBuilder::new(tmux).build(&spec)?;

    Ok(())
}
