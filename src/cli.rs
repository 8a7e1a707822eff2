//! Command-line interface for sesh.
//!
//! Parses arguments using clap and provides the [`Cli`] struct containing
//! all user-specified options.

use clap::Parser;

/// Command-line arguments for sesh.
///
/// # Examples
///
/// ```bash
/// # Launch the session described in a file
/// sesh work.yaml
///
/// # Launch ~/.config/sesh/work.yaml, printing each tmux command first
/// sesh --verbose work
///
/// # Show the tmux commands without running them
/// sesh --dry-run work.toml
/// ```
#[derive(Parser, Debug)]
#[command(name = "sesh")]
#[command(version)]
#[command(about = "Declaratively launch tmux sessions from a YAML spec")]
#[command(long_about = "Sesh creates a detached tmux session with the windows, panes,\n\
    working directories and startup commands described in a spec file.\n\n\
    Specs are YAML, or TOML when the file ends in `.toml`. A bare name is\n\
    looked up in ~/.config/sesh/.")]
pub struct Cli {
    /// Spec file, or the name of a spec in the spec directory.
    #[arg(value_name = "SPEC", required_unless_present = "list")]
    pub spec: Option<String>,

    /// Print each tmux command before running it.
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the tmux commands without running them.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// tmux server socket name (passed as `tmux -L`).
    #[arg(short = 'L', long, value_name = "NAME")]
    pub socket: Option<String>,

    /// List the named specs in the spec directories.
    #[arg(short, long)]
    pub list: bool,
}
