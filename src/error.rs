//! Error types for sesh.
//!
//! [`SeshError`] is what the binary reports. It wraps input and parse
//! failures from loading a spec, and [`BuildError`] from the session builder.
//! [`TmuxError`] describes a single failed tmux invocation.

use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// All errors that can end a sesh run.
#[derive(Error, Debug)]
pub enum SeshError {
    /// Spec file does not exist.
    #[error("failed to open spec: {} not found", .0.display())]
    SpecNotFound(PathBuf),

    /// Spec file exists but could not be read.
    #[error("failed to read spec {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML document is malformed or does not match the schema.
    #[error("failed to parse YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    /// TOML document is malformed or does not match the schema.
    #[error("failed to parse TOML: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// Building the session failed.
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Errors from [`crate::builder::SessionBuilder::build`].
#[derive(Error, Debug)]
pub enum BuildError {
    /// The spec parsed but cannot be realized (no windows, no panes, ...).
    #[error("invalid spec: {0}")]
    InvalidSpec(String),

    /// A tmux invocation failed. No later invocation was issued.
    #[error("failed to {step}: {source}")]
    Step {
        step: Step,
        #[source]
        source: TmuxError,
    },
}

impl BuildError {
    /// The build step that failed, if the error came from tmux.
    pub fn step(&self) -> Option<&Step> {
        match self {
            BuildError::Step { step, .. } => Some(step),
            BuildError::InvalidSpec(_) => None,
        }
    }
}

/// The logical build step an invocation belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Session name.
    CreateSession(String),
    /// Window name.
    CreateWindow(String),
    /// Window target the split was issued against.
    SplitPane(String),
    /// Pane target the command was sent to.
    SendCommand(String),
    /// Window target the layout was applied to.
    SelectLayout(String),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::CreateSession(s) => write!(f, "create session {}", s),
            Step::CreateWindow(w) => write!(f, "create window {}", w),
            Step::SplitPane(t) => write!(f, "split pane in window {}", t),
            Step::SendCommand(t) => write!(f, "send command to pane {}", t),
            Step::SelectLayout(t) => write!(f, "set layout for window {}", t),
        }
    }
}

/// A single tmux invocation that could not be started or exited non-zero.
#[derive(Error, Debug)]
pub enum TmuxError {
    /// The tmux program could not be spawned.
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// tmux ran and reported failure.
    #[error("tmux {} exited with {status}{}", .args.join(" "), stderr_suffix(.stderr))]
    Failed {
        args: Vec<String>,
        status: ExitStatus,
        /// Captured diagnostic output, trimmed.
        stderr: String,
    },

    /// Failure reported by a non-process multiplexer.
    #[error("{0}")]
    Other(String),
}

/// Captured stderr folded onto one line, so errors print as a single line.
fn stderr_suffix(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        String::new()
    } else {
        format!(": {}", lines.join("; "))
    }
}

/// Convenient Result type alias for sesh operations.
pub type Result<T> = std::result::Result<T, SeshError>;
