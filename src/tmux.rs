//! Tmux session, window and pane operations.
//!
//! [`Multiplexer`] is the set of control calls the session builder needs.
//! [`Tmux`] implements it by running the `tmux` program once per call and
//! waiting for it to exit.
//!
//! # Targets
//!
//! Windows and panes are addressed by position: `session:window` and
//! `session:window.pane`, both 0-based. Targets are computed from the walk
//! position in [`crate::builder`], so they match the order creation
//! commands were issued in.

use crate::error::TmuxError;
use std::fmt;
use std::process::Command;
use tracing::{debug, warn};

/// Address of a window: `session:index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowTarget {
    pub session: String,
    pub index: usize,
}

impl WindowTarget {
    pub fn new(session: impl Into<String>, index: usize) -> Self {
        Self {
            session: session.into(),
            index,
        }
    }

    /// Address of pane `index` in this window.
    pub fn pane(&self, index: usize) -> PaneTarget {
        PaneTarget {
            window: self.clone(),
            index,
        }
    }
}

impl fmt::Display for WindowTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.session, self.index)
    }
}

/// Address of a pane: `session:window.index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneTarget {
    pub window: WindowTarget,
    pub index: usize,
}

impl fmt::Display for PaneTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.window, self.index)
    }
}

/// Control calls used to realize a session.
///
/// Every call blocks until the multiplexer has applied it.
pub trait Multiplexer {
    /// Create a detached session. This also creates window 0 and its pane 0.
    fn create_session(&mut self, session: &str, window_name: Option<&str>) -> Result<(), TmuxError>;

    /// Append a window to `session`. This also creates the window's pane 0.
    fn create_window(&mut self, session: &str, window_name: Option<&str>) -> Result<(), TmuxError>;

    /// Split the active pane of `window`, starting the new pane in `dir`.
    fn split_pane(&mut self, window: &WindowTarget, dir: Option<&str>) -> Result<(), TmuxError>;

    /// Type `text` into `pane` and press Enter.
    fn send_text(&mut self, pane: &PaneTarget, text: &str) -> Result<(), TmuxError>;

    /// Apply a named layout to `window`.
    fn select_layout(&mut self, window: &WindowTarget, layout: &str) -> Result<(), TmuxError>;
}

/// The `tmux` command-line client.
///
/// # Example
///
/// ```no_run
/// use sesh::tmux::{Multiplexer, Tmux};
///
/// let mut tmux = Tmux::new().verbose(true);
/// tmux.create_session("work", Some("editor"))?;
/// # Ok::<(), sesh::TmuxError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Tmux {
    program: String,
    socket: Option<String>,
    verbose: bool,
    dry_run: bool,
    /// Argument lists skipped by a dry run, in order.
    planned: Vec<Vec<String>>,
}

impl Default for Tmux {
    fn default() -> Self {
        Self {
            program: "tmux".to_string(),
            socket: None,
            verbose: false,
            dry_run: false,
            planned: Vec::new(),
        }
    }
}

impl Tmux {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different tmux executable.
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Talk to the tmux server on socket `name` (`tmux -L name`).
    pub fn socket(mut self, name: Option<String>) -> Self {
        self.socket = name;
        self
    }

    /// Print every invocation to stdout before running it.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Print every invocation and run nothing.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Invocations a dry run would have issued, without the program name.
    pub fn planned(&self) -> &[Vec<String>] {
        &self.planned
    }

    /// The line printed for an invocation: `tmux <args...>`.
    fn echo_line(&self, args: &[String]) -> String {
        format!("{} {}", self.program, args.join(" "))
    }

    /// Full argument list for a subcommand, including the socket option.
    fn command_args(&self, args: &[&str]) -> Vec<String> {
        let mut full = Vec::with_capacity(args.len() + 2);
        if let Some(ref socket) = self.socket {
            full.push("-L".to_string());
            full.push(socket.clone());
        }
        full.extend(args.iter().map(|a| a.to_string()));
        full
    }

    fn run(&mut self, args: &[&str]) -> Result<(), TmuxError> {
        let args = self.command_args(args);
        if self.verbose || self.dry_run {
            println!("{}", self.echo_line(&args));
        }
        if self.dry_run {
            self.planned.push(args);
            return Ok(());
        }

        debug!(program = %self.program, ?args, "running tmux");
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| TmuxError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(status = %output.status, %stderr, "tmux invocation failed");
            return Err(TmuxError::Failed {
                args,
                status: output.status,
                stderr,
            });
        }

        Ok(())
    }
}

impl Multiplexer for Tmux {
    fn create_session(&mut self, session: &str, window_name: Option<&str>) -> Result<(), TmuxError> {
        let mut args = vec!["new-session", "-d", "-s", session];
        if let Some(n) = window_name {
            args.push("-n");
            args.push(n);
        }
        self.run(&args)
    }

    fn create_window(&mut self, session: &str, window_name: Option<&str>) -> Result<(), TmuxError> {
        let mut args = vec!["new-window", "-t", session];
        if let Some(n) = window_name {
            args.push("-n");
            args.push(n);
        }
        self.run(&args)
    }

    fn split_pane(&mut self, window: &WindowTarget, dir: Option<&str>) -> Result<(), TmuxError> {
        let target = window.to_string();
        let mut args = vec!["split-window", "-t", target.as_str(), "-h"];
        if let Some(d) = dir {
            args.push("-c");
            args.push(d);
        }
        self.run(&args)
    }

    fn send_text(&mut self, pane: &PaneTarget, text: &str) -> Result<(), TmuxError> {
        let target = pane.to_string();
        self.run(&["send-keys", "-t", target.as_str(), text, "C-m"])
    }

    fn select_layout(&mut self, window: &WindowTarget, layout: &str) -> Result<(), TmuxError> {
        let target = window.to_string();
        self.run(&["select-layout", "-t", target.as_str(), layout])
    }
}
