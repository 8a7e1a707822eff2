//! # Sesh
//!
//! Declaratively launch tmux sessions from a YAML (or TOML) spec.
//!
//! A spec names a session and lists its windows; each window lists its
//! panes with a startup command and an optional working directory. Sesh
//! turns that tree into the ordered tmux commands that create it:
//! `new-session`, `new-window`, `split-window`, `send-keys` and
//! `select-layout`.
//!
//! ## Quick Example
//!
//! ```yaml
//! # ~/.config/sesh/work.yaml
//! session: work
//! windows:
//!   - name: dev
//!     layout: even-horizontal
//!     panes:
//!       - command: nvim
//!         path: ~/src/app
//!       - command: cargo watch -x test
//!         path: ~/src/app
//!   - name: logs
//!     panes:
//!       - command: tail -f /var/log/app.log
//! ```
//!
//! ```no_run
//! use sesh::{loader, SessionBuilder, Tmux};
//!
//! let spec = loader::load_spec(&loader::resolve_spec_path("work"))?;
//! SessionBuilder::new(Tmux::new()).build(&spec)?;
//! # Ok::<(), sesh::SeshError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`spec`]: spec data structures and parsing
//! - [`builder`]: turns a spec into tmux calls
//! - [`tmux`]: the [`Multiplexer`] trait and the `tmux` client
//! - [`loader`]: spec file discovery and loading
//! - [`cli`]: command-line argument parsing with clap
//! - [`error`]: error types

pub mod builder;
pub mod cli;
pub mod error;
pub mod loader;
pub mod spec;
pub mod tmux;

pub use builder::SessionBuilder;
pub use error::{BuildError, Result, SeshError, Step, TmuxError};
pub use spec::{Pane, SessionSpecification, SpecFormat, Window};
pub use tmux::{Multiplexer, PaneTarget, Tmux, WindowTarget};
