//! Session spec types for sesh.
//!
//! This module defines the data structures that map to a session spec
//! document. A spec is a tree: one session, its windows, and each window's
//! panes. The same shape is accepted as YAML or TOML.
//!
//! # Spec Format
//!
//! ```yaml
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
//!       - command: journalctl -f
//! ```
//!
//! The model only checks shape. Whether a spec can actually be built (at
//! least one window, at least one pane per window) is checked by
//! [`crate::builder::validate`].

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// Document syntax of a spec file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    #[default]
    Yaml,
    Toml,
}

impl SpecFormat {
    /// Pick the format from a file extension.
    ///
    /// `.toml` is TOML; anything else, including no extension, is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => SpecFormat::Toml,
            _ => SpecFormat::Yaml,
        }
    }
}

/// A single pane: a command to run and where to run it.
///
/// # Example
///
/// ```yaml
/// command: npm run dev
/// path: ~/src/web
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Pane {
    /// Shell text sent to the pane. May be empty.
    pub command: String,
    /// Working directory. Absent or empty means inherit.
    #[serde(default)]
    pub path: Option<String>,
}

impl Pane {
    /// The working directory, treating an empty string as unset.
    pub fn dir(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.is_empty())
    }
}

/// A window and the panes it is split into.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Window {
    /// Window name shown in the status line. May be empty.
    #[serde(default)]
    pub name: String,
    /// tmux layout name (`tiled`, `even-horizontal`, ...).
    #[serde(default)]
    pub layout: Option<String>,
    /// Panes in creation order.
    pub panes: Vec<Pane>,
}

impl Window {
    /// The layout to apply, treating an empty string as unset.
    pub fn layout(&self) -> Option<&str> {
        self.layout.as_deref().filter(|l| !l.is_empty())
    }
}

/// Root of a spec document.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SessionSpecification {
    /// Session name. tmux rejects names already in use.
    pub session: String,
    /// Windows in creation order.
    pub windows: Vec<Window>,
}

impl SessionSpecification {
    /// Parse a spec from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse a spec from a TOML string.
    ///
    /// ```toml
    /// session = "work"
    ///
    /// [[windows]]
    /// name = "dev"
    /// panes = [{ command = "nvim", path = "~/src/app" }]
    /// ```
    pub fn from_toml_str(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Parse a spec in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SeshError::ParseYaml`] or [`crate::SeshError::ParseToml`]
    /// if the document is malformed or doesn't match the expected structure.
    pub fn parse(contents: &str, format: SpecFormat) -> Result<Self> {
        let spec = match format {
            SpecFormat::Yaml => Self::from_yaml_str(contents)?,
            SpecFormat::Toml => Self::from_toml_str(contents)?,
        };
        Ok(spec)
    }

    /// Total number of panes across all windows.
    pub fn pane_count(&self) -> usize {
        self.windows.iter().map(|w| w.panes.len()).sum()
    }
}
