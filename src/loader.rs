//! Spec file discovery and loading.
//!
//! A spec is given on the command line either as a path or as a bare name.
//! Bare names are looked up in the spec directories, in order:
//!
//! 1. `$XDG_CONFIG_HOME/sesh/`
//! 2. `~/.config/sesh/`
//! 3. Platform default (e.g., `~/Library/Application Support/sesh` on macOS)
//!
//! Within a directory, `<name>.yaml`, `<name>.yml` and `<name>.toml` are
//! tried in that order.

use crate::error::{Result, SeshError};
use crate::spec::{SessionSpecification, SpecFormat};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions recognized as spec files, in lookup order.
pub const SPEC_EXTENSIONS: &[&str] = &["yaml", "yml", "toml"];

/// Directories searched for named specs, most specific first.
///
/// Directories that do not exist are still returned; callers skip them.
pub fn spec_dirs() -> Vec<PathBuf> {
    let mut dirs_found = Vec::new();

    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            dirs_found.push(PathBuf::from(xdg).join("sesh"));
        }
    }

    if let Some(home) = dirs::home_dir() {
        dirs_found.push(home.join(".config").join("sesh"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        dirs_found.push(config_dir.join("sesh"));
    }

    dirs_found.dedup();
    dirs_found
}

/// True if `arg` is a plain name like `work` rather than a path.
fn is_bare_name(arg: &str) -> bool {
    let path = Path::new(arg);
    path.components().count() == 1 && path.extension().is_none()
}

/// Find `<name>.<ext>` in the first directory that has one.
pub fn find_named_spec(name: &str, search: &[PathBuf]) -> Option<PathBuf> {
    search.iter().find_map(|dir| {
        SPEC_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{}", name, ext)))
            .find(|p| p.is_file())
    })
}

/// Turn the command-line argument into the path of the spec to load.
///
/// An existing file is used as-is. A bare name that is not a file in the
/// current directory is looked up in [`spec_dirs`]. Anything else is
/// returned unchanged so that loading it reports the missing file.
pub fn resolve_spec_path(arg: &str) -> PathBuf {
    resolve_spec_path_in(arg, &spec_dirs())
}

/// [`resolve_spec_path`] with an explicit list of spec directories.
pub fn resolve_spec_path_in(arg: &str, search: &[PathBuf]) -> PathBuf {
    let path = PathBuf::from(arg);
    if path.is_file() || !is_bare_name(arg) {
        return path;
    }
    match find_named_spec(arg, search) {
        Some(found) => {
            debug!(name = arg, path = %found.display(), "resolved named spec");
            found
        }
        None => path,
    }
}

/// Load and parse a spec file. The format follows the file extension.
///
/// # Errors
///
/// - [`SeshError::SpecNotFound`] if the file doesn't exist
/// - [`SeshError::Read`] if reading fails
/// - [`SeshError::ParseYaml`] / [`SeshError::ParseToml`] if parsing fails
pub fn load_spec(path: &Path) -> Result<SessionSpecification> {
    if !path.exists() {
        return Err(SeshError::SpecNotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path).map_err(|source| SeshError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let format = SpecFormat::from_path(path);
    debug!(path = %path.display(), ?format, "loading spec");
    SessionSpecification::parse(&contents, format)
}

/// Names of all specs in the spec directories, sorted.
pub fn list_specs() -> Vec<String> {
    list_specs_in(&spec_dirs())
}

/// [`list_specs`] with an explicit list of spec directories.
pub fn list_specs_in(search: &[PathBuf]) -> Vec<String> {
    let mut names = BTreeSet::new();
    for dir in search {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let is_spec = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| SPEC_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)));
            if let (true, Some(stem)) = (is_spec, path.file_stem().and_then(|s| s.to_str())) {
                names.insert(stem.to_string());
            }
        }
    }
    names.into_iter().collect()
}
