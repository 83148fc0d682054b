//! Resolution of [`Location`]s to concrete directories.
//!
//! `Cwd`, `Home` and `AppRoot` are computed at most once per cache
//! lifetime and shared through the resolver's common cache under
//! [`CWD_KEY`], [`HOME_KEY`] and [`APP_ROOT_KEY`]. A directory that cannot
//! be determined resolves to `None` and is retried on the next lookup.
//!
//! # Application root
//!
//! The application root is the nearest ancestor of the working directory
//! (inclusive) that contains [`APP_ROOT_MARKER`]. When no ancestor has one,
//! the directory holding the running executable is used instead.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::cache::Cache;
use crate::error::ProviderError;
use crate::types::Location;

pub const CWD_KEY: &str = "process.cwd";
pub const HOME_KEY: &str = "user.home";
pub const APP_ROOT_KEY: &str = "app.root";

pub const APP_ROOT_MARKER: &str = "Cargo.toml";

/// Resolve `location` to a directory, caching ambient ones in `common`.
pub fn resolve_location(location: &Location, common: &Cache) -> Option<PathBuf> {
    let cached = match location {
        Location::Path(p) => return Some(p.clone()),
        Location::Cwd => {
            common.compute_if_absent(CWD_KEY, || current_dir().map(|p| Some(path_value(p))))
        }
        Location::Home => common.compute_if_absent(HOME_KEY, || Ok(home_dir().map(path_value))),
        Location::AppRoot => common.compute_if_absent(APP_ROOT_KEY, || {
            let cwd = current_dir()?;
            Ok(find_app_root_from(&cwd).map(path_value))
        }),
    };
    cached.as_ref().and_then(Value::as_str).map(PathBuf::from)
}

fn current_dir() -> Result<PathBuf, ProviderError> {
    std::env::current_dir().map_err(|e| ProviderError::Io {
        path: PathBuf::from("."),
        source: e,
    })
}

fn home_dir() -> Option<PathBuf> {
    let user = directories::UserDirs::new()?;
    Some(user.home_dir().to_path_buf())
}

fn path_value(path: PathBuf) -> Value {
    Value::String(path.to_string_lossy().into_owned())
}

/// Walk from `start` toward the filesystem root and return the first
/// directory containing [`APP_ROOT_MARKER`], else the executable's directory.
pub fn find_app_root_from(start: &Path) -> Option<PathBuf> {
    find_marker_ancestor(start, APP_ROOT_MARKER).or_else(executable_dir)
}

/// The nearest ancestor of `start` (inclusive) containing an entry named
/// `marker`.
pub fn find_marker_ancestor(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).exists())
        .map(Path::to_path_buf)
}

fn executable_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}
