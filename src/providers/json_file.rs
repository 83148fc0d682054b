use std::path::PathBuf;

use serde_json::Value;

use crate::error::ProviderError;
use crate::location::resolve_location;
use crate::provider::{Provider, ProviderContext};
use crate::providers::{ACTIVE_PROFILES_KEY, is_protected, member, read_json_file};
use crate::types::Location;

/// File name of the per-user developer overrides, relative to the home
/// directory.
pub const DEVTOOLS_FILE: &str = ".config-chain-devtools.json";

pub const APPLICATION_FILE: &str = "application.json";

enum FileName {
    /// A fixed path relative to the location.
    Fixed(PathBuf),
    /// `application-{profile}.json` in a directory relative to the location,
    /// where `profile` is the last active profile.
    Profile(PathBuf),
}

/// Values from the top-level members of a JSON object stored in a file.
///
/// The document is parsed once and kept in the provider's scratch cache. A
/// missing file is a miss and is looked for again on the next lookup; a
/// malformed one is a miss as well, logged in verbose mode.
pub struct JsonFile {
    priority: i32,
    description: String,
    location: Location,
    file: FileName,
}

impl JsonFile {
    /// A JSON file at `relative` under `location`.
    pub fn new(
        priority: i32,
        description: impl Into<String>,
        location: Location,
        relative: impl Into<PathBuf>,
    ) -> Self {
        Self {
            priority,
            description: description.into(),
            location,
            file: FileName::Fixed(relative.into()),
        }
    }

    fn profiled(
        priority: i32,
        description: &str,
        location: Location,
        dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            priority,
            description: description.to_string(),
            location,
            file: FileName::Profile(dir.into()),
        }
    }

    /// `~/.config-chain-devtools.json`, with `location` normally [`Location::Home`].
    pub fn devtools(location: Location) -> Self {
        Self::new(11000, "From ~/.config-chain-devtools.json", location, DEVTOOLS_FILE)
    }

    /// `{location}/config/application-{profile}.json`
    pub fn profile_config(location: Location) -> Self {
        Self::profiled(
            5000,
            "From application profile property json files in ${CWD}/config",
            location,
            "config",
        )
    }

    /// `{location}/application-{profile}.json`
    pub fn profile(location: Location) -> Self {
        Self::profiled(
            4000,
            "From application profile property json files in ${CWD}",
            location,
            "",
        )
    }

    /// `{location}/config/application.json`
    pub fn application_config(location: Location) -> Self {
        Self::new(
            3000,
            "From application property json files in ${CWD}/config",
            location,
            PathBuf::from("config").join(APPLICATION_FILE),
        )
    }

    /// `{location}/application.json`
    pub fn application(location: Location) -> Self {
        Self::new(
            2000,
            "From application property json files in ${CWD}",
            location,
            APPLICATION_FILE,
        )
    }

    /// `{location}/application.json`, with `location` normally
    /// [`Location::AppRoot`].
    pub fn packaged(location: Location) -> Self {
        Self::new(
            1000,
            "From application property json files packaged with the app",
            location,
            APPLICATION_FILE,
        )
    }

    /// The file to read for `key`, relative to the location. `None` when a
    /// profile file is wanted but no profile is active, or `key` is protected.
    fn relative_path(&self, key: &str, ctx: &ProviderContext<'_>) -> Option<PathBuf> {
        match &self.file {
            FileName::Fixed(relative) => Some(relative.clone()),
            FileName::Profile(dir) => {
                if is_protected(key) {
                    return None;
                }
                let profiles = ctx.lookup(ACTIVE_PROFILES_KEY)?;
                let profile = profiles.last().filter(|p| !p.is_empty())?;
                Some(dir.join(format!("application-{profile}.json")))
            }
        }
    }
}

impl Provider for JsonFile {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn get(&self, key: &str, ctx: &ProviderContext<'_>) -> Result<Option<Value>, ProviderError> {
        let Some(relative) = self.relative_path(key, ctx) else {
            return Ok(None);
        };
        let Some(base) = resolve_location(&self.location, ctx.common()) else {
            return Ok(None);
        };
        let path = base.join(relative);
        let doc = ctx
            .cache()
            .compute_if_absent(&path.to_string_lossy(), || read_json_file(&path));
        Ok(member(doc, key))
    }
}
