//! The standard providers and the conventions they share.
//!
//! | Priority | Provider | Source |
//! |---|---|---|
//! | 11000 | [`JsonFile::devtools`] | `~/.config-chain-devtools.json` |
//! | 10000 | [`CommandLine`] | `--key=value` |
//! | 9000 | [`CommandLineJson`] | `--application.json=<json>` |
//! | 8000 | [`EnvironmentJson`] | `APPLICATION_JSON` |
//! | 7000 | [`EnvironmentVariables`] | `KEY_NAME` per [`mangle_env_key`] |
//! | 6000 | [`ConfigTrees`] | `{tree}/{key}` |
//! | 5000 | [`JsonFile::profile_config`] | `{cwd}/config/application-{profile}.json` |
//! | 4000 | [`JsonFile::profile`] | `{cwd}/application-{profile}.json` |
//! | 3000 | [`JsonFile::application_config`] | `{cwd}/config/application.json` |
//! | 2000 | [`JsonFile::application`] | `{cwd}/application.json` |
//! | 1000 | [`JsonFile::packaged`] | `{app root}/application.json` |
//! | -100 | [`Defaults`] | [`Resolver::set_default`](crate::Resolver::set_default) |

mod command_line;
mod config_trees;
mod defaults;
mod environment;
mod json_file;

pub use command_line::{CommandLine, CommandLineJson};
pub use config_trees::ConfigTrees;
pub use defaults::Defaults;
pub use environment::{
    APPLICATION_JSON_VAR, EnvironmentJson, EnvironmentVariables, mangle_env_key,
};
pub use json_file::{APPLICATION_FILE, DEVTOOLS_FILE, JsonFile};

use std::path::Path;

use serde_json::Value;

use crate::error::ProviderError;

/// Directories scanned by [`ConfigTrees`].
pub const CONFIG_TREES_KEY: &str = "config.chain.config.trees";

/// Active profile(s); the last one selects `application-{profile}.json`.
pub const ACTIVE_PROFILES_KEY: &str = "config.chain.profiles.active";

/// Keys that configure the providers themselves. Providers whose behavior
/// depends on one of these never answer for them.
pub const PROTECTED_KEYS: [&str; 2] = [CONFIG_TREES_KEY, ACTIVE_PROFILES_KEY];

pub fn is_protected(key: &str) -> bool {
    PROTECTED_KEYS.contains(&key)
}

/// Strip one layer of matching `"` or `'` quotes from a string value; a lone
/// quote character becomes the empty string. An unquoted string containing
/// `,` is split into a list. Other values pass through untouched.
pub fn unquote(value: Value) -> Value {
    let Value::String(s) = value else {
        return value;
    };

    for quote in ['"', '\''] {
        if s.starts_with(quote) && s.ends_with(quote) {
            let inner = s.get(1..s.len() - 1).unwrap_or_default();
            return Value::String(inner.to_string());
        }
    }

    if s.contains(',') {
        return Value::Array(s.split(',').map(|part| Value::String(part.to_string())).collect());
    }
    Value::String(s)
}

/// Read and parse a JSON document. A missing file is `Ok(None)`.
pub fn read_json_file(path: &Path) -> Result<Option<Value>, ProviderError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ProviderError::Io {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    parse_json(&content, &path.display().to_string()).map(Some)
}

pub(crate) fn parse_json(content: &str, origin: &str) -> Result<Value, ProviderError> {
    serde_json::from_str(content).map_err(|e| ProviderError::Json {
        origin: origin.to_string(),
        source: e,
    })
}

/// Look `key` up as a top-level member of a JSON document.
pub(crate) fn member(doc: Option<Value>, key: &str) -> Option<Value> {
    doc.and_then(|doc| doc.get(key).cloned()).map(unquote)
}
