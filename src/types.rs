use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A normalized configuration value.
///
/// Absence is expressed as `Option<Resolved>::None` by
/// [`Resolver::lookup`](crate::Resolver::lookup).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Resolved {
    /// A single string. Objects, numbers and booleans arrive here as
    /// canonical JSON text.
    Text(String),
    /// A list of strings. May be empty.
    List(Vec<String>),
}

impl Resolved {
    /// The text, or `None` for a list.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Resolved::Text(s) => Some(s),
            Resolved::List(_) => None,
        }
    }

    /// The items, or `None` for text.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Resolved::Text(_) => None,
            Resolved::List(items) => Some(items),
        }
    }

    /// Converts to a list: text becomes a one-element list.
    pub fn into_list(self) -> Vec<String> {
        match self {
            Resolved::Text(s) => vec![s],
            Resolved::List(items) => items,
        }
    }

    /// The last element of a list, or the text itself.
    pub fn last(&self) -> Option<&str> {
        match self {
            Resolved::Text(s) => Some(s),
            Resolved::List(items) => items.last().map(String::as_str),
        }
    }
}

/// Text renders as-is; lists render comma-joined. This is also the form a
/// value takes when substituted into a `${...}` placeholder.
impl fmt::Display for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Text(s) => f.write_str(s),
            Resolved::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<&str> for Resolved {
    fn from(s: &str) -> Self {
        Resolved::Text(s.to_string())
    }
}

impl From<String> for Resolved {
    fn from(s: String) -> Self {
        Resolved::Text(s)
    }
}

impl From<Vec<String>> for Resolved {
    fn from(items: Vec<String>) -> Self {
        Resolved::List(items)
    }
}

/// Identity of a registered provider, assigned in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProviderId(pub(crate) usize);

/// Diagnostic view of a registered provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    pub id: ProviderId,
    pub priority: i32,
    pub description: String,
}

/// A base directory a provider reads from, resolved lazily at lookup time.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// Current working directory.
    Cwd,
    /// The user's home directory.
    Home,
    /// The application root: nearest ancestor of the working directory that
    /// contains `Cargo.toml`, falling back to the executable's directory.
    AppRoot,
    /// An explicit path.
    Path(PathBuf),
}
