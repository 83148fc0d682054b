use std::path::{Component, Path, PathBuf};

use serde_json::Value;

use crate::error::ProviderError;
use crate::provider::{Provider, ProviderContext};
use crate::providers::{CONFIG_TREES_KEY, is_protected, unquote};

/// Values from config trees: directories (typically mounted config maps or
/// secrets) where each file is named after a key and holds its value.
///
/// The directories come from [`CONFIG_TREES_KEY`], itself resolved through
/// the chain, and are searched in order.
pub struct ConfigTrees;

impl ConfigTrees {
    pub const PRIORITY: i32 = 6000;
}

impl Provider for ConfigTrees {
    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn description(&self) -> &str {
        "From config tree directories (a.k.a. Volume mounted ConfigMaps/Secrets)"
    }

    fn get(&self, key: &str, ctx: &ProviderContext<'_>) -> Result<Option<Value>, ProviderError> {
        if is_protected(key) {
            return Ok(None);
        }
        let Some(trees) = ctx.lookup(CONFIG_TREES_KEY) else {
            return Ok(None);
        };

        let Some(name) = entry_name(key) else {
            return Ok(None);
        };

        for tree in trees.into_list() {
            let entry = PathBuf::from(tree).join(name);
            if !entry.is_file() {
                continue;
            }
            let content = std::fs::read_to_string(&entry).map_err(|e| ProviderError::Io {
                path: entry.clone(),
                source: e,
            })?;
            return Ok(Some(unquote(Value::String(content))));
        }
        Ok(None)
    }
}

/// `key` as a path relative to a tree, or `None` if it has anything but
/// plain name components and could leave the tree.
fn entry_name(key: &str) -> Option<&Path> {
    let path = Path::new(key);
    path.components()
        .all(|c| matches!(c, Component::Normal(_)))
        .then_some(path)
}
