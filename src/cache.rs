//! Key/value caches shared between the engine and providers.
//!
//! A [`Cache`] maps string keys to raw JSON values. Every registered provider
//! owns one (its scratch cache) and all providers share a common one for
//! cross-cutting values such as the working directory, plus the defaults set
//! through [`Resolver::set_default`](crate::Resolver::set_default).
//!
//! The lock is only held for the duration of a single map operation, never
//! while a compute function runs. Compute functions are free to reenter the
//! resolver, which may touch the same cache again.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::ProviderError;

/// Shared on/off switch for verbose logging.
#[derive(Debug, Clone, Default)]
pub struct Verbosity(Arc<AtomicBool>);

impl Verbosity {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }
}

#[derive(Debug, Default)]
pub struct Cache {
    entries: Mutex<HashMap<String, Value>>,
    verbosity: Verbosity,
}

impl Cache {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            verbosity,
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.lock().get(key).cloned()
    }

    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.entries.lock().insert(key.into(), value);
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.entries.lock().remove(key)
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Return the cached value for `key`, computing it with `compute` if absent.
    ///
    /// Errors from `compute` are swallowed and only logged in verbose mode.
    /// Only truthy results are stored (see [`is_truthy`]): `null`, `""`, `0`
    /// and `false` are returned but not cached, so a source that is missing
    /// now is consulted again on the next call.
    pub fn compute_if_absent<F>(&self, key: &str, compute: F) -> Option<Value>
    where
        F: FnOnce() -> Result<Option<Value>, ProviderError>,
    {
        if let Some(value) = self.get(key)
            && is_truthy(&value)
        {
            return Some(value);
        }

        let value = match compute() {
            Ok(value) => value,
            Err(e) => {
                if self.verbosity.enabled() {
                    tracing::warn!(key, error = %e, "failed to compute value");
                }
                None
            }
        };

        match value {
            Some(v) if is_truthy(&v) => {
                if self.verbosity.enabled() {
                    tracing::debug!(key, value = %v, "computed value");
                }
                self.insert(key, v.clone());
                Some(v)
            }
            other => other,
        }
    }
}

/// Whether a value counts as present for caching purposes.
///
/// `null`, the empty string, zero and `false` are falsy. Arrays and objects
/// are truthy even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    fn cache() -> Cache {
        Cache::new(Verbosity::new(false))
    }

    #[test]
    fn computes_once_then_serves_cached() {
        let cache = cache();
        let calls = Cell::new(0);
        for _ in 0..3 {
            let v = cache.compute_if_absent("k", || {
                calls.set(calls.get() + 1);
                Ok(Some(json!("v")))
            });
            assert_eq!(v, Some(json!("v")));
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn falsy_results_are_not_cached() {
        let cache = cache();
        for falsy in [json!(null), json!(""), json!(0), json!(false)] {
            let calls = Cell::new(0);
            for _ in 0..2 {
                cache.compute_if_absent("k", || {
                    calls.set(calls.get() + 1);
                    Ok(Some(falsy.clone()))
                });
            }
            assert_eq!(calls.get(), 2, "{falsy} should not be cached");
        }
        assert!(cache.is_empty());
    }

    #[test]
    fn none_is_retried() {
        let cache = cache();
        assert_eq!(cache.compute_if_absent("k", || Ok(None)), None);
        let v = cache.compute_if_absent("k", || Ok(Some(json!("later"))));
        assert_eq!(v, Some(json!("later")));
    }

    #[test]
    fn errors_are_swallowed() {
        let cache = Cache::new(Verbosity::new(true));
        let v = cache.compute_if_absent("k", || Err(ProviderError::Other("boom".into())));
        assert_eq!(v, None);
        assert!(cache.is_empty());
    }

    #[test]
    fn empty_containers_are_truthy() {
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!(0.5)));
        assert!(!is_truthy(&json!(0.0)));
    }

    #[test]
    fn clear_empties_cache() {
        let cache = cache();
        cache.insert("a", json!(1));
        cache.insert("b", json!(2));
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn verbosity_is_shared_between_clones() {
        let v = Verbosity::new(false);
        let other = v.clone();
        other.set(true);
        assert!(v.enabled());
    }
}
