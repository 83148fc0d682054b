//! The provider contract and the context handed to providers.

use serde_json::Value;

use crate::cache::Cache;
use crate::error::ProviderError;
use crate::resolver::Resolver;
use crate::types::{ProviderId, Resolved};

/// A source of configuration values.
///
/// `get` returns the provider's raw value for `key`: `Ok(None)` (or
/// `Value::Null`) when the key is not known to this source. Returning an error
/// is reserved for a source that exists but cannot be read; the engine logs
/// it in verbose mode and falls through to the next provider.
///
/// Providers are assumed pure for the life of the cache: once the engine has
/// stored a provider's answer for a key, `get` is not called again for that
/// key until [`Resolver::clear_cache`].
pub trait Provider: Send + Sync {
    /// Higher priorities are consulted first.
    fn priority(&self) -> i32;

    fn description(&self) -> &str;

    fn get(&self, key: &str, ctx: &ProviderContext<'_>) -> Result<Option<Value>, ProviderError>;

    /// Whether this provider answers from the values stored by
    /// [`Resolver::set_default`]. Its cached answer for a key is dropped when
    /// a default is set for that key; every other provider's stays.
    fn serves_defaults(&self) -> bool {
        false
    }
}

/// What a provider can reach while answering a lookup.
pub struct ProviderContext<'a> {
    pub(crate) resolver: &'a Resolver,
    pub(crate) stack: CallStack<'a>,
    pub(crate) cache: &'a Cache,
}

impl ProviderContext<'_> {
    /// This provider's own scratch cache.
    pub fn cache(&self) -> &Cache {
        self.cache
    }

    /// The cache shared by every provider of the resolver.
    pub fn common(&self) -> &Cache {
        self.resolver.common_cache()
    }

    /// Resolve another key through the full chain.
    ///
    /// The in-progress lookups are carried along, so a provider that asks for
    /// a key it is itself currently resolving is skipped instead of recursing.
    pub fn lookup(&self, key: &str) -> Option<Resolved> {
        self.resolver.resolve(key, self.stack)
    }

    pub fn verbose(&self) -> bool {
        self.resolver.verbose()
    }
}

/// The `(key, provider)` pairs currently being resolved, innermost first.
///
/// Frames live on the Rust call stack and link to their parent, so a nested
/// resolution sees every enclosing one and a frame disappears as soon as the
/// call that pushed it returns.
#[derive(Clone, Copy, Default)]
pub(crate) struct CallStack<'a> {
    top: Option<&'a Frame<'a>>,
}

pub(crate) struct Frame<'a> {
    key: &'a str,
    provider: ProviderId,
    parent: CallStack<'a>,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(key: &'a str, provider: ProviderId, parent: CallStack<'a>) -> Self {
        Self {
            key,
            provider,
            parent,
        }
    }
}

impl CallStack<'static> {
    pub(crate) const EMPTY: Self = CallStack { top: None };
}

impl<'a> CallStack<'a> {
    pub(crate) fn push(frame: &'a Frame<'a>) -> Self {
        Self { top: Some(frame) }
    }

    pub(crate) fn contains(&self, key: &str, provider: ProviderId) -> bool {
        let mut current = self.top;
        while let Some(frame) = current {
            if frame.provider == provider && frame.key == key {
                return true;
            }
            current = frame.parent.top;
        }
        false
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.top;
        while let Some(frame) = current {
            depth += 1;
            current = frame.parent.top;
        }
        depth
    }
}

/// A provider backed by a closure.
pub struct FnProvider<F> {
    priority: i32,
    description: String,
    get: F,
}

/// Build a provider from a closure, for one-off sources such as a vault
/// client or a test stub.
pub fn from_fn<F>(priority: i32, description: impl Into<String>, get: F) -> FnProvider<F>
where
    F: Fn(&str, &ProviderContext<'_>) -> Result<Option<Value>, ProviderError> + Send + Sync,
{
    FnProvider {
        priority,
        description: description.into(),
        get,
    }
}

impl<F> Provider for FnProvider<F>
where
    F: Fn(&str, &ProviderContext<'_>) -> Result<Option<Value>, ProviderError> + Send + Sync,
{
    fn priority(&self) -> i32 {
        self.priority
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn get(&self, key: &str, ctx: &ProviderContext<'_>) -> Result<Option<Value>, ProviderError> {
        (self.get)(key, ctx)
    }
}
