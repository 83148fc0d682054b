//! The resolution engine: walk providers in priority order and return the
//! first value found.
//!
//! For each provider, highest priority first:
//!
//! 1. Skip the provider if `(key, provider)` is already being resolved
//!    further up the call stack (a placeholder or a provider's own lookup led
//!    back here).
//! 2. Push `(key, provider)`.
//! 3. Take the provider's cached answer, or call `get`, normalize the raw
//!    value, expand placeholders and cache the result, misses included.
//! 4. Return the first defined answer; later providers are not consulted.
//!
//! Nothing here returns an error. Provider failures become misses, unknown
//! placeholders stay verbatim and cycles are cut by step 1.

use serde_json::Value;

use crate::builder::ResolverBuilder;
use crate::cache::{Cache, Verbosity};
use crate::interpolate;
use crate::provider::{CallStack, Frame, Provider, ProviderContext};
use crate::providers::Defaults;
use crate::registry::{ProviderHolder, ProviderRegistry};
use crate::types::{ProviderId, ProviderInfo, Resolved};

/// A self-contained resolution context: providers, their caches and the
/// common cache.
///
/// Lookups take `&self` and may run concurrently. Registration takes
/// `&mut self` and therefore cannot overlap a lookup.
pub struct Resolver {
    registry: ProviderRegistry,
    common: Cache,
    verbosity: Verbosity,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    /// A resolver whose only provider is the defaults sink.
    pub fn new() -> Self {
        let mut resolver = Self::empty(false);
        resolver.register(Defaults);
        resolver
    }

    /// A builder for a resolver with the standard provider chain.
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    /// The standard provider chain reading this process's arguments,
    /// environment and directories.
    pub fn from_process() -> Self {
        ResolverBuilder::new().build()
    }

    pub(crate) fn empty(verbose: bool) -> Self {
        let verbosity = Verbosity::new(verbose);
        Self {
            registry: ProviderRegistry::default(),
            common: Cache::new(verbosity.clone()),
            verbosity,
        }
    }

    /// Register a provider. It is slotted in by priority; among equal
    /// priorities, earlier registrations are consulted first.
    pub fn register<P: Provider + 'static>(&mut self, provider: P) -> ProviderId {
        self.register_boxed(Box::new(provider))
    }

    pub fn register_boxed(&mut self, provider: Box<dyn Provider>) -> ProviderId {
        if self.verbose() {
            tracing::debug!(
                priority = provider.priority(),
                description = provider.description(),
                "registering provider"
            );
        }
        self.registry.register(provider, self.verbosity.clone())
    }

    /// Resolve `key` to the first value any provider has for it.
    pub fn lookup(&self, key: &str) -> Option<Resolved> {
        self.resolve(key, CallStack::EMPTY)
    }

    /// Store a fallback value, served by the lowest-priority defaults
    /// provider.
    ///
    /// The defaults provider's cached answer for `key` is dropped so that an
    /// earlier miss does not hide the new default. Other providers keep
    /// theirs, and values that were interpolated from `key` keep their old
    /// expansion until [`clear_cache`](Self::clear_cache).
    pub fn set_default(&self, key: &str, value: impl Into<Value>) {
        self.common.insert(key, value.into());
        for holder in self.registry.iter() {
            if holder.provider.serves_defaults() {
                holder.evict(key);
            }
        }
    }

    /// Forget everything cached: every provider's answers and scratch data,
    /// and the common cache. Defaults are stored in the common cache and are
    /// dropped too.
    pub fn clear_cache(&self) {
        for holder in self.registry.iter() {
            holder.clear();
        }
        self.common.clear();
    }

    pub fn set_verbose_logging(&self, enabled: bool) {
        self.verbosity.set(enabled);
    }

    pub(crate) fn verbose(&self) -> bool {
        self.verbosity.enabled()
    }

    /// Registered providers in lookup order.
    pub fn list_providers(&self) -> Vec<ProviderInfo> {
        self.registry.iter().map(ProviderHolder::info).collect()
    }

    pub fn common_cache(&self) -> &Cache {
        &self.common
    }

    #[cfg(test)]
    pub(crate) fn registry_for_tests(&self) -> impl Iterator<Item = &ProviderHolder> {
        self.registry.iter()
    }

    pub(crate) fn resolve(&self, key: &str, stack: CallStack<'_>) -> Option<Resolved> {
        for holder in self.registry.iter() {
            if stack.contains(key, holder.id) {
                continue;
            }
            let frame = Frame::new(key, holder.id, stack);
            let stack = CallStack::push(&frame);

            let value = match holder.cached(key) {
                Some(cached) => cached,
                None => {
                    let computed = self.compute(holder, key, stack);
                    holder.store(key, computed.clone());
                    computed
                }
            };

            if let Some(value) = value {
                if self.verbose() {
                    tracing::debug!(
                        key,
                        provider = holder.provider.description(),
                        value = %value,
                        "resolved"
                    );
                }
                return Some(value);
            }
        }

        if self.verbose() {
            tracing::debug!(key, "no provider has a value");
        }
        None
    }

    fn compute(&self, holder: &ProviderHolder, key: &str, stack: CallStack<'_>) -> Option<Resolved> {
        let ctx = ProviderContext {
            resolver: self,
            stack,
            cache: &holder.cache,
        };
        let raw = match holder.provider.get(key, &ctx) {
            Ok(raw) => raw?,
            Err(e) => {
                if self.verbose() {
                    tracing::warn!(
                        key,
                        provider = holder.provider.description(),
                        error = %e,
                        "provider failed"
                    );
                }
                return None;
            }
        };
        let normalized = normalize(raw)?;
        Some(interpolate::interpolate(normalized, self.verbose(), |name| {
            self.resolve(name, stack)
        }))
    }
}

/// Map a provider's raw value onto [`Resolved`].
///
/// - strings stay text
/// - arrays whose first element is a string become lists, with any later
///   non-string elements rendered as JSON text
/// - any other array becomes an empty list
/// - `null` is no value
/// - objects, numbers and booleans become canonical (compact, key-sorted)
///   JSON text
pub(crate) fn normalize(raw: Value) -> Option<Resolved> {
    match raw {
        Value::Null => None,
        Value::String(s) => Some(Resolved::Text(s)),
        Value::Array(items) => match items.first() {
            Some(Value::String(_)) => Some(Resolved::List(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            )),
            _ => Some(Resolved::List(Vec::new())),
        },
        other => Some(Resolved::Text(other.to_string())),
    }
}
