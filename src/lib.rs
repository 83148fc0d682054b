//! Priority-ordered configuration lookup. Ask for a key, get the first value
//! any registered provider has for it.
//!
//! ```no_run
//! use config_chain::Resolver;
//!
//! let resolver = Resolver::from_process();
//! if let Some(port) = resolver.lookup("server.port") {
//!     println!("listening on {port}");
//! }
//! ```
//!
//! That call walks the standard chain: developer overrides in the home
//! directory, `--key=value` arguments, inline JSON, environment variables,
//! config trees, profile and application JSON files, and finally defaults set
//! in code.
//!
//! # Providers
//!
//! A [`Provider`] answers "what is the value of this key?" from one source.
//! Each has a priority; a lookup asks providers from highest priority to
//! lowest and stops at the first one that has a value. Providers registered
//! with equal priority are asked in registration order.
//!
//! The standard providers live in [`providers`], with their priorities:
//!
//! ```text
//! 11000  ~/.config-chain-devtools.json
//! 10000  --key=value
//!  9000  --application.json={...}
//!  8000  APPLICATION_JSON={...}
//!  7000  KEY_NAME (dots to underscores, dashes dropped, upper-cased)
//!  6000  config trees: {dir}/{key}
//!  5000  {cwd}/config/application-{profile}.json
//!  4000  {cwd}/application-{profile}.json
//!  3000  {cwd}/config/application.json
//!  2000  {cwd}/application.json
//!  1000  {app root}/application.json
//!  -100  Resolver::set_default
//! ```
//!
//! Any type implementing [`Provider`] can join the chain through
//! [`Resolver::register`]; [`from_fn`] wraps a closure.
//!
//! # Values
//!
//! Providers return raw JSON. The engine reduces it to a [`Resolved`]:
//!
//! - a string stays text;
//! - an array whose first element is a string becomes a list;
//! - any other array becomes an empty list;
//! - everything else (numbers, booleans, objects) becomes its compact JSON
//!   text;
//! - `null` is no value.
//!
//! String values in JSON files, environment variables and arguments are
//! unquoted once (`"a,b"` → `a,b`), and an unquoted value containing a comma
//! is split into a list.
//!
//! # Placeholders
//!
//! `${other.key}` inside a value is replaced by the resolved value of
//! `other.key`. Placeholders nest (`${VAR_${SUFFIX}}` resolves the inner one
//! first) and apply to every element of a list. A placeholder that resolves
//! to nothing is left verbatim, and expansion of that string stops there.
//!
//! # Caching
//!
//! Each provider's answer for a key is cached, misses included, until
//! [`Resolver::clear_cache`]. [`Resolver::set_default`] only evicts the key
//! it sets, so a default added after a miss is still seen.
//!
//! # Cycles
//!
//! A provider whose lookup depends on itself for the same key is skipped for
//! the inner lookup instead of recursing. `a = ${b}`, `b = ${a}` resolves to
//! the unexpanded text rather than overflowing the stack.
//!
//! # Errors
//!
//! [`Resolver::lookup`] never fails. A provider error (an unreadable file,
//! malformed JSON) counts as a miss for that provider, and the lookup moves
//! on to the next one. With [`Resolver::set_verbose_logging`] enabled, those
//! errors are reported through [`tracing`] at `warn` level.
//!
//! # Testing
//!
//! [`Resolver::builder`] takes the arguments, environment and directories the
//! standard providers read, so a test can run the whole chain against a
//! temporary directory without touching the real process environment.

pub mod cache;
pub mod error;
pub mod location;
pub mod providers;
pub mod types;

mod builder;
mod interpolate;
mod provider;
mod registry;
mod resolver;

#[cfg(test)]
mod fixtures;

pub use builder::ResolverBuilder;
pub use cache::{Cache, Verbosity};
pub use error::ProviderError;
pub use provider::{FnProvider, Provider, ProviderContext, from_fn};
pub use resolver::Resolver;
pub use types::{Location, ProviderId, ProviderInfo, Resolved};
