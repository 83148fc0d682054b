use serde_json::Value;

use crate::error::ProviderError;
use crate::provider::{Provider, ProviderContext};

/// Programmer-supplied fallbacks, read from the common cache.
///
/// Populate through [`Resolver::set_default`](crate::Resolver::set_default).
pub struct Defaults;

impl Defaults {
    pub const PRIORITY: i32 = -100;
}

impl Provider for Defaults {
    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn description(&self) -> &str {
        "From programmatically provided defaults"
    }

    fn get(&self, key: &str, ctx: &ProviderContext<'_>) -> Result<Option<Value>, ProviderError> {
        Ok(ctx.common().get(key))
    }

    fn serves_defaults(&self) -> bool {
        true
    }
}
