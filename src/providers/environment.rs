use std::collections::HashMap;

use serde_json::Value;

use crate::error::ProviderError;
use crate::provider::{Provider, ProviderContext};
use crate::providers::{member, parse_json, unquote};

/// Environment variable holding an inline JSON object.
pub const APPLICATION_JSON_VAR: &str = "APPLICATION_JSON";

/// Map a configuration key to an environment variable name: `.` becomes
/// `_`, `-` is dropped, and the result is upper-cased.
///
/// `com.example.dxp.mainDomain` → `COM_EXAMPLE_DXP_MAINDOMAIN`
pub fn mangle_env_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '-')
        .map(|c| if c == '.' { '_' } else { c })
        .collect::<String>()
        .to_uppercase()
}

/// Values from individual environment variables, named per [`mangle_env_key`].
pub struct EnvironmentVariables {
    vars: HashMap<String, String>,
}

impl EnvironmentVariables {
    pub const PRIORITY: i32 = 7000;

    /// Takes the variables explicitly so tests can pass synthetic data
    /// instead of `std::env::vars()`.
    pub fn new(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            vars: vars.into_iter().collect(),
        }
    }
}

impl Provider for EnvironmentVariables {
    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn description(&self) -> &str {
        "From individual environment variables (following name mangling rules)"
    }

    fn get(&self, key: &str, _ctx: &ProviderContext<'_>) -> Result<Option<Value>, ProviderError> {
        Ok(self
            .vars
            .get(&mangle_env_key(key))
            .map(|value| unquote(Value::String(value.clone()))))
    }
}

/// Values from the JSON object in [`APPLICATION_JSON_VAR`].
pub struct EnvironmentJson {
    inline: Option<String>,
}

impl EnvironmentJson {
    pub const PRIORITY: i32 = 8000;

    /// `inline` is the variable's value, if set.
    pub fn new(inline: Option<String>) -> Self {
        Self { inline }
    }
}

impl Provider for EnvironmentJson {
    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn description(&self) -> &str {
        "Properties from APPLICATION_JSON (inline JSON embedded in an environment variable)"
    }

    fn get(&self, key: &str, ctx: &ProviderContext<'_>) -> Result<Option<Value>, ProviderError> {
        let Some(inline) = self.inline.as_deref() else {
            return Ok(None);
        };
        let doc = ctx.cache().compute_if_absent(APPLICATION_JSON_VAR, || {
            parse_json(inline, APPLICATION_JSON_VAR).map(Some)
        });
        Ok(member(doc, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Resolver;
    use crate::fixtures::test::vars;
    use crate::types::Resolved;

    fn resolver_with(provider: impl Provider + 'static) -> Resolver {
        let mut resolver = Resolver::empty(false);
        resolver.register(provider);
        resolver
    }

    #[test]
    fn mangles_dots_dashes_and_case() {
        assert_eq!(mangle_env_key("com.example.dxp.mainDomain"), "COM_EXAMPLE_DXP_MAINDOMAIN");
        assert_eq!(mangle_env_key("server.max-threads"), "SERVER_MAXTHREADS");
        assert_eq!(mangle_env_key("PLAIN"), "PLAIN");
    }

    #[test]
    fn reads_mangled_variable() {
        let resolver = resolver_with(EnvironmentVariables::new(vars(&[(
            "COM_EXAMPLE_DXP_MAINDOMAIN",
            "localhost:8080",
        )])));
        assert_eq!(
            resolver.lookup("com.example.dxp.mainDomain"),
            Some(Resolved::from("localhost:8080"))
        );
    }

    #[test]
    fn unset_variable_is_none() {
        let resolver = resolver_with(EnvironmentVariables::new(vars(&[])));
        assert_eq!(resolver.lookup("not.set"), None);
    }

    #[test]
    fn comma_variable_becomes_list() {
        let resolver = resolver_with(EnvironmentVariables::new(vars(&[("CODES", "one,two")])));
        assert_eq!(
            resolver.lookup("codes"),
            Some(Resolved::List(vec!["one".into(), "two".into()]))
        );
    }

    #[test]
    fn inline_json_variable() {
        let resolver = resolver_with(EnvironmentJson::new(Some(
            r#"{"com.example.server.protocol": "from APPLICATION_JSON"}"#.into(),
        )));
        assert_eq!(
            resolver.lookup("com.example.server.protocol"),
            Some(Resolved::from("from APPLICATION_JSON"))
        );
    }

    #[test]
    fn inline_json_unset_is_none() {
        let resolver = resolver_with(EnvironmentJson::new(None));
        assert_eq!(resolver.lookup("k"), None);
    }

    #[test]
    fn inline_json_nested_value_is_json_text() {
        let resolver = resolver_with(EnvironmentJson::new(Some(
            r#"{"db": {"port": 5432, "host": "h"}}"#.into(),
        )));
        assert_eq!(
            resolver.lookup("db"),
            Some(Resolved::from(r#"{"host":"h","port":5432}"#))
        );
    }
}
