use serde_json::Value;

use crate::error::ProviderError;
use crate::provider::{Provider, ProviderContext};
use crate::providers::{member, parse_json, unquote};

const APPLICATION_JSON_ARG: &str = "--application.json=";

/// Values passed as `--key=value` arguments.
///
/// The first matching argument wins. The value is unquoted, so
/// `--hosts=a,b` yields a list.
pub struct CommandLine {
    args: Vec<String>,
}

impl CommandLine {
    pub const PRIORITY: i32 = 10000;

    pub fn new(args: impl IntoIterator<Item = String>) -> Self {
        Self {
            args: args.into_iter().collect(),
        }
    }
}

impl Provider for CommandLine {
    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn description(&self) -> &str {
        "From command line arguments (--key=value)"
    }

    fn get(&self, key: &str, _ctx: &ProviderContext<'_>) -> Result<Option<Value>, ProviderError> {
        let prefix = format!("--{key}=");
        Ok(self
            .args
            .iter()
            .find_map(|arg| arg.strip_prefix(&prefix))
            .map(|value| unquote(Value::String(value.to_string()))))
    }
}

/// Values from an inline JSON object passed as `--application.json=<json>`.
pub struct CommandLineJson {
    args: Vec<String>,
}

impl CommandLineJson {
    pub const PRIORITY: i32 = 9000;

    pub fn new(args: impl IntoIterator<Item = String>) -> Self {
        Self {
            args: args.into_iter().collect(),
        }
    }
}

impl Provider for CommandLineJson {
    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn description(&self) -> &str {
        "From command line argument (--application.json=<json>)"
    }

    fn get(&self, key: &str, ctx: &ProviderContext<'_>) -> Result<Option<Value>, ProviderError> {
        let Some(inline) = self
            .args
            .iter()
            .find_map(|arg| arg.strip_prefix(APPLICATION_JSON_ARG))
        else {
            return Ok(None);
        };
        let doc = ctx.cache().compute_if_absent(APPLICATION_JSON_ARG, || {
            parse_json(inline, APPLICATION_JSON_ARG).map(Some)
        });
        Ok(member(doc, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Resolver;
    use crate::fixtures::test::args;
    use crate::types::Resolved;

    fn resolver_with(provider: impl Provider + 'static) -> Resolver {
        let mut resolver = Resolver::empty(false);
        resolver.register(provider);
        resolver
    }

    #[test]
    fn key_value_argument() {
        let resolver = resolver_with(CommandLine::new(args(&["--this.is.a.test.key=from args"])));
        assert_eq!(
            resolver.lookup("this.is.a.test.key"),
            Some(Resolved::from("from args"))
        );
    }

    #[test]
    fn first_matching_argument_wins() {
        let resolver = resolver_with(CommandLine::new(args(&["--k=one", "--k=two"])));
        assert_eq!(resolver.lookup("k"), Some(Resolved::from("one")));
    }

    #[test]
    fn prefix_must_match_whole_key() {
        let resolver = resolver_with(CommandLine::new(args(&["--key.long=x"])));
        assert_eq!(resolver.lookup("key"), None);
    }

    #[test]
    fn quoted_value_is_unquoted() {
        let resolver = resolver_with(CommandLine::new(args(&["--k='a,b'"])));
        assert_eq!(resolver.lookup("k"), Some(Resolved::from("a,b")));
    }

    #[test]
    fn comma_value_becomes_list() {
        let resolver = resolver_with(CommandLine::new(args(&["--k=a,b"])));
        assert_eq!(
            resolver.lookup("k"),
            Some(Resolved::List(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn inline_application_json() {
        let resolver = resolver_with(CommandLineJson::new(args(&[
            r#"--application.json={"com.example.server.protocol": "https"}"#,
        ])));
        assert_eq!(
            resolver.lookup("com.example.server.protocol"),
            Some(Resolved::from("https"))
        );
        assert_eq!(resolver.lookup("other"), None);
    }

    #[test]
    fn malformed_application_json_is_a_miss() {
        let resolver = resolver_with(CommandLineJson::new(args(&["--application.json={oops"])));
        assert_eq!(resolver.lookup("k"), None);
    }

    #[test]
    fn application_json_parsed_once() {
        let resolver = resolver_with(CommandLineJson::new(args(&[
            r#"--application.json={"a": "1", "b": "2"}"#,
        ])));
        resolver.lookup("a");
        resolver.lookup("b");
        let holder = resolver.registry_for_tests().next().unwrap();
        assert_eq!(holder.cache.len(), 1);
    }
}
