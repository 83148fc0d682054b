//! `${key}` placeholder expansion.
//!
//! The pattern only matches a placeholder whose body contains no `$`, so in
//! `${VAR_${SUFFIX}}` the first match is `${SUFFIX}`. Once it is substituted
//! the string is scanned again from the start and the outer placeholder,
//! now `${VAR_ONE}` say, becomes matchable.
//!
//! Scanning stops at the first placeholder that resolves to nothing, leaving
//! it (and anything after it) verbatim. There is no limit on the number of
//! placeholders in a string.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::Resolved;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^$}]*)\}").expect("placeholder pattern is valid"));

/// Upper bound, in bytes, on an expanded string. Past this size expansion
/// stops.
pub(crate) const MAX_EXPANDED_LEN: usize = 32 * 1024;

/// Expand every placeholder in `value` using `lookup`. List elements are
/// expanded independently.
pub(crate) fn interpolate<F>(value: Resolved, verbose: bool, mut lookup: F) -> Resolved
where
    F: FnMut(&str) -> Option<Resolved>,
{
    match value {
        Resolved::Text(text) => Resolved::Text(expand(text, verbose, &mut lookup)),
        Resolved::List(items) => Resolved::List(
            items
                .into_iter()
                .map(|item| expand(item, verbose, &mut lookup))
                .collect(),
        ),
    }
}

/// Substitute until no placeholder is left or one resolves to nothing.
///
/// A cached value can contain the placeholder it stands for (`x = ${x}y`), or
/// two cached values can name each other. Expansion stops, leaving the
/// placeholder verbatim, at a value that mentions a key already substituted by
/// a placeholder-bearing value in this string.
fn expand<F>(mut text: String, verbose: bool, lookup: &mut F) -> String
where
    F: FnMut(&str) -> Option<Resolved>,
{
    let mut expanding: HashSet<String> = HashSet::new();

    loop {
        let Some(caps) = PLACEHOLDER.captures(&text) else {
            return text;
        };
        let range = caps.get(0).map(|m| m.range()).unwrap_or_default();
        let name = caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default();

        let Some(value) = lookup(&name) else {
            return text;
        };
        let replacement = value.to_string();
        if PLACEHOLDER.is_match(&replacement) {
            expanding.insert(name.clone());
            if mentions_any(&replacement, &expanding) {
                if verbose {
                    tracing::warn!(key = %name, value = %replacement, "placeholder expands to itself");
                }
                return text;
            }
        }

        if text.len() - range.len() + replacement.len() > MAX_EXPANDED_LEN {
            if verbose {
                tracing::warn!(key = %name, limit = MAX_EXPANDED_LEN, "expanded value too long");
            }
            return text;
        }
        text.replace_range(range, &replacement);
    }
}

/// Whether `text` has a placeholder for any of `names`.
fn mentions_any(text: &str, names: &HashSet<String>) -> bool {
    PLACEHOLDER
        .captures_iter(text)
        .any(|caps| caps.get(1).is_some_and(|m| names.contains(m.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with(pairs: &[(&str, &str)]) -> impl FnMut(&str) -> Option<Resolved> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).map(|v| Resolved::Text(v.clone()))
    }

    fn text(s: &str, lookup: impl FnMut(&str) -> Option<Resolved>) -> String {
        match interpolate(Resolved::from(s), false, lookup) {
            Resolved::Text(t) => t,
            other => panic!("Expected Text, got {other:?}"),
        }
    }

    #[test]
    fn no_placeholder_unchanged() {
        assert_eq!(text("plain value", with(&[])), "plain value");
    }

    #[test]
    fn single_placeholder() {
        assert_eq!(text("hi ${name}!", with(&[("name", "bob")])), "hi bob!");
    }

    #[test]
    fn multiple_placeholders() {
        let lookup = with(&[("a", "1"), ("b", "2")]);
        assert_eq!(text("${a}-${b}-${a}", lookup), "1-2-1");
    }

    #[test]
    fn nested_placeholder_resolves_inner_first() {
        let lookup = with(&[("VAR_TWO", "ONE"), ("VAR_ONE", "env1")]);
        assert_eq!(text("${VAR_${VAR_TWO}}", lookup), "env1");
    }

    #[test]
    fn missing_key_left_verbatim() {
        assert_eq!(text("x ${missing} y", with(&[])), "x ${missing} y");
    }

    #[test]
    fn missing_nested_key_left_verbatim() {
        assert_eq!(text("${VAR_${VAR_TWO}}", with(&[])), "${VAR_${VAR_TWO}}");
    }

    #[test]
    fn scanning_stops_at_first_miss() {
        let lookup = with(&[("b", "2")]);
        assert_eq!(text("${a} ${b}", lookup), "${a} ${b}");
    }

    #[test]
    fn substituted_values_are_rescanned() {
        let lookup = with(&[("outer", "<${inner}>"), ("inner", "x")]);
        assert_eq!(text("${outer}", lookup), "<x>");
    }

    #[test]
    fn list_value_substitutes_comma_joined() {
        let lookup = |key: &str| {
            (key == "hosts").then(|| Resolved::List(vec!["a".into(), "b".into()]))
        };
        assert_eq!(text("hosts=${hosts}", lookup), "hosts=a,b");
    }

    #[test]
    fn list_elements_expanded_independently() {
        let value = Resolved::List(vec!["${a}".into(), "${missing}".into(), "${b}".into()]);
        let result = interpolate(value, false, with(&[("a", "1"), ("b", "2")]));
        assert_eq!(
            result,
            Resolved::List(vec!["1".into(), "${missing}".into(), "2".into()])
        );
    }

    #[test]
    fn many_placeholders_all_expand() {
        let value = vec!["${h}"; 70].join(",");
        assert_eq!(text(&value, with(&[("h", "x")])), vec!["x"; 70].join(","));
    }

    #[test]
    fn many_distinct_placeholders_all_expand() {
        let keys: Vec<String> = (0..100).map(|i| format!("k{i}")).collect();
        let pairs: Vec<(&str, &str)> = keys.iter().map(|k| (k.as_str(), k.as_str())).collect();
        let value: String = keys.iter().map(|k| format!("${{{k}}} ")).collect();
        let expected: String = keys.iter().map(|k| format!("{k} ")).collect();
        assert_eq!(text(&value, with(&pairs)), expected);
    }

    #[test]
    fn self_expanding_value_is_left_verbatim() {
        let mut calls = 0;
        let lookup = |_: &str| {
            calls += 1;
            Some(Resolved::from("${x}y"))
        };
        assert_eq!(text("a ${x} b", lookup), "a ${x} b");
        assert_eq!(calls, 1);
    }

    #[test]
    fn values_naming_each_other_terminate() {
        let lookup = with(&[("x", "${z}"), ("z", "${x}")]);
        assert_eq!(text("${x}", lookup), "${z}");
    }

    #[test]
    fn mutually_growing_values_terminate() {
        let lookup = with(&[("x", "${z}y"), ("z", "${x}")]);
        assert_eq!(text("${x}", lookup), "${z}y");
    }

    #[test]
    fn repeated_placeholder_with_nested_value_expands_each_time() {
        let lookup = with(&[("outer", "<${inner}>"), ("inner", "x")]);
        assert_eq!(text("${outer} ${outer}", lookup), "<x> <x>");
    }

    #[test]
    fn overlong_expansion_stops() {
        let big = "a".repeat(MAX_EXPANDED_LEN / 2 + 1);
        let lookup = with(&[("big", big.as_str())]);
        assert_eq!(text("${big}${big}", lookup), format!("{big}${{big}}"));
    }

    #[test]
    fn dollar_without_brace_is_literal() {
        assert_eq!(text("cost: $5 {x}", with(&[("x", "no")])), "cost: $5 {x}");
    }
}
