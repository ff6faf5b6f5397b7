//! Fragment splitting and query-string parsing.

use std::collections::BTreeMap;

use crate::pattern::decode_component;

/// Query parameters by key.
pub type Query = BTreeMap<String, String>;

/// Parse `a=1&b=two%20words`.
///
/// Pairs are split at the first `=`; a key without `=` gets an empty
/// value. Keys and values are percent-decoded and `+` in a value reads as
/// a space. Empty pairs and empty keys are skipped. When a key repeats,
/// the last occurrence wins.
pub fn parse_query(qs: &str) -> Query {
    let mut query = Query::new();
    for part in qs.split('&') {
        if part.is_empty() {
            continue;
        }
        let (key, value) = part.split_once('=').unwrap_or((part, ""));
        if key.is_empty() {
            continue;
        }
        query.insert(
            decode_component(key),
            decode_component(&value.replace('+', " ")),
        );
    }
    query
}

/// A fragment split into its path and query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFragment {
    /// Path with trailing slashes removed; `/` for the root.
    pub path: String,
    /// Text after the first `?`, if any.
    pub query_string: Option<String>,
    pub query: Query,
}

/// Split a fragment (without `#`) at its first `?` and normalize the path.
pub fn parse_fragment(fragment: &str) -> ParsedFragment {
    let (raw_path, query_string) = match fragment.split_once('?') {
        Some((p, q)) => (p, Some(q.to_string())),
        None => (fragment, None),
    };
    let query = query_string
        .as_deref()
        .map(parse_query)
        .unwrap_or_default();

    ParsedFragment {
        path: normalize_path(raw_path),
        query_string,
        query,
    }
}

/// Strip trailing slashes; an empty result becomes `/`.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Ensure a navigation target starts with `#`.
pub fn normalize_target(target: &str) -> String {
    if target.starts_with('#') {
        target.to_string()
    } else {
        format!("#{}", target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_and_plus() {
        let q = parse_query("q=shoes%20red&tag=a+b");
        assert_eq!(q["q"], "shoes red");
        assert_eq!(q["tag"], "a b");
    }

    #[test]
    fn test_missing_equals_and_empty_pairs() {
        let q = parse_query("flag&&x=1&=orphan");
        assert_eq!(q.len(), 2);
        assert_eq!(q["flag"], "");
        assert_eq!(q["x"], "1");
    }

    #[test]
    fn test_last_duplicate_wins() {
        let q = parse_query("a=1&a=2");
        assert_eq!(q["a"], "2");
    }

    #[test]
    fn test_value_keeps_extra_equals() {
        let q = parse_query("expr=a=b");
        assert_eq!(q["expr"], "a=b");
    }

    #[test]
    fn test_parse_fragment() {
        let f = parse_fragment("/search/?q=shoes%20red");
        assert_eq!(f.path, "/search");
        assert_eq!(f.query_string.as_deref(), Some("q=shoes%20red"));
        assert_eq!(f.query["q"], "shoes red");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/admin/pos///"), "/admin/pos");
        assert_eq!(normalize_path("///"), "/");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn test_normalize_target() {
        assert_eq!(normalize_target("/login"), "#/login");
        assert_eq!(normalize_target("#/login"), "#/login");
    }
}
