//! Go struct tag parsing.
//!
//! A struct tag is the conventional `key:"value" key2:"value2"` string that
//! follows a field. Lookup follows `reflect.StructTag`: the first pair with a
//! matching key wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static TAG_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s:"\x00-\x1f]+):"((?:[^"\\]|\\.)*)""#).expect("valid struct tag regex")
});

/// Ordered key → value pairs of one struct tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructTag {
    pairs: Vec<(String, String)>,
}

impl StructTag {
    /// Parse the contents of a tag literal (quotes or backticks already stripped).
    pub fn parse(raw: &str) -> Self {
        let pairs = TAG_PAIR
            .captures_iter(raw)
            .map(|caps| (caps[1].to_string(), unescape(&caps[2])))
            .collect();
        StructTag { pairs }
    }

    /// Value of the first pair named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// True when `key` is present and its value contains `needle`.
    pub fn contains(&self, key: &str, needle: &str) -> bool {
        self.get(key).is_some_and(|v| v.contains(needle))
    }
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_multiple_keys() {
        let tag = StructTag::parse(r#"json:"name,omitempty" validate:"required,min=1""#);
        assert_eq!(tag.get("json"), Some("name,omitempty"));
        assert_eq!(tag.get("validate"), Some("required,min=1"));
        assert_eq!(tag.get("builder"), None);
    }

    #[test]
    fn test_first_key_wins() {
        let tag = StructTag::parse(r#"builder:"must" builder:"ignore""#);
        assert_eq!(tag.get("builder"), Some("must"));
    }

    #[test]
    fn test_contains_is_substring_match() {
        let tag = StructTag::parse(r#"validate:"required_if_admin""#);
        assert!(tag.contains("validate", "required"));
        assert!(!tag.contains("constructor", "ignore"));
    }

    #[test]
    fn test_escaped_quote_in_value() {
        let tag = StructTag::parse(r#"doc:"say \"hi\"" getter:"ignore""#);
        assert_eq!(tag.get("doc"), Some(r#"say "hi""#));
        assert_eq!(tag.get("getter"), Some("ignore"));
    }

    #[test]
    fn test_empty_tag() {
        let tag = StructTag::parse("");
        assert_eq!(tag, StructTag::default());
        assert_eq!(tag.get("json"), None);
    }
}
