//! Route patterns.
//!
//! A pattern is a path with `:name` placeholders, e.g. `/company/:id`. Each
//! placeholder matches one or more characters other than `/`. Matching is
//! case-insensitive, anchored at both ends, and accepts one optional
//! trailing slash.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::RouterError;

/// Path parameters by placeholder name.
pub type Params = BTreeMap<String, String>;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(\w+)").expect("placeholder regex"));

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    regex: Regex,
    param_names: Vec<String>,
}

impl RoutePattern {
    /// Compile a pattern. Text outside placeholders matches literally.
    pub fn compile(pattern: &str) -> Result<Self, RouterError> {
        let mut body = String::with_capacity(pattern.len() + 16);
        let mut param_names = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER_RE.captures_iter(pattern) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            body.push_str(&regex::escape(&pattern[last..whole.start()]));
            body.push_str("([^/]+)");
            param_names.push(name.as_str().to_string());
            last = whole.end();
        }
        body.push_str(&regex::escape(&pattern[last..]));

        let regex = Regex::new(&format!("(?i)^{}/?$", body)).map_err(|source| {
            RouterError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
            param_names,
        })
    }

    /// The pattern as registered.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of appearance.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Match a normalized path, returning percent-decoded parameters.
    ///
    /// A value that is not valid percent-encoding is kept as written.
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let caps = self.regex.captures(path)?;
        let params = self
            .param_names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                let raw = caps.get(i + 1)?.as_str();
                Some((name.clone(), decode_component(raw)))
            })
            .collect();
        Some(params)
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Percent-decode, falling back to the input when it isn't valid.
pub fn decode_component(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}
