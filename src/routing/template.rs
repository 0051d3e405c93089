//! URL templates with named placeholders.
//!
//! # Syntax
//! ```text
//! api/user/{userId}/note/{noteId}   two required placeholders
//! docs/{page?}                      optional trailing placeholder
//! files/{*path}                     catch-all, must be last
//! ```
//!
//! # Design Decisions
//! - Literal segments compare ASCII case-insensitively
//! - Leading/trailing slashes are insignificant
//! - A placeholder may be omitted only if it is optional or has a default,
//!   and every following segment can be omitted as well
//! - Extracted values are percent-decoded

use std::collections::BTreeMap;
use std::collections::HashSet;

use percent_encoding::percent_decode_str;

use super::RouteError;

/// Values extracted from a matched path, keyed by placeholder name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteValues(BTreeMap<String, String>);

impl RouteValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RouteValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param { name: String, optional: bool },
    CatchAll { name: String },
}

/// A parsed URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl RouteTemplate {
    /// Parse a template such as `api/user/{userId}`.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidTemplate {
            template: raw.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = raw.trim_matches('/');
        let mut segments = Vec::new();
        let mut seen = HashSet::new();

        if !trimmed.is_empty() {
            let parts: Vec<&str> = trimmed.split('/').collect();
            let last = parts.len() - 1;

            for (i, part) in parts.iter().enumerate() {
                if part.is_empty() {
                    return Err(invalid("empty segment"));
                }

                let segment = match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                    Some(inner) => {
                        let (name, segment) = if let Some(name) = inner.strip_prefix('*') {
                            if i != last {
                                return Err(invalid("catch-all must be the last segment"));
                            }
                            (name, Segment::CatchAll { name: name.to_string() })
                        } else if let Some(name) = inner.strip_suffix('?') {
                            (name, Segment::Param { name: name.to_string(), optional: true })
                        } else {
                            (inner, Segment::Param { name: inner.to_string(), optional: false })
                        };

                        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                            return Err(invalid("placeholder names must be alphanumeric"));
                        }
                        if !seen.insert(name.to_string()) {
                            return Err(invalid("placeholder names must be unique"));
                        }
                        segment
                    }
                    None => {
                        if part.contains('{') || part.contains('}') {
                            return Err(invalid("placeholders must span a whole segment"));
                        }
                        Segment::Literal(part.to_string())
                    }
                };
                segments.push(segment);
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The template as registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in template order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Literal(_) => None,
            Segment::Param { name, .. } | Segment::CatchAll { name } => Some(name.as_str()),
        })
    }

    /// Match a request path, filling omitted placeholders from `defaults`.
    ///
    /// Defaults whose key is not a placeholder are copied into the result
    /// as-is.
    pub fn match_path(&self, path: &str, defaults: &BTreeMap<String, String>) -> Option<RouteValues> {
        let trimmed = path.trim_matches('/');
        let parts: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        let mut values = RouteValues::new();
        let mut consumed_all = false;

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(literal) => {
                    let part = parts.get(i)?;
                    if !part.eq_ignore_ascii_case(literal) {
                        return None;
                    }
                }
                Segment::Param { name, optional } => match parts.get(i) {
                    Some(part) if !part.is_empty() => values.insert(name.as_str(), decode(part)),
                    Some(_) => return None,
                    None => {
                        if let Some(default) = defaults.get(name) {
                            values.insert(name.as_str(), default.as_str());
                        } else if !optional {
                            return None;
                        }
                    }
                },
                Segment::CatchAll { name } => {
                    let rest = parts.get(i..).map(|rest| rest.join("/")).unwrap_or_default();
                    if rest.is_empty() {
                        if let Some(default) = defaults.get(name) {
                            values.insert(name.as_str(), default.as_str());
                        }
                    } else {
                        values.insert(name.as_str(), decode(&rest));
                    }
                    consumed_all = true;
                }
            }
        }

        if !consumed_all && parts.len() > self.segments.len() {
            return None;
        }

        for (key, value) in defaults {
            if !values.contains(key) {
                values.insert(key.as_str(), value.as_str());
            }
        }

        Some(values)
    }
}

fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}
