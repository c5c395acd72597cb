// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;

use opentelemetry::trace::TraceContextExt;
use opentelemetry::{Context, Key, KeyValue};

use crate::glob_matcher::GlobMatcher;

fn attribute_value<'a>(attributes: &'a [KeyValue], key: &Key) -> Option<&'a opentelemetry::Value> {
    attributes.iter().find(|kv| &kv.key == key).map(|kv| &kv.value)
}

/// Matches when an attribute is present and its value is one of an allowed set.
///
/// Non string values are compared by their string form, so `200` matches an integer
/// `http.response.status_code`.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeExactMatcher {
    key: Key,
    values: HashSet<String>,
}

impl AttributeExactMatcher {
    pub fn new<I, S>(key: impl Into<Key>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttributeExactMatcher {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn matches(&self, attributes: &[KeyValue]) -> bool {
        attribute_value(attributes, &self.key)
            .is_some_and(|value| self.values.contains(&*value.as_str()))
    }
}

/// Matches when an attribute is present, matches one included glob and no excluded glob.
///
/// Without an include list every value is included. An empty include list includes nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributePatternMatcher {
    key: Key,
    included: Option<Vec<GlobMatcher>>,
    excluded: Vec<GlobMatcher>,
}

fn globs<I, S>(patterns: I) -> Vec<GlobMatcher>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|p| GlobMatcher::new(p.as_ref()))
        .collect()
}

impl AttributePatternMatcher {
    pub fn new<I, E, S, T>(key: impl Into<Key>, included: I, excluded: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        AttributePatternMatcher {
            key: key.into(),
            included: Some(globs(included)),
            excluded: globs(excluded),
        }
    }

    /// Includes every value no excluded glob matches
    pub fn excluding<E, T>(key: impl Into<Key>, excluded: E) -> Self
    where
        E: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        AttributePatternMatcher {
            key: key.into(),
            included: None,
            excluded: globs(excluded),
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn matches(&self, attributes: &[KeyValue]) -> bool {
        let Some(value) = attribute_value(attributes, &self.key) else {
            return false;
        };
        let value = value.as_str();
        let included = self
            .included
            .as_ref()
            .is_none_or(|globs| globs.iter().any(|g| g.matches(&value)));
        included && !self.excluded.iter().any(|g| g.matches(&value))
    }
}

/// Where the parent of the span being sampled lives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParentClassification {
    /// No valid parent span context
    None,
    /// Valid parent created in this process
    Local,
    /// Valid parent extracted from a remote caller
    Remote,
}

impl ParentClassification {
    pub fn of(parent_context: Option<&Context>) -> Self {
        let Some(cx) = parent_context else {
            return ParentClassification::None;
        };
        let span = cx.span();
        let span_context = span.span_context();
        if !span_context.is_valid() {
            ParentClassification::None
        } else if span_context.is_remote() {
            ParentClassification::Remote
        } else {
            ParentClassification::Local
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use opentelemetry::trace::{SpanContext, SpanId, TraceFlags, TraceId, TraceState};

    pub(crate) fn parent(remote: bool, sampled: bool) -> Context {
        let flags = if sampled {
            TraceFlags::SAMPLED
        } else {
            TraceFlags::default()
        };
        Context::new().with_remote_span_context(SpanContext::new(
            TraceId::from(0x4bf92f3577b34da6a3ce929d0e0e4736_u128),
            SpanId::from(0x00f067aa0ba902b7_u64),
            flags,
            remote,
            TraceState::default(),
        ))
    }

    #[test]
    fn test_exact_matcher() {
        let matcher = AttributeExactMatcher::new("http.route", ["/healthz", "/livez"]);
        assert!(matcher.matches(&[KeyValue::new("http.route", "/healthz")]));
        assert!(matcher.matches(&[
            KeyValue::new("http.method", "GET"),
            KeyValue::new("http.route", "/livez"),
        ]));
        assert!(!matcher.matches(&[KeyValue::new("http.route", "/foo")]));
        assert!(!matcher.matches(&[KeyValue::new("url.path", "/healthz")]));
        assert!(!matcher.matches(&[]));
    }

    #[test]
    fn test_exact_matcher_non_string_values() {
        let matcher = AttributeExactMatcher::new("http.response.status_code", ["200"]);
        assert!(matcher.matches(&[KeyValue::new("http.response.status_code", 200_i64)]));
        assert!(!matcher.matches(&[KeyValue::new("http.response.status_code", 404_i64)]));
    }

    #[test]
    fn test_pattern_matcher() {
        let matcher =
            AttributePatternMatcher::new("http.route", ["/internal/*"], ["/internal/special/*"]);
        assert!(matcher.matches(&[KeyValue::new("http.route", "/internal/admin/users")]));
        assert!(!matcher.matches(&[KeyValue::new("http.route", "/internal/special/foo")]));
        assert!(!matcher.matches(&[KeyValue::new("http.route", "/users/profile/123")]));
        assert!(!matcher.matches(&[]));
    }

    #[test]
    fn test_pattern_matcher_without_include() {
        let matcher = AttributePatternMatcher::excluding("http.route", ["/internal/*"]);
        assert!(matcher.matches(&[KeyValue::new("http.route", "/users")]));
        assert!(!matcher.matches(&[KeyValue::new("http.route", "/internal/x")]));
        assert!(!matcher.matches(&[KeyValue::new("url.path", "/users")]));
    }

    #[test]
    fn test_pattern_matcher_empty_include_matches_nothing() {
        let matcher =
            AttributePatternMatcher::new("http.route", Vec::<String>::new(), Vec::<String>::new());
        assert!(!matcher.matches(&[KeyValue::new("http.route", "/users")]));
        assert!(!matcher.matches(&[KeyValue::new("http.route", "")]));
    }

    #[test]
    fn test_parent_classification() {
        assert_eq!(ParentClassification::of(None), ParentClassification::None);
        assert_eq!(
            ParentClassification::of(Some(&Context::new())),
            ParentClassification::None
        );
        assert_eq!(
            ParentClassification::of(Some(&parent(false, true))),
            ParentClassification::Local
        );
        assert_eq!(
            ParentClassification::of(Some(&parent(true, false))),
            ParentClassification::Remote
        );
    }
}
