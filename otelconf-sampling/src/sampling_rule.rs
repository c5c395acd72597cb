// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use opentelemetry::trace::SpanKind;
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::ShouldSample;

use crate::predicates::{AttributeExactMatcher, AttributePatternMatcher, ParentClassification};

/// A conjunction of predicates paired with the sampler used when all of them match.
///
/// A rule without predicates matches every span.
#[derive(Clone, Debug)]
pub struct SamplingRule {
    attribute_values: Option<AttributeExactMatcher>,
    attribute_patterns: Option<AttributePatternMatcher>,
    parents: Option<Vec<ParentClassification>>,
    span_kinds: Option<Vec<SpanKind>>,
    sampler: Box<dyn ShouldSample>,
}

impl SamplingRule {
    pub fn new(sampler: impl ShouldSample + 'static) -> Self {
        Self::from_boxed(Box::new(sampler))
    }

    pub fn from_boxed(sampler: Box<dyn ShouldSample>) -> Self {
        SamplingRule {
            attribute_values: None,
            attribute_patterns: None,
            parents: None,
            span_kinds: None,
            sampler,
        }
    }

    pub fn with_attribute_values(mut self, matcher: AttributeExactMatcher) -> Self {
        self.attribute_values = Some(matcher);
        self
    }

    pub fn with_attribute_patterns(mut self, matcher: AttributePatternMatcher) -> Self {
        self.attribute_patterns = Some(matcher);
        self
    }

    /// Restricts the rule to spans whose parent falls in one of `parents`.
    pub fn with_parents(mut self, parents: impl IntoIterator<Item = ParentClassification>) -> Self {
        self.parents = Some(parents.into_iter().collect());
        self
    }

    pub fn with_span_kinds(mut self, span_kinds: impl IntoIterator<Item = SpanKind>) -> Self {
        self.span_kinds = Some(span_kinds.into_iter().collect());
        self
    }

    pub fn sampler(&self) -> &dyn ShouldSample {
        self.sampler.as_ref()
    }

    pub fn matches(
        &self,
        parent_context: Option<&Context>,
        span_kind: &SpanKind,
        attributes: &[KeyValue],
    ) -> bool {
        if let Some(matcher) = &self.attribute_values {
            if !matcher.matches(attributes) {
                return false;
            }
        }
        if let Some(matcher) = &self.attribute_patterns {
            if !matcher.matches(attributes) {
                return false;
            }
        }
        if let Some(parents) = &self.parents {
            if !parents.contains(&ParentClassification::of(parent_context)) {
                return false;
            }
        }
        if let Some(kinds) = &self.span_kinds {
            if !kinds.contains(span_kind) {
                return false;
            }
        }
        true
    }
}
