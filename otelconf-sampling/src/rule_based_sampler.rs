// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use opentelemetry::trace::{Link, SamplingResult, SpanKind, TraceId};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::{Sampler, ShouldSample};

use crate::sampling_rule::SamplingRule;

/// Delegates to the sampler of the first matching rule, or to the fallback when no rule
/// matches.
///
/// Without an explicit fallback an empty rule set samples everything and a non-empty one
/// drops whatever it does not match.
#[derive(Clone, Debug)]
pub struct RuleBasedSampler {
    rules: Vec<SamplingRule>,
    fallback: Box<dyn ShouldSample>,
}

impl RuleBasedSampler {
    pub fn new(rules: Vec<SamplingRule>) -> Self {
        let fallback: Box<dyn ShouldSample> = if rules.is_empty() {
            Box::new(Sampler::AlwaysOn)
        } else {
            Box::new(Sampler::AlwaysOff)
        };
        RuleBasedSampler { rules, fallback }
    }

    pub fn with_fallback(mut self, fallback: Box<dyn ShouldSample>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn rules(&self) -> &[SamplingRule] {
        &self.rules
    }

    fn find_rule(
        &self,
        parent_context: Option<&Context>,
        span_kind: &SpanKind,
        attributes: &[KeyValue],
    ) -> Option<&SamplingRule> {
        self.rules
            .iter()
            .find(|rule| rule.matches(parent_context, span_kind, attributes))
    }
}

impl ShouldSample for RuleBasedSampler {
    fn should_sample(
        &self,
        parent_context: Option<&Context>,
        trace_id: TraceId,
        name: &str,
        span_kind: &SpanKind,
        attributes: &[KeyValue],
        links: &[Link],
    ) -> SamplingResult {
        let sampler = match self.find_rule(parent_context, span_kind, attributes) {
            Some(rule) => rule.sampler(),
            None => self.fallback.as_ref(),
        };
        sampler.should_sample(parent_context, trace_id, name, span_kind, attributes, links)
    }
}
