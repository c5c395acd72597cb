// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use opentelemetry::trace::{Link, SamplingResult, SpanKind, TraceContextExt, TraceId};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::{Sampler, ShouldSample};

use crate::predicates::ParentClassification;

/// Picks a delegate from the parent's location and sampled flag.
///
/// Spans without a parent go to `root`. Sampled parents default to always on and
/// unsampled parents to always off.
#[derive(Clone, Debug)]
pub struct ParentBasedSampler {
    root: Box<dyn ShouldSample>,
    remote_parent_sampled: Box<dyn ShouldSample>,
    remote_parent_not_sampled: Box<dyn ShouldSample>,
    local_parent_sampled: Box<dyn ShouldSample>,
    local_parent_not_sampled: Box<dyn ShouldSample>,
}

impl ParentBasedSampler {
    pub fn new(root: Box<dyn ShouldSample>) -> Self {
        ParentBasedSampler {
            root,
            remote_parent_sampled: Box::new(Sampler::AlwaysOn),
            remote_parent_not_sampled: Box::new(Sampler::AlwaysOff),
            local_parent_sampled: Box::new(Sampler::AlwaysOn),
            local_parent_not_sampled: Box::new(Sampler::AlwaysOff),
        }
    }

    pub fn with_remote_parent_sampled(mut self, sampler: Box<dyn ShouldSample>) -> Self {
        self.remote_parent_sampled = sampler;
        self
    }

    pub fn with_remote_parent_not_sampled(mut self, sampler: Box<dyn ShouldSample>) -> Self {
        self.remote_parent_not_sampled = sampler;
        self
    }

    pub fn with_local_parent_sampled(mut self, sampler: Box<dyn ShouldSample>) -> Self {
        self.local_parent_sampled = sampler;
        self
    }

    pub fn with_local_parent_not_sampled(mut self, sampler: Box<dyn ShouldSample>) -> Self {
        self.local_parent_not_sampled = sampler;
        self
    }

    fn delegate(&self, parent_context: Option<&Context>) -> &dyn ShouldSample {
        let classification = ParentClassification::of(parent_context);
        let sampled = parent_context
            .map(|cx| cx.span().span_context().is_sampled())
            .unwrap_or(false);
        let sampler = match (classification, sampled) {
            (ParentClassification::None, _) => &self.root,
            (ParentClassification::Remote, true) => &self.remote_parent_sampled,
            (ParentClassification::Remote, false) => &self.remote_parent_not_sampled,
            (ParentClassification::Local, true) => &self.local_parent_sampled,
            (ParentClassification::Local, false) => &self.local_parent_not_sampled,
        };
        sampler.as_ref()
    }
}

impl ShouldSample for ParentBasedSampler {
    fn should_sample(
        &self,
        parent_context: Option<&Context>,
        trace_id: TraceId,
        name: &str,
        span_kind: &SpanKind,
        attributes: &[KeyValue],
        links: &[Link],
    ) -> SamplingResult {
        self.delegate(parent_context).should_sample(
            parent_context,
            trace_id,
            name,
            span_kind,
            attributes,
            links,
        )
    }
}
