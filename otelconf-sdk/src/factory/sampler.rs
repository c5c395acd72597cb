// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use opentelemetry::trace::SpanKind;
use opentelemetry_sdk::trace::{Sampler as SdkSampler, ShouldSample};
use otelconf::model::tracer_provider::{self, Sampler, SpanParent};
use otelconf::model::UnionNode as _;
use otelconf::{ComponentKind, ConfigurationError, Result};
use otelconf_sampling::constants::ratio::DEFAULT_RATIO;
use otelconf_sampling::{
    AttributeExactMatcher, AttributePatternMatcher, ParentBasedSampler, ParentClassification,
    RuleBasedSampler, SamplingRule, TraceIdRatioSampler,
};

use super::delegated;
use crate::context::ConstructionContext;

/// Builds a sampler. An absent sampler is `parent_based` with an `always_on` root.
pub fn create(model: Option<&Sampler>, ctx: &mut ConstructionContext) -> Result<Box<dyn ShouldSample>> {
    let Some(model) = model else {
        return Ok(Box::new(ParentBasedSampler::new(Box::new(
            SdkSampler::AlwaysOn,
        ))));
    };
    match model {
        Sampler::AlwaysOn(_) => Ok(Box::new(SdkSampler::AlwaysOn)),
        Sampler::AlwaysOff(_) => Ok(Box::new(SdkSampler::AlwaysOff)),
        Sampler::TraceIdRatioBased(model) => Ok(Box::new(TraceIdRatioSampler::new(
            model.ratio.unwrap_or(DEFAULT_RATIO),
        ))),
        Sampler::ParentBased(model) => parent_based(model, ctx),
        Sampler::RuleBased(model) => rule_based(model, ctx),
        Sampler::JaegerRemote(body) => {
            ctx.create_plugin(&delegated(ComponentKind::Sampler, model.variant_name(), body)?)
        }
        Sampler::Plugin(plugin) => ctx.create_plugin(plugin),
    }
}

/// Unset slots keep their defaults
fn slot(
    model: Option<&Sampler>,
    ctx: &mut ConstructionContext,
) -> Result<Option<Box<dyn ShouldSample>>> {
    model.map(|sampler| create(Some(sampler), ctx)).transpose()
}

fn parent_based(
    model: &tracer_provider::ParentBasedSampler,
    ctx: &mut ConstructionContext,
) -> Result<Box<dyn ShouldSample>> {
    let root = slot(model.root.as_deref(), ctx)?.unwrap_or_else(|| Box::new(SdkSampler::AlwaysOn));
    let mut sampler = ParentBasedSampler::new(root);
    if let Some(s) = slot(model.remote_parent_sampled.as_deref(), ctx)? {
        sampler = sampler.with_remote_parent_sampled(s);
    }
    if let Some(s) = slot(model.remote_parent_not_sampled.as_deref(), ctx)? {
        sampler = sampler.with_remote_parent_not_sampled(s);
    }
    if let Some(s) = slot(model.local_parent_sampled.as_deref(), ctx)? {
        sampler = sampler.with_local_parent_sampled(s);
    }
    if let Some(s) = slot(model.local_parent_not_sampled.as_deref(), ctx)? {
        sampler = sampler.with_local_parent_not_sampled(s);
    }
    Ok(Box::new(sampler))
}

fn rule_based(
    model: &tracer_provider::RuleBasedSampler,
    ctx: &mut ConstructionContext,
) -> Result<Box<dyn ShouldSample>> {
    let rules = model
        .rules
        .iter()
        .map(|rule| sampling_rule(rule, ctx))
        .collect::<Result<Vec<_>>>()?;
    let mut sampler = RuleBasedSampler::new(rules);
    if let Some(fallback) = slot(model.fallback.as_deref(), ctx)? {
        sampler = sampler.with_fallback(fallback);
    }
    Ok(Box::new(sampler))
}

fn sampling_rule(
    model: &tracer_provider::SamplingRule,
    ctx: &mut ConstructionContext,
) -> Result<SamplingRule> {
    let sampler = model
        .sampler
        .as_deref()
        .ok_or_else(|| ConfigurationError::required("rule_based sampler rule", "sampler"))?;
    let mut rule = SamplingRule::from_boxed(create(Some(sampler), ctx)?);

    if let Some(matcher) = &model.attribute_values {
        rule = rule.with_attribute_values(AttributeExactMatcher::new(
            matcher.key.clone(),
            matcher.values.iter().cloned(),
        ));
    }
    if let Some(matcher) = &model.attribute_patterns {
        let excluded = matcher.excluded.iter().cloned();
        rule = rule.with_attribute_patterns(match &matcher.included {
            Some(included) => {
                AttributePatternMatcher::new(matcher.key.clone(), included.iter().cloned(), excluded)
            }
            None => AttributePatternMatcher::excluding(matcher.key.clone(), excluded),
        });
    }
    if let Some(parents) = &model.parent {
        rule = rule.with_parents(parents.iter().map(|parent| match parent {
            SpanParent::None => ParentClassification::None,
            SpanParent::Local => ParentClassification::Local,
            SpanParent::Remote => ParentClassification::Remote,
        }));
    }
    if let Some(kinds) = &model.span_kinds {
        rule = rule.with_span_kinds(kinds.iter().map(|kind| match kind {
            tracer_provider::SpanKind::Internal => SpanKind::Internal,
            tracer_provider::SpanKind::Server => SpanKind::Server,
            tracer_provider::SpanKind::Client => SpanKind::Client,
            tracer_provider::SpanKind::Producer => SpanKind::Producer,
            tracer_provider::SpanKind::Consumer => SpanKind::Consumer,
        }));
    }
    Ok(rule)
}
