// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::sync::Arc;

use opentelemetry_sdk::trace::{SdkTracerProvider, ShouldSample};
use otelconf::model::{self, AttributeLimits};
use otelconf::Result;

use super::limits::{self, SpanLimits};
use super::{sampler, span_processor};
use crate::components::sdk_bridge::{BridgedSpanProcessor, SharedSampler};
use crate::components::SpanProcessor;
use crate::context::ConstructionContext;

/// The configured tracing pieces and the SDK tracer provider wired from them
pub struct TracerPipeline {
    sampler: Box<dyn ShouldSample>,
    processors: Vec<Arc<dyn SpanProcessor>>,
    limits: SpanLimits,
    provider: SdkTracerProvider,
}

impl fmt::Debug for TracerPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracerPipeline")
            .field("sampler", &self.sampler)
            .field("processors", &self.processors)
            .field("limits", &self.limits)
            .finish()
    }
}

impl TracerPipeline {
    pub fn sampler(&self) -> &dyn ShouldSample {
        self.sampler.as_ref()
    }

    pub fn processors(&self) -> &[Arc<dyn SpanProcessor>] {
        &self.processors
    }

    pub fn limits(&self) -> &SpanLimits {
        &self.limits
    }

    pub fn provider(&self) -> &SdkTracerProvider {
        &self.provider
    }
}

/// Builds the tracing pipeline, `None` when the document has no tracer provider
pub fn create(
    model: Option<&model::TracerProvider>,
    attribute_limits: Option<&AttributeLimits>,
    ctx: &mut ConstructionContext,
) -> Result<Option<TracerPipeline>> {
    let Some(model) = model else {
        return Ok(None);
    };
    let limits = limits::span_limits(model.limits.as_ref(), attribute_limits);
    let sampler = sampler::create(model.sampler.as_ref(), ctx)?;
    let processors = model
        .processors
        .iter()
        .map(|processor| span_processor::create(processor, ctx))
        .collect::<Result<Vec<_>>>()?;

    let mut builder = SdkTracerProvider::builder()
        .with_sampler(SharedSampler(sampler.clone()))
        .with_max_attributes_per_span(limits.attribute_count_limit)
        .with_max_events_per_span(limits.event_count_limit)
        .with_max_links_per_span(limits.link_count_limit)
        .with_max_attributes_per_event(limits.event_attribute_count_limit)
        .with_max_attributes_per_link(limits.link_attribute_count_limit);
    if let Some(resource) = ctx.resource() {
        builder = builder.with_resource(resource.clone());
    }
    for processor in &processors {
        builder = builder.with_span_processor(BridgedSpanProcessor(Arc::clone(processor)));
    }

    Ok(Some(TracerPipeline {
        sampler,
        processors,
        limits,
        provider: builder.build(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Provider, StaticRegistry};
    use crate::testing::RecordingExporter;
    use opentelemetry::trace::{Span as _, Tracer as _, TracerProvider as _};
    use serde_json::json;

    fn pipeline(
        model: serde_json::Value,
        registry: StaticRegistry,
    ) -> (Result<Option<TracerPipeline>>, ConstructionContext) {
        let model: model::TracerProvider = serde_json::from_value(model).expect("binds");
        let mut ctx = ConstructionContext::new(Arc::new(registry));
        (create(Some(&model), None, &mut ctx), ctx)
    }

    #[test]
    fn test_absent_provider() {
        let mut ctx = ConstructionContext::new(Arc::new(StaticRegistry::new()));
        assert!(create(None, None, &mut ctx).expect("builds").is_none());
    }

    #[test]
    fn test_spans_reach_exporter() {
        let exporter = RecordingExporter::default();
        let shared = exporter.clone();
        let registry = StaticRegistry::new()
            .with_provider(Provider::span_exporter("recording", move |_, _| Ok(shared.clone())));
        let (result, _ctx) = pipeline(
            json!({
                "processors": [{"simple": {"exporter": {"recording": null}}}],
                "sampler": {"always_on": null},
                "limits": {"attribute_count_limit": 16},
            }),
            registry,
        );
        let pipeline = result.expect("builds").expect("configured");
        assert_eq!(pipeline.limits().attribute_count_limit, 16);
        assert_eq!(pipeline.processors().len(), 1);

        let tracer = pipeline.provider().tracer("test");
        let mut span = tracer.start("operation");
        span.end();
        assert_eq!(exporter.exported(), 1);
    }

    #[test]
    fn test_dropped_spans_are_not_exported() {
        let exporter = RecordingExporter::default();
        let shared = exporter.clone();
        let registry = StaticRegistry::new()
            .with_provider(Provider::span_exporter("recording", move |_, _| Ok(shared.clone())));
        let (result, _ctx) = pipeline(
            json!({
                "processors": [{"simple": {"exporter": {"recording": null}}}],
                "sampler": {"always_off": null},
            }),
            registry,
        );
        let pipeline = result.expect("builds").expect("configured");
        pipeline.provider().tracer("test").start("operation").end();
        assert_eq!(exporter.exported(), 0);
    }
}
