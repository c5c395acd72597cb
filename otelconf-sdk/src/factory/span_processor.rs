// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use otelconf::model::tracer_provider::{self, SpanProcessor as SpanProcessorModel};
use otelconf::model::UnionNode as _;
use otelconf::{ComponentKind, ConfigurationError, Result};

use super::{count, millis, span_exporter};
use crate::components::batch::BatchConfig;
use crate::components::span_processor::{BatchSpanProcessor, SimpleSpanProcessor};
use crate::components::SpanProcessor;
use crate::context::ConstructionContext;

pub fn create(
    model: &SpanProcessorModel,
    ctx: &mut ConstructionContext,
) -> Result<Arc<dyn SpanProcessor>> {
    let processor: Arc<dyn SpanProcessor> = match model {
        SpanProcessorModel::Batch(batch) => {
            let exporter = batch
                .exporter
                .as_ref()
                .ok_or_else(|| ConfigurationError::required("batch span processor", "exporter"))?;
            let exporter = span_exporter::create(exporter, ctx)?;
            Arc::new(BatchSpanProcessor::new(exporter, batch_config(batch)))
        }
        SpanProcessorModel::Simple(simple) => {
            let exporter = simple
                .exporter
                .as_ref()
                .ok_or_else(|| ConfigurationError::required("simple span processor", "exporter"))?;
            Arc::new(SimpleSpanProcessor::new(span_exporter::create(exporter, ctx)?))
        }
        SpanProcessorModel::Plugin(plugin) => return ctx.create_plugin(plugin),
    };
    ctx.track(ComponentKind::SpanProcessor, model.variant_name(), &processor);
    Ok(processor)
}

fn batch_config(model: &tracer_provider::BatchSpanProcessor) -> BatchConfig {
    let defaults = BatchConfig::span_defaults();
    BatchConfig {
        schedule_delay: millis(model.schedule_delay, defaults.schedule_delay),
        export_timeout: millis(model.export_timeout, defaults.export_timeout),
        max_queue_size: count(model.max_queue_size, defaults.max_queue_size),
        max_export_batch_size: count(model.max_export_batch_size, defaults.max_export_batch_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Provider, StaticRegistry};
    use crate::testing::RecordingExporter;
    use serde_json::json;
    use std::time::Duration;

    fn processor(model: serde_json::Value) -> SpanProcessorModel {
        let provider: tracer_provider::TracerProvider =
            serde_json::from_value(json!({ "processors": [model] })).expect("binds");
        provider.processors.into_iter().next().expect("one processor")
    }

    #[test]
    fn test_batch_requires_exporter() {
        let mut ctx = ConstructionContext::new(Arc::new(StaticRegistry::new()));
        let err = create(&processor(json!({"batch": {"schedule_delay": 100}})), &mut ctx)
            .expect_err("exporter missing");
        assert_eq!(
            err.to_string(),
            "batch span processor exporter is required but is null"
        );
        assert!(ctx.ledger().is_empty());
    }

    #[test]
    fn test_simple_requires_exporter() {
        let mut ctx = ConstructionContext::new(Arc::new(StaticRegistry::new()));
        let err = create(&processor(json!({"simple": null})), &mut ctx).expect_err("missing");
        assert!(matches!(err, ConfigurationError::Validation(_)));
    }

    #[test]
    fn test_batch_settings() {
        let model = processor(json!({"batch": {
            "schedule_delay": 200,
            "export_timeout": 1000,
            "max_queue_size": 10,
            "max_export_batch_size": 5,
            "exporter": {"console": null},
        }}));
        let SpanProcessorModel::Batch(batch) = &model else {
            panic!("batch processor expected");
        };
        assert_eq!(
            batch_config(batch),
            BatchConfig {
                schedule_delay: Duration::from_millis(200),
                export_timeout: Duration::from_millis(1000),
                max_queue_size: 10,
                max_export_batch_size: 5,
            }
        );
        let defaults = processor(json!({"batch": {"exporter": {"console": null}}}));
        let SpanProcessorModel::Batch(batch) = &defaults else {
            panic!("batch processor expected");
        };
        assert_eq!(batch_config(batch), BatchConfig::span_defaults());
    }

    #[test]
    fn test_exporter_recorded_before_processor() {
        let exporter = RecordingExporter::default();
        let shared = exporter.clone();
        let registry = StaticRegistry::new()
            .with_provider(Provider::span_exporter("recording", move |_, _| Ok(shared.clone())));
        let mut ctx = ConstructionContext::new(Arc::new(registry));
        create(&processor(json!({"simple": {"exporter": {"recording": null}}})), &mut ctx)
            .expect("builds");
        assert_eq!(
            ctx.ledger().components().collect::<Vec<_>>(),
            vec![
                (ComponentKind::SpanExporter, "recording"),
                (ComponentKind::SpanProcessor, "simple"),
            ]
        );
        ctx.rollback().expect("closes");
        assert_eq!(exporter.closes(), 1);
    }
}
