// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use otelconf::model::logger_provider::{self, LogRecordProcessor as LogRecordProcessorModel};
use otelconf::model::UnionNode as _;
use otelconf::{ComponentKind, ConfigurationError, Result};

use super::{count, log_exporter, millis};
use crate::components::batch::BatchConfig;
use crate::components::log_processor::{BatchLogRecordProcessor, SimpleLogRecordProcessor};
use crate::components::LogRecordProcessor;
use crate::context::ConstructionContext;

pub fn create(
    model: &LogRecordProcessorModel,
    ctx: &mut ConstructionContext,
) -> Result<Arc<dyn LogRecordProcessor>> {
    let processor: Arc<dyn LogRecordProcessor> = match model {
        LogRecordProcessorModel::Batch(batch) => {
            let exporter = batch.exporter.as_ref().ok_or_else(|| {
                ConfigurationError::required("batch log record processor", "exporter")
            })?;
            let exporter = log_exporter::create(exporter, ctx)?;
            Arc::new(BatchLogRecordProcessor::new(exporter, batch_config(batch)))
        }
        LogRecordProcessorModel::Simple(simple) => {
            let exporter = simple.exporter.as_ref().ok_or_else(|| {
                ConfigurationError::required("simple log record processor", "exporter")
            })?;
            Arc::new(SimpleLogRecordProcessor::new(log_exporter::create(
                exporter, ctx,
            )?))
        }
        LogRecordProcessorModel::Plugin(plugin) => return ctx.create_plugin(plugin),
    };
    ctx.track(ComponentKind::LogRecordProcessor, model.variant_name(), &processor);
    Ok(processor)
}

fn batch_config(model: &logger_provider::BatchLogRecordProcessor) -> BatchConfig {
    let defaults = BatchConfig::log_defaults();
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
    use crate::registry::StaticRegistry;
    use serde_json::json;

    fn processor(model: serde_json::Value) -> LogRecordProcessorModel {
        let provider: logger_provider::LoggerProvider =
            serde_json::from_value(json!({ "processors": [model] })).expect("binds");
        provider.processors.into_iter().next().expect("one processor")
    }

    #[test]
    fn test_batch_requires_exporter() {
        let mut ctx = ConstructionContext::new(Arc::new(StaticRegistry::new()));
        let err = create(&processor(json!({"batch": {}})), &mut ctx).expect_err("missing");
        assert_eq!(
            err.to_string(),
            "batch log record processor exporter is required but is null"
        );
    }

    #[test]
    fn test_console_pipeline_tracked_in_order() {
        let mut ctx = ConstructionContext::new(Arc::new(StaticRegistry::new()));
        create(
            &processor(json!({"batch": {"max_export_batch_size": 1, "exporter": {"console": {}}}})),
            &mut ctx,
        )
        .expect("builds");
        assert_eq!(
            ctx.ledger().components().collect::<Vec<_>>(),
            vec![
                (ComponentKind::LogRecordExporter, "console"),
                (ComponentKind::LogRecordProcessor, "batch"),
            ]
        );
    }

    #[test]
    fn test_log_defaults() {
        let model = processor(json!({"batch": {"exporter": {"console": null}}}));
        let LogRecordProcessorModel::Batch(batch) = &model else {
            panic!("batch processor expected");
        };
        assert_eq!(batch_config(batch), BatchConfig::log_defaults());
    }
}
