// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use opentelemetry_sdk::metrics::Temporality;
use otelconf::model::meter_provider::{
    DefaultHistogramAggregation, PushMetricExporter, TemporalityPreference,
};
use otelconf::model::UnionNode as _;
use otelconf::{conf_debug, ComponentKind, Result};

use super::{delegated, otlp};
use crate::components::console::ConsoleMetricExporter;
use crate::components::MetricExporter;
use crate::context::ConstructionContext;

pub fn create(
    model: &PushMetricExporter,
    ctx: &mut ConstructionContext,
) -> Result<Arc<dyn MetricExporter>> {
    match model {
        PushMetricExporter::OtlpHttp(otlp_model) => {
            histogram_hint(otlp_model.default_histogram_aggregation);
            let temporality = temporality(otlp_model.temporality_preference);
            otlp::metric_exporter(otlp_model.into(), temporality, ctx)
        }
        PushMetricExporter::OtlpGrpc(otlp_model) => {
            histogram_hint(otlp_model.default_histogram_aggregation);
            let temporality = temporality(otlp_model.temporality_preference);
            otlp::metric_exporter(otlp_model.into(), temporality, ctx)
        }
        PushMetricExporter::Console(console) => {
            histogram_hint(console.default_histogram_aggregation);
            let exporter: Arc<dyn MetricExporter> = Arc::new(ConsoleMetricExporter::new(
                temporality(console.temporality_preference),
            ));
            ctx.track(ComponentKind::MetricExporter, model.variant_name(), &exporter);
            Ok(exporter)
        }
        PushMetricExporter::OtlpFileDevelopment(body) => {
            ctx.create_plugin(&delegated(ComponentKind::MetricExporter, model.variant_name(), body)?)
        }
        PushMetricExporter::Plugin(plugin) => ctx.create_plugin(plugin),
    }
}

/// Unset preference is cumulative
pub fn temporality(preference: Option<TemporalityPreference>) -> Temporality {
    match preference.unwrap_or_default() {
        TemporalityPreference::Cumulative => Temporality::Cumulative,
        TemporalityPreference::Delta => Temporality::Delta,
        TemporalityPreference::LowMemory => Temporality::LowMemory,
    }
}

fn histogram_hint(aggregation: Option<DefaultHistogramAggregation>) {
    if aggregation == Some(DefaultHistogramAggregation::Base2ExponentialBucketHistogram) {
        conf_debug!(
            "default_histogram_aggregation applies through views, exporter keeps explicit buckets"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::StaticRegistry;
    use otelconf::model::meter_provider::PeriodicMetricReader;
    use serde_json::json;

    fn exporter(model: serde_json::Value) -> PushMetricExporter {
        let reader: PeriodicMetricReader =
            serde_json::from_value(json!({ "exporter": model })).expect("binds");
        reader.exporter.expect("exporter")
    }

    #[test]
    fn test_temporality_preference() {
        assert_eq!(temporality(None), Temporality::Cumulative);
        assert_eq!(
            temporality(Some(TemporalityPreference::Delta)),
            Temporality::Delta
        );
        assert_eq!(
            temporality(Some(TemporalityPreference::LowMemory)),
            Temporality::LowMemory
        );
    }

    #[test]
    fn test_console_exporter() {
        let mut ctx = ConstructionContext::new(Arc::new(StaticRegistry::new()));
        let built = create(
            &exporter(json!({"console": {"temporality_preference": "delta"}})),
            &mut ctx,
        )
        .expect("builds");
        assert_eq!(built.temporality(), Temporality::Delta);
        assert_eq!(ctx.ledger().len(), 1);
    }

    #[test]
    fn test_file_exporter_resolves_through_registry() {
        let mut ctx = ConstructionContext::new(Arc::new(StaticRegistry::new()));
        let err = create(
            &exporter(json!({"otlp_file/development": {"output_stream": "stdout"}})),
            &mut ctx,
        )
        .expect_err("not registered");
        assert_eq!(
            err.to_string(),
            "No component provider detected for MetricExporter with name \"otlp_file/development\"."
        );
    }
}
