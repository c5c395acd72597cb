// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::sync::Arc;

use opentelemetry_sdk::metrics::{Instrument, SdkMeterProvider, Stream};
use otelconf::model;
use otelconf::{conf_debug, conf_warn, Result};

use super::exemplar_filter::{self, ExemplarFilter};
use super::{metric_reader, view};
use crate::components::metric_reader::{CardinalityLimits, MetricReader};
use crate::components::view::{instrument_type, InstrumentSelector, View};
use crate::context::ConstructionContext;

/// The configured metric readers, views and exemplar filter and the SDK meter provider wired
/// from them
pub struct MeterPipeline {
    readers: Vec<Arc<MetricReader>>,
    views: Vec<View>,
    exemplar_filter: ExemplarFilter,
    cardinality_limits: CardinalityLimits,
    provider: SdkMeterProvider,
}

impl fmt::Debug for MeterPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeterPipeline")
            .field("readers", &self.readers)
            .field("views", &self.views)
            .field("exemplar_filter", &self.exemplar_filter)
            .field("cardinality_limits", &self.cardinality_limits)
            .finish()
    }
}

impl MeterPipeline {
    pub fn readers(&self) -> &[Arc<MetricReader>] {
        &self.readers
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Kept for callers wiring exemplars themselves, the SDK meter provider records none
    pub fn exemplar_filter(&self) -> ExemplarFilter {
        self.exemplar_filter
    }

    /// The limits applied to instruments without a view setting their own
    pub fn cardinality_limits(&self) -> &CardinalityLimits {
        &self.cardinality_limits
    }

    pub fn provider(&self) -> &SdkMeterProvider {
        &self.provider
    }
}

/// Builds the metrics pipeline, `None` when the document has no meter provider
pub fn create(
    model: Option<&model::MeterProvider>,
    ctx: &mut ConstructionContext,
) -> Result<Option<MeterPipeline>> {
    let Some(model) = model else {
        return Ok(None);
    };
    let readers = model
        .readers
        .iter()
        .map(|reader| metric_reader::create(reader, ctx))
        .collect::<Result<Vec<_>>>()?;
    let views = model
        .views
        .iter()
        .map(|v| view::create(v, ctx))
        .collect::<Result<Vec<_>>>()?;
    let cardinality_limits = merged_limits(&readers);

    let mut builder = SdkMeterProvider::builder();
    if let Some(resource) = ctx.resource() {
        builder = builder.with_resource(resource.clone());
    }
    for reader in &readers {
        builder = reader.install(builder);
    }
    for view in &views {
        let view = view.clone();
        builder = builder.with_view(move |instrument: &Instrument| {
            if !view.selector.matches_instrument(instrument) {
                return None;
            }
            let limit = view
                .stream
                .cardinality_limit
                .unwrap_or_else(|| limit_for(&cardinality_limits, instrument));
            match view.stream.sdk_stream(limit) {
                Ok(stream) => Some(stream),
                Err(e) => {
                    conf_warn!(
                        "View skipped for instrument \"{}\": {}",
                        instrument.name(),
                        e
                    );
                    None
                }
            }
        });
    }
    if cardinality_limits != CardinalityLimits::default() {
        let selectors: Vec<InstrumentSelector> =
            views.iter().map(|view| view.selector.clone()).collect();
        builder = builder.with_view(move |instrument: &Instrument| {
            if selectors.iter().any(|s| s.matches_instrument(instrument)) {
                return None;
            }
            Stream::builder()
                .with_cardinality_limit(limit_for(&cardinality_limits, instrument))
                .build()
                .ok()
        });
    }

    Ok(Some(MeterPipeline {
        readers,
        views,
        exemplar_filter: exemplar_filter::create(model.exemplar_filter),
        cardinality_limits,
        provider: builder.build(),
    }))
}

fn limit_for(limits: &CardinalityLimits, instrument: &Instrument) -> usize {
    instrument_type(instrument.kind()).map_or(limits.default, |kind| limits.limit_for(kind))
}

/// Views apply to every reader, so readers asking for different limits get the lowest
fn merged_limits(readers: &[Arc<MetricReader>]) -> CardinalityLimits {
    let limits: Vec<&CardinalityLimits> = readers
        .iter()
        .filter_map(|reader| reader.cardinality_limits())
        .collect();
    let Some((first, rest)) = limits.split_first() else {
        return CardinalityLimits::default();
    };
    if rest.iter().any(|limits| limits != first) {
        conf_debug!("Metric readers set different cardinality limits, applying the lowest");
    }
    rest.iter().fold(**first, |merged, limits| merged.min(*limits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Provider, StaticRegistry};
    use crate::testing::RecordingExporter;
    use opentelemetry::metrics::MeterProvider as _;
    use otelconf::model::meter_provider::InstrumentType;
    use serde_json::json;

    fn pipeline(model: serde_json::Value, registry: StaticRegistry) -> Result<MeterPipeline> {
        let model: model::MeterProvider = serde_json::from_value(model).expect("binds");
        let mut ctx = ConstructionContext::new(Arc::new(registry));
        create(Some(&model), &mut ctx).map(|pipeline| pipeline.expect("configured"))
    }

    fn recording(exporter: &RecordingExporter) -> StaticRegistry {
        let shared = exporter.clone();
        StaticRegistry::new()
            .with_provider(Provider::metric_exporter("recording", move |_, _| Ok(shared.clone())))
    }

    #[test]
    fn test_meter_pipeline() {
        let model: model::MeterProvider = serde_json::from_value(json!({
            "readers": [{"periodic": {"exporter": {"console": null}}}],
            "views": [{"selector": {"instrument_name": "*"}, "stream": {"aggregation": {"sum": null}}}],
            "exemplar_filter": "always_on",
        }))
        .expect("binds");
        let mut ctx = ConstructionContext::new(Arc::new(StaticRegistry::new()));
        let pipeline = create(Some(&model), &mut ctx)
            .expect("builds")
            .expect("configured");
        assert_eq!(pipeline.readers().len(), 1);
        assert_eq!(pipeline.views().len(), 1);
        assert_eq!(pipeline.exemplar_filter(), ExemplarFilter::AlwaysOn);
        assert_eq!(ctx.ledger().len(), 2);
        pipeline.provider().shutdown().expect("shuts down");
    }

    #[test]
    fn test_view_failure_keeps_readers_in_ledger() {
        let model: model::MeterProvider = serde_json::from_value(json!({
            "readers": [{"periodic": {"exporter": {"console": null}}}],
            "views": [{"stream": {}}],
        }))
        .expect("binds");
        let mut ctx = ConstructionContext::new(Arc::new(StaticRegistry::new()));
        assert!(create(Some(&model), &mut ctx).is_err());
        assert_eq!(ctx.ledger().len(), 2);
    }

    #[test]
    fn test_measurements_reach_exporter_on_shutdown() {
        let exporter = RecordingExporter::default();
        let pipeline = pipeline(
            json!({"readers": [{"periodic": {"exporter": {"recording": null}}}]}),
            recording(&exporter),
        )
        .expect("builds");
        let counter = pipeline.provider().meter("test").u64_counter("requests").build();
        counter.add(1, &[]);
        assert_eq!(exporter.exported(), 0);
        pipeline.provider().shutdown().expect("shuts down");
        assert!(exporter.exported() >= 1);
        assert_eq!(exporter.closes(), 0);
    }

    #[test]
    fn test_views_leave_other_instruments_exported() {
        let exporter = RecordingExporter::default();
        let pipeline = pipeline(
            json!({
                "readers": [{"periodic": {"exporter": {"recording": null}}}],
                "views": [{
                    "selector": {"instrument_name": "noisy.*"},
                    "stream": {"aggregation": {"drop": null}},
                }],
            }),
            recording(&exporter),
        )
        .expect("builds");
        let meter = pipeline.provider().meter("test");
        meter.u64_counter("noisy.requests").build().add(1, &[]);
        meter.u64_counter("requests").build().add(1, &[]);
        pipeline.provider().force_flush().expect("flushes");
        assert!(exporter.exported() >= 1);
        pipeline.provider().shutdown().expect("shuts down");
    }

    #[test]
    fn test_lowest_reader_limits_apply() {
        let pipeline = pipeline(
            json!({"readers": [
                {"periodic": {
                    "exporter": {"console": null},
                    "cardinality_limits": {"default": 100, "histogram": 5},
                }},
                {"periodic": {
                    "exporter": {"console": null},
                    "cardinality_limits": {"default": 50},
                }},
            ]}),
            StaticRegistry::new(),
        )
        .expect("builds");
        let limits = pipeline.cardinality_limits();
        assert_eq!(limits.limit_for(InstrumentType::Histogram), 5);
        assert_eq!(limits.limit_for(InstrumentType::Counter), 50);
        pipeline.provider().shutdown().expect("shuts down");
    }

    #[test]
    fn test_invalid_stream_is_rejected() {
        let err = pipeline(
            json!({
                "readers": [],
                "views": [{
                    "selector": {"instrument_name": "*"},
                    "stream": {"aggregation_cardinality_limit": 0},
                }],
            }),
            StaticRegistry::new(),
        )
        .expect_err("zero limit");
        assert!(err.to_string().starts_with("view stream is invalid"));
    }
}
