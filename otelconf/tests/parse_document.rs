// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use otelconf::model::meter_provider::{
    Aggregation, ExemplarFilter, MetricReader, PushMetricExporter, TemporalityPreference,
};
use otelconf::model::propagator::TextMapPropagator;
use otelconf::model::resource::AttributeType;
use otelconf::model::tracer_provider::{Sampler, SpanExporter, SpanProcessor};
use otelconf::model::logger_provider::{LogRecordExporter, LogRecordProcessor};
use otelconf::{Parser, StructuredProperties};
use pretty_assertions::assert_eq;
use serde_json::json;

const DOCUMENT: &str = r#"
file_format: "1.0"
disabled: false
log_level: ${LOG_LEVEL:-info}
resource:
  schema_url: https://opentelemetry.io/schemas/1.16.0
  attributes:
    - name: service.name
      value: ${SERVICE_NAME}
    - name: service.instance.count
      value: 3
      type: int
  attributes_list: ${OTEL_RESOURCE_ATTRIBUTES}
attribute_limits:
  attribute_value_length_limit: 4096
  attribute_count_limit: 128
propagator:
  composite:
    - tracecontext:
    - baggage:
  composite_list: "b3,xray"
tracer_provider:
  processors:
    - batch:
        schedule_delay: 5000
        export_timeout: 30000
        max_queue_size: 2048
        max_export_batch_size: 512
        exporter:
          otlp_http:
            endpoint: ${OTEL_EXPORTER_OTLP_ENDPOINT:-http://localhost:4318}/v1/traces
            headers:
              - name: api-key
                value: 1234
            timeout: 10000
    - simple:
        exporter:
          console:
  limits:
    event_count_limit: 128
  sampler:
    parent_based:
      root:
        trace_id_ratio_based:
          ratio: 0.0001
      remote_parent_not_sampled:
        always_off:
meter_provider:
  readers:
    - periodic:
        interval: 60000
        exporter:
          otlp_http:
            endpoint: http://localhost:4318/v1/metrics
            temporality_preference: delta
  views:
    - selector:
        instrument_name: my-instrument
        instrument_type: histogram
      stream:
        name: new_instrument_name
        aggregation:
          explicit_bucket_histogram:
            boundaries: [0.0, 5.0, 10.0]
            record_min_max: true
  exemplar_filter: always_on
logger_provider:
  processors:
    - batch:
        exporter:
          console:
  limits:
    attribute_count_limit: 64
instrumentation:
  general:
    http:
      client:
        request_captured_headers: [Content-Type, Accept]
  rust:
    example:
      property: value
distribution:
  acme:
    license_key: ${LICENSE:-none}
"#;

fn parser() -> Parser {
    let mut builder = Parser::builder();
    builder.set_variables(
        HashMap::from([
            ("SERVICE_NAME".to_string(), "checkout".to_string()),
            (
                "OTEL_RESOURCE_ATTRIBUTES".to_string(),
                "deployment.environment=prod".to_string(),
            ),
        ]),
        HashMap::new(),
    );
    builder.build()
}

#[test]
fn parses_complete_document() {
    let model = parser().parse(DOCUMENT).expect("document parses");

    assert_eq!(model.log_level.as_deref(), Some("info"));
    assert_eq!(model.disabled, Some(false));

    let resource = model.resource.expect("resource");
    assert_eq!(resource.attributes[0].value, json!("checkout"));
    assert_eq!(resource.attributes[1].attribute_type, Some(AttributeType::Int));
    assert_eq!(
        resource.attributes_list.as_deref(),
        Some("deployment.environment=prod")
    );

    let propagator = model.propagator.expect("propagator");
    assert!(matches!(
        propagator.composite.as_slice(),
        [TextMapPropagator::TraceContext(_), TextMapPropagator::Baggage(_)]
    ));

    let tracer_provider = model.tracer_provider.expect("tracer provider");
    let SpanProcessor::Batch(batch) = &tracer_provider.processors[0] else {
        panic!("expected batch processor");
    };
    assert_eq!(batch.max_export_batch_size, Some(512));
    let Some(SpanExporter::OtlpHttp(otlp)) = &batch.exporter else {
        panic!("expected otlp exporter");
    };
    assert_eq!(
        otlp.endpoint.as_deref(),
        Some("http://localhost:4318/v1/traces")
    );
    assert_eq!(otlp.headers[0].value.as_deref(), Some("1234"));
    assert!(matches!(
        &tracer_provider.processors[1],
        SpanProcessor::Simple(simple) if matches!(simple.exporter, Some(SpanExporter::Console(_)))
    ));
    let Some(Sampler::ParentBased(parent_based)) = &tracer_provider.sampler else {
        panic!("expected parent based sampler");
    };
    assert!(matches!(
        parent_based.root.as_deref(),
        Some(Sampler::TraceIdRatioBased(ratio)) if ratio.ratio == Some(0.0001)
    ));
    assert!(matches!(
        parent_based.remote_parent_not_sampled.as_deref(),
        Some(Sampler::AlwaysOff(_))
    ));
    assert_eq!(parent_based.local_parent_sampled, None);

    let meter_provider = model.meter_provider.expect("meter provider");
    let MetricReader::Periodic(periodic) = &meter_provider.readers[0] else {
        panic!("expected periodic reader");
    };
    let Some(PushMetricExporter::OtlpHttp(metric_exporter)) = &periodic.exporter else {
        panic!("expected otlp metric exporter");
    };
    assert_eq!(
        metric_exporter.temporality_preference,
        Some(TemporalityPreference::Delta)
    );
    let stream = meter_provider.views[0].stream.as_ref().expect("stream");
    assert!(matches!(
        &stream.aggregation,
        Some(Aggregation::ExplicitBucketHistogram(h))
            if h.boundaries == Some(vec![0.0, 5.0, 10.0]) && h.record_min_max == Some(true)
    ));
    assert_eq!(meter_provider.exemplar_filter, Some(ExemplarFilter::AlwaysOn));

    let logger_provider = model.logger_provider.expect("logger provider");
    assert!(matches!(
        &logger_provider.processors[0],
        LogRecordProcessor::Batch(batch) if matches!(batch.exporter, Some(LogRecordExporter::Console(_)))
    ));

    let instrumentation =
        StructuredProperties::from_serializable(&model.instrumentation.expect("instrumentation"));
    let rust = instrumentation.get_structured("rust").expect("rust section");
    assert_eq!(
        rust.get_structured("example")
            .and_then(|e| e.get_string("property"))
            .as_deref(),
        Some("value")
    );
    assert_eq!(
        instrumentation
            .get_structured("general")
            .and_then(|g| g.get_structured("http"))
            .and_then(|h| h.get_structured("client"))
            .and_then(|c| c.get_string_list("request_captured_headers")),
        Some(vec!["Content-Type".to_string(), "Accept".to_string()])
    );

    let distribution = StructuredProperties::from_serializable(&model.distribution.expect("distribution"));
    assert_eq!(
        distribution
            .get_structured("acme")
            .and_then(|a| a.get_string("license_key"))
            .as_deref(),
        Some("none")
    );
}

#[test]
fn reparsing_serialized_model_is_stable() {
    let model = parser().parse(DOCUMENT).expect("document parses");
    let tree = serde_json::to_value(&model).expect("serializes");
    let rebound = Parser::default().bind(tree).expect("rebinds");
    assert_eq!(model, rebound);
}
