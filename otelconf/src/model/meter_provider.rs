// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{IncludeExclude, NameStringValuePair, OtlpHttpEncoding};
use super::lenient;
use super::union::{self, Empty};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterProvider {
    #[serde(deserialize_with = "lenient::list")]
    pub readers: Vec<MetricReader>,
    #[serde(deserialize_with = "lenient::list")]
    pub views: Vec<View>,
    pub exemplar_filter: Option<ExemplarFilter>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExemplarFilter {
    #[default]
    TraceBased,
    AlwaysOn,
    AlwaysOff,
}

crate::union_node! {
    pub enum MetricReader: "MetricReader" {
        "periodic" => Periodic(PeriodicMetricReader),
        "pull" => Pull(PullMetricReader),
    }
}

/// Durations are in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodicMetricReader {
    pub interval: Option<u64>,
    pub timeout: Option<u64>,
    #[serde(deserialize_with = "union::optional")]
    pub exporter: Option<PushMetricExporter>,
    pub cardinality_limits: Option<CardinalityLimits>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullMetricReader {
    #[serde(deserialize_with = "union::optional")]
    pub exporter: Option<PullMetricExporter>,
    pub cardinality_limits: Option<CardinalityLimits>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

crate::union_node! {
    pub enum PushMetricExporter: "MetricExporter" {
        "otlp_http" => OtlpHttp(OtlpHttpMetricExporter),
        "otlp_grpc" => OtlpGrpc(OtlpGrpcMetricExporter),
        "otlp_file/development" => OtlpFileDevelopment(OtlpFileMetricExporter),
        "console" => Console(ConsoleMetricExporter),
    }
}

// A pull exporter is itself a reader, so plugins resolve as readers.
crate::union_node! {
    pub enum PullMetricExporter: "MetricReader" {
        "prometheus/development" => PrometheusDevelopment(PrometheusMetricExporter),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalityPreference {
    #[default]
    Cumulative,
    Delta,
    LowMemory,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultHistogramAggregation {
    #[default]
    ExplicitBucketHistogram,
    Base2ExponentialBucketHistogram,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtlpHttpMetricExporter {
    pub endpoint: Option<String>,
    pub certificate_file: Option<String>,
    pub client_key_file: Option<String>,
    pub client_certificate_file: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub headers: Vec<NameStringValuePair>,
    pub headers_list: Option<String>,
    pub compression: Option<String>,
    pub timeout: Option<u64>,
    pub encoding: Option<OtlpHttpEncoding>,
    pub temporality_preference: Option<TemporalityPreference>,
    pub default_histogram_aggregation: Option<DefaultHistogramAggregation>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtlpGrpcMetricExporter {
    pub endpoint: Option<String>,
    pub certificate_file: Option<String>,
    pub client_key_file: Option<String>,
    pub client_certificate_file: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub headers: Vec<NameStringValuePair>,
    pub headers_list: Option<String>,
    pub compression: Option<String>,
    pub timeout: Option<u64>,
    pub insecure: Option<bool>,
    pub temporality_preference: Option<TemporalityPreference>,
    pub default_histogram_aggregation: Option<DefaultHistogramAggregation>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtlpFileMetricExporter {
    pub output_stream: Option<String>,
    pub temporality_preference: Option<TemporalityPreference>,
    pub default_histogram_aggregation: Option<DefaultHistogramAggregation>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleMetricExporter {
    pub temporality_preference: Option<TemporalityPreference>,
    pub default_histogram_aggregation: Option<DefaultHistogramAggregation>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrometheusMetricExporter {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub without_scope_info: Option<bool>,
    pub with_resource_constant_labels: Option<IncludeExclude>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

/// Per instrument kind cap on distinct attribute sets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardinalityLimits {
    pub default: Option<u64>,
    pub counter: Option<u64>,
    pub gauge: Option<u64>,
    pub histogram: Option<u64>,
    pub observable_counter: Option<u64>,
    pub observable_gauge: Option<u64>,
    pub observable_up_down_counter: Option<u64>,
    pub up_down_counter: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct View {
    pub selector: Option<ViewSelector>,
    pub stream: Option<ViewStream>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSelector {
    pub instrument_name: Option<String>,
    pub instrument_type: Option<InstrumentType>,
    pub unit: Option<String>,
    pub meter_name: Option<String>,
    pub meter_version: Option<String>,
    pub meter_schema_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentType {
    Counter,
    Gauge,
    Histogram,
    ObservableCounter,
    ObservableGauge,
    ObservableUpDownCounter,
    UpDownCounter,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewStream {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "union::optional")]
    pub aggregation: Option<Aggregation>,
    pub aggregation_cardinality_limit: Option<u64>,
    pub attribute_keys: Option<IncludeExclude>,
}

crate::union_node! {
    pub enum Aggregation: "Aggregation" {
        "default" => Default(Empty),
        "drop" => Drop(Empty),
        "explicit_bucket_histogram" => ExplicitBucketHistogram(ExplicitBucketHistogramAggregation),
        "base2_exponential_bucket_histogram" => Base2ExponentialBucketHistogram(Base2ExponentialBucketHistogramAggregation),
        "last_value" => LastValue(Empty),
        "sum" => Sum(Empty),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplicitBucketHistogramAggregation {
    pub boundaries: Option<Vec<f64>>,
    pub record_min_max: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Base2ExponentialBucketHistogramAggregation {
    pub max_scale: Option<i8>,
    pub max_size: Option<u32>,
    pub record_min_max: Option<bool>,
}
