// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{OtlpFileExporter, OtlpGrpcExporter, OtlpHttpExporter};
use super::lenient;
use super::union::{self, Empty};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerProvider {
    #[serde(deserialize_with = "lenient::list")]
    pub processors: Vec<SpanProcessor>,
    pub limits: Option<SpanLimits>,
    #[serde(deserialize_with = "union::optional")]
    pub sampler: Option<Sampler>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanLimits {
    pub attribute_value_length_limit: Option<u64>,
    pub attribute_count_limit: Option<u64>,
    pub event_count_limit: Option<u64>,
    pub link_count_limit: Option<u64>,
    pub event_attribute_count_limit: Option<u64>,
    pub link_attribute_count_limit: Option<u64>,
}

crate::union_node! {
    pub enum SpanProcessor: "SpanProcessor" {
        "batch" => Batch(BatchSpanProcessor),
        "simple" => Simple(SimpleSpanProcessor),
    }
}

/// Durations are in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSpanProcessor {
    pub schedule_delay: Option<u64>,
    pub export_timeout: Option<u64>,
    pub max_queue_size: Option<u64>,
    pub max_export_batch_size: Option<u64>,
    #[serde(deserialize_with = "union::optional")]
    pub exporter: Option<SpanExporter>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleSpanProcessor {
    #[serde(deserialize_with = "union::optional")]
    pub exporter: Option<SpanExporter>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

crate::union_node! {
    pub enum SpanExporter: "SpanExporter" {
        "otlp_http" => OtlpHttp(OtlpHttpExporter),
        "otlp_grpc" => OtlpGrpc(OtlpGrpcExporter),
        "otlp_file/development" => OtlpFileDevelopment(OtlpFileExporter),
        "console" => Console(Empty),
        "zipkin" => Zipkin(ZipkinSpanExporter),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZipkinSpanExporter {
    pub endpoint: Option<String>,
    pub timeout: Option<u64>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

crate::union_node! {
    pub enum Sampler: "Sampler" {
        "always_on" => AlwaysOn(Empty),
        "always_off" => AlwaysOff(Empty),
        "trace_id_ratio_based" => TraceIdRatioBased(TraceIdRatioBasedSampler),
        "parent_based" => ParentBased(ParentBasedSampler),
        "rule_based" => RuleBased(RuleBasedSampler),
        "jaeger_remote" => JaegerRemote(JaegerRemoteSampler),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceIdRatioBasedSampler {
    pub ratio: Option<f64>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParentBasedSampler {
    #[serde(deserialize_with = "union::optional_boxed")]
    pub root: Option<Box<Sampler>>,
    #[serde(deserialize_with = "union::optional_boxed")]
    pub remote_parent_sampled: Option<Box<Sampler>>,
    #[serde(deserialize_with = "union::optional_boxed")]
    pub remote_parent_not_sampled: Option<Box<Sampler>>,
    #[serde(deserialize_with = "union::optional_boxed")]
    pub local_parent_sampled: Option<Box<Sampler>>,
    #[serde(deserialize_with = "union::optional_boxed")]
    pub local_parent_not_sampled: Option<Box<Sampler>>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleBasedSampler {
    #[serde(deserialize_with = "lenient::list")]
    pub rules: Vec<SamplingRule>,
    /// Decision when no rule matches
    #[serde(deserialize_with = "union::optional_boxed")]
    pub fallback: Option<Box<Sampler>>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

/// A rule applies when every predicate it sets matches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingRule {
    pub attribute_values: Option<AttributeValuesMatcher>,
    pub attribute_patterns: Option<AttributePatternsMatcher>,
    pub parent: Option<Vec<SpanParent>>,
    pub span_kinds: Option<Vec<SpanKind>>,
    #[serde(deserialize_with = "union::optional_boxed")]
    pub sampler: Option<Box<Sampler>>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeValuesMatcher {
    pub key: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributePatternsMatcher {
    pub key: String,
    /// Absent includes every value, an empty list includes none
    #[serde(default, deserialize_with = "lenient::optional_string_list")]
    pub included: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub excluded: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanParent {
    None,
    Local,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    Internal,
    Server,
    Client,
    Producer,
    Consumer,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JaegerRemoteSampler {
    pub endpoint: Option<String>,
    /// Polling interval in milliseconds
    pub interval: Option<u64>,
    #[serde(deserialize_with = "union::optional_boxed")]
    pub initial_sampler: Option<Box<Sampler>>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}
