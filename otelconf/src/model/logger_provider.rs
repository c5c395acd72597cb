// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{OtlpFileExporter, OtlpGrpcExporter, OtlpHttpExporter};
use super::lenient;
use super::union::{self, Empty};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerProvider {
    #[serde(deserialize_with = "lenient::list")]
    pub processors: Vec<LogRecordProcessor>,
    pub limits: Option<LogRecordLimits>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogRecordLimits {
    pub attribute_value_length_limit: Option<u64>,
    pub attribute_count_limit: Option<u64>,
}

crate::union_node! {
    pub enum LogRecordProcessor: "LogRecordProcessor" {
        "batch" => Batch(BatchLogRecordProcessor),
        "simple" => Simple(SimpleLogRecordProcessor),
    }
}

/// Durations are in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchLogRecordProcessor {
    pub schedule_delay: Option<u64>,
    pub export_timeout: Option<u64>,
    pub max_queue_size: Option<u64>,
    pub max_export_batch_size: Option<u64>,
    #[serde(deserialize_with = "union::optional")]
    pub exporter: Option<LogRecordExporter>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleLogRecordProcessor {
    #[serde(deserialize_with = "union::optional")]
    pub exporter: Option<LogRecordExporter>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

crate::union_node! {
    pub enum LogRecordExporter: "LogRecordExporter" {
        "otlp_http" => OtlpHttp(OtlpHttpExporter),
        "otlp_grpc" => OtlpGrpc(OtlpGrpcExporter),
        "otlp_file/development" => OtlpFileDevelopment(OtlpFileExporter),
        "console" => Console(Empty),
    }
}
