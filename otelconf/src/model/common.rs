// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Nodes shared by several providers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NameStringValuePair {
    pub name: String,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub value: Option<String>,
}

/// Glob based include / exclude filter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncludeExclude {
    #[serde(deserialize_with = "lenient::string_list")]
    pub included: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub excluded: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtlpHttpEncoding {
    #[default]
    Protobuf,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtlpHttpExporter {
    pub endpoint: Option<String>,
    pub certificate_file: Option<String>,
    pub client_key_file: Option<String>,
    pub client_certificate_file: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub headers: Vec<NameStringValuePair>,
    pub headers_list: Option<String>,
    pub compression: Option<String>,
    /// Milliseconds
    pub timeout: Option<u64>,
    pub encoding: Option<OtlpHttpEncoding>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtlpGrpcExporter {
    pub endpoint: Option<String>,
    pub certificate_file: Option<String>,
    pub client_key_file: Option<String>,
    pub client_certificate_file: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub headers: Vec<NameStringValuePair>,
    pub headers_list: Option<String>,
    pub compression: Option<String>,
    /// Milliseconds
    pub timeout: Option<u64>,
    pub insecure: Option<bool>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtlpFileExporter {
    /// `stdout` or a `file:///` URI
    pub output_stream: Option<String>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}
