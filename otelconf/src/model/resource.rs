// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::IncludeExclude;
use super::lenient;
use super::union::Empty;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    #[serde(deserialize_with = "lenient::list")]
    pub attributes: Vec<AttributeNameValue>,
    /// `key1=value1,key2=value2`, values percent-encoded
    pub attributes_list: Option<String>,
    pub schema_url: Option<String>,
    #[serde(rename = "detection/development")]
    pub detection: Option<ResourceDetection>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeNameValue {
    pub name: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default, rename = "type")]
    pub attribute_type: Option<AttributeType>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    #[default]
    String,
    Bool,
    Int,
    Double,
    StringArray,
    BoolArray,
    IntArray,
    DoubleArray,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceDetection {
    /// Filter applied to detected attributes only
    pub attributes: Option<IncludeExclude>,
    #[serde(deserialize_with = "lenient::list")]
    pub detectors: Vec<ResourceDetector>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

crate::union_node! {
    pub enum ResourceDetector: "ResourceDetector" {
        "container" => Container(Empty),
        "host" => Host(Empty),
        "os" => Os(Empty),
        "process" => Process(Empty),
        "service" => Service(Empty),
    }
}
