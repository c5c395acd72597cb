// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;
use super::union::Empty;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Propagator {
    #[serde(deserialize_with = "lenient::list")]
    pub composite: Vec<TextMapPropagator>,
    /// Comma separated propagator names, merged after `composite`
    pub composite_list: Option<String>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

crate::union_node! {
    pub enum TextMapPropagator: "TextMapPropagator" {
        "tracecontext" => TraceContext(Empty),
        "baggage" => Baggage(Empty),
        "b3" => B3(Empty),
        "b3multi" => B3Multi(Empty),
        "jaeger" => Jaeger(Empty),
        "ottrace" => OtTrace(Empty),
    }
}
