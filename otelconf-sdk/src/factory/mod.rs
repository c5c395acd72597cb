// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! One factory per capability kind, turning model nodes into live components.
//!
//! Factories take the node to build (`None` when it is absent from the document) and the
//! [`ConstructionContext`](crate::context::ConstructionContext) of the current build. Well-known
//! variants without a built-in implementation and plugin nodes are built by the provider
//! registered under their name.

pub mod aggregation;
pub mod cardinality_limits;
pub mod exemplar_filter;
pub mod limits;
pub mod log_exporter;
pub mod log_processor;
pub mod logger_provider;
pub mod meter_provider;
pub mod metric_exporter;
pub mod metric_reader;
pub mod propagator;
pub mod resource;
pub mod sampler;
pub mod span_exporter;
pub mod span_processor;
pub mod tracer_provider;
pub mod view;

mod otlp;

use std::time::Duration;

use otelconf::model::PluginComponent;
use otelconf::{ComponentKind, ConfigurationError, Result};
use serde::Serialize;

/// Plugin node for a well-known variant resolved through the registry
fn delegated<T: Serialize>(kind: ComponentKind, name: &str, body: &T) -> Result<PluginComponent> {
    let properties =
        serde_json::to_value(body).map_err(|e| ConfigurationError::construction(kind, name, e))?;
    Ok(PluginComponent {
        name: name.to_string(),
        properties,
    })
}

fn millis(value: Option<u64>, default: Duration) -> Duration {
    value.map_or(default, Duration::from_millis)
}

fn count(value: Option<u64>, default: usize) -> usize {
    value.map_or(default, |v| usize::try_from(v).unwrap_or(usize::MAX))
}
