// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use otelconf::model::meter_provider;
use otelconf::{conf_warn, ConfigurationError, Result};
use otelconf_sampling::glob_matcher::GlobMatcher;

use super::{aggregation, count};
use crate::components::metric_reader::DEFAULT_CARDINALITY_LIMIT;
use crate::components::view::{InstrumentSelector, StreamConfig, View};
use crate::context::ConstructionContext;

pub fn create(model: &meter_provider::View, ctx: &mut ConstructionContext) -> Result<View> {
    let selector = model
        .selector
        .as_ref()
        .ok_or_else(|| ConfigurationError::required("view", "selector"))?;
    let stream = model
        .stream
        .as_ref()
        .ok_or_else(|| ConfigurationError::required("view", "stream"))?;
    let stream = stream_config(stream, ctx)?;
    stream
        .sdk_stream(stream.cardinality_limit.unwrap_or(DEFAULT_CARDINALITY_LIMIT))
        .map_err(|e| ConfigurationError::Validation(format!("view stream is invalid: {e}")))?;
    if stream.attribute_keys_included.is_none() && !stream.attribute_keys_excluded.is_empty() {
        conf_warn!("view attribute_keys excluded without included keeps every attribute");
    }
    Ok(View {
        selector: InstrumentSelector {
            instrument_name: selector.instrument_name.as_deref().map(GlobMatcher::new),
            instrument_type: selector.instrument_type,
            unit: selector.unit.clone(),
            meter_name: selector.meter_name.clone(),
            meter_version: selector.meter_version.clone(),
            meter_schema_url: selector.meter_schema_url.clone(),
        },
        stream,
    })
}

fn stream_config(
    model: &meter_provider::ViewStream,
    ctx: &mut ConstructionContext,
) -> Result<StreamConfig> {
    let (included, excluded) = match &model.attribute_keys {
        Some(keys) if !keys.included.is_empty() => {
            (Some(keys.included.clone()), keys.excluded.clone())
        }
        Some(keys) => (None, keys.excluded.clone()),
        None => (None, Vec::new()),
    };
    Ok(StreamConfig {
        name: model.name.clone(),
        description: model.description.clone(),
        aggregation: aggregation::create(model.aggregation.as_ref(), ctx)?,
        cardinality_limit: model
            .aggregation_cardinality_limit
            .map(|limit| count(Some(limit), usize::MAX)),
        attribute_keys_included: included,
        attribute_keys_excluded: excluded,
    })
}
