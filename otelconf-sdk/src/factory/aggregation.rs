// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use otelconf::model::meter_provider::Aggregation as AggregationModel;
use otelconf::{ConfigurationError, Result};

use crate::components::view::{
    Aggregation, DEFAULT_EXPONENTIAL_MAX_SCALE, DEFAULT_EXPONENTIAL_MAX_SIZE,
    DEFAULT_HISTOGRAM_BOUNDARIES,
};
use crate::context::ConstructionContext;

const MIN_EXPONENTIAL_SCALE: i8 = -10;
const MAX_EXPONENTIAL_SCALE: i8 = 20;
const MIN_EXPONENTIAL_SIZE: u32 = 2;

pub fn create(model: Option<&AggregationModel>, ctx: &mut ConstructionContext) -> Result<Aggregation> {
    let Some(model) = model else {
        return Ok(Aggregation::Default);
    };
    Ok(match model {
        AggregationModel::Default(_) => Aggregation::Default,
        AggregationModel::Drop(_) => Aggregation::Drop,
        AggregationModel::Sum(_) => Aggregation::Sum,
        AggregationModel::LastValue(_) => Aggregation::LastValue,
        AggregationModel::ExplicitBucketHistogram(model) => {
            let boundaries = model
                .boundaries
                .clone()
                .unwrap_or_else(|| DEFAULT_HISTOGRAM_BOUNDARIES.to_vec());
            if boundaries.windows(2).any(|pair| pair[0] >= pair[1]) {
                return Err(ConfigurationError::Validation(
                    "explicit_bucket_histogram boundaries must be strictly increasing".to_string(),
                ));
            }
            Aggregation::ExplicitBucketHistogram {
                boundaries,
                record_min_max: model.record_min_max.unwrap_or(true),
            }
        }
        AggregationModel::Base2ExponentialBucketHistogram(model) => {
            let max_scale = model.max_scale.unwrap_or(DEFAULT_EXPONENTIAL_MAX_SCALE);
            if !(MIN_EXPONENTIAL_SCALE..=MAX_EXPONENTIAL_SCALE).contains(&max_scale) {
                return Err(ConfigurationError::Validation(format!(
                    "base2_exponential_bucket_histogram max_scale must be between {MIN_EXPONENTIAL_SCALE} and {MAX_EXPONENTIAL_SCALE}"
                )));
            }
            let max_size = model.max_size.unwrap_or(DEFAULT_EXPONENTIAL_MAX_SIZE);
            if max_size < MIN_EXPONENTIAL_SIZE {
                return Err(ConfigurationError::Validation(format!(
                    "base2_exponential_bucket_histogram max_size must be at least {MIN_EXPONENTIAL_SIZE}"
                )));
            }
            Aggregation::Base2ExponentialHistogram {
                max_size,
                max_scale,
                record_min_max: model.record_min_max.unwrap_or(true),
            }
        }
        AggregationModel::Plugin(plugin) => ctx.create_plugin(plugin)?,
    })
}
