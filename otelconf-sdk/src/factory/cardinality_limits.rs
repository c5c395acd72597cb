// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use otelconf::model::meter_provider;
use otelconf::{ConfigurationError, Result};

use crate::components::metric_reader::CardinalityLimits;

/// Limits per instrument kind. Kinds left unset inherit `default`.
pub fn create(model: Option<&meter_provider::CardinalityLimits>) -> Result<CardinalityLimits> {
    let Some(model) = model else {
        return Ok(CardinalityLimits::default());
    };
    let limit = |name: &str, value: Option<u64>| -> Result<Option<usize>> {
        match value {
            Some(0) => Err(ConfigurationError::Validation(format!(
                "cardinality_limits {name} must be positive"
            ))),
            Some(v) => Ok(Some(usize::try_from(v).unwrap_or(usize::MAX))),
            None => Ok(None),
        }
    };
    Ok(CardinalityLimits {
        default: limit("default", model.default)?.unwrap_or(CardinalityLimits::default().default),
        counter: limit("counter", model.counter)?,
        gauge: limit("gauge", model.gauge)?,
        histogram: limit("histogram", model.histogram)?,
        observable_counter: limit("observable_counter", model.observable_counter)?,
        observable_gauge: limit("observable_gauge", model.observable_gauge)?,
        observable_up_down_counter: limit(
            "observable_up_down_counter",
            model.observable_up_down_counter,
        )?,
        up_down_counter: limit("up_down_counter", model.up_down_counter)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use otelconf::model::meter_provider::InstrumentType;

    #[test]
    fn test_unset_kinds_inherit_default() {
        let limits = create(Some(&meter_provider::CardinalityLimits {
            default: Some(100),
            histogram: Some(10),
            ..Default::default()
        }))
        .expect("valid");
        assert_eq!(limits.limit_for(InstrumentType::Histogram), 10);
        assert_eq!(limits.limit_for(InstrumentType::Counter), 100);
        assert_eq!(
            create(None).expect("valid").limit_for(InstrumentType::Gauge),
            2000
        );
    }

    #[test]
    fn test_zero_is_rejected() {
        let err = create(Some(&meter_provider::CardinalityLimits {
            counter: Some(0),
            ..Default::default()
        }))
        .expect_err("zero");
        assert_eq!(err.to_string(), "cardinality_limits counter must be positive");
    }
}
