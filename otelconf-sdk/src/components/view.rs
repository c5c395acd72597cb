// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use opentelemetry::Key;
use opentelemetry_sdk::metrics::{self as sdk, Instrument, InstrumentKind, Stream};
use otelconf::model::meter_provider::InstrumentType;
use otelconf_sampling::glob_matcher::GlobMatcher;

/// How a matched instrument's measurements are combined
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Aggregation {
    /// Whatever the instrument kind uses by default
    #[default]
    Default,
    Drop,
    Sum,
    LastValue,
    ExplicitBucketHistogram {
        boundaries: Vec<f64>,
        record_min_max: bool,
    },
    Base2ExponentialHistogram {
        max_size: u32,
        max_scale: i8,
        record_min_max: bool,
    },
}

impl Aggregation {
    /// `None` leaves the instrument's default aggregation in place
    pub(crate) fn to_sdk(&self) -> Option<sdk::Aggregation> {
        match self {
            Aggregation::Default => None,
            Aggregation::Drop => Some(sdk::Aggregation::Drop),
            Aggregation::Sum => Some(sdk::Aggregation::Sum),
            Aggregation::LastValue => Some(sdk::Aggregation::LastValue),
            Aggregation::ExplicitBucketHistogram {
                boundaries,
                record_min_max,
            } => Some(sdk::Aggregation::ExplicitBucketHistogram {
                boundaries: boundaries.clone(),
                record_min_max: *record_min_max,
            }),
            Aggregation::Base2ExponentialHistogram {
                max_size,
                max_scale,
                record_min_max,
            } => Some(sdk::Aggregation::Base2ExponentialHistogram {
                max_size: *max_size,
                max_scale: *max_scale,
                record_min_max: *record_min_max,
            }),
        }
    }
}

pub const DEFAULT_HISTOGRAM_BOUNDARIES: [f64; 15] = [
    0.0, 5.0, 10.0, 25.0, 50.0, 75.0, 100.0, 250.0, 500.0, 750.0, 1000.0, 2500.0, 5000.0,
    7500.0, 10000.0,
];
pub const DEFAULT_EXPONENTIAL_MAX_SIZE: u32 = 160;
pub const DEFAULT_EXPONENTIAL_MAX_SCALE: i8 = 20;

/// Which instruments a view applies to. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstrumentSelector {
    pub instrument_name: Option<GlobMatcher>,
    pub instrument_type: Option<InstrumentType>,
    pub unit: Option<String>,
    pub meter_name: Option<String>,
    pub meter_version: Option<String>,
    pub meter_schema_url: Option<String>,
}

#[allow(unreachable_patterns)]
pub(crate) fn instrument_type(kind: InstrumentKind) -> Option<InstrumentType> {
    match kind {
        InstrumentKind::Counter => Some(InstrumentType::Counter),
        InstrumentKind::Gauge => Some(InstrumentType::Gauge),
        InstrumentKind::Histogram => Some(InstrumentType::Histogram),
        InstrumentKind::ObservableCounter => Some(InstrumentType::ObservableCounter),
        InstrumentKind::ObservableGauge => Some(InstrumentType::ObservableGauge),
        InstrumentKind::ObservableUpDownCounter => Some(InstrumentType::ObservableUpDownCounter),
        InstrumentKind::UpDownCounter => Some(InstrumentType::UpDownCounter),
        _ => None,
    }
}

impl InstrumentSelector {
    pub fn matches(
        &self,
        instrument_name: &str,
        instrument_type: InstrumentType,
        unit: &str,
        meter_name: &str,
    ) -> bool {
        self.matches_parts(instrument_name, Some(instrument_type), unit, meter_name)
    }

    /// Matches an instrument registered with the SDK meter provider
    pub fn matches_instrument(&self, instrument: &Instrument) -> bool {
        let scope = instrument.scope();
        self.matches_parts(
            instrument.name(),
            instrument_type(instrument.kind()),
            instrument.unit(),
            scope.name(),
        ) && self
            .meter_version
            .as_deref()
            .is_none_or(|v| scope.version() == Some(v))
            && self
                .meter_schema_url
                .as_deref()
                .is_none_or(|u| scope.schema_url() == Some(u))
    }

    fn matches_parts(
        &self,
        instrument_name: &str,
        instrument_type: Option<InstrumentType>,
        unit: &str,
        meter_name: &str,
    ) -> bool {
        self.instrument_name
            .as_ref()
            .is_none_or(|glob| glob.matches(instrument_name))
            && self
                .instrument_type
                .is_none_or(|t| Some(t) == instrument_type)
            && self.unit.as_deref().is_none_or(|u| u == unit)
            && self.meter_name.as_deref().is_none_or(|m| m == meter_name)
    }
}

/// Overrides applied to the streams of matched instruments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamConfig {
    pub name: Option<String>,
    pub description: Option<String>,
    pub aggregation: Aggregation,
    pub cardinality_limit: Option<usize>,
    pub attribute_keys_included: Option<Vec<String>>,
    pub attribute_keys_excluded: Vec<String>,
}

impl StreamConfig {
    /// Whether an attribute survives the include and exclude lists
    pub fn keeps_attribute(&self, key: &str) -> bool {
        let included = self
            .attribute_keys_included
            .as_ref()
            .is_none_or(|keys| keys.iter().any(|k| k == key));
        included && !self.attribute_keys_excluded.iter().any(|k| k == key)
    }

    /// The included keys minus the excluded ones, `None` when every key is allowed
    pub fn allowed_attribute_keys(&self) -> Option<Vec<String>> {
        self.attribute_keys_included.as_ref().map(|keys| {
            keys.iter()
                .filter(|key| self.keeps_attribute(key))
                .cloned()
                .collect()
        })
    }

    /// The SDK stream replacing the default stream of a selected instrument
    pub(crate) fn sdk_stream(&self, cardinality_limit: usize) -> Result<Stream, String> {
        if cardinality_limit == 0 {
            return Err("cardinality limit must be positive".to_string());
        }
        let mut builder = Stream::builder().with_cardinality_limit(cardinality_limit);
        if let Some(name) = &self.name {
            builder = builder.with_name(name.clone());
        }
        if let Some(description) = &self.description {
            builder = builder.with_description(description.clone());
        }
        if let Some(aggregation) = self.aggregation.to_sdk() {
            builder = builder.with_aggregation(aggregation);
        }
        if let Some(keys) = self.allowed_attribute_keys() {
            builder = builder.with_allowed_attribute_keys(keys.into_iter().map(Key::from));
        }
        builder.build().map_err(|e| e.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct View {
    pub selector: InstrumentSelector,
    pub stream: StreamConfig,
}
