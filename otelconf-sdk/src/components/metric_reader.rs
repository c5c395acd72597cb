// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use opentelemetry_sdk::metrics::reader::MetricReader as SdkMetricReader;
use opentelemetry_sdk::metrics::{MeterProviderBuilder, PeriodicReader};
use otelconf::model::meter_provider::InstrumentType;
use otelconf::{conf_debug, conf_warn};

use super::sdk_bridge::BridgedMetricExporter;
use super::{Component, MetricExporter};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(60_000);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);
pub const DEFAULT_CARDINALITY_LIMIT: usize = 2000;

/// Cap on distinct attribute sets per instrument kind, unset kinds use `default`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardinalityLimits {
    pub default: usize,
    pub counter: Option<usize>,
    pub gauge: Option<usize>,
    pub histogram: Option<usize>,
    pub observable_counter: Option<usize>,
    pub observable_gauge: Option<usize>,
    pub observable_up_down_counter: Option<usize>,
    pub up_down_counter: Option<usize>,
}

impl Default for CardinalityLimits {
    fn default() -> Self {
        CardinalityLimits {
            default: DEFAULT_CARDINALITY_LIMIT,
            counter: None,
            gauge: None,
            histogram: None,
            observable_counter: None,
            observable_gauge: None,
            observable_up_down_counter: None,
            up_down_counter: None,
        }
    }
}

impl CardinalityLimits {
    /// The tighter limit of both, kind by kind
    pub fn min(&self, other: &CardinalityLimits) -> CardinalityLimits {
        let min = |a: Option<usize>, b: Option<usize>, default_a: usize, default_b: usize| {
            match (a, b) {
                (None, None) => None,
                (a, b) => Some(a.unwrap_or(default_a).min(b.unwrap_or(default_b))),
            }
        };
        CardinalityLimits {
            default: self.default.min(other.default),
            counter: min(self.counter, other.counter, self.default, other.default),
            gauge: min(self.gauge, other.gauge, self.default, other.default),
            histogram: min(self.histogram, other.histogram, self.default, other.default),
            observable_counter: min(
                self.observable_counter,
                other.observable_counter,
                self.default,
                other.default,
            ),
            observable_gauge: min(
                self.observable_gauge,
                other.observable_gauge,
                self.default,
                other.default,
            ),
            observable_up_down_counter: min(
                self.observable_up_down_counter,
                other.observable_up_down_counter,
                self.default,
                other.default,
            ),
            up_down_counter: min(
                self.up_down_counter,
                other.up_down_counter,
                self.default,
                other.default,
            ),
        }
    }

    pub fn limit_for(&self, instrument: InstrumentType) -> usize {
        let specific = match instrument {
            InstrumentType::Counter => self.counter,
            InstrumentType::Gauge => self.gauge,
            InstrumentType::Histogram => self.histogram,
            InstrumentType::ObservableCounter => self.observable_counter,
            InstrumentType::ObservableGauge => self.observable_gauge,
            InstrumentType::ObservableUpDownCounter => self.observable_up_down_counter,
            InstrumentType::UpDownCounter => self.up_down_counter,
        };
        specific.unwrap_or(self.default)
    }
}

type Install = Box<dyn FnOnce(MeterProviderBuilder) -> MeterProviderBuilder + Send>;

/// Settings of a reader pushing to an exporter on a fixed interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PeriodicSettings {
    fn default() -> Self {
        PeriodicSettings {
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// A metric reader waiting to be installed on the meter provider.
///
/// The SDK reader is created on install, so a build failing before the meter provider exists
/// never starts a reader thread. Installed readers are shut down with the meter provider.
pub struct MetricReader {
    install: Mutex<Option<Install>>,
    periodic: Option<PeriodicSettings>,
    cardinality_limits: Option<CardinalityLimits>,
}

impl fmt::Debug for MetricReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricReader")
            .field("periodic", &self.periodic)
            .field("cardinality_limits", &self.cardinality_limits)
            .finish()
    }
}

impl MetricReader {
    /// Wraps a ready SDK reader, as pull exporters provide
    pub fn new<R: SdkMetricReader>(reader: R) -> Self {
        MetricReader::from_install(Box::new(move |builder: MeterProviderBuilder| {
            builder.with_reader(reader)
        }))
    }

    /// Pushes to `exporter` every `settings.interval`, leaving it open on shutdown
    pub fn periodic(exporter: Arc<dyn MetricExporter>, settings: PeriodicSettings) -> Self {
        if settings.timeout != DEFAULT_TIMEOUT {
            conf_debug!(
                "periodic metric reader timeout {:?} is left to the exporter",
                settings.timeout
            );
        }
        let install: Install = Box::new(move |builder: MeterProviderBuilder| {
            builder.with_reader(
                PeriodicReader::builder(BridgedMetricExporter(exporter))
                    .with_interval(settings.interval)
                    .build(),
            )
        });
        let mut reader = MetricReader::from_install(install);
        reader.periodic = Some(settings);
        reader
    }

    fn from_install(install: Install) -> Self {
        MetricReader {
            install: Mutex::new(Some(install)),
            periodic: None,
            cardinality_limits: None,
        }
    }

    pub fn with_cardinality_limits(mut self, limits: CardinalityLimits) -> Self {
        self.cardinality_limits = Some(limits);
        self
    }

    pub fn periodic_settings(&self) -> Option<&PeriodicSettings> {
        self.periodic.as_ref()
    }

    pub fn cardinality_limits(&self) -> Option<&CardinalityLimits> {
        self.cardinality_limits.as_ref()
    }

    /// Adds the SDK reader to `builder`. A reader is only ever installed once.
    pub(crate) fn install(&self, builder: MeterProviderBuilder) -> MeterProviderBuilder {
        let install = match self.install.lock() {
            Ok(mut install) => install.take(),
            Err(_) => None,
        };
        match install {
            Some(install) => install(builder),
            None => {
                conf_warn!("Metric reader is already installed on a meter provider");
                builder
            }
        }
    }
}

impl Component for MetricReader {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinality_limit_fallback() {
        let limits = CardinalityLimits {
            default: 100,
            histogram: Some(10),
            ..CardinalityLimits::default()
        };
        assert_eq!(limits.limit_for(InstrumentType::Histogram), 10);
        assert_eq!(limits.limit_for(InstrumentType::Counter), 100);
        assert_eq!(
            CardinalityLimits::default().limit_for(InstrumentType::Gauge),
            DEFAULT_CARDINALITY_LIMIT
        );
    }

    #[test]
    fn test_tighter_limit_wins() {
        let first = CardinalityLimits {
            default: 100,
            histogram: Some(10),
            ..CardinalityLimits::default()
        };
        let second = CardinalityLimits {
            default: 50,
            counter: Some(80),
            ..CardinalityLimits::default()
        };
        let merged = first.min(&second);
        assert_eq!(merged.limit_for(InstrumentType::Histogram), 10);
        assert_eq!(merged.limit_for(InstrumentType::Counter), 80);
        assert_eq!(merged.limit_for(InstrumentType::Gauge), 50);
    }

    #[test]
    fn test_reader_installs_once() {
        let reader = MetricReader::new(opentelemetry_sdk::metrics::ManualReader::builder().build());
        let builder = reader.install(opentelemetry_sdk::metrics::SdkMeterProvider::builder());
        let builder = reader.install(builder);
        builder.build().shutdown().expect("shuts down");
    }
}
