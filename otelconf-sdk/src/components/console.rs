// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Exporters printing to stdout, backed by `opentelemetry-stdout`

use std::fmt;

use futures::executor::block_on;
use opentelemetry_sdk::error::OTelSdkResult;
use opentelemetry_sdk::logs::{LogBatch, LogExporter as _};
use opentelemetry_sdk::metrics::data::ResourceMetrics;
use opentelemetry_sdk::metrics::exporter::PushMetricExporter as _;
use opentelemetry_sdk::metrics::Temporality;
use opentelemetry_sdk::trace::{SpanData, SpanExporter as _};
use opentelemetry_sdk::Resource;

use super::{Component, Exclusive, LogRecordExporter, MetricExporter, SpanExporter};

pub struct ConsoleSpanExporter {
    inner: Exclusive<opentelemetry_stdout::SpanExporter>,
}

impl fmt::Debug for ConsoleSpanExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConsoleSpanExporter")
    }
}

impl ConsoleSpanExporter {
    pub fn new(resource: Option<&Resource>) -> Self {
        let mut exporter = opentelemetry_stdout::SpanExporter::default();
        if let Some(resource) = resource {
            exporter.set_resource(resource);
        }
        ConsoleSpanExporter {
            inner: Exclusive::new(exporter),
        }
    }
}

impl Component for ConsoleSpanExporter {
    fn shutdown(&self) -> OTelSdkResult {
        self.inner.with(|exporter| exporter.shutdown())?
    }
}

impl SpanExporter for ConsoleSpanExporter {
    fn export(&self, batch: Vec<SpanData>) -> OTelSdkResult {
        self.inner.with(|exporter| block_on(exporter.export(batch)))?
    }
}

pub struct ConsoleMetricExporter {
    inner: opentelemetry_stdout::MetricExporter,
    temporality: Temporality,
}

impl fmt::Debug for ConsoleMetricExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleMetricExporter")
            .field("temporality", &self.temporality)
            .finish()
    }
}

impl ConsoleMetricExporter {
    pub fn new(temporality: Temporality) -> Self {
        ConsoleMetricExporter {
            inner: opentelemetry_stdout::MetricExporter::builder()
                .with_temporality(temporality)
                .build(),
            temporality,
        }
    }
}

impl Component for ConsoleMetricExporter {
    fn shutdown(&self) -> OTelSdkResult {
        self.inner.shutdown()
    }
}

impl MetricExporter for ConsoleMetricExporter {
    fn export(&self, metrics: &ResourceMetrics) -> OTelSdkResult {
        block_on(self.inner.export(metrics))
    }

    fn force_flush(&self) -> OTelSdkResult {
        self.inner.force_flush()
    }

    fn temporality(&self) -> Temporality {
        self.temporality
    }
}

pub struct ConsoleLogRecordExporter {
    inner: Exclusive<opentelemetry_stdout::LogExporter>,
}

impl fmt::Debug for ConsoleLogRecordExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConsoleLogRecordExporter")
    }
}

impl ConsoleLogRecordExporter {
    pub fn new(resource: Option<&Resource>) -> Self {
        let mut exporter = opentelemetry_stdout::LogExporter::default();
        if let Some(resource) = resource {
            exporter.set_resource(resource);
        }
        ConsoleLogRecordExporter {
            inner: Exclusive::new(exporter),
        }
    }
}

impl Component for ConsoleLogRecordExporter {
    fn shutdown(&self) -> OTelSdkResult {
        self.inner.with(|exporter| exporter.shutdown())?
    }
}

impl LogRecordExporter for ConsoleLogRecordExporter {
    fn export(&self, batch: LogBatch<'_>) -> OTelSdkResult {
        self.inner.with(|exporter| block_on(exporter.export(batch)))?
    }
}
