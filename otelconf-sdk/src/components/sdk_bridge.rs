// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Adapters plugging configured components into `opentelemetry_sdk` providers.
//!
//! Providers shut their processors down when dropped and the SDK batch processors and readers
//! shut their exporters down. The adapters only flush on shutdown, closing stays with the build
//! ledger.

use std::sync::Arc;
use std::time::Duration;

use opentelemetry::trace::{Link, SamplingResult, SpanKind, TraceId};
use opentelemetry::{Context, InstrumentationScope, KeyValue};
use opentelemetry_sdk::error::OTelSdkResult;
use opentelemetry_sdk::logs::{LogBatch, SdkLogRecord};
use opentelemetry_sdk::metrics::data::ResourceMetrics;
use opentelemetry_sdk::metrics::exporter::PushMetricExporter;
use opentelemetry_sdk::metrics::Temporality;
use opentelemetry_sdk::trace::{ShouldSample, SpanData};

use super::{LogRecordExporter, LogRecordProcessor, MetricExporter, SpanExporter, SpanProcessor};

/// Feeds an SDK batch span processor. The default shutdown leaves the exporter open.
#[derive(Debug)]
pub(crate) struct BridgedSpanExporter(pub(crate) Arc<dyn SpanExporter>);

impl opentelemetry_sdk::trace::SpanExporter for BridgedSpanExporter {
    async fn export(&self, batch: Vec<SpanData>) -> OTelSdkResult {
        self.0.export(batch)
    }
}

/// Feeds an SDK batch log processor. The default shutdown leaves the exporter open.
#[derive(Debug)]
pub(crate) struct BridgedLogExporter(pub(crate) Arc<dyn LogRecordExporter>);

impl opentelemetry_sdk::logs::LogExporter for BridgedLogExporter {
    async fn export(&self, batch: LogBatch<'_>) -> OTelSdkResult {
        self.0.export(batch)
    }
}

/// Feeds an SDK periodic reader
#[derive(Debug)]
pub(crate) struct BridgedMetricExporter(pub(crate) Arc<dyn MetricExporter>);

impl PushMetricExporter for BridgedMetricExporter {
    async fn export(&self, metrics: &ResourceMetrics) -> OTelSdkResult {
        self.0.export(metrics)
    }

    fn force_flush(&self) -> OTelSdkResult {
        self.0.force_flush()
    }

    fn shutdown(&self) -> OTelSdkResult {
        self.0.force_flush()
    }

    fn shutdown_with_timeout(&self, _timeout: Duration) -> OTelSdkResult {
        self.0.force_flush()
    }

    fn temporality(&self) -> Temporality {
        self.0.temporality()
    }
}

#[derive(Debug)]
pub(crate) struct BridgedSpanProcessor(pub(crate) Arc<dyn SpanProcessor>);

impl opentelemetry_sdk::trace::SpanProcessor for BridgedSpanProcessor {
    fn on_start(&self, _span: &mut opentelemetry_sdk::trace::Span, _cx: &Context) {}

    fn on_end(&self, span: SpanData) {
        self.0.on_end(span)
    }

    fn force_flush(&self) -> OTelSdkResult {
        self.0.force_flush()
    }

    fn shutdown(&self) -> OTelSdkResult {
        self.0.force_flush()
    }

    fn shutdown_with_timeout(&self, _timeout: Duration) -> OTelSdkResult {
        self.0.force_flush()
    }
}

#[derive(Debug)]
pub(crate) struct BridgedLogProcessor(pub(crate) Arc<dyn LogRecordProcessor>);

impl opentelemetry_sdk::logs::LogProcessor for BridgedLogProcessor {
    fn emit(&self, data: &mut SdkLogRecord, instrumentation: &InstrumentationScope) {
        self.0.emit(data, instrumentation)
    }

    fn force_flush(&self) -> OTelSdkResult {
        self.0.force_flush()
    }

    fn shutdown(&self) -> OTelSdkResult {
        self.0.force_flush()
    }
}

/// Lets a boxed sampler be handed to a provider builder
#[derive(Clone, Debug)]
pub(crate) struct SharedSampler(pub(crate) Box<dyn ShouldSample>);

impl ShouldSample for SharedSampler {
    fn should_sample(
        &self,
        parent_context: Option<&Context>,
        trace_id: TraceId,
        name: &str,
        span_kind: &SpanKind,
        attributes: &[KeyValue],
        links: &[Link],
    ) -> SamplingResult {
        self.0
            .should_sample(parent_context, trace_id, name, span_kind, attributes, links)
    }
}
