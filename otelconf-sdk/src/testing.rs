// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Recording fakes shared by the unit tests of this crate

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use opentelemetry_sdk::error::OTelSdkResult;
use opentelemetry_sdk::logs::LogBatch;
use opentelemetry_sdk::metrics::data::ResourceMetrics;
use opentelemetry::trace::{Span as _, Tracer as _, TracerProvider as _};
use opentelemetry_sdk::trace::{SdkTracerProvider, SpanData};

use crate::components::sdk_bridge::BridgedSpanProcessor;
use crate::components::{Component, LogRecordExporter, MetricExporter, SpanExporter, SpanProcessor};

#[derive(Debug, Default)]
struct Recording {
    exported: AtomicUsize,
    closes: AtomicUsize,
}

/// Counts what it exports and how often it is closed. Clones share their counters.
#[derive(Debug, Default, Clone)]
pub(crate) struct RecordingExporter(Arc<Recording>);

impl RecordingExporter {
    pub(crate) fn exported(&self) -> usize {
        self.0.exported.load(Ordering::SeqCst)
    }

    pub(crate) fn closes(&self) -> usize {
        self.0.closes.load(Ordering::SeqCst)
    }
}

impl Component for RecordingExporter {
    fn shutdown(&self) -> OTelSdkResult {
        self.0.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl SpanExporter for RecordingExporter {
    fn export(&self, batch: Vec<SpanData>) -> OTelSdkResult {
        self.0.exported.fetch_add(batch.len(), Ordering::SeqCst);
        Ok(())
    }
}

impl MetricExporter for RecordingExporter {
    fn export(&self, _metrics: &ResourceMetrics) -> OTelSdkResult {
        self.0.exported.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl LogRecordExporter for RecordingExporter {
    fn export(&self, batch: LogBatch<'_>) -> OTelSdkResult {
        self.0.exported.fetch_add(batch.iter().count(), Ordering::SeqCst);
        Ok(())
    }
}

/// Ends one sampled span per name through `processor`.
///
/// Dropping the returned provider flushes the processor.
pub(crate) fn end_spans(
    processor: Arc<dyn SpanProcessor>,
    names: &[&'static str],
) -> SdkTracerProvider {
    let provider = SdkTracerProvider::builder()
        .with_span_processor(BridgedSpanProcessor(processor))
        .build();
    let tracer = provider.tracer("test");
    for name in names {
        tracer.start(*name).end();
    }
    provider
}
