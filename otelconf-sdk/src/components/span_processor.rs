// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::sync::Arc;

use opentelemetry_sdk::error::OTelSdkResult;
use opentelemetry_sdk::trace::{self, SpanData, SpanProcessor as SdkSpanProcessor};
use otelconf::conf_warn;

use super::batch::BatchConfig;
use super::sdk_bridge::BridgedSpanExporter;
use super::{Component, SpanExporter, SpanProcessor};

/// Exports every sampled span as soon as it ends
pub struct SimpleSpanProcessor {
    exporter: Arc<dyn SpanExporter>,
}

impl fmt::Debug for SimpleSpanProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleSpanProcessor")
            .field("exporter", &self.exporter)
            .finish()
    }
}

impl SimpleSpanProcessor {
    pub fn new(exporter: Arc<dyn SpanExporter>) -> Self {
        SimpleSpanProcessor { exporter }
    }

    pub fn exporter(&self) -> &Arc<dyn SpanExporter> {
        &self.exporter
    }
}

impl Component for SimpleSpanProcessor {}

impl SpanProcessor for SimpleSpanProcessor {
    fn on_end(&self, span: SpanData) {
        if !span.span_context.is_sampled() {
            return;
        }
        if let Err(e) = self.exporter.export(vec![span]) {
            conf_warn!("SimpleSpanProcessor.on_end message='Failed to export span' error='{e}'");
        }
    }

    fn force_flush(&self) -> OTelSdkResult {
        Ok(())
    }
}

/// Queues sampled spans and exports them in batches from a background thread.
///
/// A batch leaves once `max_export_batch_size` spans are waiting or `schedule_delay` has
/// passed since the last export. Shutting down drains the queue and stops the thread but
/// leaves the exporter open.
pub struct BatchSpanProcessor {
    exporter: Arc<dyn SpanExporter>,
    inner: trace::BatchSpanProcessor,
    config: BatchConfig,
}

impl fmt::Debug for BatchSpanProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchSpanProcessor")
            .field("exporter", &self.exporter)
            .field("config", &self.config)
            .finish()
    }
}

impl BatchSpanProcessor {
    pub fn new(exporter: Arc<dyn SpanExporter>, config: BatchConfig) -> Self {
        let inner = trace::BatchSpanProcessor::builder(BridgedSpanExporter(Arc::clone(&exporter)))
            .with_batch_config(config.trace_config())
            .build();
        BatchSpanProcessor {
            exporter,
            inner,
            config,
        }
    }

    pub fn exporter(&self) -> &Arc<dyn SpanExporter> {
        &self.exporter
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }
}

impl Component for BatchSpanProcessor {
    fn shutdown(&self) -> OTelSdkResult {
        SdkSpanProcessor::shutdown(&self.inner)
    }
}

impl SpanProcessor for BatchSpanProcessor {
    fn on_end(&self, span: SpanData) {
        if span.span_context.is_sampled() {
            SdkSpanProcessor::on_end(&self.inner, span);
        }
    }

    fn force_flush(&self) -> OTelSdkResult {
        SdkSpanProcessor::force_flush(&self.inner)
    }
}
