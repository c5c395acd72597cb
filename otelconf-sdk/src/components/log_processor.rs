// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::sync::Arc;

use opentelemetry::InstrumentationScope;
use opentelemetry_sdk::error::OTelSdkResult;
use opentelemetry_sdk::logs::{self, LogBatch, LogProcessor, SdkLogRecord};
use otelconf::conf_warn;

use super::batch::BatchConfig;
use super::sdk_bridge::BridgedLogExporter;
use super::{Component, LogRecordExporter, LogRecordProcessor};

pub struct SimpleLogRecordProcessor {
    exporter: Arc<dyn LogRecordExporter>,
}

impl fmt::Debug for SimpleLogRecordProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleLogRecordProcessor")
            .field("exporter", &self.exporter)
            .finish()
    }
}

impl SimpleLogRecordProcessor {
    pub fn new(exporter: Arc<dyn LogRecordExporter>) -> Self {
        SimpleLogRecordProcessor { exporter }
    }

    pub fn exporter(&self) -> &Arc<dyn LogRecordExporter> {
        &self.exporter
    }
}

impl Component for SimpleLogRecordProcessor {}

impl LogRecordProcessor for SimpleLogRecordProcessor {
    fn emit(&self, record: &mut SdkLogRecord, scope: &InstrumentationScope) {
        let refs = [(&*record, scope)];
        if let Err(e) = self.exporter.export(LogBatch::new(&refs)) {
            conf_warn!("SimpleLogRecordProcessor.emit message='Failed to export log' error='{e}'");
        }
    }

    fn force_flush(&self) -> OTelSdkResult {
        Ok(())
    }
}

/// Log record counterpart of [`BatchSpanProcessor`](super::span_processor::BatchSpanProcessor)
pub struct BatchLogRecordProcessor {
    exporter: Arc<dyn LogRecordExporter>,
    inner: logs::BatchLogProcessor,
    config: BatchConfig,
}

impl fmt::Debug for BatchLogRecordProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchLogRecordProcessor")
            .field("exporter", &self.exporter)
            .field("config", &self.config)
            .finish()
    }
}

impl BatchLogRecordProcessor {
    pub fn new(exporter: Arc<dyn LogRecordExporter>, config: BatchConfig) -> Self {
        let inner = logs::BatchLogProcessor::builder(BridgedLogExporter(Arc::clone(&exporter)))
            .with_batch_config(config.log_config())
            .build();
        BatchLogRecordProcessor {
            exporter,
            inner,
            config,
        }
    }

    pub fn exporter(&self) -> &Arc<dyn LogRecordExporter> {
        &self.exporter
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }
}

impl Component for BatchLogRecordProcessor {
    fn shutdown(&self) -> OTelSdkResult {
        LogProcessor::shutdown(&self.inner)
    }
}

impl LogRecordProcessor for BatchLogRecordProcessor {
    fn emit(&self, record: &mut SdkLogRecord, scope: &InstrumentationScope) {
        LogProcessor::emit(&self.inner, record, scope)
    }

    fn force_flush(&self) -> OTelSdkResult {
        LogProcessor::force_flush(&self.inner)
    }
}
