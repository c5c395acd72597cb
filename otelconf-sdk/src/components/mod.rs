// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Capabilities a configured component can fill.
//!
//! Exporters, processors and readers are shared as `Arc<dyn ..>` between the pipeline using
//! them and the build ledger that closes them, so every trait here takes `&self`.

use std::fmt;

use opentelemetry::InstrumentationScope;
use opentelemetry_sdk::error::{OTelSdkError, OTelSdkResult};
use opentelemetry_sdk::logs::{LogBatch, SdkLogRecord};
use opentelemetry_sdk::metrics::data::ResourceMetrics;
use opentelemetry_sdk::metrics::Temporality;
use opentelemetry_sdk::trace::SpanData;

pub mod batch;
pub mod console;
pub mod log_processor;
pub mod metric_reader;
#[cfg(any(feature = "otlp-http", feature = "otlp-grpc"))]
pub mod otlp;
pub(crate) mod sdk_bridge;
pub mod span_processor;
pub mod view;

/// Anything the build ledger can close
pub trait Component: Send + Sync + fmt::Debug {
    /// Releases the component. The owner of the build calls it once.
    fn shutdown(&self) -> OTelSdkResult {
        Ok(())
    }
}

pub trait SpanExporter: Component {
    fn export(&self, batch: Vec<SpanData>) -> OTelSdkResult;
}

pub trait SpanProcessor: Component {
    fn on_end(&self, span: SpanData);

    fn force_flush(&self) -> OTelSdkResult;
}

pub trait MetricExporter: Component {
    fn export(&self, metrics: &ResourceMetrics) -> OTelSdkResult;

    fn force_flush(&self) -> OTelSdkResult {
        Ok(())
    }

    fn temporality(&self) -> Temporality {
        Temporality::Cumulative
    }
}

pub trait LogRecordExporter: Component {
    fn export(&self, batch: LogBatch<'_>) -> OTelSdkResult;
}

pub trait LogRecordProcessor: Component {
    fn emit(&self, record: &mut SdkLogRecord, scope: &InstrumentationScope);

    fn force_flush(&self) -> OTelSdkResult;
}

/// Serializes access to an SDK exporter whose methods may need `&mut self`
pub(crate) struct Exclusive<E> {
    inner: std::sync::Mutex<E>,
}

impl<E> Exclusive<E> {
    pub(crate) fn new(inner: E) -> Self {
        Exclusive {
            inner: std::sync::Mutex::new(inner),
        }
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut E) -> R) -> Result<R, OTelSdkError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| OTelSdkError::InternalFailure("exporter lock poisoned".to_string()))?;
        Ok(f(&mut guard))
    }
}

/// Keeps the first error while still running every step
pub(crate) fn first_error(results: impl IntoIterator<Item = OTelSdkResult>) -> OTelSdkResult {
    results
        .into_iter()
        .fold(Ok(()), |acc, result| acc.and(result))
}
