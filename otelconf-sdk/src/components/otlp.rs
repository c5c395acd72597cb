// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! OTLP exporters backed by `opentelemetry-otlp`

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "otlp-http")]
use opentelemetry_otlp::{Protocol, WithHttpConfig};
use opentelemetry_sdk::error::OTelSdkResult;
use opentelemetry_sdk::logs::{LogBatch, LogExporter as _};
use opentelemetry_sdk::metrics::data::ResourceMetrics;
use opentelemetry_sdk::metrics::exporter::PushMetricExporter as _;
use opentelemetry_sdk::metrics::Temporality;
use opentelemetry_sdk::trace::{SpanData, SpanExporter as _};
use opentelemetry_sdk::Resource;
use otelconf::conf_warn;

use super::{Component, Exclusive, LogRecordExporter, MetricExporter, SpanExporter};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtlpTransport {
    HttpProtobuf,
    HttpJson,
    Grpc,
}

impl OtlpTransport {
    fn name(&self) -> &'static str {
        match self {
            OtlpTransport::HttpProtobuf | OtlpTransport::HttpJson => "otlp_http",
            OtlpTransport::Grpc => "otlp_grpc",
        }
    }
}

/// Connection settings shared by the OTLP exporters of every signal
#[derive(Debug, Clone, PartialEq)]
pub struct OtlpSettings {
    pub transport: OtlpTransport,
    pub endpoint: Option<String>,
    pub headers: HashMap<String, String>,
    pub timeout: Duration,
}

impl OtlpSettings {
    pub fn new(transport: OtlpTransport) -> Self {
        OtlpSettings {
            transport,
            endpoint: None,
            headers: HashMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Runs export futures to completion.
///
/// gRPC exporters need a tokio runtime both when they are built and when they export.
struct Driver {
    #[cfg(feature = "otlp-grpc")]
    runtime: Option<tokio::runtime::Runtime>,
}

impl Driver {
    fn for_transport(transport: OtlpTransport) -> anyhow::Result<Self> {
        match transport {
            #[cfg(feature = "otlp-grpc")]
            OtlpTransport::Grpc => Ok(Driver {
                runtime: Some(
                    tokio::runtime::Builder::new_current_thread()
                        .enable_all()
                        .build()?,
                ),
            }),
            #[cfg(not(feature = "otlp-grpc"))]
            OtlpTransport::Grpc => {
                anyhow::bail!("otlp_grpc exporters require the 'otlp-grpc' feature")
            }
            #[cfg(feature = "otlp-http")]
            OtlpTransport::HttpProtobuf | OtlpTransport::HttpJson => Ok(Driver {
                #[cfg(feature = "otlp-grpc")]
                runtime: None,
            }),
            #[cfg(not(feature = "otlp-http"))]
            OtlpTransport::HttpProtobuf | OtlpTransport::HttpJson => {
                anyhow::bail!("otlp_http exporters require the 'otlp-http' feature")
            }
        }
    }

    /// Builds within the runtime context when there is one
    fn build<T>(&self, f: impl FnOnce() -> T) -> T {
        #[cfg(feature = "otlp-grpc")]
        if let Some(runtime) = &self.runtime {
            let _guard = runtime.enter();
            return f();
        }
        f()
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        #[cfg(feature = "otlp-grpc")]
        if let Some(runtime) = &self.runtime {
            return runtime.block_on(future);
        }
        futures::executor::block_on(future)
    }
}

fn warn_unapplied_headers(settings: &OtlpSettings) {
    if settings.transport == OtlpTransport::Grpc && !settings.headers.is_empty() {
        conf_warn!("otlp_grpc exporter headers are not supported and will be ignored");
    }
}

#[cfg(feature = "otlp-http")]
fn http_protocol(transport: OtlpTransport) -> Protocol {
    match transport {
        OtlpTransport::HttpJson => Protocol::HttpJson,
        _ => Protocol::HttpBinary,
    }
}

/// Applies the settings common to every signal's builder. Defined as a macro since the
/// builders of each signal are distinct types.
macro_rules! build_exporter {
    ($builder:expr, $settings:expr $(, $extra:ident($arg:expr))*) => {{
        let settings: &OtlpSettings = $settings;
        warn_unapplied_headers(settings);
        match settings.transport {
            #[cfg(feature = "otlp-grpc")]
            OtlpTransport::Grpc => {
                let builder = $builder.with_tonic().with_timeout(settings.timeout)
                    $(.$extra($arg))*;
                let built = match &settings.endpoint {
                    Some(endpoint) => builder.with_endpoint(endpoint.clone()).build(),
                    None => builder.build(),
                };
                built.map_err(anyhow::Error::from)
            }
            #[cfg(feature = "otlp-http")]
            OtlpTransport::HttpProtobuf | OtlpTransport::HttpJson => {
                let builder = $builder
                    .with_http()
                    .with_protocol(http_protocol(settings.transport))
                    .with_timeout(settings.timeout)
                    .with_headers(settings.headers.clone())
                    $(.$extra($arg))*;
                let built = match &settings.endpoint {
                    Some(endpoint) => builder.with_endpoint(endpoint.clone()).build(),
                    None => builder.build(),
                };
                built.map_err(anyhow::Error::from)
            }
            #[allow(unreachable_patterns)]
            transport => Err(anyhow::anyhow!(
                "{} exporters are not enabled in this build",
                transport.name()
            )),
        }
    }};
}

pub struct OtlpSpanExporter {
    inner: Exclusive<opentelemetry_otlp::SpanExporter>,
    driver: Driver,
    transport: OtlpTransport,
}

impl fmt::Debug for OtlpSpanExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtlpSpanExporter")
            .field("transport", &self.transport)
            .finish()
    }
}

impl OtlpSpanExporter {
    pub fn new(settings: &OtlpSettings, resource: Option<&Resource>) -> anyhow::Result<Self> {
        let driver = Driver::for_transport(settings.transport)?;
        let mut exporter = driver.build(|| {
            build_exporter!(opentelemetry_otlp::SpanExporter::builder(), settings)
        })?;
        if let Some(resource) = resource {
            exporter.set_resource(resource);
        }
        Ok(OtlpSpanExporter {
            inner: Exclusive::new(exporter),
            driver,
            transport: settings.transport,
        })
    }
}

impl Component for OtlpSpanExporter {
    fn shutdown(&self) -> OTelSdkResult {
        self.inner.with(|exporter| exporter.shutdown())?
    }
}

impl SpanExporter for OtlpSpanExporter {
    fn export(&self, batch: Vec<SpanData>) -> OTelSdkResult {
        self.inner
            .with(|exporter| self.driver.block_on(exporter.export(batch)))?
    }
}

pub struct OtlpMetricExporter {
    inner: opentelemetry_otlp::MetricExporter,
    driver: Driver,
    transport: OtlpTransport,
    temporality: Temporality,
}

impl fmt::Debug for OtlpMetricExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtlpMetricExporter")
            .field("transport", &self.transport)
            .field("temporality", &self.temporality)
            .finish()
    }
}

impl OtlpMetricExporter {
    pub fn new(settings: &OtlpSettings, temporality: Temporality) -> anyhow::Result<Self> {
        let driver = Driver::for_transport(settings.transport)?;
        let inner = driver.build(|| {
            build_exporter!(
                opentelemetry_otlp::MetricExporter::builder(),
                settings,
                with_temporality(temporality)
            )
        })?;
        Ok(OtlpMetricExporter {
            inner,
            driver,
            transport: settings.transport,
            temporality,
        })
    }
}

impl Component for OtlpMetricExporter {
    fn shutdown(&self) -> OTelSdkResult {
        self.inner.shutdown()
    }
}

impl MetricExporter for OtlpMetricExporter {
    fn export(&self, metrics: &ResourceMetrics) -> OTelSdkResult {
        self.driver.block_on(self.inner.export(metrics))
    }

    fn force_flush(&self) -> OTelSdkResult {
        self.inner.force_flush()
    }

    fn temporality(&self) -> Temporality {
        self.temporality
    }
}

pub struct OtlpLogRecordExporter {
    inner: Exclusive<opentelemetry_otlp::LogExporter>,
    driver: Driver,
    transport: OtlpTransport,
}

impl fmt::Debug for OtlpLogRecordExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtlpLogRecordExporter")
            .field("transport", &self.transport)
            .finish()
    }
}

impl OtlpLogRecordExporter {
    pub fn new(settings: &OtlpSettings, resource: Option<&Resource>) -> anyhow::Result<Self> {
        let driver = Driver::for_transport(settings.transport)?;
        let mut exporter = driver.build(|| {
            build_exporter!(opentelemetry_otlp::LogExporter::builder(), settings)
        })?;
        if let Some(resource) = resource {
            exporter.set_resource(resource);
        }
        Ok(OtlpLogRecordExporter {
            inner: Exclusive::new(exporter),
            driver,
            transport: settings.transport,
        })
    }
}

impl Component for OtlpLogRecordExporter {
    fn shutdown(&self) -> OTelSdkResult {
        self.inner.with(|exporter| exporter.shutdown())?
    }
}

impl LogRecordExporter for OtlpLogRecordExporter {
    fn export(&self, batch: LogBatch<'_>) -> OTelSdkResult {
        self.inner
            .with(|exporter| self.driver.block_on(exporter.export(batch)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "otlp-http")]
    #[test]
    fn test_http_span_exporter_builds_without_connecting() {
        let mut settings = OtlpSettings::new(OtlpTransport::HttpProtobuf);
        settings.endpoint = Some("http://localhost:4318/v1/traces".to_string());
        settings
            .headers
            .insert("api-key".to_string(), "secret".to_string());
        let exporter = OtlpSpanExporter::new(&settings, None).expect("builds");
        assert!(format!("{exporter:?}").contains("HttpProtobuf"));
    }

    #[cfg(not(feature = "otlp-grpc"))]
    #[test]
    fn test_grpc_requires_feature() {
        let settings = OtlpSettings::new(OtlpTransport::Grpc);
        let err = OtlpSpanExporter::new(&settings, None).expect_err("feature disabled");
        assert!(err.to_string().contains("otlp-grpc"));
    }
}
