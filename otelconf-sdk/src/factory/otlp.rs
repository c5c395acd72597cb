// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! OTLP exporter nodes of every signal, reduced to one set of connection settings.

use std::sync::Arc;

use opentelemetry_sdk::metrics::Temporality;
use otelconf::model::common::{
    NameStringValuePair, OtlpGrpcExporter, OtlpHttpEncoding, OtlpHttpExporter,
};
use otelconf::model::meter_provider::{OtlpGrpcMetricExporter, OtlpHttpMetricExporter};
use otelconf::{ComponentKind, ConfigurationError, Result};

use crate::components::{LogRecordExporter, MetricExporter, SpanExporter};
use crate::context::ConstructionContext;

#[cfg(any(feature = "otlp-http", feature = "otlp-grpc"))]
use crate::components::otlp::{
    OtlpLogRecordExporter, OtlpMetricExporter, OtlpSettings, OtlpSpanExporter, OtlpTransport,
};

/// Fields shared by the `otlp_http` and `otlp_grpc` nodes
#[cfg_attr(
    not(any(feature = "otlp-http", feature = "otlp-grpc")),
    allow(dead_code)
)]
pub(crate) struct OtlpNode<'a> {
    name: &'static str,
    grpc: bool,
    json: bool,
    endpoint: Option<&'a str>,
    headers: &'a [NameStringValuePair],
    headers_list: Option<&'a str>,
    timeout: Option<u64>,
    compression: Option<&'a str>,
    certificate_files: [Option<&'a str>; 3],
}

macro_rules! otlp_node_from {
    ($model:ty, grpc) => {
        impl<'a> From<&'a $model> for OtlpNode<'a> {
            fn from(model: &'a $model) -> Self {
                OtlpNode {
                    name: "otlp_grpc",
                    grpc: true,
                    json: false,
                    endpoint: model.endpoint.as_deref(),
                    headers: &model.headers,
                    headers_list: model.headers_list.as_deref(),
                    timeout: model.timeout,
                    compression: model.compression.as_deref(),
                    certificate_files: [
                        model.certificate_file.as_deref(),
                        model.client_key_file.as_deref(),
                        model.client_certificate_file.as_deref(),
                    ],
                }
            }
        }
    };
    ($model:ty, http) => {
        impl<'a> From<&'a $model> for OtlpNode<'a> {
            fn from(model: &'a $model) -> Self {
                OtlpNode {
                    name: "otlp_http",
                    grpc: false,
                    json: model.encoding == Some(OtlpHttpEncoding::Json),
                    endpoint: model.endpoint.as_deref(),
                    headers: &model.headers,
                    headers_list: model.headers_list.as_deref(),
                    timeout: model.timeout,
                    compression: model.compression.as_deref(),
                    certificate_files: [
                        model.certificate_file.as_deref(),
                        model.client_key_file.as_deref(),
                        model.client_certificate_file.as_deref(),
                    ],
                }
            }
        }
    };
}

otlp_node_from!(OtlpHttpExporter, http);
otlp_node_from!(OtlpHttpMetricExporter, http);
otlp_node_from!(OtlpGrpcExporter, grpc);
otlp_node_from!(OtlpGrpcMetricExporter, grpc);

impl OtlpNode<'_> {
    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    /// `headers_list` entries first, `headers` entries override them
    pub(crate) fn headers(&self) -> Vec<(String, String)> {
        let mut headers: Vec<(String, String)> = Vec::new();
        let mut insert = |name: &str, value: String| {
            match headers.iter_mut().find(|(existing, _)| existing == name) {
                Some(entry) => entry.1 = value,
                None => headers.push((name.to_string(), value)),
            }
        };
        for entry in self
            .headers_list
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
        {
            let Some((name, value)) = entry.split_once('=') else {
                otelconf::conf_warn!("Ignoring {} headers_list entry without '='", self.name);
                continue;
            };
            match urlencoding::decode(value.trim()) {
                Ok(value) => insert(name.trim(), value.into_owned()),
                Err(e) => otelconf::conf_warn!(
                    "Ignoring {} header {}: invalid encoding: {}",
                    self.name,
                    name.trim(),
                    e
                ),
            }
        }
        for header in self.headers {
            if let Some(value) = &header.value {
                insert(&header.name, value.clone());
            }
        }
        headers
    }

    #[cfg(any(feature = "otlp-http", feature = "otlp-grpc"))]
    fn settings(&self) -> OtlpSettings {
        if let Some(compression) = self.compression.filter(|c| *c != "none") {
            otelconf::conf_warn!(
                "{} compression \"{}\" is not supported, sending uncompressed",
                self.name,
                compression
            );
        }
        if self.certificate_files.iter().any(Option::is_some) {
            otelconf::conf_warn!(
                "{} certificate files are not supported and will be ignored",
                self.name
            );
        }
        let transport = match (self.grpc, self.json) {
            (true, _) => OtlpTransport::Grpc,
            (false, true) => OtlpTransport::HttpJson,
            (false, false) => OtlpTransport::HttpProtobuf,
        };
        let mut settings = OtlpSettings::new(transport);
        settings.endpoint = self.endpoint.map(str::to_owned);
        settings.headers = self.headers().into_iter().collect();
        settings.timeout = super::millis(self.timeout, settings.timeout);
        settings
    }

    fn construction(&self, kind: ComponentKind, source: anyhow::Error) -> ConfigurationError {
        ConfigurationError::construction(kind, self.name, source)
    }
}

#[cfg(any(feature = "otlp-http", feature = "otlp-grpc"))]
pub(crate) fn span_exporter(
    node: OtlpNode<'_>,
    ctx: &mut ConstructionContext,
) -> Result<Arc<dyn SpanExporter>> {
    let exporter = OtlpSpanExporter::new(&node.settings(), ctx.resource())
        .map_err(|e| node.construction(ComponentKind::SpanExporter, e))?;
    let exporter: Arc<dyn SpanExporter> = Arc::new(exporter);
    ctx.track(ComponentKind::SpanExporter, node.name, &exporter);
    Ok(exporter)
}

#[cfg(any(feature = "otlp-http", feature = "otlp-grpc"))]
pub(crate) fn metric_exporter(
    node: OtlpNode<'_>,
    temporality: Temporality,
    ctx: &mut ConstructionContext,
) -> Result<Arc<dyn MetricExporter>> {
    let exporter = OtlpMetricExporter::new(&node.settings(), temporality)
        .map_err(|e| node.construction(ComponentKind::MetricExporter, e))?;
    let exporter: Arc<dyn MetricExporter> = Arc::new(exporter);
    ctx.track(ComponentKind::MetricExporter, node.name, &exporter);
    Ok(exporter)
}

#[cfg(any(feature = "otlp-http", feature = "otlp-grpc"))]
pub(crate) fn log_exporter(
    node: OtlpNode<'_>,
    ctx: &mut ConstructionContext,
) -> Result<Arc<dyn LogRecordExporter>> {
    let exporter = OtlpLogRecordExporter::new(&node.settings(), ctx.resource())
        .map_err(|e| node.construction(ComponentKind::LogRecordExporter, e))?;
    let exporter: Arc<dyn LogRecordExporter> = Arc::new(exporter);
    ctx.track(ComponentKind::LogRecordExporter, node.name, &exporter);
    Ok(exporter)
}

#[cfg(not(any(feature = "otlp-http", feature = "otlp-grpc")))]
fn unavailable(node: &OtlpNode<'_>, kind: ComponentKind) -> ConfigurationError {
    node.construction(
        kind,
        anyhow::anyhow!("OTLP exporters require the 'otlp-http' or 'otlp-grpc' feature"),
    )
}

#[cfg(not(any(feature = "otlp-http", feature = "otlp-grpc")))]
pub(crate) fn span_exporter(
    node: OtlpNode<'_>,
    _ctx: &mut ConstructionContext,
) -> Result<Arc<dyn SpanExporter>> {
    Err(unavailable(&node, ComponentKind::SpanExporter))
}

#[cfg(not(any(feature = "otlp-http", feature = "otlp-grpc")))]
pub(crate) fn metric_exporter(
    node: OtlpNode<'_>,
    _temporality: Temporality,
    _ctx: &mut ConstructionContext,
) -> Result<Arc<dyn MetricExporter>> {
    Err(unavailable(&node, ComponentKind::MetricExporter))
}

#[cfg(not(any(feature = "otlp-http", feature = "otlp-grpc")))]
pub(crate) fn log_exporter(
    node: OtlpNode<'_>,
    _ctx: &mut ConstructionContext,
) -> Result<Arc<dyn LogRecordExporter>> {
    Err(unavailable(&node, ComponentKind::LogRecordExporter))
}
