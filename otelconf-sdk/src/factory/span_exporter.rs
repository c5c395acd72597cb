// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use otelconf::model::tracer_provider::SpanExporter as SpanExporterModel;
use otelconf::model::UnionNode as _;
use otelconf::{ComponentKind, Result};

use super::{delegated, otlp};
use crate::components::console::ConsoleSpanExporter;
use crate::components::SpanExporter;
use crate::context::ConstructionContext;

pub fn create(
    model: &SpanExporterModel,
    ctx: &mut ConstructionContext,
) -> Result<Arc<dyn SpanExporter>> {
    match model {
        SpanExporterModel::OtlpHttp(model) => otlp::span_exporter(model.into(), ctx),
        SpanExporterModel::OtlpGrpc(model) => otlp::span_exporter(model.into(), ctx),
        SpanExporterModel::Console(_) => {
            let exporter: Arc<dyn SpanExporter> =
                Arc::new(ConsoleSpanExporter::new(ctx.resource()));
            ctx.track(ComponentKind::SpanExporter, model.variant_name(), &exporter);
            Ok(exporter)
        }
        SpanExporterModel::OtlpFileDevelopment(body) => {
            ctx.create_plugin(&delegated(ComponentKind::SpanExporter, model.variant_name(), body)?)
        }
        SpanExporterModel::Zipkin(body) => {
            ctx.create_plugin(&delegated(ComponentKind::SpanExporter, model.variant_name(), body)?)
        }
        SpanExporterModel::Plugin(plugin) => ctx.create_plugin(plugin),
    }
}
