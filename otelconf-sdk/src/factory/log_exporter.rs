// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use otelconf::model::logger_provider::LogRecordExporter as LogRecordExporterModel;
use otelconf::model::UnionNode as _;
use otelconf::{ComponentKind, Result};

use super::{delegated, otlp};
use crate::components::console::ConsoleLogRecordExporter;
use crate::components::LogRecordExporter;
use crate::context::ConstructionContext;

pub fn create(
    model: &LogRecordExporterModel,
    ctx: &mut ConstructionContext,
) -> Result<Arc<dyn LogRecordExporter>> {
    match model {
        LogRecordExporterModel::OtlpHttp(model) => otlp::log_exporter(model.into(), ctx),
        LogRecordExporterModel::OtlpGrpc(model) => otlp::log_exporter(model.into(), ctx),
        LogRecordExporterModel::Console(_) => {
            let exporter: Arc<dyn LogRecordExporter> =
                Arc::new(ConsoleLogRecordExporter::new(ctx.resource()));
            ctx.track(ComponentKind::LogRecordExporter, model.variant_name(), &exporter);
            Ok(exporter)
        }
        LogRecordExporterModel::OtlpFileDevelopment(body) => {
            ctx.create_plugin(&delegated(ComponentKind::LogRecordExporter, model.variant_name(), body)?)
        }
        LogRecordExporterModel::Plugin(plugin) => ctx.create_plugin(plugin),
    }
}
