// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::sync::Arc;

use opentelemetry_sdk::logs::SdkLoggerProvider;
use otelconf::model::{self, AttributeLimits};
use otelconf::Result;

use super::limits::{self, LogRecordLimits};
use super::log_processor;
use crate::components::sdk_bridge::BridgedLogProcessor;
use crate::components::LogRecordProcessor;
use crate::context::ConstructionContext;

/// The configured log record processors and the SDK logger provider wired from them
pub struct LoggerPipeline {
    processors: Vec<Arc<dyn LogRecordProcessor>>,
    limits: LogRecordLimits,
    provider: SdkLoggerProvider,
}

impl fmt::Debug for LoggerPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerPipeline")
            .field("processors", &self.processors)
            .field("limits", &self.limits)
            .finish()
    }
}

impl LoggerPipeline {
    pub fn processors(&self) -> &[Arc<dyn LogRecordProcessor>] {
        &self.processors
    }

    pub fn limits(&self) -> &LogRecordLimits {
        &self.limits
    }

    pub fn provider(&self) -> &SdkLoggerProvider {
        &self.provider
    }
}

pub fn create(
    model: Option<&model::LoggerProvider>,
    attribute_limits: Option<&AttributeLimits>,
    ctx: &mut ConstructionContext,
) -> Result<Option<LoggerPipeline>> {
    let Some(model) = model else {
        return Ok(None);
    };
    let limits = limits::log_record_limits(model.limits.as_ref(), attribute_limits);
    let processors = model
        .processors
        .iter()
        .map(|processor| log_processor::create(processor, ctx))
        .collect::<Result<Vec<_>>>()?;

    let mut builder = SdkLoggerProvider::builder();
    if let Some(resource) = ctx.resource() {
        builder = builder.with_resource(resource.clone());
    }
    for processor in &processors {
        builder = builder.with_log_processor(BridgedLogProcessor(Arc::clone(processor)));
    }

    Ok(Some(LoggerPipeline {
        processors,
        limits,
        provider: builder.build(),
    }))
}
