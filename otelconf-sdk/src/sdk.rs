// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::sync::Mutex;

use opentelemetry_sdk::error::{OTelSdkError, OTelSdkResult};
use opentelemetry_sdk::Resource;
use otelconf::{conf_debug, conf_warn, StructuredProperties};

use crate::components::first_error;
use crate::factory::logger_provider::LoggerPipeline;
use crate::factory::meter_provider::MeterPipeline;
use crate::factory::propagator::ContextPropagators;
use crate::factory::tracer_provider::TracerPipeline;
use crate::ledger::Ledger;

/// Everything a successful build produced.
///
/// The SDK owns the closeable components of its build. [`OpenTelemetrySdk::shutdown`] closes
/// them newest first, and dropping the SDK shuts it down if that has not happened yet.
pub struct OpenTelemetrySdk {
    resource: Option<Resource>,
    propagators: Option<ContextPropagators>,
    tracer: Option<TracerPipeline>,
    meter: Option<MeterPipeline>,
    logger: Option<LoggerPipeline>,
    instrumentation: StructuredProperties,
    distribution: StructuredProperties,
    ledger: Mutex<Option<Ledger>>,
}

pub(crate) struct SdkParts {
    pub(crate) resource: Resource,
    pub(crate) propagators: ContextPropagators,
    pub(crate) tracer: Option<TracerPipeline>,
    pub(crate) meter: Option<MeterPipeline>,
    pub(crate) logger: Option<LoggerPipeline>,
    pub(crate) instrumentation: StructuredProperties,
    pub(crate) distribution: StructuredProperties,
}

impl OpenTelemetrySdk {
    pub(crate) fn new(parts: SdkParts, ledger: Ledger) -> Self {
        OpenTelemetrySdk {
            resource: Some(parts.resource),
            propagators: Some(parts.propagators),
            tracer: parts.tracer,
            meter: parts.meter,
            logger: parts.logger,
            instrumentation: parts.instrumentation,
            distribution: parts.distribution,
            ledger: Mutex::new(Some(ledger)),
        }
    }

    /// An SDK that built nothing and holds nothing to close
    pub fn disabled() -> Self {
        OpenTelemetrySdk {
            resource: None,
            propagators: None,
            tracer: None,
            meter: None,
            logger: None,
            instrumentation: StructuredProperties::empty(),
            distribution: StructuredProperties::empty(),
            ledger: Mutex::new(None),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.resource.is_none()
    }

    pub fn resource(&self) -> Option<&Resource> {
        self.resource.as_ref()
    }

    pub fn propagators(&self) -> Option<&ContextPropagators> {
        self.propagators.as_ref()
    }

    pub fn tracer_pipeline(&self) -> Option<&TracerPipeline> {
        self.tracer.as_ref()
    }

    pub fn meter_pipeline(&self) -> Option<&MeterPipeline> {
        self.meter.as_ref()
    }

    pub fn logger_pipeline(&self) -> Option<&LoggerPipeline> {
        self.logger.as_ref()
    }

    /// The `instrumentation` node, empty when absent
    pub fn instrumentation(&self) -> &StructuredProperties {
        &self.instrumentation
    }

    /// The `distribution` node, empty when absent
    pub fn distribution(&self) -> &StructuredProperties {
        &self.distribution
    }

    /// Flushes every pipeline, then closes every component of the build.
    ///
    /// Only the first call does anything, later calls return `AlreadyShutdown`.
    pub fn shutdown(&self) -> OTelSdkResult {
        let ledger = match self.ledger.lock() {
            Ok(mut ledger) => ledger.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let Some(ledger) = ledger else {
            return Err(OTelSdkError::AlreadyShutdown);
        };
        conf_debug!("Shutting down SDK with {} components", ledger.len());

        let mut results = Vec::new();
        if let Some(tracer) = &self.tracer {
            results.push(tracer.provider().shutdown());
        }
        if let Some(meter) = &self.meter {
            results.push(meter.provider().shutdown());
        }
        if let Some(logger) = &self.logger {
            results.push(logger.provider().shutdown());
        }
        results.push(ledger.close_all());
        first_error(results)
    }
}

impl Drop for OpenTelemetrySdk {
    fn drop(&mut self) {
        let pending = match self.ledger.get_mut() {
            Ok(ledger) => ledger.is_some(),
            Err(poisoned) => poisoned.get_ref().is_some(),
        };
        if pending {
            if let Err(e) = self.shutdown() {
                conf_warn!("Error shutting down SDK on drop: {}", e);
            }
        }
    }
}

impl fmt::Debug for OpenTelemetrySdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenTelemetrySdk")
            .field("resource", &self.resource)
            .field("propagators", &self.propagators)
            .field("tracer", &self.tracer)
            .field("meter", &self.meter)
            .field("logger", &self.logger)
            .finish()
    }
}
