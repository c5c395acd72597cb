// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::sync::Arc;

use otelconf::log::{set_max_level, LevelFilter};
use otelconf::sources::VariableSource;
use otelconf::{
    conf_debug, conf_error, conf_info, conf_warn, OpenTelemetryConfiguration, Parser,
    ParserBuilder, Result, StructuredProperties,
};

use crate::context::ConstructionContext;
use crate::factory::{logger_provider, meter_provider, propagator, resource, tracer_provider};
use crate::registry::{ProviderRegistry, StaticRegistry};
use crate::sdk::{OpenTelemetrySdk, SdkParts};

/// Entry point: parses declarative configuration documents and builds SDKs from them.
///
/// Every build uses a fresh [`ConstructionContext`]. When a build fails, the components it had
/// already created are closed, newest first, before the error is returned.
///
/// ```rust,no_run
/// use otelconf_sdk::DeclarativeConfiguration;
///
/// let sdk = DeclarativeConfiguration::default()
///     .parse_and_create(
///         r#"
/// file_format: "1.0"
/// tracer_provider:
///   processors:
///     - batch:
///         exporter:
///           otlp_http:
///             endpoint: ${OTEL_EXPORTER_OTLP_TRACES_ENDPOINT:-http://localhost:4318/v1/traces}
/// "#,
///     )
///     .unwrap();
/// sdk.shutdown().unwrap();
/// ```
pub struct DeclarativeConfiguration {
    parser: Parser,
    registry: Arc<dyn ProviderRegistry>,
}

impl fmt::Debug for DeclarativeConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclarativeConfiguration")
            .field("parser", &self.parser)
            .finish()
    }
}

impl Default for DeclarativeConfiguration {
    fn default() -> Self {
        DeclarativeConfiguration::builder().build()
    }
}

impl DeclarativeConfiguration {
    pub fn builder() -> DeclarativeConfigurationBuilder {
        DeclarativeConfigurationBuilder {
            parser: Parser::builder(),
            registry: None,
        }
    }

    pub fn parse(&self, text: &str) -> Result<OpenTelemetryConfiguration> {
        self.parser.parse(text)
    }

    pub fn parse_and_create(&self, text: &str) -> Result<OpenTelemetrySdk> {
        let model = self.parser.parse(text)?;
        self.create(&model)
    }

    pub fn parse_reader_and_create<R: Read>(&self, reader: R) -> Result<OpenTelemetrySdk> {
        let model = self.parser.parse_reader(reader)?;
        self.create(&model)
    }

    /// Builds an SDK from an already bound model
    pub fn create(&self, model: &OpenTelemetryConfiguration) -> Result<OpenTelemetrySdk> {
        apply_log_level(model.log_level.as_deref());
        if model.disabled == Some(true) {
            conf_info!("OpenTelemetry SDK disabled by configuration");
            return Ok(OpenTelemetrySdk::disabled());
        }

        let mut ctx = ConstructionContext::new(Arc::clone(&self.registry));
        match build(model, &mut ctx) {
            Ok(parts) => {
                let ledger = ctx.into_ledger();
                conf_debug!(
                    "Created OpenTelemetry SDK with {} closeable components",
                    ledger.len()
                );
                Ok(OpenTelemetrySdk::new(parts, ledger))
            }
            Err(e) => {
                conf_error!("Error creating OpenTelemetry SDK from configuration: {}", e);
                if let Err(close) = ctx.rollback() {
                    conf_warn!("Error closing components of the failed build: {}", close);
                }
                Err(e)
            }
        }
    }
}

fn apply_log_level(level: Option<&str>) {
    let Some(level) = level else {
        return;
    };
    match level.parse::<LevelFilter>() {
        Ok(level) => set_max_level(level),
        Err(e) => conf_warn!("Ignoring log_level \"{}\": {}", level, e),
    }
}

fn build(model: &OpenTelemetryConfiguration, ctx: &mut ConstructionContext) -> Result<SdkParts> {
    let resource = resource::create(model.resource.as_ref(), ctx)?;
    ctx.set_resource(resource.clone());

    let propagators = propagator::create(model.propagator.as_ref(), ctx)?;
    let attribute_limits = model.attribute_limits.as_ref();
    let tracer = tracer_provider::create(model.tracer_provider.as_ref(), attribute_limits, ctx)?;
    let meter = meter_provider::create(model.meter_provider.as_ref(), ctx)?;
    let logger = logger_provider::create(model.logger_provider.as_ref(), attribute_limits, ctx)?;

    Ok(SdkParts {
        resource,
        propagators,
        tracer,
        meter,
        logger,
        instrumentation: model
            .instrumentation
            .as_ref()
            .map(StructuredProperties::from_serializable)
            .unwrap_or_default(),
        distribution: model
            .distribution
            .as_ref()
            .map(StructuredProperties::from_serializable)
            .unwrap_or_default(),
    })
}

pub struct DeclarativeConfigurationBuilder {
    parser: ParserBuilder,
    registry: Option<Arc<dyn ProviderRegistry>>,
}

impl DeclarativeConfigurationBuilder {
    /// Finalizes the builder. Without a registry only built-in components are available.
    pub fn build(self) -> DeclarativeConfiguration {
        DeclarativeConfiguration {
            parser: self.parser.build(),
            registry: self
                .registry
                .unwrap_or_else(|| Arc::new(StaticRegistry::new())),
        }
    }

    pub fn set_registry<R: ProviderRegistry + 'static>(&mut self, registry: R) -> &mut Self {
        self.registry = Some(Arc::new(registry));
        self
    }

    pub fn set_shared_registry(&mut self, registry: Arc<dyn ProviderRegistry>) -> &mut Self {
        self.registry = Some(registry);
        self
    }

    pub fn set_variable_sources<E, S>(&mut self, env: E, system: S) -> &mut Self
    where
        E: VariableSource + 'static,
        S: VariableSource + 'static,
    {
        self.parser.set_variable_sources(env, system);
        self
    }

    /// Replaces the process environment and system properties with plain maps
    pub fn set_variables(
        &mut self,
        env: HashMap<String, String>,
        system_properties: HashMap<String, String>,
    ) -> &mut Self {
        self.parser.set_variables(env, system_properties);
        self
    }

    pub fn add_model_customizer<F>(&mut self, customizer: F) -> &mut Self
    where
        F: Fn(OpenTelemetryConfiguration) -> OpenTelemetryConfiguration + Send + Sync + 'static,
    {
        self.parser.add_model_customizer(customizer);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Provider;
    use crate::testing::RecordingExporter;
    use opentelemetry::Key;

    #[test]
    fn test_instrumentation_and_distribution_exposed() {
        let sdk = DeclarativeConfiguration::default()
            .parse_and_create(
                r#"
file_format: "1.0"
instrumentation/development:
  rust:
    example:
      property: value
distribution:
  vendor:
    enabled: true
"#,
            )
            .expect("builds");
        let rust = sdk.instrumentation().get_structured("rust").expect("rust");
        assert_eq!(
            rust.get_structured("example")
                .and_then(|e| e.get_string("property"))
                .as_deref(),
            Some("value")
        );
        assert_eq!(
            sdk.distribution()
                .get_structured("vendor")
                .and_then(|v| v.get_bool("enabled")),
            Some(true)
        );
    }

    #[test]
    fn test_substituted_resource() {
        let mut builder = DeclarativeConfiguration::builder();
        builder.set_variables(
            HashMap::from([("SERVICE".to_string(), "checkout".to_string())]),
            HashMap::new(),
        );
        let sdk = builder
            .build()
            .parse_and_create(
                r#"
file_format: "1.0"
resource:
  attributes:
    - name: service.name
      value: ${SERVICE}
"#,
            )
            .expect("builds");
        assert_eq!(
            sdk.resource()
                .and_then(|r| r.get(&Key::from_static_str("service.name"))),
            Some("checkout".into())
        );
    }

    #[test]
    fn test_customizer_runs_before_build() {
        let exporter = RecordingExporter::default();
        let shared = exporter.clone();
        let mut builder = DeclarativeConfiguration::builder();
        builder
            .set_registry(
                StaticRegistry::new()
                    .with_provider(Provider::span_exporter("recording", move |_, _| {
                        Ok(shared.clone())
                    })),
            )
            .add_model_customizer(|mut model| {
                model.tracer_provider = Some(
                    serde_json::from_value(serde_json::json!({
                        "processors": [{"simple": {"exporter": {"recording": null}}}]
                    }))
                    .expect("binds"),
                );
                model
            });
        let sdk = builder
            .build()
            .parse_and_create("file_format: \"1.0\"")
            .expect("builds");
        assert!(sdk.tracer_pipeline().is_some());
        sdk.shutdown().expect("shuts down");
        assert_eq!(exporter.closes(), 1);
    }
}
