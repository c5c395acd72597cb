// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use otelconf::model::meter_provider::{MetricReader as MetricReaderModel, PullMetricExporter};
use otelconf::model::UnionNode as _;
use otelconf::{conf_warn, ComponentKind, ConfigurationError, Result};

use super::{cardinality_limits, delegated, metric_exporter, millis};
use crate::components::metric_reader::{self, MetricReader, PeriodicSettings};
use crate::context::ConstructionContext;

pub fn create(
    model: &MetricReaderModel,
    ctx: &mut ConstructionContext,
) -> Result<Arc<MetricReader>> {
    match model {
        MetricReaderModel::Periodic(periodic) => {
            let exporter = periodic.exporter.as_ref().ok_or_else(|| {
                ConfigurationError::required("periodic metric reader", "exporter")
            })?;
            let limits = cardinality_limits::create(periodic.cardinality_limits.as_ref())?;
            let exporter = metric_exporter::create(exporter, ctx)?;
            let settings = PeriodicSettings {
                interval: millis(periodic.interval, metric_reader::DEFAULT_INTERVAL),
                timeout: millis(periodic.timeout, metric_reader::DEFAULT_TIMEOUT),
            };
            let reader =
                Arc::new(MetricReader::periodic(exporter, settings).with_cardinality_limits(limits));
            ctx.track(ComponentKind::MetricReader, model.variant_name(), &reader);
            Ok(reader)
        }
        MetricReaderModel::Pull(pull) => {
            let exporter = pull
                .exporter
                .as_ref()
                .ok_or_else(|| ConfigurationError::required("pull metric reader", "exporter"))?;
            if pull.cardinality_limits.is_some() {
                conf_warn!("pull metric reader cardinality_limits are left to the exporter");
            }
            match exporter {
                PullMetricExporter::PrometheusDevelopment(body) => ctx.create_plugin(&delegated(
                    ComponentKind::MetricReader,
                    exporter.variant_name(),
                    body,
                )?),
                PullMetricExporter::Plugin(plugin) => ctx.create_plugin(plugin),
            }
        }
        MetricReaderModel::Plugin(plugin) => ctx.create_plugin(plugin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Provider, StaticRegistry};
    use opentelemetry_sdk::metrics::ManualReader;
    use otelconf::model::meter_provider::MeterProvider;
    use serde_json::json;
    use std::time::Duration;

    fn reader(model: serde_json::Value) -> MetricReaderModel {
        let provider: MeterProvider =
            serde_json::from_value(json!({ "readers": [model] })).expect("binds");
        provider.readers.into_iter().next().expect("one reader")
    }

    #[test]
    fn test_periodic_reader() {
        let mut ctx = ConstructionContext::new(Arc::new(StaticRegistry::new()));
        let built = create(
            &reader(json!({"periodic": {
                "interval": 1000,
                "exporter": {"console": null},
                "cardinality_limits": {"default": 10},
            }})),
            &mut ctx,
        )
        .expect("builds");
        assert_eq!(
            built.periodic_settings(),
            Some(&PeriodicSettings {
                interval: Duration::from_secs(1),
                timeout: metric_reader::DEFAULT_TIMEOUT,
            })
        );
        assert_eq!(built.cardinality_limits().map(|limits| limits.default), Some(10));
        assert_eq!(
            ctx.ledger().components().collect::<Vec<_>>(),
            vec![
                (ComponentKind::MetricExporter, "console"),
                (ComponentKind::MetricReader, "periodic"),
            ]
        );
    }

    #[test]
    fn test_reader_requires_exporter() {
        let mut ctx = ConstructionContext::new(Arc::new(StaticRegistry::new()));
        let err = create(&reader(json!({"periodic": {"interval": 10}})), &mut ctx)
            .expect_err("missing");
        assert_eq!(
            err.to_string(),
            "periodic metric reader exporter is required but is null"
        );
    }

    #[test]
    fn test_prometheus_resolves_as_reader() {
        let registry = StaticRegistry::new().with_provider(Provider::metric_reader(
            "prometheus/development",
            |properties, _| {
                let port = properties.get_i64_or("port", 9464);
                u16::try_from(port)?;
                Ok(ManualReader::builder().build())
            },
        ));
        let mut ctx = ConstructionContext::new(Arc::new(registry));
        create(
            &reader(json!({"pull": {"exporter": {"prometheus/development": {"port": 9000}}}})),
            &mut ctx,
        )
        .expect("builds");
        assert_eq!(
            ctx.ledger().components().collect::<Vec<_>>(),
            vec![(ComponentKind::MetricReader, "prometheus/development")]
        );

        let mut ctx = ConstructionContext::new(Arc::new(StaticRegistry::new()));
        let err = create(
            &reader(json!({"pull": {"exporter": {"prometheus/development": null}}})),
            &mut ctx,
        )
        .expect_err("not registered");
        assert_eq!(
            err.to_string(),
            "No component provider detected for MetricReader with name \"prometheus/development\"."
        );
    }
}
