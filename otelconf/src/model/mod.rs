// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Typed configuration model.
//!
//! Every node keeps the keys it does not declare in `additional_properties`. Nodes that hold
//! one of several named kinds are enums declared with [`union_node!`](crate::union_node) and
//! carry a `Plugin` arm for names resolved through the provider registry.

pub mod common;
pub mod logger_provider;
pub mod meter_provider;
pub mod propagator;
pub mod resource;
pub mod tracer_provider;
pub mod union;

mod lenient;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use logger_provider::LoggerProvider;
pub use meter_provider::MeterProvider;
pub use propagator::Propagator;
pub use resource::Resource;
pub use tracer_provider::TracerProvider;
pub use union::{Empty, PluginComponent, UnionNode};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenTelemetryConfiguration {
    #[serde(deserialize_with = "lenient::optional_string")]
    pub file_format: Option<String>,
    pub disabled: Option<bool>,
    /// Level of the library's own diagnostics
    pub log_level: Option<String>,
    pub resource: Option<Resource>,
    pub attribute_limits: Option<AttributeLimits>,
    pub propagator: Option<Propagator>,
    pub tracer_provider: Option<TracerProvider>,
    pub meter_provider: Option<MeterProvider>,
    pub logger_provider: Option<LoggerProvider>,
    #[serde(alias = "instrumentation/development")]
    pub instrumentation: Option<Instrumentation>,
    pub distribution: Option<Distribution>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

/// Limits applied to every signal unless the signal sets its own
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeLimits {
    pub attribute_value_length_limit: Option<u64>,
    pub attribute_count_limit: Option<u64>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

/// Instrumentation settings. Language specific sections such as `rust:` are kept in
/// `additional_properties`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Instrumentation {
    pub general: Option<GeneralInstrumentation>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralInstrumentation {
    pub peer: Option<PeerInstrumentation>,
    pub http: Option<HttpInstrumentation>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerInstrumentation {
    #[serde(deserialize_with = "lenient::list")]
    pub service_mapping: Vec<PeerServiceMapping>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeerServiceMapping {
    pub peer: String,
    pub service: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpInstrumentation {
    pub client: Option<HttpCapturedHeaders>,
    pub server: Option<HttpCapturedHeaders>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpCapturedHeaders {
    #[serde(deserialize_with = "lenient::string_list")]
    pub request_captured_headers: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub response_captured_headers: Vec<String>,
}

/// Open mapping for distribution specific settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Distribution {
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::tracer_provider::{
        AttributePatternsMatcher, AttributeValuesMatcher, BatchSpanProcessor, Sampler,
        SamplingRule, SpanExporter, SpanParent, SpanProcessor,
    };
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn bind(value: Value) -> Result<OpenTelemetryConfiguration, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn test_unknown_keys_are_preserved() {
        let model = bind(json!({
            "file_format": "1.0",
            "vendor_extension": {"enabled": true},
            "tracer_provider": {"custom_flag": 3},
        }))
        .expect("binds");
        assert_eq!(
            model.additional_properties.get("vendor_extension"),
            Some(&json!({"enabled": true}))
        );
        assert_eq!(
            model
                .tracer_provider
                .as_ref()
                .and_then(|tp| tp.additional_properties.get("custom_flag")),
            Some(&json!(3))
        );
    }

    #[test]
    fn test_unquoted_file_format() {
        let model = bind(json!({"file_format": 0.4})).expect("binds");
        assert_eq!(model.file_format.as_deref(), Some("0.4"));
        let model = bind(json!({"file_format": 1.0})).expect("binds");
        assert_eq!(model.file_format.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_null_variant_equals_empty_variant() {
        let with_null = bind(json!({
            "tracer_provider": {"processors": [{"simple": {"exporter": {"console": null}}}]}
        }))
        .expect("binds");
        let with_empty = bind(json!({
            "tracer_provider": {"processors": [{"simple": {"exporter": {"console": {}}}}]}
        }))
        .expect("binds");
        assert_eq!(with_null, with_empty);
    }

    #[test]
    fn test_empty_optional_union_is_absent() {
        let model = bind(json!({"tracer_provider": {"sampler": {}}})).expect("binds");
        assert_eq!(model.tracer_provider.and_then(|tp| tp.sampler), None);
        let model = bind(json!({"tracer_provider": {"sampler": null}})).expect("binds");
        assert_eq!(model.tracer_provider.and_then(|tp| tp.sampler), None);
    }

    #[test]
    fn test_empty_list_element_is_rejected() {
        let err = bind(json!({"tracer_provider": {"processors": [{}]}})).expect_err("empty");
        assert!(err
            .to_string()
            .contains("SpanProcessor must have exactly one entry but has 0"));
    }

    #[test]
    fn test_pattern_include_list_keeps_empty_apart_from_absent() {
        let patterns = |body: serde_json::Value| -> AttributePatternsMatcher {
            serde_json::from_value(body).expect("binds")
        };
        assert_eq!(patterns(json!({"key": "url.path"})).included, None);
        assert_eq!(patterns(json!({"key": "url.path", "included": null})).included, None);
        assert_eq!(
            patterns(json!({"key": "url.path", "included": []})).included,
            Some(vec![])
        );
        assert_eq!(
            patterns(json!({"key": "url.path", "included": ["/a/*", 200]})).included,
            Some(vec!["/a/*".to_string(), "200".to_string()])
        );
    }

    #[test]
    fn test_structural_errors() {
        assert!(bind(json!({"tracer_provider": {"processors": "batch"}})).is_err());
        assert!(bind(json!({"attribute_limits": {"attribute_count_limit": "many"}})).is_err());
        assert!(bind(json!({"disabled": [true]})).is_err());
    }

    #[test]
    fn test_rule_based_sampler_binding() {
        let model = bind(json!({
            "tracer_provider": {
                "processors": [{"batch": {"exporter": {"foo": {"key": "value"}}}}],
                "sampler": {"rule_based": {"rules": [{
                    "attribute_values": {"key": "http.route", "values": ["/healthz", 200]},
                    "attribute_patterns": {"key": "url.path", "included": ["/internal/*"]},
                    "parent": ["none", "remote"],
                    "sampler": {"always_off": null},
                }]}},
            }
        }))
        .expect("binds");
        let tracer_provider = model.tracer_provider.expect("tracer provider");

        assert_eq!(
            tracer_provider.processors,
            vec![SpanProcessor::Batch(BatchSpanProcessor {
                exporter: Some(SpanExporter::Plugin(PluginComponent {
                    name: "foo".into(),
                    properties: json!({"key": "value"}),
                })),
                ..Default::default()
            })]
        );

        let Some(Sampler::RuleBased(rule_based)) = tracer_provider.sampler else {
            panic!("expected rule based sampler");
        };
        assert_eq!(
            rule_based.rules,
            vec![SamplingRule {
                attribute_values: Some(AttributeValuesMatcher {
                    key: "http.route".into(),
                    values: vec!["/healthz".into(), "200".into()],
                }),
                attribute_patterns: Some(AttributePatternsMatcher {
                    key: "url.path".into(),
                    included: Some(vec!["/internal/*".into()]),
                    excluded: vec![],
                }),
                parent: Some(vec![SpanParent::None, SpanParent::Remote]),
                span_kinds: None,
                sampler: Some(Box::new(Sampler::AlwaysOff(Empty::default()))),
                additional_properties: Map::new(),
            }]
        );
    }

    #[test]
    fn test_instrumentation_alias() {
        let model = bind(json!({
            "instrumentation/development": {
                "general": {"peer": {"service_mapping": [{"peer": "1.2.3.4", "service": "FooService"}]}},
                "rust": {"example": {"property": "value"}},
            }
        }))
        .expect("binds");
        let instrumentation = model.instrumentation.expect("instrumentation");
        assert_eq!(
            instrumentation
                .general
                .and_then(|g| g.peer)
                .map(|p| p.service_mapping.len()),
            Some(1)
        );
        assert!(instrumentation.additional_properties.contains_key("rust"));
    }
}
