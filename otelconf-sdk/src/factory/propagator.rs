// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use opentelemetry::propagation::{TextMapCompositePropagator, TextMapPropagator as _};
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use otelconf::model::propagator::TextMapPropagator;
use otelconf::model::{self, PluginComponent, UnionNode as _};
use otelconf::{conf_debug, conf_warn, ComponentKind, Result};

use super::delegated;
use crate::context::ConstructionContext;
use crate::registry::BoxedPropagator;

const TRACECONTEXT: &str = "tracecontext";
const BAGGAGE: &str = "baggage";

/// The propagators of the SDK, applied in order
pub struct ContextPropagators {
    names: Vec<String>,
    composite: TextMapCompositePropagator,
}

impl ContextPropagators {
    /// Names of the configured propagators, in injection order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn text_map_propagator(&self) -> &TextMapCompositePropagator {
        &self.composite
    }

    /// Header names written or read by the composite
    pub fn fields(&self) -> Vec<String> {
        self.composite.fields().map(str::to_owned).collect()
    }
}

impl fmt::Debug for ContextPropagators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextPropagators")
            .field("names", &self.names)
            .finish()
    }
}

/// Builds the composite propagator.
///
/// Entries of `composite` come first, then the names of `composite_list`. A name listed more
/// than once is built once. An absent or empty configuration gives W3C trace context and baggage.
pub fn create(
    model: Option<&model::Propagator>,
    ctx: &mut ConstructionContext,
) -> Result<ContextPropagators> {
    let mut entries: Vec<(String, Option<&TextMapPropagator>)> = Vec::new();
    if let Some(model) = model {
        for node in &model.composite {
            push_unique(&mut entries, node.variant_name(), Some(node));
        }
        for name in model
            .composite_list
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
        {
            if name == "none" {
                conf_warn!("Ignoring propagator \"none\" in composite_list");
                continue;
            }
            push_unique(&mut entries, name, None);
        }
    }

    if entries.is_empty() {
        conf_debug!("No propagators configured, using tracecontext and baggage");
        entries.push((TRACECONTEXT.to_string(), None));
        entries.push((BAGGAGE.to_string(), None));
    }

    let mut names = Vec::with_capacity(entries.len());
    let mut propagators = Vec::with_capacity(entries.len());
    for (name, node) in entries {
        propagators.push(build(&name, node, ctx)?);
        names.push(name);
    }
    Ok(ContextPropagators {
        names,
        composite: TextMapCompositePropagator::new(propagators),
    })
}

fn push_unique<'a>(
    entries: &mut Vec<(String, Option<&'a TextMapPropagator>)>,
    name: &str,
    node: Option<&'a TextMapPropagator>,
) {
    if entries.iter().all(|(existing, _)| existing != name) {
        entries.push((name.to_string(), node));
    }
}

fn build(
    name: &str,
    node: Option<&TextMapPropagator>,
    ctx: &mut ConstructionContext,
) -> Result<BoxedPropagator> {
    match (name, node) {
        (TRACECONTEXT, _) => Ok(Box::new(TraceContextPropagator::new())),
        (BAGGAGE, _) => Ok(Box::new(BaggagePropagator::new())),
        (_, Some(TextMapPropagator::Plugin(plugin))) => ctx.create_plugin(plugin),
        (_, Some(TextMapPropagator::B3(body)))
        | (_, Some(TextMapPropagator::B3Multi(body)))
        | (_, Some(TextMapPropagator::Jaeger(body)))
        | (_, Some(TextMapPropagator::OtTrace(body)))
        | (_, Some(TextMapPropagator::TraceContext(body)))
        | (_, Some(TextMapPropagator::Baggage(body))) => {
            ctx.create_plugin(&delegated(ComponentKind::TextMapPropagator, name, body)?)
        }
        (_, None) => ctx.create_plugin(&PluginComponent {
            name: name.to_string(),
            properties: serde_json::Value::Null,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Provider, StaticRegistry};
    use opentelemetry::propagation::{Extractor, Injector};
    use opentelemetry::Context;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Debug)]
    struct FixedHeader(&'static str);

    impl opentelemetry::propagation::TextMapPropagator for FixedHeader {
        fn inject_context(&self, _cx: &Context, injector: &mut dyn Injector) {
            injector.set(self.0, "1".to_string());
        }

        fn extract_with_context(&self, cx: &Context, _extractor: &dyn Extractor) -> Context {
            cx.clone()
        }

        fn fields(&self) -> opentelemetry::propagation::text_map_propagator::FieldIter<'_> {
            opentelemetry::propagation::text_map_propagator::FieldIter::new(&[])
        }
    }

    fn build_names(model: serde_json::Value, registry: StaticRegistry) -> Result<Vec<String>> {
        let model: model::Propagator = serde_json::from_value(model).expect("binds");
        let mut ctx = ConstructionContext::new(Arc::new(registry));
        create(Some(&model), &mut ctx).map(|p| p.names().to_vec())
    }

    #[test]
    fn test_default_propagators() {
        let mut ctx = ConstructionContext::new(Arc::new(StaticRegistry::new()));
        let propagators = create(None, &mut ctx).expect("builds");
        assert_eq!(propagators.names(), ["tracecontext", "baggage"]);
        let fields = propagators.fields();
        assert!(fields.contains(&"traceparent".to_string()));
        assert!(fields.contains(&"baggage".to_string()));
    }

    #[test]
    fn test_composite_and_list_deduplicated() {
        let names = build_names(
            json!({
                "composite": [{"tracecontext": null}, {"baggage": null}],
                "composite_list": "baggage, tracecontext,none,,",
            }),
            StaticRegistry::new(),
        )
        .expect("builds");
        assert_eq!(names, ["tracecontext", "baggage"]);
    }

    #[test]
    fn test_well_known_without_builtin_uses_registry() {
        let registry = StaticRegistry::new()
            .with_provider(Provider::propagator("b3multi", |_, _| Ok(FixedHeader("x-b3-traceid"))));
        let names = build_names(
            json!({"composite": [{"b3multi": null}], "composite_list": "tracecontext"}),
            registry,
        )
        .expect("builds");
        assert_eq!(names, ["b3multi", "tracecontext"]);

        let err = build_names(json!({"composite_list": "xray"}), StaticRegistry::new())
            .expect_err("xray is not registered");
        assert_eq!(
            err.to_string(),
            "No component provider detected for TextMapPropagator with name \"xray\"."
        );
    }

    #[test]
    fn test_injection_order() {
        let registry = StaticRegistry::new()
            .with_provider(Provider::propagator("custom", |_, _| Ok(FixedHeader("x-custom"))));
        let model: model::Propagator =
            serde_json::from_value(json!({"composite": [{"custom": {}}, {"tracecontext": {}}]}))
                .expect("binds");
        let mut ctx = ConstructionContext::new(Arc::new(registry));
        let propagators = create(Some(&model), &mut ctx).expect("builds");

        let mut carrier: HashMap<String, String> = HashMap::new();
        propagators
            .text_map_propagator()
            .inject_context(&Context::new(), &mut carrier);
        assert_eq!(carrier.get("x-custom").map(String::as_str), Some("1"));
    }
}
