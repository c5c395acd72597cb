// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Builds the SDK resource.
//!
//! Attributes are layered from lowest to highest precedence: SDK defaults, detected attributes,
//! `attributes_list`, then `attributes`.

use opentelemetry::{Array, KeyValue, StringValue, Value as AttributeValue};
use opentelemetry_sdk::resource::{ResourceDetector as _, TelemetryResourceDetector};
use opentelemetry_sdk::Resource;
use otelconf::model::common::IncludeExclude;
use otelconf::model::resource::{AttributeNameValue, AttributeType, ResourceDetector};
use otelconf::model::{self, UnionNode as _};
use otelconf::{conf_warn, ComponentKind, ConfigurationError, Result};
use otelconf_sampling::glob_matcher::GlobMatcher;
use serde_json::Value;

use super::delegated;
use crate::context::ConstructionContext;

type Detector = Box<dyn opentelemetry_sdk::resource::ResourceDetector>;

pub const SERVICE_NAME: &str = "service.name";
pub const DEFAULT_SERVICE_NAME: &str = "unknown_service";

pub fn create(model: Option<&model::Resource>, ctx: &mut ConstructionContext) -> Result<Resource> {
    let mut builder = Resource::builder_empty()
        .with_attributes(resource_attributes(&TelemetryResourceDetector.detect()))
        .with_attributes([KeyValue::new(SERVICE_NAME, DEFAULT_SERVICE_NAME)]);

    let Some(model) = model else {
        return Ok(builder.build());
    };

    if let Some(detection) = &model.detection {
        let filter = AttributeFilter::new(detection.attributes.as_ref());
        for detector in &detection.detectors {
            let detected = detect(detector, ctx)?;
            builder = builder.with_attributes(
                detected
                    .into_iter()
                    .filter(|kv| filter.keeps(kv.key.as_str())),
            );
        }
    }

    if let Some(list) = &model.attributes_list {
        builder = builder.with_attributes(parse_attributes_list(list));
    }

    let attributes = model
        .attributes
        .iter()
        .filter_map(|attribute| attribute_key_value(attribute).transpose())
        .collect::<Result<Vec<_>>>()?;

    let builder = match &model.schema_url {
        Some(schema_url) => builder.with_schema_url(attributes, schema_url.clone()),
        None => builder.with_attributes(attributes),
    };
    Ok(builder.build())
}

fn resource_attributes(resource: &Resource) -> Vec<KeyValue> {
    resource
        .iter()
        .map(|(key, value)| KeyValue::new(key.clone(), value.clone()))
        .collect()
}

fn detect(detector: &ResourceDetector, ctx: &mut ConstructionContext) -> Result<Vec<KeyValue>> {
    match detector {
        ResourceDetector::Os(_) => Ok(vec![KeyValue::new("os.type", std::env::consts::OS)]),
        ResourceDetector::Process(_) => Ok(process_attributes()),
        ResourceDetector::Container(body)
        | ResourceDetector::Host(body)
        | ResourceDetector::Service(body) => {
            let plugin =
                delegated(ComponentKind::ResourceDetector, detector.variant_name(), body)?;
            let detector = ctx.create_plugin::<Detector>(&plugin)?;
            Ok(resource_attributes(&detector.detect()))
        }
        ResourceDetector::Plugin(plugin) => {
            let detector = ctx.create_plugin::<Detector>(plugin)?;
            Ok(resource_attributes(&detector.detect()))
        }
    }
}

fn process_attributes() -> Vec<KeyValue> {
    let mut attributes = vec![
        KeyValue::new("process.pid", i64::from(std::process::id())),
        KeyValue::new("process.runtime.name", "rust"),
    ];
    if let Some(name) = std::env::current_exe()
        .ok()
        .and_then(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
    {
        attributes.push(KeyValue::new("process.executable.name", name));
    }
    attributes
}

/// Include and exclude globs applied to detected attribute keys
struct AttributeFilter {
    included: Vec<GlobMatcher>,
    excluded: Vec<GlobMatcher>,
}

impl AttributeFilter {
    fn new(model: Option<&IncludeExclude>) -> Self {
        let globs = |patterns: &[String]| -> Vec<GlobMatcher> {
            patterns.iter().map(|p| GlobMatcher::new(p)).collect()
        };
        match model {
            Some(model) => AttributeFilter {
                included: globs(&model.included),
                excluded: globs(&model.excluded),
            },
            None => AttributeFilter {
                included: Vec::new(),
                excluded: Vec::new(),
            },
        }
    }

    fn keeps(&self, key: &str) -> bool {
        (self.included.is_empty() || self.included.iter().any(|g| g.matches(key)))
            && !self.excluded.iter().any(|g| g.matches(key))
    }
}

/// Parses `k1=v1,k2=v2` with percent-encoded values
fn parse_attributes_list(list: &str) -> Vec<KeyValue> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let Some((key, value)) = entry.split_once('=') else {
                conf_warn!("Ignoring resource attributes_list entry without '=': {}", entry);
                return None;
            };
            let key = key.trim();
            if key.is_empty() {
                conf_warn!("Ignoring resource attributes_list entry with empty key: {}", entry);
                return None;
            }
            match urlencoding::decode(value.trim()) {
                Ok(decoded) => Some(KeyValue::new(key.to_string(), decoded.into_owned())),
                Err(e) => {
                    conf_warn!("Ignoring resource attribute {}: invalid encoding: {}", key, e);
                    None
                }
            }
        })
        .collect()
}

fn attribute_key_value(attribute: &AttributeNameValue) -> Result<Option<KeyValue>> {
    if attribute.value.is_null() {
        conf_warn!("Ignoring resource attribute {}: value is null", attribute.name);
        return Ok(None);
    }
    let attribute_type = attribute.attribute_type.unwrap_or_default();
    let value = typed_value(&attribute.value, attribute_type).ok_or_else(|| {
        ConfigurationError::Validation(format!(
            "resource attribute {} value {} does not match type {}",
            attribute.name,
            attribute.value,
            type_name(attribute_type)
        ))
    })?;
    Ok(Some(KeyValue::new(attribute.name.clone(), value)))
}

fn typed_value(value: &Value, attribute_type: AttributeType) -> Option<AttributeValue> {
    Some(match attribute_type {
        AttributeType::String => AttributeValue::String(scalar_text(value)?.into()),
        AttributeType::Bool => AttributeValue::Bool(value.as_bool()?),
        AttributeType::Int => AttributeValue::I64(value.as_i64()?),
        AttributeType::Double => AttributeValue::F64(value.as_f64()?),
        AttributeType::StringArray => AttributeValue::Array(Array::String(
            value.as_array()?
                .iter()
                .map(|v| scalar_text(v).map(StringValue::from))
                .collect::<Option<_>>()?,
        )),
        AttributeType::BoolArray => AttributeValue::Array(Array::Bool(
            value.as_array()?.iter().map(Value::as_bool).collect::<Option<_>>()?,
        )),
        AttributeType::IntArray => AttributeValue::Array(Array::I64(
            value.as_array()?.iter().map(Value::as_i64).collect::<Option<_>>()?,
        )),
        AttributeType::DoubleArray => AttributeValue::Array(Array::F64(
            value.as_array()?.iter().map(Value::as_f64).collect::<Option<_>>()?,
        )),
    })
}

/// Scalars written unquoted still count as strings
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn type_name(attribute_type: AttributeType) -> &'static str {
    match attribute_type {
        AttributeType::String => "string",
        AttributeType::Bool => "bool",
        AttributeType::Int => "int",
        AttributeType::Double => "double",
        AttributeType::StringArray => "string_array",
        AttributeType::BoolArray => "bool_array",
        AttributeType::IntArray => "int_array",
        AttributeType::DoubleArray => "double_array",
    }
}
