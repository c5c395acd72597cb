// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use serde_json::{Map, Value};

use crate::conf_warn;

/// Read-only, typed view over a mapping node.
///
/// Reads never fail: an absent key or an explicit null gives `None`, and a value of the wrong
/// type gives `None` after logging a warning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredProperties {
    entries: Map<String, Value>,
}

impl StructuredProperties {
    pub fn empty() -> Self {
        Self::default()
    }

    /// `None` unless `value` is a mapping or null
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::empty()),
            Value::Object(entries) => Some(StructuredProperties {
                entries: entries.clone(),
            }),
            _ => None,
        }
    }

    /// Views any serializable node, such as a part of the configuration model
    pub fn from_serializable<T: Serialize>(node: &T) -> Self {
        match serde_json::to_value(node) {
            Ok(value) => Self::from_value(&value).unwrap_or_default(),
            Err(e) => {
                conf_warn!("Unable to convert node to structured properties: {}", e);
                Self::empty()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn property_keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.entries)
    }

    fn typed<'a, T>(
        &'a self,
        key: &str,
        expected: &str,
        read: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Option<T> {
        let value = self.entries.get(key).filter(|v| !v.is_null())?;
        let typed = read(value);
        if typed.is_none() {
            conf_warn!(
                "Ignoring value of property \"{}\": expected {} but found {}",
                key,
                expected,
                type_name(value)
            );
        }
        typed
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.typed(key, "string", |v| v.as_str().map(str::to_owned))
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.typed(key, "boolean", Value::as_bool)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.typed(key, "integer", Value::as_i64)
    }

    /// Integers are widened
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.typed(key, "number", Value::as_f64)
    }

    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|| default.to_owned())
    }

    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    pub fn get_i64_or(&self, key: &str, default: i64) -> i64 {
        self.get_i64(key).unwrap_or(default)
    }

    pub fn get_f64_or(&self, key: &str, default: f64) -> f64 {
        self.get_f64(key).unwrap_or(default)
    }

    fn list<'a, T>(
        &'a self,
        key: &str,
        expected: &str,
        read: impl Fn(&'a Value) -> Option<T>,
    ) -> Option<Vec<T>> {
        self.typed(key, expected, |v| {
            v.as_array()?.iter().map(&read).collect::<Option<Vec<_>>>()
        })
    }

    pub fn get_string_list(&self, key: &str) -> Option<Vec<String>> {
        self.list(key, "list of strings", |v| v.as_str().map(str::to_owned))
    }

    pub fn get_bool_list(&self, key: &str) -> Option<Vec<bool>> {
        self.list(key, "list of booleans", Value::as_bool)
    }

    pub fn get_i64_list(&self, key: &str) -> Option<Vec<i64>> {
        self.list(key, "list of integers", Value::as_i64)
    }

    pub fn get_f64_list(&self, key: &str) -> Option<Vec<f64>> {
        self.list(key, "list of numbers", Value::as_f64)
    }

    pub fn get_structured(&self, key: &str) -> Option<StructuredProperties> {
        self.typed(key, "mapping", |v| {
            v.as_object().map(|entries| StructuredProperties {
                entries: entries.clone(),
            })
        })
    }

    pub fn get_structured_list(&self, key: &str) -> Option<Vec<StructuredProperties>> {
        self.list(key, "list of mappings", |v| {
            v.as_object().map(|entries| StructuredProperties {
                entries: entries.clone(),
            })
        })
    }
}

impl From<Map<String, Value>> for StructuredProperties {
    fn from(entries: Map<String, Value>) -> Self {
        StructuredProperties { entries }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
