// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::fmt;

/// Where a substituted variable is looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    /// `${NAME}` and `${env:NAME}`
    Environment,
    /// `${sys:NAME}`
    SystemProperties,
}

/// Represent a source of variables for `${...}` references
pub trait VariableSource: fmt::Debug + Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads the process environment at lookup time
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl VariableSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A source backed by a map supplied by the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapSource {
    map: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.map.insert(key.into(), value.into());
        self
    }
}

impl<K: ToString, V: ToString> FromIterator<(K, V)> for MapSource {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        MapSource {
            map: iter
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl From<HashMap<String, String>> for MapSource {
    fn from(map: HashMap<String, String>) -> Self {
        MapSource { map }
    }
}

impl VariableSource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }
}

/// Compose multiple sources together.
///
/// The higher precedence sources are the first ones in the list.
#[derive(Debug, Default)]
pub struct CompositeSource {
    sources: Vec<Box<dyn VariableSource>>,
}

impl CompositeSource {
    pub fn new() -> Self {
        CompositeSource {
            sources: Vec::new(),
        }
    }

    pub fn add_source<S: VariableSource + 'static>(&mut self, source: S) -> &mut Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl VariableSource for CompositeSource {
    fn get(&self, key: &str) -> Option<String> {
        self.sources.iter().find_map(|s| s.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::{CompositeSource, MapSource, VariableSource};

    #[test]
    fn test_map_source() {
        let source: MapSource = [("STR_1", "value1")].into_iter().collect();
        assert_eq!(source.get("STR_1").as_deref(), Some("value1"));
        assert_eq!(source.get("STR_2"), None);
    }

    #[test]
    fn test_composite_priority_order() {
        let mut source = CompositeSource::new();
        source
            .add_source([("SERVICE", "from-override")].into_iter().collect::<MapSource>())
            .add_source(
                [("SERVICE", "from-default"), ("ENV", "staging")]
                    .into_iter()
                    .collect::<MapSource>(),
            );

        assert_eq!(source.get("SERVICE").as_deref(), Some("from-override"));
        assert_eq!(source.get("ENV").as_deref(), Some("staging"));
        assert_eq!(source.get("VERSION"), None);
    }
}
