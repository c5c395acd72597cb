// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Support for nodes that hold exactly one of several named kinds.
//!
//! A union node is a mapping with a single entry. A key naming one of the node's well-known
//! variants binds that variant, any other key becomes a [`PluginComponent`] resolved later
//! through the provider registry.

use serde::de::{DeserializeOwned, Error as _};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::conf_warn;

/// An entry whose key is not a well-known variant of its node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginComponent {
    pub name: String,
    /// The entry's value as written, null when the key had no value
    pub properties: Value,
}

/// Empty-bodied variant such as `console:` or `always_on:`.
///
/// Unknown keys written under it are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Empty {
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

pub trait UnionNode: Sized {
    /// Capability name used in error messages
    const LABEL: &'static str;
    /// Keys of the well-known variants
    const VARIANTS: &'static [&'static str];

    /// Binds the entries of a mapping. `Ok(None)` when the mapping is empty.
    fn from_entries(entries: Map<String, Value>) -> Result<Option<Self>, String>;

    /// The variant key, or the plugin name
    fn variant_name(&self) -> &str;
}

/// Picks the entry a union node binds to.
///
/// A single well-known key wins over unrecognized siblings, which are ignored with a warning.
/// Several well-known keys, or several unrecognized keys without a well-known one, are an error.
pub fn select_entry<T: UnionNode>(
    entries: Map<String, Value>,
) -> Result<Option<(String, Value)>, String> {
    let total = entries.len();
    let (mut known, mut unknown): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|(key, _)| T::VARIANTS.contains(&key.as_str()));

    match (known.len(), unknown.len()) {
        (0, 0) => Ok(None),
        (1, ignored) => {
            if ignored > 0 {
                let names: Vec<_> = unknown.iter().map(|(k, _)| k.as_str()).collect();
                conf_warn!(
                    "{} has well-known entry \"{}\", ignoring {:?}",
                    T::LABEL,
                    known[0].0,
                    names
                );
            }
            Ok(known.pop())
        }
        (0, 1) => Ok(unknown.pop()),
        _ => Err(format!(
            "{} must have exactly one entry but has {}",
            T::LABEL,
            total
        )),
    }
}

/// Binds a well-known variant body, null meaning "present with defaults"
pub fn bind_variant<T: DeserializeOwned + Default>(key: &str, value: Value) -> Result<T, String> {
    if value.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(value).map_err(|e| format!("{key}: {e}"))
}

pub fn serialize_entry<S, V>(serializer: S, key: &str, value: &V) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize + ?Sized,
{
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(key, value)?;
    map.end()
}

/// Deserializes a union that must not be empty, used for list elements
pub fn deserialize_required<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: UnionNode,
{
    let entries = Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    T::from_entries(entries)
        .map_err(D::Error::custom)?
        .ok_or_else(|| {
            D::Error::custom(format!(
                "{} must have exactly one entry but has 0",
                T::LABEL
            ))
        })
}

/// Field helper: null and `{}` both bind to `None`
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: UnionNode,
{
    let entries = Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    T::from_entries(entries).map_err(D::Error::custom)
}

pub fn optional_boxed<'de, D, T>(deserializer: D) -> Result<Option<Box<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: UnionNode,
{
    optional(deserializer).map(|node| node.map(Box::new))
}

/// Declares a union node enum with its well-known variants and a `Plugin` arm
#[macro_export]
#[doc(hidden)]
macro_rules! union_node {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $label:literal {
            $( $(#[$vmeta:meta])* $key:literal => $variant:ident($ty:ty), )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant($ty), )+
            /// Unrecognized entry, resolved through the provider registry
            Plugin($crate::model::union::PluginComponent),
        }

        impl $crate::model::union::UnionNode for $name {
            const LABEL: &'static str = $label;
            const VARIANTS: &'static [&'static str] = &[$($key),+];

            fn from_entries(
                entries: serde_json::Map<String, serde_json::Value>,
            ) -> Result<Option<Self>, String> {
                let Some((key, value)) = $crate::model::union::select_entry::<Self>(entries)? else {
                    return Ok(None);
                };
                let node = match key.as_str() {
                    $( $key => $name::$variant($crate::model::union::bind_variant(&key, value)?), )+
                    _ => $name::Plugin($crate::model::union::PluginComponent {
                        name: key,
                        properties: value,
                    }),
                };
                Ok(Some(node))
            }

            fn variant_name(&self) -> &str {
                match self {
                    $( $name::$variant(_) => $key, )+
                    $name::Plugin(plugin) => &plugin.name,
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                match self {
                    $( $name::$variant(body) => {
                        $crate::model::union::serialize_entry(serializer, $key, body)
                    } )+
                    $name::Plugin(plugin) => $crate::model::union::serialize_entry(
                        serializer,
                        &plugin.name,
                        &plugin.properties,
                    ),
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                $crate::model::union::deserialize_required(deserializer)
            }
        }
    };
}
