// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use thiserror::Error;

pub type Result<T, E = ConfigurationError> = std::result::Result<T, E>;

/// Boxed cause carried by [`ConfigurationError::ComponentConstruction`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The abstract role a configured component fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Resource,
    ResourceDetector,
    TextMapPropagator,
    Sampler,
    SpanExporter,
    SpanProcessor,
    MetricExporter,
    MetricReader,
    View,
    Aggregation,
    CardinalityLimits,
    ExemplarFilter,
    LogRecordExporter,
    LogRecordProcessor,
}

impl ComponentKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Resource => "Resource",
            ComponentKind::ResourceDetector => "ResourceDetector",
            ComponentKind::TextMapPropagator => "TextMapPropagator",
            ComponentKind::Sampler => "Sampler",
            ComponentKind::SpanExporter => "SpanExporter",
            ComponentKind::SpanProcessor => "SpanProcessor",
            ComponentKind::MetricExporter => "MetricExporter",
            ComponentKind::MetricReader => "MetricReader",
            ComponentKind::View => "View",
            ComponentKind::Aggregation => "Aggregation",
            ComponentKind::CardinalityLimits => "CardinalityLimits",
            ComponentKind::ExemplarFilter => "ExemplarFilter",
            ComponentKind::LogRecordExporter => "LogRecordExporter",
            ComponentKind::LogRecordProcessor => "LogRecordProcessor",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every failure raised while parsing a document or building components from it.
///
/// Structured property type mismatches are not part of this type: they are logged and the
/// read returns `None`.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// The input could not be read as YAML or does not fit the model's shape
    #[error("{0}")]
    Parse(String),

    #[error("Unsupported file format. Supported formats include: {}", .supported.join(", "))]
    UnsupportedFileFormat {
        found: Option<String>,
        supported: &'static [&'static str],
    },

    /// A composite node is missing a required field
    #[error("{0}")]
    Validation(String),

    #[error("No component provider detected for {kind} with name \"{name}\".")]
    ComponentNotFound { kind: ComponentKind, name: String },

    #[error("Error configuring {kind} with name \"{name}\": {source}")]
    ComponentConstruction {
        kind: ComponentKind,
        name: String,
        #[source]
        source: BoxError,
    },
}

impl ConfigurationError {
    pub fn parse(message: impl fmt::Display) -> Self {
        ConfigurationError::Parse(format!("Unable to parse configuration input stream: {message}"))
    }

    pub fn binding(message: impl fmt::Display) -> Self {
        ConfigurationError::Parse(format!("Unable to bind configuration model: {message}"))
    }

    /// Error for a composite node whose required `field` is absent or null
    pub fn required(node: &str, field: &str) -> Self {
        ConfigurationError::Validation(format!("{node} {field} is required but is null"))
    }

    pub fn not_found(kind: ComponentKind, name: impl Into<String>) -> Self {
        ConfigurationError::ComponentNotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn construction(
        kind: ComponentKind,
        name: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        ConfigurationError::ComponentConstruction {
            kind,
            name: name.into(),
            source: source.into(),
        }
    }

    /// The capability kind and component name this error points at, when it names one
    pub fn component(&self) -> Option<(ComponentKind, &str)> {
        match self {
            ConfigurationError::ComponentNotFound { kind, name }
            | ConfigurationError::ComponentConstruction { kind, name, .. } => {
                Some((*kind, name.as_str()))
            }
            _ => None,
        }
    }
}
