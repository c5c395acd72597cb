// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Declarative configuration front end.
//!
//! Turns a YAML document into a typed [`model::OpenTelemetryConfiguration`]:
//! `${...}` references are resolved by the [`substitution`] engine, the document is loaded
//! into a generic tree by the [`loader`] and bound onto the model by the [`parser`].

pub mod error;
pub mod loader;
pub mod log;
pub mod model;
pub mod parser;
pub mod properties;
pub mod sources;
pub mod substitution;

mod scalar;

pub use error::{ComponentKind, ConfigurationError, Result};
pub use model::OpenTelemetryConfiguration;
pub use parser::{Parser, ParserBuilder, SUPPORTED_FILE_FORMATS};
pub use properties::StructuredProperties;
