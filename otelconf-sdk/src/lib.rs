// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Builds a wired OpenTelemetry SDK from a declarative configuration model.
//!
//! [`DeclarativeConfiguration`] parses a document with [`otelconf`] and hands the model to the
//! [`factory`] graph. Components the model names but this crate does not implement are built
//! by the providers of a [`ProviderRegistry`](registry::ProviderRegistry).

pub mod components;
pub mod configuration;
pub mod context;
pub mod factory;
pub mod ledger;
pub mod registry;
pub mod sdk;

#[cfg(test)]
mod testing;

pub use configuration::{DeclarativeConfiguration, DeclarativeConfigurationBuilder};
pub use context::ConstructionContext;
pub use registry::{Provider, ProviderContext, ProviderFactory, ProviderRegistry, StaticRegistry};
pub use sdk::OpenTelemetrySdk;

pub use otelconf::{ComponentKind, ConfigurationError, OpenTelemetryConfiguration, Result};
