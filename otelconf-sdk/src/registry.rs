// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Externally supplied component constructors, keyed by capability kind and name.
//!
//! A [`ProviderRegistry`] is asked for its providers once per build. The result is kept as a
//! [`ProviderSnapshot`] that answers every lookup of that build.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use opentelemetry::propagation::TextMapPropagator;
use opentelemetry_sdk::error::OTelSdkResult;
use opentelemetry_sdk::metrics::reader::MetricReader as SdkMetricReader;
use opentelemetry_sdk::resource::ResourceDetector;
use opentelemetry_sdk::trace::ShouldSample;
use opentelemetry_sdk::Resource;
use otelconf::{conf_warn, ComponentKind, StructuredProperties};

use crate::components::metric_reader::MetricReader;
use crate::components::view::Aggregation;
use crate::components::{
    Component, LogRecordExporter, LogRecordProcessor, MetricExporter, SpanExporter, SpanProcessor,
};

pub type BoxedPropagator = Box<dyn TextMapPropagator + Send + Sync>;

/// Builds a component from the properties written under its name
pub type Constructor<T> =
    Arc<dyn Fn(&StructuredProperties, &ProviderContext<'_>) -> anyhow::Result<T> + Send + Sync>;

/// Closes a component recorded in the build ledger
pub type Closer = Box<dyn FnOnce() -> OTelSdkResult + Send>;

/// Shared state available to provider constructors
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderContext<'a> {
    resource: Option<&'a Resource>,
}

impl<'a> ProviderContext<'a> {
    pub fn new(resource: Option<&'a Resource>) -> Self {
        ProviderContext { resource }
    }

    /// The resource of the SDK being built, once it has been constructed
    pub fn resource(&self) -> Option<&'a Resource> {
        self.resource
    }
}

#[derive(Clone)]
pub enum ProviderFactory {
    ResourceDetector(Constructor<Box<dyn ResourceDetector>>),
    TextMapPropagator(Constructor<BoxedPropagator>),
    Sampler(Constructor<Box<dyn ShouldSample>>),
    SpanExporter(Constructor<Arc<dyn SpanExporter>>),
    SpanProcessor(Constructor<Arc<dyn SpanProcessor>>),
    MetricExporter(Constructor<Arc<dyn MetricExporter>>),
    MetricReader(Constructor<Arc<MetricReader>>),
    Aggregation(Constructor<Aggregation>),
    LogRecordExporter(Constructor<Arc<dyn LogRecordExporter>>),
    LogRecordProcessor(Constructor<Arc<dyn LogRecordProcessor>>),
}

impl ProviderFactory {
    pub fn kind(&self) -> ComponentKind {
        match self {
            ProviderFactory::ResourceDetector(_) => ComponentKind::ResourceDetector,
            ProviderFactory::TextMapPropagator(_) => ComponentKind::TextMapPropagator,
            ProviderFactory::Sampler(_) => ComponentKind::Sampler,
            ProviderFactory::SpanExporter(_) => ComponentKind::SpanExporter,
            ProviderFactory::SpanProcessor(_) => ComponentKind::SpanProcessor,
            ProviderFactory::MetricExporter(_) => ComponentKind::MetricExporter,
            ProviderFactory::MetricReader(_) => ComponentKind::MetricReader,
            ProviderFactory::Aggregation(_) => ComponentKind::Aggregation,
            ProviderFactory::LogRecordExporter(_) => ComponentKind::LogRecordExporter,
            ProviderFactory::LogRecordProcessor(_) => ComponentKind::LogRecordProcessor,
        }
    }
}

impl fmt::Debug for ProviderFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProviderFactory({})", self.kind())
    }
}

/// A named constructor for one capability kind
#[derive(Clone, Debug)]
pub struct Provider {
    name: String,
    factory: ProviderFactory,
}

macro_rules! component_provider {
    ($(#[$meta:meta])* $fn_name:ident, $variant:ident, $capability:ident) => {
        $(#[$meta])*
        pub fn $fn_name<C, F>(name: impl Into<String>, constructor: F) -> Self
        where
            C: $capability + 'static,
            F: Fn(&StructuredProperties, &ProviderContext<'_>) -> anyhow::Result<C>
                + Send
                + Sync
                + 'static,
        {
            Provider::new(
                name,
                ProviderFactory::$variant(Arc::new(move |properties, context| {
                    constructor(properties, context).map(|c| Arc::new(c) as Arc<dyn $capability>)
                })),
            )
        }
    };
}

impl Provider {
    pub fn new(name: impl Into<String>, factory: ProviderFactory) -> Self {
        Provider {
            name: name.into(),
            factory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ComponentKind {
        self.factory.kind()
    }

    pub fn factory(&self) -> &ProviderFactory {
        &self.factory
    }

    pub fn resource_detector<D, F>(name: impl Into<String>, constructor: F) -> Self
    where
        D: ResourceDetector + 'static,
        F: Fn(&StructuredProperties, &ProviderContext<'_>) -> anyhow::Result<D>
            + Send
            + Sync
            + 'static,
    {
        Provider::new(
            name,
            ProviderFactory::ResourceDetector(Arc::new(move |properties, context| {
                constructor(properties, context).map(|d| Box::new(d) as Box<dyn ResourceDetector>)
            })),
        )
    }

    pub fn propagator<P, F>(name: impl Into<String>, constructor: F) -> Self
    where
        P: TextMapPropagator + Send + Sync + 'static,
        F: Fn(&StructuredProperties, &ProviderContext<'_>) -> anyhow::Result<P>
            + Send
            + Sync
            + 'static,
    {
        Provider::new(
            name,
            ProviderFactory::TextMapPropagator(Arc::new(move |properties, context| {
                constructor(properties, context).map(|p| Box::new(p) as BoxedPropagator)
            })),
        )
    }

    pub fn sampler<S, F>(name: impl Into<String>, constructor: F) -> Self
    where
        S: ShouldSample + 'static,
        F: Fn(&StructuredProperties, &ProviderContext<'_>) -> anyhow::Result<S>
            + Send
            + Sync
            + 'static,
    {
        Provider::new(
            name,
            ProviderFactory::Sampler(Arc::new(move |properties, context| {
                constructor(properties, context).map(|s| Box::new(s) as Box<dyn ShouldSample>)
            })),
        )
    }

    pub fn aggregation<F>(name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(&StructuredProperties, &ProviderContext<'_>) -> anyhow::Result<Aggregation>
            + Send
            + Sync
            + 'static,
    {
        Provider::new(name, ProviderFactory::Aggregation(Arc::new(constructor)))
    }

    component_provider!(span_exporter, SpanExporter, SpanExporter);
    component_provider!(span_processor, SpanProcessor, SpanProcessor);
    component_provider!(metric_exporter, MetricExporter, MetricExporter);
    /// Pull exporters such as `prometheus/development` register here with the SDK reader they
    /// serve from
    pub fn metric_reader<R, F>(name: impl Into<String>, constructor: F) -> Self
    where
        R: SdkMetricReader,
        F: Fn(&StructuredProperties, &ProviderContext<'_>) -> anyhow::Result<R>
            + Send
            + Sync
            + 'static,
    {
        Provider::new(
            name,
            ProviderFactory::MetricReader(Arc::new(move |properties, context| {
                constructor(properties, context).map(|r| Arc::new(MetricReader::new(r)))
            })),
        )
    }
    component_provider!(log_record_exporter, LogRecordExporter, LogRecordExporter);
    component_provider!(log_record_processor, LogRecordProcessor, LogRecordProcessor);
}

/// Source of externally supplied providers
pub trait ProviderRegistry: Send + Sync {
    /// Enumerates every registered provider. Called at most once per build.
    fn discover(&self) -> Vec<Provider>;
}

/// Registry over a fixed list of providers
#[derive(Clone, Debug, Default)]
pub struct StaticRegistry {
    providers: Vec<Provider>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn add_provider(&mut self, provider: Provider) -> &mut Self {
        self.providers.push(provider);
        self
    }
}

impl FromIterator<Provider> for StaticRegistry {
    fn from_iter<I: IntoIterator<Item = Provider>>(iter: I) -> Self {
        StaticRegistry {
            providers: iter.into_iter().collect(),
        }
    }
}

impl ProviderRegistry for StaticRegistry {
    fn discover(&self) -> Vec<Provider> {
        self.providers.clone()
    }
}

/// The providers of one build, indexed by kind and name
#[derive(Debug, Default)]
pub struct ProviderSnapshot {
    providers: HashMap<(ComponentKind, String), ProviderFactory>,
}

impl ProviderSnapshot {
    /// When two providers share a kind and name the first one is kept
    pub fn from_providers(providers: Vec<Provider>) -> Self {
        let mut snapshot = ProviderSnapshot::default();
        for Provider { name, factory } in providers {
            let kind = factory.kind();
            match snapshot.providers.entry((kind, name)) {
                std::collections::hash_map::Entry::Occupied(entry) => {
                    conf_warn!(
                        "Duplicate provider registered for {} with name \"{}\", keeping the first",
                        kind,
                        entry.key().1
                    );
                }
                std::collections::hash_map::Entry::Vacant(entry) => {
                    entry.insert(factory);
                }
            }
        }
        snapshot
    }

    pub fn lookup(&self, kind: ComponentKind, name: &str) -> Option<&ProviderFactory> {
        self.providers.get(&(kind, name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Output types of provider constructors
pub(crate) trait Produced: Sized {
    const KIND: ComponentKind;

    fn constructor(factory: &ProviderFactory) -> Option<&Constructor<Self>>;

    /// How the build ledger closes this output, when it holds resources
    fn closer(&self) -> Option<Closer> {
        None
    }
}

macro_rules! produced {
    ($variant:ident, $output:ty) => {
        impl Produced for $output {
            const KIND: ComponentKind = ComponentKind::$variant;

            fn constructor(factory: &ProviderFactory) -> Option<&Constructor<Self>> {
                match factory {
                    ProviderFactory::$variant(constructor) => Some(constructor),
                    _ => None,
                }
            }
        }
    };
    ($variant:ident, $output:ty, closeable) => {
        impl Produced for $output {
            const KIND: ComponentKind = ComponentKind::$variant;

            fn constructor(factory: &ProviderFactory) -> Option<&Constructor<Self>> {
                match factory {
                    ProviderFactory::$variant(constructor) => Some(constructor),
                    _ => None,
                }
            }

            fn closer(&self) -> Option<Closer> {
                Some(closer_for(Arc::clone(self)))
            }
        }
    };
}

pub(crate) fn closer_for<C: Component + ?Sized + 'static>(component: Arc<C>) -> Closer {
    Box::new(move || component.shutdown())
}

produced!(ResourceDetector, Box<dyn ResourceDetector>);
produced!(TextMapPropagator, BoxedPropagator);
produced!(Sampler, Box<dyn ShouldSample>);
produced!(Aggregation, Aggregation);
produced!(SpanExporter, Arc<dyn SpanExporter>, closeable);
produced!(SpanProcessor, Arc<dyn SpanProcessor>, closeable);
produced!(MetricExporter, Arc<dyn MetricExporter>, closeable);
produced!(MetricReader, Arc<MetricReader>, closeable);
produced!(LogRecordExporter, Arc<dyn LogRecordExporter>, closeable);
produced!(LogRecordProcessor, Arc<dyn LogRecordProcessor>, closeable);
