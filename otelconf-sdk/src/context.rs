// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

use opentelemetry_sdk::error::OTelSdkResult;
use opentelemetry_sdk::Resource;
use otelconf::model::PluginComponent;
use otelconf::{conf_debug, ComponentKind, ConfigurationError, Result, StructuredProperties};

use crate::components::Component;
use crate::ledger::Ledger;
use crate::registry::{closer_for, Produced, ProviderContext, ProviderRegistry, ProviderSnapshot};

/// State of a single build: the provider snapshot, the resource once built and the ledger of
/// closeable components created so far.
///
/// A context serves exactly one build. Create a new one for every build so that rollback only
/// ever closes what that build created.
pub struct ConstructionContext {
    registry: Arc<dyn ProviderRegistry>,
    providers: OnceCell<ProviderSnapshot>,
    resource: Option<Resource>,
    ledger: Ledger,
}

impl fmt::Debug for ConstructionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructionContext")
            .field("providers", &self.providers.get())
            .field("ledger", &self.ledger)
            .finish()
    }
}

impl ConstructionContext {
    pub fn new(registry: Arc<dyn ProviderRegistry>) -> Self {
        ConstructionContext {
            registry,
            providers: OnceCell::new(),
            resource: None,
            ledger: Ledger::new(),
        }
    }

    /// Providers of this build, discovered on first use
    pub fn providers(&self) -> &ProviderSnapshot {
        self.providers.get_or_init(|| {
            let snapshot = ProviderSnapshot::from_providers(self.registry.discover());
            conf_debug!("Discovered {} component providers", snapshot.len());
            snapshot
        })
    }

    pub fn resource(&self) -> Option<&Resource> {
        self.resource.as_ref()
    }

    pub(crate) fn set_resource(&mut self, resource: Resource) {
        self.resource = Some(resource);
    }

    pub fn provider_context(&self) -> ProviderContext<'_> {
        ProviderContext::new(self.resource.as_ref())
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Records a built-in component so that a failed build closes it
    pub(crate) fn track<C: Component + ?Sized + 'static>(
        &mut self,
        kind: ComponentKind,
        name: &str,
        component: &Arc<C>,
    ) {
        self.ledger
            .record(kind, name, closer_for(Arc::clone(component)));
    }

    /// Builds `plugin` with the provider registered under its name for `T`'s capability kind
    pub(crate) fn create_plugin<T: Produced>(&mut self, plugin: &PluginComponent) -> Result<T> {
        let name = plugin.name.as_str();
        let constructor = self
            .providers()
            .lookup(T::KIND, name)
            .and_then(T::constructor)
            .cloned()
            .ok_or_else(|| ConfigurationError::not_found(T::KIND, name))?;

        let properties = StructuredProperties::from_value(&plugin.properties).ok_or_else(|| {
            ConfigurationError::construction(
                T::KIND,
                name,
                format!("properties must be a mapping, found {}", plugin.properties),
            )
        })?;

        conf_debug!("Creating {} \"{}\" from provider", T::KIND, name);
        let component = constructor(&properties, &self.provider_context())
            .map_err(|e| ConfigurationError::construction(T::KIND, name, e))?;
        if let Some(close) = component.closer() {
            self.ledger.record(T::KIND, name, close);
        }
        Ok(component)
    }

    pub(crate) fn into_ledger(self) -> Ledger {
        self.ledger
    }

    /// Closes everything this build created
    pub fn rollback(self) -> OTelSdkResult {
        self.ledger.close_all()
    }
}
