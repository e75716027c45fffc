//! # Handler Registry
//!
//! Maps resource-type names (`Custom::MediaLiveChannel`, ...) to handlers.
//!
//! The table is assembled once with a [`RegistryBuilder`] at process start and
//! frozen by [`RegistryBuilder::build`]. The resulting [`HandlerRegistry`] has no
//! mutating methods, so it can be shared behind an `Arc` and read from any task
//! without locking.

use crate::handler::ResourceHandler;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Immutable name -> handler table.
pub struct HandlerRegistry<C: Send + Sync> {
    handlers: HashMap<String, Arc<dyn ResourceHandler<C>>>,
}

impl<C: Send + Sync> HandlerRegistry<C> {
    pub fn builder() -> RegistryBuilder<C> {
        RegistryBuilder::new()
    }

    /// Look up the handler for an exact resource-type name.
    pub fn get(&self, resource_type: &str) -> Option<Arc<dyn ResourceHandler<C>>> {
        self.handlers.get(resource_type).cloned()
    }

    /// Registered names, sorted.
    pub fn resource_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Collects registrations before the registry is frozen.
pub struct RegistryBuilder<C: Send + Sync> {
    handlers: HashMap<String, Arc<dyn ResourceHandler<C>>>,
}

impl<C: Send + Sync> Default for RegistryBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Send + Sync> RegistryBuilder<C> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Associate `resource_type` with `handler`. A later registration under the
    /// same name replaces the earlier one.
    pub fn register<H>(self, resource_type: impl Into<String>, handler: H) -> Self
    where
        H: ResourceHandler<C> + 'static,
    {
        self.register_arc(resource_type, Arc::new(handler))
    }

    pub fn register_arc(
        mut self,
        resource_type: impl Into<String>,
        handler: Arc<dyn ResourceHandler<C>>,
    ) -> Self {
        let resource_type = resource_type.into();
        if self.handlers.insert(resource_type.clone(), handler).is_some() {
            debug!(%resource_type, "Replaced existing handler registration");
        } else {
            debug!(%resource_type, "Registered handler");
        }
        self
    }

    pub fn build(self) -> HandlerRegistry<C> {
        HandlerRegistry {
            handlers: self.handlers,
        }
    }
}
