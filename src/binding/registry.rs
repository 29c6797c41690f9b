//! Registry of capability providers, in registration order

use parking_lot::RwLock;
use std::sync::Arc;

use super::{
    CommandBindingProvider, DataBindingProvider, EnabledCommandBinder, EventCommandBinder,
    NativeDataBinder, TextEventDataBinder,
};

/// Thread-safe list of command and data binders.
///
/// Order matters: when two binders report the same affinity, the one
/// registered first wins.
pub struct ProviderRegistry {
    command_binders: RwLock<Vec<Arc<dyn CommandBindingProvider>>>,
    data_binders: RwLock<Vec<Arc<dyn DataBindingProvider>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            command_binders: RwLock::new(Vec::new()),
            data_binders: RwLock::new(Vec::new()),
        }
    }

    /// Registry holding the built-in binders
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register_command_binder(Arc::new(EventCommandBinder));
        registry.register_command_binder(Arc::new(EnabledCommandBinder));
        registry.register_data_binder(Arc::new(NativeDataBinder));
        registry.register_data_binder(Arc::new(TextEventDataBinder));
        registry
    }

    pub fn register_command_binder(&self, binder: Arc<dyn CommandBindingProvider>) {
        log::debug!("Registered command binder: {}", binder.name());
        self.command_binders.write().push(binder);
    }

    pub fn register_data_binder(&self, binder: Arc<dyn DataBindingProvider>) {
        log::debug!("Registered data binder: {}", binder.name());
        self.data_binders.write().push(binder);
    }

    /// Snapshot of the command binders
    pub fn command_binders(&self) -> Vec<Arc<dyn CommandBindingProvider>> {
        self.command_binders.read().clone()
    }

    /// Snapshot of the data binders
    pub fn data_binders(&self) -> Vec<Arc<dyn DataBindingProvider>> {
        self.data_binders.read().clone()
    }

    /// Get total number of registered binders
    pub fn count(&self) -> usize {
        self.command_binders.read().len() + self.data_binders.read().len()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_registered_in_order() {
        let registry = ProviderRegistry::with_defaults();

        let commands: Vec<_> = registry.command_binders().iter().map(|b| b.name()).collect();
        let data: Vec<_> = registry.data_binders().iter().map(|b| b.name()).collect();

        assert_eq!(commands, vec!["event-command-binder", "enabled-command-binder"]);
        assert_eq!(data, vec!["native-data-binder", "text-event-data-binder"]);
        assert_eq!(registry.count(), 4);
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = ProviderRegistry::default();
        assert_eq!(registry.count(), 0);
        assert!(registry.command_binders().is_empty());
    }
}
