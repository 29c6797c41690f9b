//! Binding resolution
//!
//! [`Binder`] is the entry point. For each request it builds a [`BindingKey`]
//! from the target's static type, asks the resolver for the binder with the
//! best affinity (cached per key), and lets that binder wire the live
//! subscriptions.

pub mod cache;
pub mod command;
pub mod data;
pub mod registry;
pub mod resolved;
pub mod resolver;

pub use cache::{DEFAULT_CACHE_CAPACITY, MruCache};
pub use command::{CommandBindingProvider, EnabledCommandBinder, EventCommandBinder};
pub use data::{DataBindingProvider, NativeDataBinder, TextEventDataBinder};
pub use registry::ProviderRegistry;
pub use resolved::ResolvedBinding;
pub use resolver::{AffinityResolver, BindingKey, CapabilityProvider, select_best};

use serde_json::Value;
use std::sync::Arc;

use crate::config::Settings;
use crate::error::ProviderKind;
use crate::reactive::{Command, NotifyPropertyChanged, Subject};
use crate::ui::Widget;
use crate::{Error, Result};

/// Binding facade over a [`ProviderRegistry`]
pub struct Binder {
    registry: Arc<ProviderRegistry>,
    commands: AffinityResolver<dyn CommandBindingProvider>,
    data: AffinityResolver<dyn DataBindingProvider>,
}

impl Binder {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self::with_capacity(registry, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(registry: Arc<ProviderRegistry>, capacity: usize) -> Self {
        Self {
            registry,
            commands: AffinityResolver::new(ProviderKind::Command, capacity),
            data: AffinityResolver::new(ProviderKind::Data, capacity),
        }
    }

    pub fn from_settings(registry: Arc<ProviderRegistry>, settings: &Settings) -> Self {
        Self::with_capacity(registry, settings.binding.cache_capacity)
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Bind `command` to the target's default activation event.
    ///
    /// Without a parameter stream the command receives the event arguments.
    pub fn bind_command(
        &self,
        command: Arc<dyn Command>,
        target: Arc<dyn Widget>,
        parameter: Option<Subject<Value>>,
    ) -> Result<ResolvedBinding> {
        self.bind_command_inner(command, target, parameter, None)
    }

    /// Bind `command` to a named event on the target
    pub fn bind_command_to_event(
        &self,
        command: Arc<dyn Command>,
        target: Arc<dyn Widget>,
        parameter: Option<Subject<Value>>,
        event_name: &str,
    ) -> Result<ResolvedBinding> {
        self.bind_command_inner(command, target, parameter, Some(event_name))
    }

    fn bind_command_inner(
        &self,
        command: Arc<dyn Command>,
        target: Arc<dyn Widget>,
        parameter: Option<Subject<Value>>,
        event_name: Option<&str>,
    ) -> Result<ResolvedBinding> {
        let target_type = target.target_type();
        let key = BindingKey::new(target_type, event_name);

        let binder = self
            .commands
            .resolve(
                &key,
                || self.registry.command_binders(),
                |binder, key| binder.affinity(&key.target, key.context.is_some()),
            )
            .ok_or(Error::NoProviderFound {
                kind: ProviderKind::Command,
                target: target_type.name,
            })?;

        let parameter = parameter.unwrap_or_else(Subject::completed);
        match binder.bind(command, target, parameter, event_name)? {
            Some(binding) => Ok(binding),
            None => {
                log::warn!("{} refused to bind {}", binder.name(), target_type.name);
                Err(Error::ProviderRefused {
                    provider: binder.name(),
                    target: target_type.name,
                })
            }
        }
    }

    /// Bind `source_property` on `source` to `target_property` on `target`
    pub fn bind_property(
        &self,
        source: Arc<dyn NotifyPropertyChanged>,
        source_property: &str,
        target: Arc<dyn Widget>,
        target_property: &str,
    ) -> Result<ResolvedBinding> {
        if !source.has_property(source_property) {
            return Err(Error::invalid_argument(format!(
                "Source has no property '{}'",
                source_property
            )));
        }

        let target_type = target.target_type();
        let key = BindingKey::new(target_type, Some(target_property));

        let binder = self
            .data
            .resolve(
                &key,
                || self.registry.data_binders(),
                |binder, key| binder.affinity(&key.target, key.context.as_deref().unwrap_or("")),
            )
            .ok_or(Error::NoProviderFound {
                kind: ProviderKind::Data,
                target: target_type.name,
            })?;

        match binder.bind(source, source_property, target, target_property)? {
            Some(binding) => Ok(binding),
            None => {
                log::warn!(
                    "{} refused to bind {}.{}",
                    binder.name(),
                    target_type.name,
                    target_property
                );
                Err(Error::ProviderRefused {
                    provider: binder.name(),
                    target: target_type.name,
                })
            }
        }
    }

    /// Forget every cached resolution, e.g. after registering binders late
    pub fn clear_cache(&self) {
        self.commands.clear();
        self.data.clear();
    }

    pub fn cached_resolutions(&self) -> usize {
        self.commands.cached_len() + self.data.cached_len()
    }
}
