//! View lookup for view-models
//!
//! [`ViewLocator::resolve_view`] tries three strategies in order, logging
//! each one that comes up empty:
//!
//! 1. the view-model type name run through the name transform
//!    (`app::LoginViewModel` becomes `app::LoginView`), as a concrete view
//! 2. a view registered for the interface form of the view-model name
//!    (`app::ILoginViewModel`)
//! 3. a view registered for the view-model type itself

use anyhow::Context;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::{RoutableViewModel, ViewFor};
use crate::config::{Settings, ViewSettings};
use crate::{Error, Result};

/// Builds a fresh view
pub type ViewFactory = Arc<dyn Fn() -> anyhow::Result<Arc<dyn ViewFor>> + Send + Sync>;

/// Name transform from a view-model type name to a view type name
pub type NameTransform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// What a view was registered against
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewKey {
    /// A concrete view type name
    Concrete(String),

    /// "The view for" a view-model type (or interface) name
    ViewFor(String),
}

/// Registered view factories, keyed by [`ViewKey`] plus an optional contract
pub struct ViewRegistry {
    factories: RwLock<HashMap<(ViewKey, Option<String>), ViewFactory>>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// Register a factory, replacing any previous one for the same key
    pub fn register<F>(&self, key: ViewKey, contract: Option<&str>, factory: F)
    where
        F: Fn() -> anyhow::Result<Arc<dyn ViewFor>> + Send + Sync + 'static,
    {
        log::debug!("Registered view for {:?} (contract {:?})", key, contract);
        self.factories
            .write()
            .insert((key, contract.map(str::to_string)), Arc::new(factory));
    }

    /// Register a concrete view type by name
    pub fn register_view<F>(&self, view_type_name: &str, contract: Option<&str>, factory: F)
    where
        F: Fn() -> anyhow::Result<Arc<dyn ViewFor>> + Send + Sync + 'static,
    {
        self.register(ViewKey::Concrete(view_type_name.to_string()), contract, factory);
    }

    /// Register the view for view-model type `VM`
    pub fn register_view_for<VM, F>(&self, contract: Option<&str>, factory: F)
    where
        VM: RoutableViewModel + 'static,
        F: Fn() -> anyhow::Result<Arc<dyn ViewFor>> + Send + Sync + 'static,
    {
        self.register_view_for_name(std::any::type_name::<VM>(), contract, factory);
    }

    /// Register the view for a view-model type or interface given by name
    pub fn register_view_for_name<F>(&self, view_model_type_name: &str, contract: Option<&str>, factory: F)
    where
        F: Fn() -> anyhow::Result<Arc<dyn ViewFor>> + Send + Sync + 'static,
    {
        self.register(ViewKey::ViewFor(view_model_type_name.to_string()), contract, factory);
    }

    pub fn contains(&self, key: &ViewKey, contract: Option<&str>) -> bool {
        self.factories
            .read()
            .contains_key(&(key.clone(), contract.map(str::to_string)))
    }

    /// Build a view. `None` when nothing is registered for the key.
    pub fn create(&self, key: &ViewKey, contract: Option<&str>) -> Option<anyhow::Result<Arc<dyn ViewFor>>> {
        let factory = self
            .factories
            .read()
            .get(&(key.clone(), contract.map(str::to_string)))
            .cloned()?;
        Some(factory().with_context(|| format!("View factory for {:?} failed", key)))
    }

    pub fn len(&self) -> usize {
        self.factories.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Finds the view for a view-model
pub struct ViewLocator {
    views: Arc<ViewRegistry>,
    naming: ViewSettings,
    transform: Option<NameTransform>,
}

impl ViewLocator {
    pub fn new(views: Arc<ViewRegistry>) -> Self {
        Self {
            views,
            naming: ViewSettings::default(),
            transform: None,
        }
    }

    pub fn from_settings(views: Arc<ViewRegistry>, settings: &Settings) -> Self {
        Self {
            views,
            naming: settings.views.clone(),
            transform: None,
        }
    }

    /// Replace the default view-model to view name transform
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    pub fn views(&self) -> &Arc<ViewRegistry> {
        &self.views
    }

    /// Candidate view type name for a view-model type name
    pub fn view_type_name(&self, view_model_type_name: &str) -> String {
        if let Some(transform) = &self.transform {
            return transform(view_model_type_name);
        }
        match view_model_type_name.strip_suffix(self.naming.view_model_suffix.as_str()) {
            Some(stem) => format!("{}{}", stem, self.naming.view_suffix),
            None => view_model_type_name.to_string(),
        }
    }

    /// Prefix the last path segment with the interface prefix
    pub fn interface_name(&self, type_name: &str) -> String {
        match type_name.rsplit_once("::") {
            Some((path, leaf)) => format!("{}::{}{}", path, self.naming.interface_prefix, leaf),
            None => format!("{}{}", self.naming.interface_prefix, type_name),
        }
    }

    pub fn resolve_view(&self, view_model: &dyn RoutableViewModel) -> Result<Arc<dyn ViewFor>> {
        let type_name = view_model.type_name();
        let contract = view_model.view_contract();

        let strategies = [
            ViewKey::Concrete(self.view_type_name(type_name)),
            ViewKey::ViewFor(self.interface_name(type_name)),
            ViewKey::ViewFor(type_name.to_string()),
        ];

        for key in &strategies {
            match self.views.create(key, contract) {
                Some(Ok(view)) => {
                    log::debug!("Resolved view for {} via {:?}", type_name, key);
                    return Ok(view);
                }
                Some(Err(err)) => log::debug!("Couldn't build view {:?}: {:#}", key, err),
                None => log::debug!("No view registered for {:?} (contract {:?})", key, contract),
            }
        }

        Err(Error::ViewNotFound {
            view_model: type_name.to_string(),
        })
    }
}
