use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use uuid::Uuid;

use super::RoutingState;
use crate::AsAny;

/// Application state behind a view
pub trait ViewModel: AsAny + Send + Sync {
    /// Fully qualified type name, the input to view lookup
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Optional tag selecting one of several views registered for this type
    fn view_contract(&self) -> Option<&str> {
        None
    }

    /// Routable form of this view-model, if it has one.
    /// Routable types implement this as `Some(self)`.
    fn as_routable(self: Arc<Self>) -> Option<Arc<dyn RoutableViewModel>> {
        None
    }
}

/// A view-model that can sit on a navigation stack
pub trait RoutableViewModel: ViewModel {
    /// This entry's part of the route URL
    fn url_path_segment(&self) -> String;

    /// The screen whose router hosts this view-model
    fn host_screen(&self) -> ScreenId;
}

/// Compare two stack entries by identity
pub fn same_view_model(a: &Arc<dyn RoutableViewModel>, b: &Arc<dyn RoutableViewModel>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

/// Non-owning handle from a view-model to its screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenId(Uuid);

impl ScreenId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScreenId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ScreenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps screen ids to their routers without keeping the routers alive
pub struct ScreenRegistry {
    screens: RwLock<HashMap<ScreenId, Weak<RoutingState>>>,
}

impl ScreenRegistry {
    pub fn new() -> Self {
        Self {
            screens: RwLock::new(HashMap::new()),
        }
    }

    /// Register `router` under a fresh id
    pub fn register(&self, router: &Arc<RoutingState>) -> ScreenId {
        let id = ScreenId::new();
        self.screens.write().insert(id, Arc::downgrade(router));
        log::debug!("Registered screen {}", id);
        id
    }

    /// Router for `id`, if it is registered and still alive
    pub fn router(&self, id: ScreenId) -> Option<Arc<RoutingState>> {
        self.screens.read().get(&id).and_then(Weak::upgrade)
    }

    /// Router hosting `view_model`
    pub fn router_for(&self, view_model: &dyn RoutableViewModel) -> Option<Arc<RoutingState>> {
        self.router(view_model.host_screen())
    }

    pub fn remove(&self, id: ScreenId) -> bool {
        self.screens.write().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.screens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ScreenRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_registry_does_not_own_router() {
        let screens = ScreenRegistry::new();
        let router = RoutingState::new();
        let id = screens.register(&router);

        assert!(screens.router(id).is_some());
        drop(router);
        assert!(screens.router(id).is_none());
        assert!(screens.remove(id));
        assert!(screens.is_empty());
    }

    #[test]
    fn test_screen_ids_are_unique() {
        assert_ne!(ScreenId::new(), ScreenId::new());
    }
}
