//! Navigation stack and the router that owns it

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::{Arc, Weak};

use super::{RoutableViewModel, ViewModel};
use crate::reactive::{DelegateCommand, ReactiveCommand, Subject, Subscription};
use crate::{Error, Result, exception};

pub const URL_SCHEME: &str = "app://";

/// Ordered view-models, root first and current last.
///
/// Every mutation is followed by exactly one count notification carrying the
/// new length. A refused mutation leaves the stack alone and notifies nobody.
#[derive(Clone)]
pub struct NavigationStack {
    entries: Arc<Mutex<Vec<Arc<dyn RoutableViewModel>>>>,
    count_changed: Subject<usize>,
}

impl NavigationStack {
    fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            count_changed: Subject::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<Arc<dyn RoutableViewModel>> {
        self.entries.lock().last().cloned()
    }

    pub fn snapshot(&self) -> Vec<Arc<dyn RoutableViewModel>> {
        self.entries.lock().clone()
    }

    pub fn count_changed(&self) -> &Subject<usize> {
        &self.count_changed
    }

    /// Call `on_count` with the current length, then after every mutation
    pub fn observe_count<F>(&self, on_count: F) -> Subscription
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        on_count(self.len());
        self.count_changed.subscribe(move |count| on_count(*count))
    }

    /// Apply `apply` under the lock. `None` means nothing changed.
    fn mutate<R>(&self, apply: impl FnOnce(&mut Vec<Arc<dyn RoutableViewModel>>) -> Option<R>) -> Option<R> {
        let (result, count) = {
            let mut entries = self.entries.lock();
            let result = apply(&mut entries);
            (result, entries.len())
        };
        if result.is_some() {
            self.count_changed.next(count);
        }
        result
    }
}

/// Serializable view of the current route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSnapshot {
    pub segments: Vec<String>,
    pub url: String,
}

/// Owns the navigation stack and the commands derived from it
pub struct RoutingState {
    stack: NavigationStack,
    navigate_back: Arc<ReactiveCommand>,
    subscriptions: Vec<Subscription>,
}

impl RoutingState {
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let stack = NavigationStack::new();
            let navigate_back = ReactiveCommand::with_initial(false);

            let command = Arc::downgrade(&navigate_back);
            let can_go_back = stack.count_changed().subscribe(move |count| {
                if let Some(command) = command.upgrade() {
                    command.set_can_execute(*count > 1);
                }
            });

            let router = weak.clone();
            let go_back = navigate_back.subscribe(move |_| {
                if let Some(router) = router.upgrade() {
                    router.navigate_back();
                }
            });

            Self {
                stack,
                navigate_back,
                subscriptions: vec![can_go_back, go_back],
            }
        })
    }

    pub fn navigation_stack(&self) -> &NavigationStack {
        &self.stack
    }

    /// Push `view_model`. Fails unless it is routable.
    pub fn navigate(&self, view_model: Arc<dyn ViewModel>) -> Result<()> {
        let routable = as_routable(view_model)?;
        let segment = routable.url_path_segment();
        let count = self.stack.mutate(|entries| {
            entries.push(routable);
            Some(entries.len())
        });
        log::info!("Navigated to '{}' (depth {})", segment, count.unwrap_or_default());
        Ok(())
    }

    /// Replace the whole stack with `view_model`.
    ///
    /// Observers see a single notification for the final state.
    pub fn navigate_and_reset(&self, view_model: Arc<dyn ViewModel>) -> Result<()> {
        let routable = as_routable(view_model)?;
        let segment = routable.url_path_segment();
        let dropped = self.stack.mutate(|entries| {
            let dropped = entries.len();
            entries.clear();
            entries.push(routable);
            Some(dropped)
        });
        log::info!(
            "Reset navigation to '{}' (dropped {} entries)",
            segment,
            dropped.unwrap_or_default()
        );
        Ok(())
    }

    /// Pop the current view-model. Returns false without notifying when the
    /// stack holds one entry or fewer.
    pub fn navigate_back(&self) -> bool {
        let popped = self.stack.mutate(|entries| {
            if entries.len() > 1 { entries.pop() } else { None }
        });

        match popped {
            Some(view_model) => {
                log::info!("Navigated back from '{}'", view_model.url_path_segment());
                true
            }
            None => {
                log::debug!("Ignoring navigate back on a stack of {}", self.stack.len());
                false
            }
        }
    }

    pub fn can_navigate_back(&self) -> bool {
        self.stack.len() > 1
    }

    /// Bindable back command; can-execute follows the stack depth
    pub fn navigate_back_command(&self) -> Arc<ReactiveCommand> {
        Arc::clone(&self.navigate_back)
    }

    pub fn current_view_model(&self) -> Option<Arc<dyn RoutableViewModel>> {
        self.stack.last()
    }

    pub fn url_for_current_route(&self) -> String {
        self.snapshot().url
    }

    /// Most recently pushed entry of type `T`
    pub fn find_in_stack<T>(&self) -> Option<Arc<T>>
    where
        T: RoutableViewModel + 'static,
    {
        self.stack
            .snapshot()
            .into_iter()
            .rev()
            .find(|vm| <dyn RoutableViewModel as crate::AsAny>::as_any(&**vm).is::<T>())
            .and_then(|vm| {
                <dyn RoutableViewModel as crate::AsAny>::into_any_arc(vm)
                    .downcast::<T>()
                    .ok()
            })
    }

    /// Call `on_change` with the current view-model now and after every mutation
    pub fn view_model_changes<F>(&self, on_change: F) -> Subscription
    where
        F: Fn(Option<Arc<dyn RoutableViewModel>>) + Send + Sync + 'static,
    {
        let stack = self.stack.clone();
        self.stack.observe_count(move |_| on_change(stack.last()))
    }

    /// Command that builds a view-model with `factory` and navigates to it
    pub fn navigate_command_for<F>(self: &Arc<Self>, factory: F) -> Arc<DelegateCommand>
    where
        F: Fn() -> Arc<dyn ViewModel> + Send + Sync + 'static,
    {
        let router = Arc::downgrade(self);
        DelegateCommand::new(move |_| {
            if let Some(router) = router.upgrade() {
                if let Err(err) = router.navigate(factory()) {
                    exception::report(&err);
                }
            }
        })
    }

    /// Like [`RoutingState::navigate_command_for`], resetting the stack first
    pub fn navigate_and_reset_command_for<F>(self: &Arc<Self>, factory: F) -> Arc<DelegateCommand>
    where
        F: Fn() -> Arc<dyn ViewModel> + Send + Sync + 'static,
    {
        let router = Arc::downgrade(self);
        DelegateCommand::new(move |_| {
            if let Some(router) = router.upgrade() {
                if let Err(err) = router.navigate_and_reset(factory()) {
                    exception::report(&err);
                }
            }
        })
    }

    pub fn snapshot(&self) -> RouteSnapshot {
        let segments: Vec<String> = self
            .stack
            .snapshot()
            .iter()
            .map(|vm| vm.url_path_segment())
            .collect();
        let url = format!("{}{}", URL_SCHEME, segments.join("/"));
        RouteSnapshot { segments, url }
    }
}

impl Drop for RoutingState {
    fn drop(&mut self) {
        for subscription in &self.subscriptions {
            subscription.unsubscribe();
        }
    }
}

fn as_routable(view_model: Arc<dyn ViewModel>) -> Result<Arc<dyn RoutableViewModel>> {
    let type_name = view_model.type_name();
    view_model.as_routable().ok_or_else(|| {
        Error::invalid_argument(format!("Navigate requires a routable view-model, got {}", type_name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Command;
    use crate::routing::ScreenId;
    use serde_json::Value;

    fn press_back(router: &RoutingState) -> bool {
        let command = router.navigate_back_command();
        if !command.can_execute(&Value::Null) {
            return false;
        }
        command.execute(&Value::Null);
        true
    }

    struct Page {
        segment: &'static str,
        screen: ScreenId,
    }

    impl ViewModel for Page {
        fn as_routable(self: Arc<Self>) -> Option<Arc<dyn RoutableViewModel>> {
            Some(self)
        }
    }

    impl RoutableViewModel for Page {
        fn url_path_segment(&self) -> String {
            self.segment.to_string()
        }

        fn host_screen(&self) -> ScreenId {
            self.screen
        }
    }

    struct NotRoutable;

    impl ViewModel for NotRoutable {}

    fn page(segment: &'static str) -> Arc<Page> {
        Arc::new(Page {
            segment,
            screen: ScreenId::new(),
        })
    }

    #[test]
    fn test_navigate_back_is_disabled_on_root() {
        let router = RoutingState::new();
        assert!(!router.navigate_back_command().current_can_execute());

        router.navigate(page("home")).unwrap();
        assert!(!router.can_navigate_back());
        assert!(!router.navigate_back());
        assert_eq!(router.navigation_stack().len(), 1);
    }

    #[test]
    fn test_non_routable_is_rejected() {
        let router = RoutingState::new();
        let result = router.navigate(Arc::new(NotRoutable));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert!(router.navigation_stack().is_empty());
    }

    #[test]
    fn test_back_command_pops() {
        let router = RoutingState::new();
        router.navigate(page("home")).unwrap();
        router.navigate(page("settings")).unwrap();

        assert!(press_back(&router));
        assert_eq!(router.url_for_current_route(), "app://home");
        assert!(!press_back(&router));
    }

    #[test]
    fn test_snapshot_serializes() {
        let router = RoutingState::new();
        router.navigate(page("home")).unwrap();

        let json = serde_json::to_value(router.snapshot()).unwrap();
        assert_eq!(json["url"], "app://home");
        assert_eq!(json["segments"][0], "home");
    }

    #[test]
    fn test_empty_route_url() {
        let router = RoutingState::new();
        assert_eq!(router.url_for_current_route(), "app://");
    }
}
