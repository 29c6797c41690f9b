//! Container that shows the view for its router's current view-model

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use super::{RoutableViewModel, RoutingState, ViewLocator};
use crate::exception::{self, ExceptionHandler};
use crate::reactive::Subscription;
use crate::ui::{Capabilities, ControlCore, Dock, TargetType, UiDispatcher, Widget};
use crate::Error;

/// Swaps its single child whenever the router's stack changes.
///
/// With no current view-model it shows the default content. Otherwise it
/// resolves a view, hands it the view-model and docks it to fill the host.
/// Content changes wait for the host's handle and always run on the UI thread.
pub struct RoutedViewHost {
    core: ControlCore,
    locator: Arc<ViewLocator>,
    router: Mutex<Option<Arc<RoutingState>>>,
    router_subscription: Mutex<Subscription>,
    default_content: Mutex<Option<Arc<dyn Widget>>>,
    exception_handler: Mutex<Option<ExceptionHandler>>,
    this: Weak<RoutedViewHost>,
}

impl RoutedViewHost {
    pub const TYPE: TargetType = TargetType::new("RoutedViewHost", Capabilities::CONTROL);

    pub fn new(name: impl Into<String>, dispatcher: UiDispatcher, locator: Arc<ViewLocator>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            core: ControlCore::new(name, dispatcher),
            locator,
            router: Mutex::new(None),
            router_subscription: Mutex::new(Subscription::empty()),
            default_content: Mutex::new(None),
            exception_handler: Mutex::new(None),
            this: this.clone(),
        })
    }

    pub fn core(&self) -> &ControlCore {
        &self.core
    }

    /// Realize the host; queued content changes apply now
    pub fn create_handle(&self) {
        self.core.create_handle();
    }

    pub fn router(&self) -> Option<Arc<RoutingState>> {
        self.router.lock().clone()
    }

    /// Follow `router`, dropping whichever router was followed before
    pub fn set_router(&self, router: Option<Arc<RoutingState>>) {
        let previous = std::mem::replace(&mut *self.router_subscription.lock(), Subscription::empty());
        previous.unsubscribe();
        *self.router.lock() = router.clone();

        let Some(router) = router else {
            log::debug!("{}: router cleared", self.core.name());
            self.show(None);
            return;
        };

        let host = self.this.clone();
        let source = Arc::downgrade(&router);
        let subscription = router.navigation_stack().observe_count(move |_| {
            let (Some(host), Some(router)) = (host.upgrade(), source.upgrade()) else {
                return;
            };
            host.show(router.current_view_model());
        });
        *self.router_subscription.lock() = subscription;
    }

    pub fn default_content(&self) -> Option<Arc<dyn Widget>> {
        self.default_content.lock().clone()
    }

    /// Content shown while there is no current view-model
    pub fn set_default_content(&self, content: Option<Arc<dyn Widget>>) {
        *self.default_content.lock() = content;
        let current = self.router().and_then(|router| router.current_view_model());
        if current.is_none() {
            self.show(None);
        }
    }

    /// The displayed child, if any
    pub fn content(&self) -> Option<Arc<dyn Widget>> {
        self.core.first_child()
    }

    /// Send view errors here instead of the process-wide sink
    pub fn set_exception_handler<F>(&self, handler: F)
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        *self.exception_handler.lock() = Some(Arc::new(handler));
    }

    fn show(&self, view_model: Option<Arc<dyn RoutableViewModel>>) {
        let host = self.this.clone();
        self.core.handle().when_ready(move || {
            let Some(host) = host.upgrade() else {
                return;
            };
            match view_model {
                None => {
                    let content = host.default_content();
                    host.replace_content(content);
                }
                Some(view_model) => match host.locator.resolve_view(view_model.as_ref()) {
                    Ok(view) => {
                        view.set_view_model(Some(Arc::clone(&view_model)));
                        log::debug!(
                            "{}: showing view for '{}'",
                            host.core.name(),
                            view_model.url_path_segment()
                        );
                        host.replace_content(Some(view.into_widget()));
                    }
                    Err(err) => host.report(&err),
                },
            }
        });
    }

    fn replace_content(&self, content: Option<Arc<dyn Widget>>) {
        self.core.clear_children();
        if let Some(content) = content {
            if let Some(control) = content.control() {
                control.set_dock(Dock::Fill);
            }
            self.core.add_child(content);
        }
    }

    fn report(&self, err: &Error) {
        let handler = self.exception_handler.lock().clone();
        match handler {
            Some(handler) => handler(err),
            None => exception::report(err),
        }
    }
}

impl Drop for RoutedViewHost {
    fn drop(&mut self) {
        self.router_subscription.lock().unsubscribe();
    }
}

impl Widget for RoutedViewHost {
    fn target_type(&self) -> TargetType {
        Self::TYPE
    }

    fn control(&self) -> Option<&ControlCore> {
        Some(&self.core)
    }
}
