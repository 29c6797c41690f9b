//! Navigation lifecycle hooks for a single view-model
//!
//! Each hook looks up the view-model's router through its host screen and
//! watches the current entry of that router's stack.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use super::{RoutableViewModel, RoutingState, ScreenRegistry, same_view_model};
use crate::reactive::Subscription;
use crate::{Error, Result};

/// Whether a view-model is the one on top of its router's stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPhase {
    /// Somewhere below the top, or not on the stack at all
    Inactive,

    /// Current entry
    Active,
}

fn host_router(screens: &ScreenRegistry, view_model: &dyn RoutableViewModel) -> Result<Arc<RoutingState>> {
    screens.router_for(view_model).ok_or_else(|| {
        Error::invalid_argument(format!(
            "Screen {} for '{}' isn't registered",
            view_model.host_screen(),
            view_model.url_path_segment()
        ))
    })
}

/// Track the phase of `view_model`, calling `on_phase` with each new reading
fn watch_phase<F>(
    screens: &ScreenRegistry,
    view_model: &Arc<dyn RoutableViewModel>,
    on_phase: F,
) -> Result<Subscription>
where
    F: Fn(NavigationPhase) + Send + Sync + 'static,
{
    let router = host_router(screens, view_model.as_ref())?;
    let target: Weak<dyn RoutableViewModel> = Arc::downgrade(view_model);

    Ok(router.view_model_changes(move |current| {
        let Some(target) = target.upgrade() else {
            return;
        };
        let phase = match current {
            Some(current) if same_view_model(&current, &target) => NavigationPhase::Active,
            _ => NavigationPhase::Inactive,
        };
        on_phase(phase);
    }))
}

/// Call `on_navigated_to` whenever `view_model` is current after a stack
/// change, including right away if it already is
pub fn navigated_to<F>(
    screens: &ScreenRegistry,
    view_model: &Arc<dyn RoutableViewModel>,
    on_navigated_to: F,
) -> Result<Subscription>
where
    F: Fn() + Send + Sync + 'static,
{
    watch_phase(screens, view_model, move |phase| {
        if phase == NavigationPhase::Active {
            on_navigated_to();
        }
    })
}

/// Call `on_navigated_from` each time `view_model` stops being current
pub fn navigated_from<F>(
    screens: &ScreenRegistry,
    view_model: &Arc<dyn RoutableViewModel>,
    on_navigated_from: F,
) -> Result<Subscription>
where
    F: Fn() + Send + Sync + 'static,
{
    let previous = Mutex::new(NavigationPhase::Inactive);
    watch_phase(screens, view_model, move |phase| {
        let was = std::mem::replace(&mut *previous.lock(), phase);
        if was == NavigationPhase::Active && phase == NavigationPhase::Inactive {
            on_navigated_from();
        }
    })
}

/// Run `activate` whenever `view_model` becomes current and tear down what it
/// returned as soon as it isn't. Unsubscribing the result tears it down too.
pub fn when_navigated_to<F>(
    screens: &ScreenRegistry,
    view_model: &Arc<dyn RoutableViewModel>,
    activate: F,
) -> Result<Subscription>
where
    F: Fn() -> Subscription + Send + Sync + 'static,
{
    let inner: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

    let active = Arc::clone(&inner);
    let outer = watch_phase(screens, view_model, move |phase| {
        let previous = active.lock().take();
        if let Some(previous) = previous {
            previous.unsubscribe();
        }
        if phase == NavigationPhase::Active {
            let next = activate();
            *active.lock() = Some(next);
        }
    })?;

    Ok(Subscription::new(move || {
        outer.unsubscribe();
        if let Some(inner) = inner.lock().take() {
            inner.unsubscribe();
        }
    }))
}
