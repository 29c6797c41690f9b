//! Binding resolution and navigation state for headless widgets
//!
//! - [`binding`]: pick the best binder for a widget by affinity and wire
//!   commands and properties to it
//! - [`routing`]: a navigation stack of view-models and a host control that
//!   shows the view for whichever one is current
//! - [`reactive`] and [`ui`]: the observable core and the widget model both
//!   of the above are built on

use std::any::Any;
use std::sync::Arc;

pub mod binding;
pub mod config;
pub mod error;
pub mod exception;
pub mod reactive;
pub mod routing;
pub mod ui;

pub use binding::{Binder, ProviderRegistry, ResolvedBinding};
pub use config::Settings;
pub use error::{Error, ProviderKind, Result};
pub use routing::{RoutableViewModel, RoutedViewHost, RoutingState, ViewLocator, ViewModel, ViewRegistry};

/// Downcasting support for trait objects
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
