//! Navigation state and routed view hosting

pub mod host;
pub mod lifecycle;
pub mod locator;
pub mod state;
pub mod view;
pub mod view_model;

pub use host::RoutedViewHost;
pub use lifecycle::{NavigationPhase, navigated_from, navigated_to, when_navigated_to};
pub use locator::{NameTransform, ViewFactory, ViewKey, ViewLocator, ViewRegistry};
pub use state::{NavigationStack, RouteSnapshot, RoutingState, URL_SCHEME};
pub use view::{PanelView, ViewFor};
pub use view_model::{RoutableViewModel, ScreenId, ScreenRegistry, ViewModel, same_view_model};
