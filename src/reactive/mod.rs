//! Minimal push-based reactive primitives
//!
//! Just enough of an observable core for bindings and routing: multicast
//! subjects, idempotent subscriptions, commands and property notifications.

pub mod command;
pub mod property;
pub mod subject;
pub mod subscription;

pub use command::{Command, DelegateCommand, ReactiveCommand};
pub use property::{NotifyPropertyChanged, PropertyBag, PropertyChange, observe_property_changes};
pub use subject::Subject;
pub use subscription::{CompositeSubscription, Subscription};
