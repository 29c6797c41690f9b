//! Headless widget model and UI-thread marshalling

pub mod controls;
pub mod dispatcher;
pub mod handle;
pub mod widget;

pub use controls::{
    Button, ControlCore, DataBindingId, DataBindings, Label, Panel, TextBox, ENABLED_PROPERTY,
    TEXT_PROPERTY, VISIBLE_PROPERTY, value_to_text,
};
pub use dispatcher::{UiAction, UiDispatcher};
pub use handle::HandleState;
pub use widget::{
    Capabilities, Dock, EventArgs, EventSource, HasActivationEvent, HasEnabledFlag, HasTextValue,
    TargetType, Widget, run_when_ready,
};
