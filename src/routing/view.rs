use parking_lot::Mutex;
use std::sync::Arc;

use super::RoutableViewModel;
use crate::ui::{Capabilities, ControlCore, TargetType, UiDispatcher, Widget};

/// A widget that displays a view-model
pub trait ViewFor: Widget {
    fn view_model(&self) -> Option<Arc<dyn RoutableViewModel>>;

    fn set_view_model(&self, view_model: Option<Arc<dyn RoutableViewModel>>);

    fn into_widget(self: Arc<Self>) -> Arc<dyn Widget>;
}

/// Container view that just holds on to its view-model
pub struct PanelView {
    core: ControlCore,
    view_model: Mutex<Option<Arc<dyn RoutableViewModel>>>,
}

impl PanelView {
    pub const TYPE: TargetType = TargetType::new("PanelView", Capabilities::CONTROL);

    pub fn new(name: impl Into<String>, dispatcher: UiDispatcher) -> Arc<Self> {
        Arc::new(Self {
            core: ControlCore::new(name, dispatcher),
            view_model: Mutex::new(None),
        })
    }

    pub fn core(&self) -> &ControlCore {
        &self.core
    }
}

impl Widget for PanelView {
    fn target_type(&self) -> TargetType {
        Self::TYPE
    }

    fn control(&self) -> Option<&ControlCore> {
        Some(&self.core)
    }
}

impl ViewFor for PanelView {
    fn view_model(&self) -> Option<Arc<dyn RoutableViewModel>> {
        self.view_model.lock().clone()
    }

    fn set_view_model(&self, view_model: Option<Arc<dyn RoutableViewModel>>) {
        *self.view_model.lock() = view_model;
    }

    fn into_widget(self: Arc<Self>) -> Arc<dyn Widget> {
        self
    }
}
