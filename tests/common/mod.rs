//! Shared fixtures for the integration tests

#![allow(dead_code)]

use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use viewbind::reactive::{NotifyPropertyChanged, PropertyBag, PropertyChange, Subject};
use viewbind::routing::{RoutableViewModel, ScreenId, ViewModel};
use viewbind::ui::{
    Capabilities, ControlCore, EventSource, HasActivationEvent, HasEnabledFlag, TargetType,
    UiDispatcher, Widget,
};

/// Routable page with a fixed path segment
pub struct HomeViewModel {
    pub segment: String,
    pub screen: ScreenId,
}

impl HomeViewModel {
    pub fn new(segment: &str, screen: ScreenId) -> Arc<Self> {
        Arc::new(Self {
            segment: segment.to_string(),
            screen,
        })
    }
}

impl ViewModel for HomeViewModel {
    fn as_routable(self: Arc<Self>) -> Option<Arc<dyn RoutableViewModel>> {
        Some(self)
    }
}

impl RoutableViewModel for HomeViewModel {
    fn url_path_segment(&self) -> String {
        self.segment.clone()
    }

    fn host_screen(&self) -> ScreenId {
        self.screen
    }
}

/// Second routable type, for type-based lookups
pub struct SettingsViewModel {
    pub screen: ScreenId,
    pub contract: Option<String>,
}

impl SettingsViewModel {
    pub fn new(screen: ScreenId) -> Arc<Self> {
        Arc::new(Self {
            screen,
            contract: None,
        })
    }

    pub fn with_contract(screen: ScreenId, contract: &str) -> Arc<Self> {
        Arc::new(Self {
            screen,
            contract: Some(contract.to_string()),
        })
    }
}

impl ViewModel for SettingsViewModel {
    fn view_contract(&self) -> Option<&str> {
        self.contract.as_deref()
    }

    fn as_routable(self: Arc<Self>) -> Option<Arc<dyn RoutableViewModel>> {
        Some(self)
    }
}

impl RoutableViewModel for SettingsViewModel {
    fn url_path_segment(&self) -> String {
        "settings".to_string()
    }

    fn host_screen(&self) -> ScreenId {
        self.screen
    }
}

/// A plain view-model that can't be navigated to
pub struct DialogViewModel;

impl ViewModel for DialogViewModel {}

/// View-model with observable properties
pub struct ProfileViewModel {
    pub properties: PropertyBag,
}

impl ProfileViewModel {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            properties: PropertyBag::new().with("Name", Value::String(name.to_string())),
        })
    }

    pub fn name(&self) -> String {
        self.properties
            .get("Name")
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }
}

impl NotifyPropertyChanged for ProfileViewModel {
    fn get_property(&self, name: &str) -> Option<Value> {
        self.properties.get(name)
    }

    fn set_property(&self, name: &str, value: Value) -> viewbind::Result<()> {
        self.properties.set_property(name, value)
    }

    fn property_changed(&self) -> &Subject<PropertyChange> {
        self.properties.changed()
    }
}

/// Button-like control that counts writes to its enabled flag
pub struct CountingButton {
    core: ControlCore,
    click: EventSource,
    writes: AtomicUsize,
    history: Mutex<Vec<bool>>,
}

impl CountingButton {
    pub const TYPE: TargetType = TargetType::new(
        "CountingButton",
        Capabilities::CONTROL
            .union(Capabilities::ACTIVATION)
            .union(Capabilities::ENABLED_FLAG),
    );

    pub fn new(dispatcher: UiDispatcher) -> Arc<Self> {
        Arc::new(Self {
            core: ControlCore::new("counting", dispatcher),
            click: Subject::new(),
            writes: AtomicUsize::new(0),
            history: Mutex::new(Vec::new()),
        })
    }

    pub fn core(&self) -> &ControlCore {
        &self.core
    }

    pub fn click(&self) {
        self.click.next(Value::String("click".to_string()));
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn history(&self) -> Vec<bool> {
        self.history.lock().clone()
    }

    pub fn observer_count(&self) -> usize {
        self.click.observer_count()
    }
}

impl HasActivationEvent for CountingButton {
    fn activation_event(&self) -> (&'static str, &EventSource) {
        ("Click", &self.click)
    }
}

impl HasEnabledFlag for CountingButton {
    fn is_enabled(&self) -> bool {
        self.core.is_enabled()
    }

    fn set_enabled(&self, enabled: bool) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.history.lock().push(enabled);
        self.core.set_enabled(enabled);
    }
}

impl Widget for CountingButton {
    fn target_type(&self) -> TargetType {
        Self::TYPE
    }

    fn control(&self) -> Option<&ControlCore> {
        Some(&self.core)
    }

    fn event(&self, name: &str) -> Option<EventSource> {
        match name {
            "Click" => Some(self.click.clone()),
            _ => None,
        }
    }

    fn as_activatable(&self) -> Option<&dyn HasActivationEvent> {
        Some(self)
    }

    fn as_enableable(&self) -> Option<&dyn HasEnabledFlag> {
        Some(self)
    }
}

/// Collects every value a test callback sees
pub fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + Sync + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |value: &T| sink.lock().push(value.clone()))
}
