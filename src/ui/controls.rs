//! Headless controls
//!
//! These model just the parts of a desktop control that bindings and the
//! routed view host touch: a realized handle, a property store, events,
//! docking and a child list. Nothing here renders.

use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{
    Capabilities, Dock, EventSource, HandleState, HasActivationEvent, HasEnabledFlag,
    HasTextValue, TargetType, UiDispatcher, Widget,
};
use crate::reactive::{
    CompositeSubscription, NotifyPropertyChanged, PropertyBag, Subject, Subscription,
    observe_property_changes,
};
use crate::{Error, Result};

pub const ENABLED_PROPERTY: &str = "Enabled";
pub const VISIBLE_PROPERTY: &str = "Visible";
pub const TEXT_PROPERTY: &str = "Text";

/// Render any JSON value the way a text control would show it
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// State shared by every control
pub struct ControlCore {
    name: String,
    handle: HandleState,
    properties: PropertyBag,
    dock: Mutex<Dock>,
    children: Mutex<Vec<Arc<dyn Widget>>>,
    data_bindings: DataBindings,
}

impl ControlCore {
    pub fn new(name: impl Into<String>, dispatcher: UiDispatcher) -> Self {
        let properties = PropertyBag::new()
            .with(ENABLED_PROPERTY, json!(true))
            .with(VISIBLE_PROPERTY, json!(true))
            .with(TEXT_PROPERTY, json!(""));
        let handle = HandleState::new(dispatcher);

        Self {
            name: name.into(),
            data_bindings: DataBindings::new(properties.clone(), handle.clone()),
            handle,
            properties,
            dock: Mutex::new(Dock::None),
            children: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> &HandleState {
        &self.handle
    }

    /// Realize the control. Deferred UI work runs now.
    pub fn create_handle(&self) {
        self.handle.create();
    }

    pub fn is_handle_created(&self) -> bool {
        self.handle.is_created()
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    pub fn dock(&self) -> Dock {
        *self.dock.lock()
    }

    pub fn set_dock(&self, dock: Dock) {
        *self.dock.lock() = dock;
    }

    pub fn data_bindings(&self) -> &DataBindings {
        &self.data_bindings
    }

    pub fn children(&self) -> Vec<Arc<dyn Widget>> {
        self.children.lock().clone()
    }

    pub fn first_child(&self) -> Option<Arc<dyn Widget>> {
        self.children.lock().first().cloned()
    }

    pub fn add_child(&self, child: Arc<dyn Widget>) {
        self.children.lock().push(child);
    }

    pub fn clear_children(&self) {
        self.children.lock().clear();
    }

    pub fn text(&self) -> String {
        self.properties
            .get(TEXT_PROPERTY)
            .map(|v| value_to_text(&v))
            .unwrap_or_default()
    }

    fn write(&self, name: &str, value: Value) {
        write_logged(&self.properties, &self.name, name, value);
    }
}

/// Write a control property, logging instead of failing. Returns false when
/// the write was rejected.
fn write_logged(properties: &PropertyBag, owner: &str, name: &str, value: Value) -> bool {
    match properties.set(name, value) {
        Ok(_) => true,
        Err(err) => {
            log::warn!("{}: failed to write {}: {}", owner, name, err);
            false
        }
    }
}

impl HasEnabledFlag for ControlCore {
    fn is_enabled(&self) -> bool {
        self.properties
            .get(ENABLED_PROPERTY)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    fn set_enabled(&self, enabled: bool) {
        self.write(ENABLED_PROPERTY, Value::Bool(enabled));
    }
}

/// Identifier of one native data binding on a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataBindingId(u64);

/// A control's own two-way binding list
pub struct DataBindings {
    properties: PropertyBag,
    handle: HandleState,
    next_id: AtomicU64,
    entries: Mutex<HashMap<DataBindingId, CompositeSubscription>>,
}

impl DataBindings {
    fn new(properties: PropertyBag, handle: HandleState) -> Self {
        Self {
            properties,
            handle,
            next_id: AtomicU64::new(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Bind `target_property` on this control to `source_property` on `source`.
    ///
    /// The source value is pushed into the control once the handle exists and
    /// on every later source change; control-side changes flow back to the source.
    pub fn add(
        &self,
        target_property: &str,
        source: &Arc<dyn NotifyPropertyChanged>,
        source_property: &str,
    ) -> Result<DataBindingId> {
        if !self.properties.contains(target_property) {
            return Err(Error::invalid_argument(format!(
                "Control has no property '{}'",
                target_property
            )));
        }
        if !source.has_property(source_property) {
            return Err(Error::invalid_argument(format!(
                "Source has no property '{}'",
                source_property
            )));
        }

        let subscriptions = CompositeSubscription::new();
        let weak_source = Arc::downgrade(source);

        {
            let properties = self.properties.clone();
            let weak_source = weak_source.clone();
            let (tp, sp) = (target_property.to_string(), source_property.to_string());
            self.handle.when_ready(move || {
                if let Some(value) = weak_source.upgrade().and_then(|s| s.get_property(&sp)) {
                    write_logged(&properties, "native binding", &tp, value);
                }
            });
        }

        {
            let properties = self.properties.clone();
            let handle = self.handle.clone();
            let tp = target_property.to_string();
            subscriptions.add(observe_property_changes(
                source.as_ref(),
                &[source_property],
                move |change| {
                    let properties = properties.clone();
                    let (tp, value) = (tp.clone(), change.value.clone());
                    handle.when_ready(move || {
                        write_logged(&properties, "native binding", &tp, value);
                    });
                },
            ));
        }

        {
            let sp = source_property.to_string();
            subscriptions.add(observe_property_changes(
                &self.properties,
                &[target_property],
                move |change| {
                    if let Some(source) = weak_source.upgrade() {
                        if let Err(err) = source.set_property(&sp, change.value.clone()) {
                            log::warn!("Native binding write-back to '{}' failed: {}", sp, err);
                        }
                    }
                },
            ));
        }

        let id = DataBindingId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.entries.lock().insert(id, subscriptions);
        Ok(id)
    }

    /// Remove a binding. Returns false if it was already gone.
    pub fn remove(&self, id: DataBindingId) -> bool {
        let removed = self.entries.lock().remove(&id);
        match removed {
            Some(subscriptions) => {
                subscriptions.unsubscribe();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct Button {
    core: ControlCore,
    click: EventSource,
}

impl Button {
    pub const TYPE: TargetType = TargetType::new(
        "Button",
        Capabilities::CONTROL
            .union(Capabilities::ACTIVATION)
            .union(Capabilities::ENABLED_FLAG)
            .union(Capabilities::NATIVE_BINDING),
    );

    pub fn new(name: impl Into<String>, dispatcher: UiDispatcher) -> Arc<Self> {
        Arc::new(Self {
            core: ControlCore::new(name, dispatcher),
            click: Subject::new(),
        })
    }

    /// Raise the click event, as a user press would
    pub fn click(&self) {
        self.click.next(json!({ "event": "Click", "source": self.core.name() }));
    }

    pub fn core(&self) -> &ControlCore {
        &self.core
    }
}

impl HasActivationEvent for Button {
    fn activation_event(&self) -> (&'static str, &EventSource) {
        ("Click", &self.click)
    }
}

impl Widget for Button {
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
        Some(&self.core)
    }
}

pub struct TextBox {
    core: ControlCore,
    text_changed: EventSource,
    text_watch: Subscription,
}

impl TextBox {
    pub const TYPE: TargetType = TargetType::new(
        "TextBox",
        Capabilities::CONTROL
            .union(Capabilities::TEXT_VALUE)
            .union(Capabilities::ENABLED_FLAG)
            .union(Capabilities::NATIVE_BINDING),
    );

    pub fn new(name: impl Into<String>, dispatcher: UiDispatcher) -> Arc<Self> {
        let core = ControlCore::new(name, dispatcher);
        let text_changed: EventSource = Subject::new();

        let events = text_changed.clone();
        let text_watch = observe_property_changes(core.properties(), &[TEXT_PROPERTY], move |c| {
            events.next(json!({ "event": "TextChanged", "text": c.value }));
        });

        Arc::new(Self {
            core,
            text_changed,
            text_watch,
        })
    }

    pub fn core(&self) -> &ControlCore {
        &self.core
    }
}

impl Drop for TextBox {
    fn drop(&mut self) {
        self.text_watch.unsubscribe();
    }
}

impl HasTextValue for TextBox {
    fn text(&self) -> String {
        self.core.text()
    }

    fn set_text(&self, text: &str) {
        self.core.write(TEXT_PROPERTY, Value::String(text.to_string()));
    }

    fn text_changed(&self) -> &EventSource {
        &self.text_changed
    }
}

impl Widget for TextBox {
    fn target_type(&self) -> TargetType {
        Self::TYPE
    }

    fn control(&self) -> Option<&ControlCore> {
        Some(&self.core)
    }

    fn event(&self, name: &str) -> Option<EventSource> {
        match name {
            "TextChanged" => Some(self.text_changed.clone()),
            _ => None,
        }
    }

    fn as_enableable(&self) -> Option<&dyn HasEnabledFlag> {
        Some(&self.core)
    }

    fn as_text_input(&self) -> Option<&dyn HasTextValue> {
        Some(self)
    }
}

/// Read-only text display
pub struct Label {
    core: ControlCore,
}

impl Label {
    pub const TYPE: TargetType = TargetType::new(
        "Label",
        Capabilities::CONTROL.union(Capabilities::NATIVE_BINDING),
    );

    pub fn new(name: impl Into<String>, dispatcher: UiDispatcher) -> Arc<Self> {
        Arc::new(Self {
            core: ControlCore::new(name, dispatcher),
        })
    }

    pub fn core(&self) -> &ControlCore {
        &self.core
    }

    pub fn text(&self) -> String {
        self.core.text()
    }
}

impl Widget for Label {
    fn target_type(&self) -> TargetType {
        Self::TYPE
    }

    fn control(&self) -> Option<&ControlCore> {
        Some(&self.core)
    }
}

/// Plain container
pub struct Panel {
    core: ControlCore,
}

impl Panel {
    pub const TYPE: TargetType = TargetType::new("Panel", Capabilities::CONTROL);

    pub fn new(name: impl Into<String>, dispatcher: UiDispatcher) -> Arc<Self> {
        Arc::new(Self {
            core: ControlCore::new(name, dispatcher),
        })
    }

    pub fn core(&self) -> &ControlCore {
        &self.core
    }
}

impl Widget for Panel {
    fn target_type(&self) -> TargetType {
        Self::TYPE
    }

    fn control(&self) -> Option<&ControlCore> {
        Some(&self.core)
    }
}
