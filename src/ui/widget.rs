use serde_json::Value;
use std::ops::BitOr;

use super::ControlCore;
use crate::AsAny;
use crate::reactive::Subject;

/// Payload carried by widget events
pub type EventArgs = Value;

/// A widget event stream
pub type EventSource = Subject<EventArgs>;

/// Set of capabilities a widget type declares.
///
/// Affinity scoring only ever looks at these bits, never at a live instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);
    /// Owns a handle and lives on the UI thread
    pub const CONTROL: Capabilities = Capabilities(1);
    /// Has a default "click-like" event
    pub const ACTIVATION: Capabilities = Capabilities(1 << 1);
    /// Has a boolean enabled-like flag
    pub const ENABLED_FLAG: Capabilities = Capabilities(1 << 2);
    /// Has an editable text value with a change event
    pub const TEXT_VALUE: Capabilities = Capabilities(1 << 3);
    /// Supports the widget's own two-way data bindings
    pub const NATIVE_BINDING: Capabilities = Capabilities(1 << 4);

    pub const fn union(self, other: Capabilities) -> Capabilities {
        Capabilities(self.0 | other.0)
    }

    pub const fn contains(self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Capabilities {
    type Output = Capabilities;

    fn bitor(self, rhs: Capabilities) -> Capabilities {
        self.union(rhs)
    }
}

/// Static description of a widget type, used as the affinity input and cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetType {
    pub name: &'static str,
    pub capabilities: Capabilities,
}

impl TargetType {
    pub const fn new(name: &'static str, capabilities: Capabilities) -> Self {
        Self { name, capabilities }
    }

    pub fn has(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn is_control(&self) -> bool {
        self.has(Capabilities::CONTROL)
    }
}

/// Placement of a child inside its container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dock {
    #[default]
    None,
    Fill,
}

pub trait HasActivationEvent {
    /// Name and stream of the default activation event
    fn activation_event(&self) -> (&'static str, &EventSource);
}

pub trait HasEnabledFlag {
    fn is_enabled(&self) -> bool;
    fn set_enabled(&self, enabled: bool);
}

pub trait HasTextValue {
    fn text(&self) -> String;
    fn set_text(&self, text: &str);
    fn text_changed(&self) -> &EventSource;
}

/// A bindable UI element.
///
/// Capability accessors return `None` unless the widget's [`TargetType`]
/// declares the matching bit.
pub trait Widget: AsAny + Send + Sync {
    fn target_type(&self) -> TargetType;

    /// Handle, property store and children, for widgets that are controls
    fn control(&self) -> Option<&ControlCore> {
        None
    }

    /// Look up an explicitly named event
    fn event(&self, _name: &str) -> Option<EventSource> {
        None
    }

    fn as_activatable(&self) -> Option<&dyn HasActivationEvent> {
        None
    }

    fn as_enableable(&self) -> Option<&dyn HasEnabledFlag> {
        None
    }

    fn as_text_input(&self) -> Option<&dyn HasTextValue> {
        None
    }
}

/// Run `action` once the widget's handle exists, on the UI thread.
/// Widgets without a handle run it straight away.
pub fn run_when_ready<F>(widget: &dyn Widget, action: F)
where
    F: FnOnce() + Send + 'static,
{
    match widget.control() {
        Some(control) => control.handle().when_ready(action),
        None => action(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_union_and_contains() {
        let caps = Capabilities::CONTROL | Capabilities::ACTIVATION;
        assert!(caps.contains(Capabilities::CONTROL));
        assert!(caps.contains(Capabilities::ACTIVATION));
        assert!(!caps.contains(Capabilities::TEXT_VALUE));
        assert!(caps.contains(Capabilities::NONE));
    }

    #[test]
    fn test_target_type_equality_is_structural() {
        let a = TargetType::new("Button", Capabilities::CONTROL);
        let b = TargetType::new("Button", Capabilities::CONTROL);
        let c = TargetType::new("Button", Capabilities::CONTROL | Capabilities::ACTIVATION);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
