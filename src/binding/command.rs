//! Command binders: wire a [`Command`] to a widget event

use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

use super::{CapabilityProvider, ResolvedBinding};
use crate::reactive::{Command, CompositeSubscription, Subject};
use crate::ui::{Capabilities, EventSource, TargetType, Widget};
use crate::{Error, Result};

pub trait CommandBindingProvider: CapabilityProvider {
    /// Positive when this binder can handle `target`; the highest score wins.
    /// `has_event_target` is true when the caller names the event explicitly.
    fn affinity(&self, target: &TargetType, has_event_target: bool) -> i32;

    /// Bind `command` to `target`, to `event_name` if given or the default
    /// activation event otherwise.
    ///
    /// The latest value from `parameter` is passed to the command. If
    /// `parameter` completes without ever producing a value, the raw event
    /// arguments are passed instead. Returns `Ok(None)` if the event this
    /// binder expected isn't there.
    fn bind(
        &self,
        command: Arc<dyn Command>,
        target: Arc<dyn Widget>,
        parameter: Subject<Value>,
        event_name: Option<&str>,
    ) -> Result<Option<ResolvedBinding>>;
}

fn locate_event(target: &dyn Widget, event_name: Option<&str>) -> Option<(String, EventSource)> {
    match event_name {
        Some(name) => target.event(name).map(|event| (name.to_string(), event)),
        None => target.as_activatable().map(|activatable| {
            let (name, event) = activatable.activation_event();
            (name.to_string(), event.clone())
        }),
    }
}

#[derive(Default)]
struct ParameterState {
    latest: Option<Value>,
    use_event_args: bool,
}

/// Gate `command` on can-execute every time `event` fires
fn wire_command(
    command: Arc<dyn Command>,
    event: &EventSource,
    parameter: &Subject<Value>,
    subscriptions: &CompositeSubscription,
) {
    let state = Arc::new(Mutex::new(ParameterState::default()));

    let on_value = Arc::clone(&state);
    let on_done = Arc::clone(&state);
    subscriptions.add(parameter.subscribe_with_completion(
        move |value| on_value.lock().latest = Some(value.clone()),
        move || {
            let mut state = on_done.lock();
            if state.latest.is_none() {
                state.use_event_args = true;
            }
        },
    ));

    subscriptions.add(event.subscribe(move |args| {
        let parameter = {
            let state = state.lock();
            if state.use_event_args {
                args.clone()
            } else {
                state.latest.clone().unwrap_or(Value::Null)
            }
        };

        if command.can_execute(&parameter) {
            command.execute(&parameter);
        }
    }));
}

/// Binds to the default activation event (or a named one)
pub struct EventCommandBinder;

impl CapabilityProvider for EventCommandBinder {
    fn name(&self) -> &'static str {
        "event-command-binder"
    }
}

impl CommandBindingProvider for EventCommandBinder {
    fn affinity(&self, target: &TargetType, has_event_target: bool) -> i32 {
        if has_event_target {
            return 5;
        }
        if target.has(Capabilities::ACTIVATION) { 3 } else { 0 }
    }

    fn bind(
        &self,
        command: Arc<dyn Command>,
        target: Arc<dyn Widget>,
        parameter: Subject<Value>,
        event_name: Option<&str>,
    ) -> Result<Option<ResolvedBinding>> {
        let Some((name, event)) = locate_event(target.as_ref(), event_name) else {
            return Ok(None);
        };

        let subscriptions = CompositeSubscription::new();
        wire_command(command, &event, &parameter, &subscriptions);
        log::debug!("Bound command to {}.{}", target.target_type().name, name);

        Ok(Some(ResolvedBinding::new(
            self.name(),
            target.target_type().name,
            subscriptions,
        )))
    }
}

/// Like [`EventCommandBinder`], and also mirrors the command's can-execute
/// state onto the widget's enabled flag
pub struct EnabledCommandBinder;

impl CapabilityProvider for EnabledCommandBinder {
    fn name(&self) -> &'static str {
        "enabled-command-binder"
    }
}

impl CommandBindingProvider for EnabledCommandBinder {
    fn affinity(&self, target: &TargetType, has_event_target: bool) -> i32 {
        if !target.is_control() {
            return 0;
        }
        if has_event_target {
            return 5;
        }
        if target.has(Capabilities::ACTIVATION) && target.has(Capabilities::ENABLED_FLAG) {
            4
        } else {
            0
        }
    }

    fn bind(
        &self,
        command: Arc<dyn Command>,
        target: Arc<dyn Widget>,
        parameter: Subject<Value>,
        event_name: Option<&str>,
    ) -> Result<Option<ResolvedBinding>> {
        let Some((name, event)) = locate_event(target.as_ref(), event_name) else {
            return Ok(None);
        };

        let subscriptions = CompositeSubscription::new();

        if target.as_enableable().is_some() {
            let (Some(reactive), Some(control)) = (command.as_reactive(), target.control()) else {
                return Err(Error::invalid_argument(
                    "Binding to Enabled is only available for reactive commands on controls",
                ));
            };

            let handle = control.handle().clone();
            let weak_target = Arc::downgrade(&target);

            let initial = reactive.current_can_execute();
            let first = weak_target.clone();
            handle.when_ready(move || set_enabled(&first, initial));

            subscriptions.add(reactive.can_execute_changed().subscribe(move |enabled| {
                let target = weak_target.clone();
                let enabled = *enabled;
                handle.when_ready(move || set_enabled(&target, enabled));
            }));
        }

        wire_command(command, &event, &parameter, &subscriptions);
        log::debug!(
            "Bound command with enabled mirroring to {}.{}",
            target.target_type().name,
            name
        );

        Ok(Some(ResolvedBinding::new(
            self.name(),
            target.target_type().name,
            subscriptions,
        )))
    }
}

fn set_enabled(target: &std::sync::Weak<dyn Widget>, enabled: bool) {
    match target.upgrade() {
        Some(widget) => {
            if let Some(flag) = widget.as_enableable() {
                flag.set_enabled(enabled);
            }
        }
        None => log::warn!("Widget dropped before enabled state could be applied"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{Label, TextBox};

    #[test]
    fn test_event_binder_affinity() {
        let binder = EventCommandBinder;
        assert_eq!(binder.affinity(&crate::ui::Button::TYPE, false), 3);
        assert_eq!(binder.affinity(&Label::TYPE, false), 0);
        assert_eq!(binder.affinity(&Label::TYPE, true), 5);
    }

    #[test]
    fn test_enabled_binder_affinity() {
        let binder = EnabledCommandBinder;
        let plain = TargetType::new("Hotkey", Capabilities::ACTIVATION);

        assert_eq!(binder.affinity(&crate::ui::Button::TYPE, false), 4);
        assert_eq!(binder.affinity(&TextBox::TYPE, false), 0);
        assert_eq!(binder.affinity(&TextBox::TYPE, true), 5);
        assert_eq!(binder.affinity(&plain, true), 0);
    }
}
