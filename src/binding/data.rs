//! Data binders: keep a source property and a widget property in sync

use serde_json::Value;
use std::sync::{Arc, Weak};

use super::{CapabilityProvider, ResolvedBinding};
use crate::reactive::{CompositeSubscription, NotifyPropertyChanged, Subscription, observe_property_changes};
use crate::ui::{Capabilities, TEXT_PROPERTY, TargetType, Widget, run_when_ready, value_to_text};
use crate::{Error, Result};

pub trait DataBindingProvider: CapabilityProvider {
    /// Positive when this binder can bind `target_property` on `target`
    fn affinity(&self, target: &TargetType, target_property: &str) -> i32;

    /// Bind `source_property` on `source` to `target_property` on `target`.
    /// Returns `Ok(None)` when the widget turns out not to support the property.
    fn bind(
        &self,
        source: Arc<dyn NotifyPropertyChanged>,
        source_property: &str,
        target: Arc<dyn Widget>,
        target_property: &str,
    ) -> Result<Option<ResolvedBinding>>;
}

/// Delegates to the control's own two-way binding list
pub struct NativeDataBinder;

impl CapabilityProvider for NativeDataBinder {
    fn name(&self) -> &'static str {
        "native-data-binder"
    }
}

impl DataBindingProvider for NativeDataBinder {
    fn affinity(&self, target: &TargetType, _target_property: &str) -> i32 {
        if target.is_control() && target.has(Capabilities::NATIVE_BINDING) {
            2
        } else {
            0
        }
    }

    fn bind(
        &self,
        source: Arc<dyn NotifyPropertyChanged>,
        source_property: &str,
        target: Arc<dyn Widget>,
        target_property: &str,
    ) -> Result<Option<ResolvedBinding>> {
        let Some(control) = target.control() else {
            return Ok(None);
        };
        if !control.properties().contains(target_property) {
            log::debug!(
                "{} has no bindable property '{}'",
                target.target_type().name,
                target_property
            );
            return Ok(None);
        }

        let id = control
            .data_bindings()
            .add(target_property, &source, source_property)?;

        let weak_target: Weak<dyn Widget> = Arc::downgrade(&target);
        let subscriptions = CompositeSubscription::new();
        subscriptions.add(Subscription::new(move || {
            if let Some(widget) = weak_target.upgrade() {
                if let Some(control) = widget.control() {
                    control.data_bindings().remove(id);
                }
            }
        }));

        Ok(Some(ResolvedBinding::new(
            self.name(),
            target.target_type().name,
            subscriptions,
        )))
    }
}

/// Two-way text binding driven by the widget's text-changed event
pub struct TextEventDataBinder;

impl CapabilityProvider for TextEventDataBinder {
    fn name(&self) -> &'static str {
        "text-event-data-binder"
    }
}

impl DataBindingProvider for TextEventDataBinder {
    fn affinity(&self, target: &TargetType, target_property: &str) -> i32 {
        if target.has(Capabilities::TEXT_VALUE) && target_property == TEXT_PROPERTY {
            5
        } else {
            0
        }
    }

    fn bind(
        &self,
        source: Arc<dyn NotifyPropertyChanged>,
        source_property: &str,
        target: Arc<dyn Widget>,
        target_property: &str,
    ) -> Result<Option<ResolvedBinding>> {
        if target_property != TEXT_PROPERTY {
            return Ok(None);
        }
        let Some(input) = target.as_text_input() else {
            return Ok(None);
        };
        if !source.has_property(source_property) {
            return Err(Error::invalid_argument(format!(
                "Source has no property '{}'",
                source_property
            )));
        }

        let subscriptions = CompositeSubscription::new();
        let weak_target: Weak<dyn Widget> = Arc::downgrade(&target);
        let weak_source: Weak<dyn NotifyPropertyChanged> = Arc::downgrade(&source);

        // source -> widget
        {
            let weak_target = weak_target.clone();
            subscriptions.add(observe_property_changes(
                source.as_ref(),
                &[source_property],
                move |change| {
                    let Some(widget) = weak_target.upgrade() else {
                        return;
                    };
                    let text = value_to_text(&change.value);
                    let deferred = weak_target.clone();
                    run_when_ready(widget.as_ref(), move || {
                        if let Some(input) = deferred.upgrade() {
                            if let Some(text_input) = input.as_text_input() {
                                text_input.set_text(&text);
                            }
                        }
                    });
                },
            ));
        }

        // widget's current text seeds the source
        write_back(&weak_source, source_property, &input.text());

        // widget -> source
        {
            let sp = source_property.to_string();
            subscriptions.add(input.text_changed().subscribe(move |_| {
                let Some(widget) = weak_target.upgrade() else {
                    return;
                };
                if let Some(text_input) = widget.as_text_input() {
                    write_back(&weak_source, &sp, &text_input.text());
                }
            }));
        }

        log::debug!(
            "Bound {}.{} to source property '{}'",
            target.target_type().name,
            target_property,
            source_property
        );

        Ok(Some(ResolvedBinding::new(
            self.name(),
            target.target_type().name,
            subscriptions,
        )))
    }
}

fn write_back(source: &Weak<dyn NotifyPropertyChanged>, property: &str, text: &str) {
    let Some(source) = source.upgrade() else {
        return;
    };
    if let Err(err) = source.set_property(property, Value::String(text.to_string())) {
        log::warn!("Text write-back to '{}' failed: {}", property, err);
    }
}
