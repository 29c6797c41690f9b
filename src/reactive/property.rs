use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use super::{Subject, Subscription};
use crate::{Error, Result};

/// A single property change notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyChange {
    pub property_name: String,
    pub value: Value,
}

/// An object that publishes named property changes
pub trait NotifyPropertyChanged: Send + Sync {
    fn get_property(&self, name: &str) -> Option<Value>;

    /// Write a property. Fails for properties the object doesn't declare.
    fn set_property(&self, name: &str, value: Value) -> Result<()>;

    fn property_changed(&self) -> &Subject<PropertyChange>;

    fn has_property(&self, name: &str) -> bool {
        self.get_property(name).is_some()
    }
}

/// Watch `names` on `source`, calling `on_change` for each matching notification
pub fn observe_property_changes<F>(
    source: &dyn NotifyPropertyChanged,
    names: &[&str],
    on_change: F,
) -> Subscription
where
    F: Fn(&PropertyChange) + Send + Sync + 'static,
{
    let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    source.property_changed().subscribe(move |change| {
        if names.iter().any(|n| *n == change.property_name) {
            on_change(change);
        }
    })
}

/// Declared-property store that raises a notification only when a value changes
#[derive(Clone)]
pub struct PropertyBag {
    values: Arc<Mutex<HashMap<String, Value>>>,
    changed: Subject<PropertyChange>,
}

impl Default for PropertyBag {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyBag {
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
            changed: Subject::new(),
        }
    }

    /// Builder-style declaration
    pub fn with(self, name: impl Into<String>, initial: Value) -> Self {
        self.declare(name, initial);
        self
    }

    /// Declare a property with an initial value. Redeclaring keeps the current value.
    pub fn declare(&self, name: impl Into<String>, initial: Value) {
        self.values.lock().entry(name.into()).or_insert(initial);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.lock().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.lock().contains_key(name)
    }

    /// Returns whether the stored value actually changed
    pub fn set(&self, name: &str, value: Value) -> Result<bool> {
        {
            let mut values = self.values.lock();
            let slot = values
                .get_mut(name)
                .ok_or_else(|| Error::invalid_argument(format!("Unknown property '{}'", name)))?;
            if *slot == value {
                return Ok(false);
            }
            *slot = value.clone();
        }

        self.changed.next(PropertyChange {
            property_name: name.to_string(),
            value,
        });
        Ok(true)
    }

    pub fn changed(&self) -> &Subject<PropertyChange> {
        &self.changed
    }
}

impl NotifyPropertyChanged for PropertyBag {
    fn get_property(&self, name: &str) -> Option<Value> {
        self.get(name)
    }

    fn set_property(&self, name: &str, value: Value) -> Result<()> {
        self.set(name, value).map(|_| ())
    }

    fn property_changed(&self) -> &Subject<PropertyChange> {
        &self.changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_same_value_is_silent() {
        let bag = PropertyBag::new().with("Name", json!("Ada"));
        let hits = Arc::new(Mutex::new(Vec::new()));
        let h = Arc::clone(&hits);
        let _sub = bag.changed().subscribe(move |c| h.lock().push(c.value.clone()));

        assert!(!bag.set("Name", json!("Ada")).unwrap());
        assert!(bag.set("Name", json!("Grace")).unwrap());

        assert_eq!(*hits.lock(), vec![json!("Grace")]);
    }

    #[test]
    fn test_unknown_property_is_invalid() {
        let bag = PropertyBag::new();
        let result = bag.set_property("Missing", json!(1));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_observe_filters_by_name() {
        let bag = PropertyBag::new().with("A", json!(0)).with("B", json!(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let _sub = observe_property_changes(&bag, &["B"], move |c| {
            s.lock().push(c.property_name.clone())
        });

        bag.set("A", json!(1)).unwrap();
        bag.set("B", json!(1)).unwrap();

        assert_eq!(*seen.lock(), vec!["B".to_string()]);
    }
}
