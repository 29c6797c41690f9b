use parking_lot::Mutex;
use serde_json::Value;
use std::sync::{Arc, Weak};

use super::{Subject, Subscription};

/// Something a widget can invoke, gated by a can-execute check
pub trait Command: Send + Sync {
    fn can_execute(&self, parameter: &Value) -> bool;

    fn execute(&self, parameter: &Value);

    /// Access the reactive form of this command, if it has one.
    /// Only reactive commands publish can-execute changes.
    fn as_reactive(&self) -> Option<&ReactiveCommand> {
        None
    }
}

/// Command whose can-execute state is driven by a boolean stream
pub struct ReactiveCommand {
    can_execute: Mutex<bool>,
    can_execute_changed: Subject<bool>,
    executed: Subject<Value>,
    source: Subscription,
}

impl ReactiveCommand {
    /// Always-executable command
    pub fn new() -> Arc<Self> {
        Self::with_initial(true)
    }

    pub fn with_initial(can_execute: bool) -> Arc<Self> {
        Arc::new(Self {
            can_execute: Mutex::new(can_execute),
            can_execute_changed: Subject::new(),
            executed: Subject::new(),
            source: Subscription::empty(),
        })
    }

    /// Follow `source` for can-execute. Repeated equal values are collapsed.
    pub fn from_can_execute(source: &Subject<bool>, initial: bool) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let subscription = source.subscribe(move |value| {
                if let Some(command) = weak.upgrade() {
                    command.set_can_execute(*value);
                }
            });

            Self {
                can_execute: Mutex::new(initial),
                can_execute_changed: Subject::new(),
                executed: Subject::new(),
                source: subscription,
            }
        })
    }

    /// Update can-execute, notifying only on an actual change
    pub fn set_can_execute(&self, value: bool) {
        {
            let mut current = self.can_execute.lock();
            if *current == value {
                return;
            }
            *current = value;
        }
        self.can_execute_changed.next(value);
    }

    pub fn current_can_execute(&self) -> bool {
        *self.can_execute.lock()
    }

    pub fn can_execute_changed(&self) -> &Subject<bool> {
        &self.can_execute_changed
    }

    /// Stream of parameters this command was executed with
    pub fn executed(&self) -> &Subject<Value> {
        &self.executed
    }

    pub fn subscribe<F>(&self, on_execute: F) -> Subscription
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.executed.subscribe(on_execute)
    }
}

impl Command for ReactiveCommand {
    fn can_execute(&self, _parameter: &Value) -> bool {
        self.current_can_execute()
    }

    fn execute(&self, parameter: &Value) {
        self.executed.next(parameter.clone());
    }

    fn as_reactive(&self) -> Option<&ReactiveCommand> {
        Some(self)
    }
}

impl Drop for ReactiveCommand {
    fn drop(&mut self) {
        self.source.unsubscribe();
    }
}

type CanExecuteFn = Box<dyn Fn(&Value) -> bool + Send + Sync>;
type ExecuteFn = Box<dyn Fn(&Value) + Send + Sync>;

/// Plain closure-backed command without a can-execute stream
pub struct DelegateCommand {
    can_execute: CanExecuteFn,
    execute: ExecuteFn,
}

impl DelegateCommand {
    pub fn new<E>(execute: E) -> Arc<Self>
    where
        E: Fn(&Value) + Send + Sync + 'static,
    {
        Self::with_can_execute(|_| true, execute)
    }

    pub fn with_can_execute<C, E>(can_execute: C, execute: E) -> Arc<Self>
    where
        C: Fn(&Value) -> bool + Send + Sync + 'static,
        E: Fn(&Value) + Send + Sync + 'static,
    {
        Arc::new(Self {
            can_execute: Box::new(can_execute),
            execute: Box::new(execute),
        })
    }
}

impl Command for DelegateCommand {
    fn can_execute(&self, parameter: &Value) -> bool {
        (self.can_execute)(parameter)
    }

    fn execute(&self, parameter: &Value) {
        (self.execute)(parameter)
    }
}
