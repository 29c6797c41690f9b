use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use super::Subscription;

type NextFn<T> = Arc<dyn Fn(&T) + Send + Sync>;
type CompletedFn = Arc<dyn Fn() + Send + Sync>;

struct Observer<T> {
    id: u64,
    on_next: NextFn<T>,
    on_completed: Option<CompletedFn>,
}

struct SubjectState<T> {
    next_id: u64,
    observers: Vec<Observer<T>>,
    completed: bool,
}

/// Multicast push stream.
///
/// Observers are invoked outside the internal lock, in subscription order,
/// so a callback may freely subscribe, unsubscribe or emit again.
pub struct Subject<T> {
    state: Arc<Mutex<SubjectState<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Subject<T> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                next_id: 0,
                observers: Vec::new(),
                completed: false,
            })),
        }
    }

    /// A stream that has already completed without emitting anything
    pub fn completed() -> Self {
        let subject = Self::new();
        subject.complete();
        subject
    }

    pub fn subscribe<F>(&self, on_next: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.add_observer(Arc::new(on_next), None)
    }

    pub fn subscribe_with_completion<F, C>(&self, on_next: F, on_completed: C) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
        C: Fn() + Send + Sync + 'static,
    {
        self.add_observer(Arc::new(on_next), Some(Arc::new(on_completed)))
    }

    fn add_observer(&self, on_next: NextFn<T>, on_completed: Option<CompletedFn>) -> Subscription {
        let id = {
            let mut state = self.state.lock();
            if state.completed {
                drop(state);
                if let Some(on_completed) = on_completed {
                    on_completed();
                }
                return Subscription::empty();
            }
            let id = state.next_id;
            state.next_id += 1;
            state.observers.push(Observer {
                id,
                on_next,
                on_completed,
            });
            id
        };

        let weak: Weak<Mutex<SubjectState<T>>> = Arc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                state.lock().observers.retain(|o| o.id != id);
            }
        })
    }

    /// Push a value to every current observer. Ignored after completion.
    pub fn next(&self, value: T) {
        let callbacks: Vec<NextFn<T>> = {
            let state = self.state.lock();
            if state.completed {
                return;
            }
            state.observers.iter().map(|o| Arc::clone(&o.on_next)).collect()
        };

        for callback in callbacks {
            callback(&value);
        }
    }

    /// Signal completion and drop every observer
    pub fn complete(&self) {
        let observers = {
            let mut state = self.state.lock();
            if state.completed {
                return;
            }
            state.completed = true;
            std::mem::take(&mut state.observers)
        };

        for observer in observers {
            if let Some(on_completed) = observer.on_completed {
                on_completed();
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state.lock().completed
    }

    /// Number of live registrations
    pub fn observer_count(&self) -> usize {
        self.state.lock().observers.len()
    }
}
