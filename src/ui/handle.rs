use parking_lot::Mutex;
use std::sync::Arc;

use super::{UiAction, UiDispatcher};

struct HandleInner {
    created: bool,
    deferred: Vec<UiAction>,
}

/// Whether a widget has been realized, plus the work waiting on that.
///
/// Cloning shares the same underlying state.
#[derive(Clone)]
pub struct HandleState {
    dispatcher: UiDispatcher,
    inner: Arc<Mutex<HandleInner>>,
}

impl HandleState {
    pub fn new(dispatcher: UiDispatcher) -> Self {
        Self {
            dispatcher,
            inner: Arc::new(Mutex::new(HandleInner {
                created: false,
                deferred: Vec::new(),
            })),
        }
    }

    pub fn dispatcher(&self) -> &UiDispatcher {
        &self.dispatcher
    }

    pub fn is_created(&self) -> bool {
        self.inner.lock().created
    }

    /// Run `action` on the UI thread once the handle exists.
    ///
    /// Before creation the action is queued and runs exactly once, in queue
    /// order, when [`HandleState::create`] fires.
    pub fn when_ready<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut inner = self.inner.lock();
            if !inner.created {
                inner.deferred.push(Box::new(action));
                return;
            }
        }
        self.dispatcher.invoke(action);
    }

    /// Number of actions waiting for creation
    pub fn deferred_count(&self) -> usize {
        self.inner.lock().deferred.len()
    }

    /// Realize the handle and flush deferred work. Later calls do nothing.
    pub fn create(&self) {
        let deferred = {
            let mut inner = self.inner.lock();
            if inner.created {
                return;
            }
            inner.created = true;
            std::mem::take(&mut inner.deferred)
        };

        log::debug!("Handle created, flushing {} deferred action(s)", deferred.len());
        for action in deferred {
            self.dispatcher.invoke(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deferred_actions_run_once_in_order() {
        let handle = HandleState::new(UiDispatcher::for_current_thread());
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let o = Arc::clone(&order);
            handle.when_ready(move || o.lock().push(i));
        }
        assert!(order.lock().is_empty());
        assert_eq!(handle.deferred_count(), 3);

        handle.create();
        handle.create();

        assert_eq!(*order.lock(), vec![0, 1, 2]);
        assert_eq!(handle.deferred_count(), 0);
    }

    #[test]
    fn test_when_ready_after_creation_runs_immediately() {
        let handle = HandleState::new(UiDispatcher::for_current_thread());
        handle.create();

        let ran = Arc::new(Mutex::new(false));
        let r = Arc::clone(&ran);
        handle.when_ready(move || *r.lock() = true);

        assert!(*ran.lock());
    }
}
