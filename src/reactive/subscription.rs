use parking_lot::Mutex;

type Teardown = Box<dyn FnOnce() + Send>;

/// Handle to a live registration. Tearing it down more than once is a no-op.
///
/// Dropping a `Subscription` does not unsubscribe; call [`Subscription::unsubscribe`].
pub struct Subscription {
    teardown: Mutex<Option<Teardown>>,
}

impl Subscription {
    pub fn new<F>(teardown: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            teardown: Mutex::new(Some(Box::new(teardown))),
        }
    }

    /// A subscription with nothing to release
    pub fn empty() -> Self {
        Self {
            teardown: Mutex::new(None),
        }
    }

    pub fn unsubscribe(&self) {
        // Take first so the teardown runs without holding the lock
        let teardown = self.teardown.lock().take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.teardown.lock().is_none()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Owns a group of subscriptions and releases them together
pub struct CompositeSubscription {
    // None once disposed
    members: Mutex<Option<Vec<Subscription>>>,
}

impl CompositeSubscription {
    pub fn new() -> Self {
        Self {
            members: Mutex::new(Some(Vec::new())),
        }
    }

    /// Add a member. Adding to an already disposed group releases it immediately.
    pub fn add(&self, subscription: Subscription) {
        let mut members = self.members.lock();
        match members.as_mut() {
            Some(list) => list.push(subscription),
            None => {
                drop(members);
                subscription.unsubscribe();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.members.lock().as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn unsubscribe(&self) {
        let members = self.members.lock().take();
        if let Some(members) = members {
            for member in members {
                member.unsubscribe();
            }
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.members.lock().is_none()
    }
}

impl Default for CompositeSubscription {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Subscription>> for CompositeSubscription {
    fn from(subscriptions: Vec<Subscription>) -> Self {
        Self {
            members: Mutex::new(Some(subscriptions)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_composite_releases_each_member_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let composite = CompositeSubscription::new();
        for _ in 0..3 {
            let r = Arc::clone(&released);
            composite.add(Subscription::new(move || {
                r.fetch_add(1, Ordering::SeqCst);
            }));
        }

        composite.unsubscribe();
        composite.unsubscribe();

        assert_eq!(released.load(Ordering::SeqCst), 3);
        assert!(composite.is_disposed());
    }

    #[test]
    fn test_add_after_dispose_releases_immediately() {
        let released = Arc::new(AtomicUsize::new(0));
        let composite = CompositeSubscription::new();
        composite.unsubscribe();

        let r = Arc::clone(&released);
        composite.add(Subscription::new(move || {
            r.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
