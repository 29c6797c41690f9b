use crate::reactive::CompositeSubscription;

/// A live binding between a source and a widget.
///
/// Owns every listener its provider created. [`ResolvedBinding::stop`]
/// releases all of them and may be called any number of times, from any thread.
#[must_use = "a ResolvedBinding stays live until stop() is called"]
pub struct ResolvedBinding {
    provider: &'static str,
    target: &'static str,
    subscriptions: CompositeSubscription,
}

impl ResolvedBinding {
    pub fn new(
        provider: &'static str,
        target: &'static str,
        subscriptions: CompositeSubscription,
    ) -> Self {
        Self {
            provider,
            target,
            subscriptions,
        }
    }

    /// Name of the provider that created this binding
    pub fn provider(&self) -> &'static str {
        self.provider
    }

    /// Type name of the bound widget
    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn stop(&self) {
        if !self.subscriptions.is_disposed() {
            log::debug!("Stopping {} binding on {}", self.provider, self.target);
        }
        self.subscriptions.unsubscribe();
    }

    pub fn is_stopped(&self) -> bool {
        self.subscriptions.is_disposed()
    }
}

impl std::fmt::Debug for ResolvedBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedBinding")
            .field("provider", &self.provider)
            .field("target", &self.target)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
