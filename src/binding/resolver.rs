//! Affinity-based provider selection with a memoizing cache

use parking_lot::Mutex;
use std::sync::Arc;

use super::cache::MruCache;
use crate::error::ProviderKind;
use crate::ui::TargetType;

/// Anything that can be registered and chosen by affinity
pub trait CapabilityProvider: Send + Sync {
    /// Stable name, used in logs and errors
    fn name(&self) -> &'static str;
}

/// Cache key for one resolution: the target type plus an optional context
/// (an explicit event name for commands, the target property for data).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingKey {
    pub target: TargetType,
    pub context: Option<String>,
}

impl BindingKey {
    pub fn new(target: TargetType, context: Option<&str>) -> Self {
        Self {
            target,
            context: context.map(str::to_string),
        }
    }
}

/// Pick the provider with the strictly highest positive score.
/// Ties keep the earliest provider.
pub fn select_best<P, S>(providers: &[Arc<P>], score: S) -> Option<Arc<P>>
where
    P: ?Sized,
    S: Fn(&P) -> i32,
{
    let mut best: Option<(i32, &Arc<P>)> = None;
    for provider in providers {
        let affinity = score(&**provider);
        let threshold = best.map_or(0, |(score, _)| score);
        if affinity > threshold {
            best = Some((affinity, provider));
        }
    }
    best.map(|(_, provider)| Arc::clone(provider))
}

/// Resolves a [`BindingKey`] to the best provider, caching hits and misses alike
pub struct AffinityResolver<P: ?Sized> {
    kind: ProviderKind,
    cache: Mutex<MruCache<BindingKey, Option<Arc<P>>>>,
}

impl<P> AffinityResolver<P>
where
    P: ?Sized + CapabilityProvider,
{
    pub fn new(kind: ProviderKind, capacity: usize) -> Self {
        Self {
            kind,
            cache: Mutex::new(MruCache::new(capacity)),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Resolve `key`. On a miss `candidates` is fetched and every provider is
    /// scored; the result, including "none", is cached.
    pub fn resolve<C, S>(&self, key: &BindingKey, candidates: C, score: S) -> Option<Arc<P>>
    where
        C: FnOnce() -> Vec<Arc<P>>,
        S: Fn(&P, &BindingKey) -> i32,
    {
        let mut cache = self.cache.lock();
        cache.get_or_insert_with(key, |key| {
            let providers = candidates();
            let chosen = select_best(&providers, |p| score(p, key));
            match &chosen {
                Some(provider) => log::debug!(
                    "Resolved {} binder for {} ({:?}): {}",
                    self.kind,
                    key.target.name,
                    key.context,
                    provider.name()
                ),
                None => log::debug!(
                    "No {} binder among {} candidate(s) for {} ({:?})",
                    self.kind,
                    providers.len(),
                    key.target.name,
                    key.context
                ),
            }
            chosen
        })
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_cached(&self, key: &BindingKey) -> bool {
        self.cache.lock().contains_key(key)
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }
}
