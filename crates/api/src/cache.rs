//! Single-slot cache for the producer-interval aggregation.
//!
//! There is exactly one cacheable answer per store generation, so the
//! cache is one slot behind an async `RwLock`, owned by [`AppState`]
//! next to the pool it shadows. Every store replacement bumps a
//! generation counter when it invalidates the slot; a computed result
//! is only installed if the generation observed before the store read
//! is still current. This keeps a query that raced an ingest from
//! re-installing a pre-replacement answer -- with the cache removed,
//! behaviour is identical apart from latency.
//!
//! [`AppState`]: crate::state::AppState

use tokio::sync::RwLock;

use razzie_core::intervals::AggregationResult;

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    value: Option<AggregationResult>,
}

/// Memoizes the last computed [`AggregationResult`].
#[derive(Debug, Default)]
pub struct IntervalCache {
    slot: RwLock<Slot>,
}

impl IntervalCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached result (if any) together with the generation it was
    /// observed under.
    ///
    /// Callers that go on to compute a fresh result must take this
    /// generation *before* reading the store and hand it back to
    /// [`set_if_current`](Self::set_if_current).
    pub async fn read(&self) -> (Option<AggregationResult>, u64) {
        let slot = self.slot.read().await;
        (slot.value.clone(), slot.generation)
    }

    /// Install a freshly computed result, unless the store was replaced
    /// since `generation` was observed. Returns whether the result was
    /// installed.
    pub async fn set_if_current(&self, generation: u64, result: AggregationResult) -> bool {
        let mut slot = self.slot.write().await;
        if slot.generation != generation {
            return false;
        }
        slot.value = Some(result);
        true
    }

    /// Drop the cached result and start a new generation. Called after
    /// every successful store replacement.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.write().await;
        slot.generation += 1;
        slot.value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use razzie_core::intervals::aggregate;

    #[tokio::test]
    async fn starts_empty() {
        let cache = IntervalCache::new();
        let (value, _) = cache.read().await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn current_result_round_trips() {
        let cache = IntervalCache::new();
        let result = aggregate([("Producer X", 1980), ("Producer X", 1985)]);

        let (_, generation) = cache.read().await;
        assert!(cache.set_if_current(generation, result.clone()).await);
        assert_eq!(cache.read().await.0, Some(result));
    }

    #[tokio::test]
    async fn invalidate_clears_the_slot() {
        let cache = IntervalCache::new();
        let (_, generation) = cache.read().await;
        cache
            .set_if_current(generation, AggregationResult::default())
            .await;

        cache.invalidate().await;
        assert!(cache.read().await.0.is_none());
    }

    #[tokio::test]
    async fn result_from_an_outdated_generation_is_not_installed() {
        let cache = IntervalCache::new();
        let old = aggregate([("Old Producer", 1970), ("Old Producer", 1980)]);

        // A query observes the generation, then an ingest replaces the
        // store before the query finishes computing.
        let (_, generation) = cache.read().await;
        cache.invalidate().await;

        assert!(!cache.set_if_current(generation, old).await);
        assert!(cache.read().await.0.is_none());
    }

    #[tokio::test]
    async fn new_generation_accepts_a_fresh_result() {
        let cache = IntervalCache::new();
        let fresh = aggregate([("Producer X", 1980), ("Producer X", 1985)]);

        cache.invalidate().await;
        let (_, generation) = cache.read().await;
        assert!(cache.set_if_current(generation, fresh.clone()).await);
        assert_eq!(cache.read().await.0, Some(fresh));
    }
}
