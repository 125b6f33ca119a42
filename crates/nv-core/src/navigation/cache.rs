//! Backward-navigation cache

use indexmap::IndexMap;

use super::PositionKey;

/// Ordered record of forward page steps.
///
/// Each entry maps the start position of a page reached by `next` to the
/// start of the page it was reached from. Entries are kept in the order the
/// steps were taken, so the cache behaves like a stack of visited pages.
#[derive(Debug, Clone, Default)]
pub struct PositionCache {
    steps: IndexMap<PositionKey, PositionKey>,
}

/// Result of looking a boundary up in the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheHit {
    /// Insertion index of the boundary
    pub index: usize,
    /// Start of the page that preceded the boundary
    pub previous_start: PositionKey,
}

impl PositionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the page starting at `boundary` was reached from `previous_start`.
    ///
    /// Re-pushing a known boundary updates its predecessor in place.
    pub fn push(&mut self, boundary: PositionKey, previous_start: PositionKey) {
        self.steps.insert(boundary, previous_start);
    }

    pub fn lookup(&self, boundary: &PositionKey) -> Option<CacheHit> {
        self.steps
            .get_full(boundary)
            .map(|(index, _, previous_start)| CacheHit {
                index,
                previous_start: previous_start.clone(),
            })
    }

    /// Drop every step recorded at or after `index`
    pub fn truncate(&mut self, index: usize) {
        self.steps.truncate(index);
    }

    /// Most recent step as `(boundary, previous_start)`
    pub fn last(&self) -> Option<(&PositionKey, &PositionKey)> {
        self.steps.last()
    }

    pub fn pop(&mut self) -> Option<(PositionKey, PositionKey)> {
        self.steps.pop()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(text: &str) -> PositionKey {
        PositionKey::parse(text).unwrap()
    }

    #[test]
    fn test_lookup_reports_insertion_index() {
        let mut cache = PositionCache::new();
        cache.push(key("10"), key("1"));
        cache.push(key("20"), key("10"));

        let hit = cache.lookup(&key("20")).unwrap();
        assert_eq!(hit.index, 1);
        assert_eq!(hit.previous_start, key("10"));
        assert!(cache.lookup(&key("30")).is_none());
    }

    #[test]
    fn test_repush_keeps_position() {
        let mut cache = PositionCache::new();
        cache.push(key("10"), key("1"));
        cache.push(key("20"), key("10"));
        cache.push(key("10"), key("2"));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.lookup(&key("10")).unwrap().index, 0);
        assert_eq!(cache.last().map(|(b, _)| b.clone()), Some(key("20")));
    }

    #[test]
    fn test_truncate_pop_and_clear() {
        let mut cache = PositionCache::new();
        cache.push(key("2.1"), key("1"));
        cache.push(key("3"), key("2.1"));
        cache.push(key("4.2"), key("3"));

        cache.truncate(2);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.pop(), Some((key("3"), key("2.1"))));

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.last().is_none());
    }
}
