//! # Token Cache
//!
//! Segmentation results keyed by `(text, locale)`.
//!
//! Re-segmenting the same block every time a read-aloud starts is wasted
//! work, so a [`ReadingSession`](crate::playback::ReadingSession) owns one of
//! these and hands it to every highlighter it builds. The cache is an
//! ordinary value: nothing global, nothing shared between sessions.
//!
//! Unbounded by default. A bounded cache evicts the oldest insertion first.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::segment::{segment, Token};

type Key = (String, Option<String>);

#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    entries: HashMap<Key, Vec<Token>>,
    order: VecDeque<Key>,
    capacity: Option<usize>,
    hits: u64,
    misses: u64,
}

impl TokenCache {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Cache holding at most `capacity` texts (at least one).
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::default()
        }
    }

    pub fn with_capacity(capacity: Option<usize>) -> Self {
        match capacity {
            Some(n) => Self::bounded(n),
            None => Self::unbounded(),
        }
    }

    /// Tokens for `text`, segmenting on the first request only.
    ///
    /// # Example
    /// ```rust
    /// use readalong::cache::TokenCache;
    ///
    /// let mut cache = TokenCache::bounded(8);
    /// assert_eq!(cache.get_or_segment("one two", None).len(), 3);
    /// assert_eq!(cache.get_or_segment("one two", None).len(), 3);
    /// assert_eq!((cache.hits(), cache.misses()), (1, 1));
    /// ```
    pub fn get_or_segment(&mut self, text: &str, locale: Option<&str>) -> &[Token] {
        let key: Key = (text.to_string(), locale.map(str::to_string));

        if self.entries.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
            if let Some(capacity) = self.capacity {
                while self.entries.len() >= capacity {
                    let Some(oldest) = self.order.pop_front() else {
                        break;
                    };
                    self.entries.remove(&oldest);
                    debug!(len = oldest.0.len(), "evicted cached segmentation");
                }
            }
            self.entries.insert(key.clone(), segment(text, locale));
            self.order.push_back(key.clone());
        }

        &self.entries[&key]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_tokens_match_segmenter() {
        let mut cache = TokenCache::unbounded();
        let text = "The quick brown fox.";
        assert_eq!(cache.get_or_segment(text, None), segment(text, None).as_slice());
        assert_eq!(cache.get_or_segment(text, None), segment(text, None).as_slice());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_locale_is_part_of_key() {
        let mut cache = TokenCache::unbounded();
        cache.get_or_segment("text", None);
        cache.get_or_segment("text", Some("en"));
        cache.get_or_segment("text", Some("en-GB"));
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.misses(), 3);
    }

    #[test]
    fn test_bounded_evicts_oldest() {
        let mut cache = TokenCache::bounded(2);
        cache.get_or_segment("a", None);
        cache.get_or_segment("b", None);
        cache.get_or_segment("c", None);
        assert_eq!(cache.len(), 2);

        // "a" was evicted, "c" is still there
        cache.get_or_segment("c", None);
        assert_eq!(cache.hits(), 1);
        cache.get_or_segment("a", None);
        assert_eq!(cache.misses(), 4);
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut cache = TokenCache::bounded(0);
        assert_eq!(cache.capacity(), Some(1));
        cache.get_or_segment("a", None);
        cache.get_or_segment("b", None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cache = TokenCache::with_capacity(None);
        cache.get_or_segment("a b", None);
        cache.clear();
        assert!(cache.is_empty());
    }
}
