use std::collections::{HashMap, VecDeque};

use crate::coords::ColorRgba;
use crate::error::Result;

use super::ColorResolver;

/// Memoizes style resolution.
///
/// Eviction is FIFO once `capacity` distinct styles are held. Real drawing
/// code uses a small style vocabulary, so the bound is rarely reached; it
/// exists so the cache cannot grow without limit on generated styles.
/// Failed resolutions are not cached.
#[derive(Debug, Clone)]
pub struct StyleCache {
    capacity: usize,
    entries: HashMap<String, ColorRgba>,
    order: VecDeque<String>,
    hits: u64,
    misses: u64,
}

impl StyleCache {
    /// Creates a cache holding at most `capacity` styles (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    pub fn resolve(&mut self, resolver: &dyn ColorResolver, spec: &str) -> Result<ColorRgba> {
        if let Some(c) = self.entries.get(spec) {
            self.hits += 1;
            return Ok(*c);
        }

        self.misses += 1;
        let color = resolver.resolve(spec)?;

        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                log::trace!("style cache: evicted {oldest:?}");
            }
        }
        self.entries.insert(spec.to_owned(), color);
        self.order.push_back(spec.to_owned());
        Ok(color)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
