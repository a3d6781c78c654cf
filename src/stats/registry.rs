//! Per-instrument state registry

use std::collections::HashMap;

#[derive(Debug)]
struct Slot<T> {
    value: T,
    last_used: u64,
}

/// Owns one `T` per instrument key.
///
/// State is only ever created through [`InstrumentRegistry::get_or_create`];
/// read-only lookups never allocate an entry. When `max_entries` is set the
/// least recently touched instrument is evicted to make room for a new one.
#[derive(Debug)]
pub struct InstrumentRegistry<T> {
    entries: HashMap<String, Slot<T>>,
    max_entries: Option<usize>,
    clock: u64,
}

impl<T> InstrumentRegistry<T> {
    /// Registry without an eviction bound
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            max_entries: None,
            clock: 0,
        }
    }

    /// Registry holding at most `max_entries` instruments (LRU eviction)
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries: Some(max_entries.max(1)),
            clock: 0,
        }
    }

    /// Fetch the instrument's state, creating it with `init` on first touch
    pub fn get_or_create(&mut self, key: &str, init: impl FnOnce() -> T) -> &mut T {
        self.clock += 1;
        let tick = self.clock;

        if !self.entries.contains_key(key) {
            if let Some(max) = self.max_entries {
                if self.entries.len() >= max {
                    self.evict_lru();
                }
            }
        }

        let slot = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Slot {
                value: init(),
                last_used: tick,
            });
        slot.last_used = tick;
        &mut slot.value
    }

    /// Read-only lookup, does not affect recency
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key).map(|slot| &slot.value)
    }

    /// Mutable lookup of an existing instrument, marks it as recently used
    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.clock += 1;
        let tick = self.clock;
        self.entries.get_mut(key).map(|slot| {
            slot.last_used = tick;
            &mut slot.value
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop an instrument's state
    pub fn remove(&mut self, key: &str) -> Option<T> {
        self.entries.remove(key).map(|slot| slot.value)
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, slot)| slot.last_used)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            tracing::debug!(instrument = %key, "Evicting least recently used instrument");
            self.entries.remove(&key);
        }
    }
}

impl<T> Default for InstrumentRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
