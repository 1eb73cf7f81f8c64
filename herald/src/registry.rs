//! Priority registry with a lazily rebuilt sorted view.
//!
//! [`Registry`] stores entries per event name in priority buckets. Within a
//! bucket entries keep their insertion order. The flattened, priority-ordered
//! list for an event is cached and dropped whenever that event changes, then
//! rebuilt on the next read.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::Arc,
};

/// Default registration priority.
pub const DEFAULT_PRIORITY: i32 = 0;

/// Registry of entries keyed by event name and priority.
///
/// The registry is the source of truth; the sorted cache is derived data.
/// Higher priorities come first in the sorted view.
pub struct Registry<S> {
    events: HashMap<String, BTreeMap<i32, Vec<S>>>,
    sorted: HashMap<String, Arc<[S]>>,
}

impl<S: Clone> Registry<S> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            events: HashMap::new(),
            sorted: HashMap::new(),
        }
    }

    /// Append `entry` to the `priority` bucket of `event`.
    ///
    /// Invalidates the cached order of `event` only.
    pub fn insert(&mut self, event: impl Into<String>, entry: S, priority: i32) {
        let event = event.into();
        self.sorted.remove(&event);
        self.events
            .entry(event)
            .or_default()
            .entry(priority)
            .or_default()
            .push(entry);
    }

    /// Delete every entry of `event`, all priorities included.
    ///
    /// Returns `true` if the event was registered.
    pub fn remove(&mut self, event: &str) -> bool {
        self.sorted.remove(event);
        self.events.remove(event).is_some()
    }

    /// Rebuild and cache the sorted view of `event`.
    ///
    /// Buckets are visited from the highest priority down and concatenated in
    /// insertion order. An unknown event caches and returns an empty view.
    pub fn sort(&mut self, event: &str) -> Arc<[S]> {
        let sorted: Arc<[S]> = match self.events.get(event) {
            Some(buckets) => buckets
                .values()
                .rev()
                .flat_map(|bucket| bucket.iter().cloned())
                .collect(),
            None => Arc::from([]),
        };
        self.sorted.insert(event.to_owned(), sorted.clone());
        sorted
    }

    /// The sorted view of `event`, rebuilt if missing or empty.
    pub fn get(&mut self, event: &str) -> Arc<[S]> {
        match self.sorted.get(event) {
            Some(sorted) if !sorted.is_empty() => sorted.clone(),
            _ => self.sort(event),
        }
    }

    /// Whether a cached view exists for `event`.
    pub fn is_cached(&self, event: &str) -> bool {
        self.sorted.contains_key(event)
    }

    /// Whether `event` has at least one entry.
    pub fn contains(&self, event: &str) -> bool {
        self.events.contains_key(event)
    }

    /// Number of entries registered for `event`.
    pub fn count(&self, event: &str) -> usize {
        self.events
            .get(event)
            .map_or(0, |buckets| buckets.values().map(Vec::len).sum())
    }

    /// Registered event names, sorted.
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.events.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get the number of registered events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the registry has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<S: Clone> Default for Registry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut events: Vec<(&str, usize)> = self
            .events
            .iter()
            .map(|(name, buckets)| (name.as_str(), buckets.values().map(Vec::len).sum()))
            .collect();
        events.sort_unstable();
        f.debug_struct("Registry")
            .field("events", &events)
            .field("cached", &self.sorted.len())
            .finish()
    }
}
