//! Per-key running statistics and the map that holds them.

use ahash::AHashMap;

/// Running summary for one key.
///
/// The mean is always derived from `sum` and `count`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub count: u64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl Aggregate {
    /// Summary of exactly one observation.
    pub fn single(value: f64) -> Self {
        Self {
            count: 1,
            sum: value,
            min: value,
            max: value,
        }
    }

    /// Associative, commutative combination of two summaries.
    #[must_use]
    pub fn combine(self, other: Aggregate) -> Aggregate {
        Aggregate {
            count: self.count + other.count,
            sum: self.sum + other.sum,
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Key to [`Aggregate`] mapping. Keys are owned, so a map never borrows from
/// the buffer it was built from.
#[derive(Debug, Clone, Default)]
pub struct AggregateMap {
    entries: AHashMap<String, Aggregate>,
}

impl PartialEq for AggregateMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(key, agg)| other.entries.get(key) == Some(agg))
    }
}

impl AggregateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one observation into the entry for `key`.
    pub fn record(&mut self, key: &str, value: f64) {
        self.insert_or_combine(key, Aggregate::single(value));
    }

    /// Combines `agg` into the entry for `key`, inserting it when absent.
    pub fn insert_or_combine(&mut self, key: &str, agg: Aggregate) {
        // Lookup by &str first so the common hit path never allocates.
        match self.entries.get_mut(key) {
            Some(existing) => *existing = existing.combine(agg),
            None => {
                self.entries.insert(key.to_owned(), agg);
            }
        }
    }

    /// Merges every entry of `other` into `self`, consuming `other`.
    pub fn absorb(&mut self, other: AggregateMap) {
        for (key, agg) in other.entries {
            self.entries
                .entry(key)
                .and_modify(|existing| *existing = existing.combine(agg))
                .or_insert(agg);
        }
    }

    /// Pure form of [`absorb`](Self::absorb). The larger map is kept as the
    /// accumulator so fewer entries are rehashed.
    #[must_use]
    pub fn merge(self, other: AggregateMap) -> AggregateMap {
        let (mut big, small) = if self.len() >= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        big.absorb(small);
        big
    }

    pub fn get(&self, key: &str) -> Option<&Aggregate> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Aggregate)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries ordered byte-wise by key.
    pub fn sorted(&self) -> Vec<(&str, &Aggregate)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}
