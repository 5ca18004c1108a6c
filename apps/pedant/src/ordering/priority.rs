//! Single-dimension priority ordering.
//!
//! An item's key is extracted, ranked by the first matching entry of a
//! `PriorityList`, and items of equal rank fall back to the natural order
//! of their keys. Unmatched keys share the `Unranked` rank, which sorts
//! after every list position; an empty list therefore degrades to plain
//! natural ordering.

use super::ItemOrdering;
use crate::utils::split_comma_separated;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Maps an item to the key one ordering dimension compares.
pub type Extractor<T, P> = Arc<dyn Fn(&T) -> P + Send + Sync>;

/// How an extracted key is matched against a priority entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equivalence {
    /// Key equals the entry.
    Exact,
    /// Key starts with the entry (`com.foo.x` matches `com.foo`).
    Prefix,
}

impl Equivalence {
    pub fn holds(self, key: &str, entry: &str) -> bool {
        match self {
            Equivalence::Exact => key == entry,
            Equivalence::Prefix => key.starts_with(entry),
        }
    }
}

/// Position of a key in a priority list. `Unranked` sorts after any `At`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rank {
    At(usize),
    Unranked,
}

/// Ordered priority tokens; earlier entries win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityList {
    entries: Vec<String>,
}

impl PriorityList {
    /// Build from tokens. Tokens are trimmed, blanks dropped, and a repeated
    /// token keeps its first position.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<String> = Vec::new();
        for token in tokens {
            let token = token.as_ref().trim();
            if token.is_empty() || entries.iter().any(|e| e == token) {
                continue;
            }
            entries.push(token.to_string());
        }
        Self { entries }
    }

    /// Build from comma-separated configuration text.
    pub fn parse(text: &str) -> Self {
        Self::new(split_comma_separated(text))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Index of the first entry equivalent to `key`.
    pub fn rank(&self, key: &str, equivalence: Equivalence) -> Rank {
        self.entries
            .iter()
            .position(|entry| equivalence.holds(key, entry))
            .map_or(Rank::Unranked, Rank::At)
    }
}

/// Orders items by the priority rank of one extracted key.
pub struct PriorityOrdering<T, P> {
    extractor: Extractor<T, P>,
    equivalence: Equivalence,
    priorities: PriorityList,
}

impl<T, P> PriorityOrdering<T, P>
where
    P: AsRef<str> + Ord,
{
    pub fn new<F>(extractor: F, equivalence: Equivalence) -> Self
    where
        F: Fn(&T) -> P + Send + Sync + 'static,
    {
        Self::from_extractor(Arc::new(extractor), equivalence)
    }

    pub fn from_extractor(extractor: Extractor<T, P>, equivalence: Equivalence) -> Self {
        Self {
            extractor,
            equivalence,
            priorities: PriorityList::default(),
        }
    }

    pub fn with_priorities(mut self, priorities: PriorityList) -> Self {
        self.priorities = priorities;
        self
    }

    /// Replace the whole priority list.
    pub fn redefine(&mut self, priorities: PriorityList) {
        self.priorities = priorities;
    }

    pub fn priorities(&self) -> &PriorityList {
        &self.priorities
    }

    pub fn equivalence(&self) -> Equivalence {
        self.equivalence
    }

    pub fn key(&self, item: &T) -> P {
        (self.extractor)(item)
    }

    pub fn rank(&self, key: &P) -> Rank {
        self.priorities.rank(key.as_ref(), self.equivalence)
    }
}

impl<T, P> ItemOrdering<T> for PriorityOrdering<T, P>
where
    P: AsRef<str> + Ord,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        let (ka, kb) = (self.key(a), self.key(b));
        self.rank(&ka)
            .cmp(&self.rank(&kb))
            .then_with(|| ka.cmp(&kb))
    }
}

impl<T, P> Clone for PriorityOrdering<T, P> {
    fn clone(&self) -> Self {
        Self {
            extractor: Arc::clone(&self.extractor),
            equivalence: self.equivalence,
            priorities: self.priorities.clone(),
        }
    }
}

impl<T, P> fmt::Debug for PriorityOrdering<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityOrdering")
            .field("equivalence", &self.equivalence)
            .field("priorities", &self.priorities.entries)
            .finish_non_exhaustive()
    }
}
