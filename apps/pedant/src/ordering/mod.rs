//! Priority-based orderings used by every ordering rule.
//!
//! - `priority`: a single dimension ranked against a priority list, with a
//!   natural-order fallback on the extracted key.
//! - `compound`: several named dimensions applied in sequence with
//!   short-circuit tie-breaking.
//! - `elements`: static name -> strategy tables for dependencies and plugins.

pub mod compound;
pub mod elements;
pub mod priority;

pub use compound::{CompoundOrdering, OrderingElement};
pub use priority::{Equivalence, Extractor, PriorityList, PriorityOrdering, Rank};

use std::cmp::Ordering;

/// A total order over `T` plus the checks built on it.
///
/// Implementors only provide `compare`; `is_ordered` and `sorted_copy` are
/// derived from it so every ordering answers them the same way.
pub trait ItemOrdering<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;

    /// True when `compare` never decreases across consecutive items.
    fn is_ordered(&self, items: &[T]) -> bool {
        items
            .windows(2)
            .all(|pair| self.compare(&pair[0], &pair[1]) != Ordering::Greater)
    }

    /// Stable sort of a copy of `items`. Items comparing `Equal` keep their
    /// relative input order.
    fn sorted_copy(&self, items: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        let mut sorted = items.to_vec();
        sorted.sort_by(|a, b| self.compare(a, b));
        sorted
    }
}
