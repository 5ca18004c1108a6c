//! Compound ordering over several named priority dimensions.
//!
//! Elements are kept in registration order. The active sequence is a list
//! of element indices; comparison walks it and stops at the first
//! dimension that tells the two items apart.

use super::priority::{PriorityList, PriorityOrdering};
use super::ItemOrdering;
use crate::errors::ConfigError;
use std::cmp::Ordering;
use tracing::debug;

/// A named ordering dimension.
#[derive(Debug, Clone)]
pub struct OrderingElement<T, P> {
    name: String,
    ordering: PriorityOrdering<T, P>,
}

impl<T, P> OrderingElement<T, P> {
    pub fn new(name: impl Into<String>, ordering: PriorityOrdering<T, P>) -> Self {
        Self {
            name: name.into(),
            ordering,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ordering(&self) -> &PriorityOrdering<T, P> {
        &self.ordering
    }
}

/// Chains `OrderingElement`s; the first non-equal comparison wins.
#[derive(Debug, Clone)]
pub struct CompoundOrdering<T, P> {
    elements: Vec<OrderingElement<T, P>>,
    active: Vec<usize>,
}

impl<T, P> CompoundOrdering<T, P>
where
    P: AsRef<str> + Ord,
{
    /// All `elements` become active in the given order.
    pub fn new(elements: Vec<OrderingElement<T, P>>) -> Result<Self, ConfigError> {
        if elements.is_empty() {
            return Err(ConfigError::EmptyOrdering);
        }
        for (i, element) in elements.iter().enumerate() {
            if elements[..i].iter().any(|e| e.name == element.name) {
                return Err(ConfigError::DuplicateElement(element.name.clone()));
            }
        }
        let active = (0..elements.len()).collect();
        Ok(Self { elements, active })
    }

    /// Replace the active sequence with `names`, in that order.
    ///
    /// The sequence is validated before anything changes: an unknown name,
    /// a repeated name, or an empty sequence leaves the ordering untouched.
    /// Priority lists stay attached to their elements.
    pub fn redefine_order<I, S>(&mut self, names: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut active: Vec<usize> = Vec::new();
        for name in names {
            let name = name.as_ref();
            let idx = self.index_of(name)?;
            if active.contains(&idx) {
                return Err(ConfigError::DuplicateElement(name.to_string()));
            }
            active.push(idx);
        }
        if active.is_empty() {
            return Err(ConfigError::EmptyOrdering);
        }
        self.active = active;
        debug!(order = ?self.order(), "redefined ordering sequence");
        Ok(())
    }

    /// Replace the priority list of one element. The active sequence is
    /// left as it is.
    pub fn set_priorities(&mut self, name: &str, priorities: PriorityList) -> Result<(), ConfigError> {
        let idx = self.index_of(name)?;
        debug!(element = name, priorities = ?priorities.entries(), "set priorities");
        self.elements[idx].ordering.redefine(priorities);
        Ok(())
    }

    /// Names of the active elements in tie-break order.
    pub fn order(&self) -> Vec<&str> {
        self.active
            .iter()
            .map(|&i| self.elements[i].name.as_str())
            .collect()
    }

    pub fn element(&self, name: &str) -> Option<&OrderingElement<T, P>> {
        self.elements.iter().find(|e| e.name == name)
    }

    fn index_of(&self, name: &str) -> Result<usize, ConfigError> {
        self.elements
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(|| ConfigError::UnknownElement {
                name: name.to_string(),
                available: self.elements.iter().map(|e| e.name.clone()).collect(),
            })
    }
}

impl<T, P> ItemOrdering<T> for CompoundOrdering<T, P>
where
    P: AsRef<str> + Ord,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        for &idx in &self.active {
            let result = self.elements[idx].ordering.compare(a, b);
            if result != Ordering::Equal {
                return result;
            }
        }
        Ordering::Equal
    }
}
