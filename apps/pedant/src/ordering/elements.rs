//! Ordering dimensions available to the dependency and plugin rules.
//!
//! Each registry is a static, read-only table of strategies in
//! registration order. The order matters: it is the default tie-break
//! sequence and the order names are listed in error messages.

use super::compound::{CompoundOrdering, OrderingElement};
use super::priority::{Equivalence, PriorityList, PriorityOrdering};
use crate::errors::ConfigError;
use crate::models::artifact::{Dependency, Plugin};
use std::sync::Arc;

/// One named dimension: how to extract the key and how to rank it.
pub struct ElementStrategy<T: 'static> {
    pub name: &'static str,
    pub extractor: fn(&T) -> String,
    pub equivalence: Equivalence,
}

/// Name -> strategy table, searched linearly to keep declaration order.
pub struct ElementRegistry<T: 'static> {
    strategies: &'static [ElementStrategy<T>],
}

impl<T: 'static> ElementRegistry<T> {
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name).collect()
    }

    pub fn get(&self, name: &str) -> Result<&'static ElementStrategy<T>, ConfigError> {
        self.strategies
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ConfigError::UnknownElement {
                name: name.to_string(),
                available: self.names().into_iter().map(str::to_string).collect(),
            })
    }

    /// Build a compound ordering over every registered element, activate
    /// `order_by` as the tie-break sequence, and attach `priorities`.
    pub fn compound<S: AsRef<str>>(
        &self,
        order_by: &[S],
        priorities: &[(String, PriorityList)],
    ) -> Result<CompoundOrdering<T, String>, ConfigError> {
        let elements = self
            .strategies
            .iter()
            .map(|s| {
                OrderingElement::new(
                    s.name,
                    PriorityOrdering::from_extractor(Arc::new(s.extractor), s.equivalence),
                )
            })
            .collect();
        let mut ordering = CompoundOrdering::new(elements)?;
        ordering.redefine_order(order_by)?;
        for (name, list) in priorities {
            ordering.set_priorities(name, list.clone())?;
        }
        Ok(ordering)
    }
}

fn dependency_scope(d: &Dependency) -> String {
    d.scope.clone()
}

fn dependency_group(d: &Dependency) -> String {
    d.group_id.clone()
}

fn dependency_artifact(d: &Dependency) -> String {
    d.artifact_id.clone()
}

fn plugin_group(p: &Plugin) -> String {
    p.group_id.clone()
}

fn plugin_artifact(p: &Plugin) -> String {
    p.artifact_id.clone()
}

static DEPENDENCY_STRATEGIES: [ElementStrategy<Dependency>; 3] = [
    ElementStrategy {
        name: "scope",
        extractor: dependency_scope,
        equivalence: Equivalence::Exact,
    },
    ElementStrategy {
        name: "groupId",
        extractor: dependency_group,
        equivalence: Equivalence::Prefix,
    },
    ElementStrategy {
        name: "artifactId",
        extractor: dependency_artifact,
        equivalence: Equivalence::Prefix,
    },
];

static PLUGIN_STRATEGIES: [ElementStrategy<Plugin>; 2] = [
    ElementStrategy {
        name: "groupId",
        extractor: plugin_group,
        equivalence: Equivalence::Prefix,
    },
    ElementStrategy {
        name: "artifactId",
        extractor: plugin_artifact,
        equivalence: Equivalence::Prefix,
    },
];

/// `scope` (exact), `groupId` (prefix), `artifactId` (prefix).
pub static DEPENDENCY_ELEMENTS: ElementRegistry<Dependency> = ElementRegistry {
    strategies: &DEPENDENCY_STRATEGIES,
};

/// `groupId` (prefix), `artifactId` (prefix).
pub static PLUGIN_ELEMENTS: ElementRegistry<Plugin> = ElementRegistry {
    strategies: &PLUGIN_STRATEGIES,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::ItemOrdering;

    #[test]
    fn test_registry_preserves_declaration_order() {
        assert_eq!(DEPENDENCY_ELEMENTS.names(), vec!["scope", "groupId", "artifactId"]);
        assert_eq!(PLUGIN_ELEMENTS.names(), vec!["groupId", "artifactId"]);
    }

    #[test]
    fn test_unknown_element_is_config_error() {
        let err = PLUGIN_ELEMENTS.compound(&["groupId", "scope"], &[]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownElement {
                name: "scope".into(),
                available: vec!["groupId".into(), "artifactId".into()],
            }
        );
    }

    #[test]
    fn test_dependency_compound_orders_scope_group_artifact() {
        let ordering = DEPENDENCY_ELEMENTS
            .compound(
                &["scope", "groupId", "artifactId"],
                &[
                    ("scope".to_string(), PriorityList::parse("compile,runtime")),
                    ("groupId".to_string(), PriorityList::parse("com.foo")),
                ],
            )
            .unwrap();
        let deps = vec![
            Dependency::new("org.bar", "a").with_scope("test"),
            Dependency::new("org.bar", "a"),
            Dependency::new("com.foo.x", "z"),
            Dependency::new("com.foo.x", "b").with_scope("runtime"),
        ];
        let sorted: Vec<String> = ordering.sorted_copy(&deps).iter().map(|d| d.to_string()).collect();
        assert_eq!(
            sorted,
            vec![
                "com.foo.x:z:compile",
                "org.bar:a:compile",
                "com.foo.x:b:runtime",
                "org.bar:a:test",
            ]
        );
    }

    #[test]
    fn test_scope_uses_exact_equivalence() {
        let strategy = DEPENDENCY_ELEMENTS.get("scope").unwrap();
        assert_eq!(strategy.equivalence, Equivalence::Exact);
        assert_eq!(DEPENDENCY_ELEMENTS.get("groupId").unwrap().equivalence, Equivalence::Prefix);
    }
}
