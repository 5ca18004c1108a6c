//! One-to-one matching of declared items against resolved items.
//!
//! Declared coordinates may contain `${name}` placeholders that only the
//! resolved collection has expanded. A matcher pairs every declared
//! (subset) item with the first resolved (superset) item it corresponds
//! to, after substituting placeholders through a `PropertyResolver`.

use crate::errors::MatchError;
use crate::models::artifact::{Dependency, Plugin};
use regex::{Captures, Regex};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::sync::OnceLock;
use tracing::{debug, trace};

/// Resolves a placeholder name (`project.version` for `${project.version}`).
pub trait PropertyResolver {
    fn resolve(&self, name: &str) -> Option<String>;
}

impl<F> PropertyResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, name: &str) -> Option<String> {
        self(name)
    }
}

impl PropertyResolver for BTreeMap<String, String> {
    fn resolve(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl PropertyResolver for HashMap<String, String> {
    fn resolve(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Resolver that knows no properties; substitution leaves text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProperties;

impl PropertyResolver for NoProperties {
    fn resolve(&self, _name: &str) -> Option<String> {
        None
    }
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

/// Replace every `${name}` in `text` with its resolved value. Unknown
/// names are left as written.
pub fn substitute(text: &str, resolver: &dyn PropertyResolver) -> String {
    if !text.contains("${") {
        return text.to_string();
    }
    placeholder()
        .replace_all(text, |caps: &Captures| {
            resolver
                .resolve(&caps[1])
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// A declared item paired with the resolved item it corresponds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched<V> {
    pub declared: V,
    pub resolved: V,
}

/// Aligns a subset collection against a superset collection.
///
/// `transform` is applied to each superset item exactly once; `matches`
/// decides correspondence; `handle_unmatched` decides what happens to a
/// subset item nothing corresponds to (an error unless overridden).
pub trait OneToOneMatcher {
    type Superset;
    type Subset: Clone + Display;

    fn transform(&self, item: &Self::Superset) -> Self::Subset;

    fn matches(&self, candidate: &Self::Subset, item: &Self::Subset) -> bool;

    fn handle_unmatched(
        &self,
        item: &Self::Subset,
        superset: &[Self::Subset],
    ) -> Result<Self::Subset, MatchError> {
        Err(MatchError {
            item: item.to_string(),
            superset: superset.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// One entry per subset item, in subset order. The first qualifying
    /// superset item wins.
    fn match_all(
        &self,
        superset: &[Self::Superset],
        subset: &[Self::Subset],
    ) -> Result<Vec<Matched<Self::Subset>>, MatchError> {
        let candidates: Vec<Self::Subset> = superset.iter().map(|s| self.transform(s)).collect();
        subset
            .iter()
            .map(|item| -> Result<Matched<Self::Subset>, MatchError> {
                let resolved = match candidates.iter().find(|c| self.matches(c, item)) {
                    Some(found) => found.clone(),
                    None => self.handle_unmatched(item, &candidates)?,
                };
                trace!(declared = %item, resolved = %resolved, "matched");
                Ok(Matched {
                    declared: item.clone(),
                    resolved,
                })
            })
            .collect()
    }
}

fn substitute_opt(value: &Option<String>, resolver: &dyn PropertyResolver) -> Option<String> {
    value.as_deref().map(|v| substitute(v, resolver))
}

/// Matches declared dependencies against resolved ones.
///
/// Group and artifact ids always take part; classifier and type do unless
/// disabled. An unmatched `pom`/`import` dependency matches itself, since
/// imported bills of materials never show up among resolved dependencies.
pub struct DependencyMatcher<'a> {
    resolver: &'a dyn PropertyResolver,
    compare_classifier_and_type: bool,
}

impl<'a> DependencyMatcher<'a> {
    pub fn new(resolver: &'a dyn PropertyResolver) -> Self {
        Self {
            resolver,
            compare_classifier_and_type: true,
        }
    }

    /// Whether classifier and type must also be equal (the default).
    pub fn compare_classifier_and_type(mut self, compare: bool) -> Self {
        self.compare_classifier_and_type = compare;
        self
    }

    fn sub(&self, text: &str) -> String {
        substitute(text, self.resolver)
    }
}

impl OneToOneMatcher for DependencyMatcher<'_> {
    type Superset = Dependency;
    type Subset = Dependency;

    fn transform(&self, item: &Dependency) -> Dependency {
        Dependency {
            group_id: self.sub(&item.group_id),
            artifact_id: self.sub(&item.artifact_id),
            version: substitute_opt(&item.version, self.resolver),
            scope: self.sub(&item.scope),
            kind: self.sub(&item.kind),
            classifier: substitute_opt(&item.classifier, self.resolver),
            optional: item.optional,
        }
    }

    fn matches(&self, candidate: &Dependency, item: &Dependency) -> bool {
        if candidate.group_id != self.sub(&item.group_id)
            || candidate.artifact_id != self.sub(&item.artifact_id)
        {
            return false;
        }
        !self.compare_classifier_and_type
            || (candidate.classifier == substitute_opt(&item.classifier, self.resolver)
                && candidate.kind == self.sub(&item.kind))
    }

    fn handle_unmatched(
        &self,
        item: &Dependency,
        superset: &[Dependency],
    ) -> Result<Dependency, MatchError> {
        let substituted = self.transform(item);
        if substituted.is_bom_import() {
            debug!(dependency = %substituted, "bill-of-materials import matches itself");
            return Ok(substituted);
        }
        Err(MatchError {
            item: item.to_string(),
            superset: superset.iter().map(|d| d.to_string()).collect(),
        })
    }
}

/// Matches declared plugins against resolved ones by group and artifact id.
pub struct PluginMatcher<'a> {
    resolver: &'a dyn PropertyResolver,
}

impl<'a> PluginMatcher<'a> {
    pub fn new(resolver: &'a dyn PropertyResolver) -> Self {
        Self { resolver }
    }
}

impl OneToOneMatcher for PluginMatcher<'_> {
    type Superset = Plugin;
    type Subset = Plugin;

    fn transform(&self, item: &Plugin) -> Plugin {
        Plugin {
            group_id: substitute(&item.group_id, self.resolver),
            artifact_id: substitute(&item.artifact_id, self.resolver),
            version: substitute_opt(&item.version, self.resolver),
        }
    }

    fn matches(&self, candidate: &Plugin, item: &Plugin) -> bool {
        candidate.group_id == substitute(&item.group_id, self.resolver)
            && candidate.artifact_id == substitute(&item.artifact_id, self.resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitute_replaces_known_and_keeps_unknown() {
        let p = props(&[("project.groupId", "com.foo"), ("v", "1.0")]);
        assert_eq!(substitute("${project.groupId}.core", &p), "com.foo.core");
        assert_eq!(substitute("${v}-${missing}", &p), "1.0-${missing}");
        assert_eq!(substitute("plain", &p), "plain");
        assert_eq!(substitute("${unterminated", &p), "${unterminated");
    }

    #[test]
    fn test_closure_resolver() {
        let upper = |name: &str| Some(name.to_uppercase());
        assert_eq!(substitute("a${b}c", &upper), "aBc");
    }

    #[test]
    fn test_one_entry_per_declared_item_in_declared_order() {
        let p = props(&[("project.groupId", "com.foo")]);
        let matcher = DependencyMatcher::new(&p);
        let resolved = vec![
            Dependency::new("org.bar", "b").with_version("2"),
            Dependency::new("com.foo", "a").with_version("1"),
        ];
        let declared = vec![
            Dependency::new("${project.groupId}", "a"),
            Dependency::new("org.bar", "b"),
        ];
        let matched = matcher.match_all(&resolved, &declared).unwrap();
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].declared, declared[0]);
        assert_eq!(matched[0].resolved, resolved[1]);
        assert_eq!(matched[1].resolved, resolved[0]);
    }

    #[test]
    fn test_first_qualifying_superset_item_wins() {
        let matcher = DependencyMatcher::new(&NoProperties).compare_classifier_and_type(false);
        let resolved = vec![
            Dependency::new("g", "a").with_classifier("tests"),
            Dependency::new("g", "a"),
        ];
        let matched = matcher
            .match_all(&resolved, &[Dependency::new("g", "a")])
            .unwrap();
        assert_eq!(matched[0].resolved, resolved[0]);

        let strict = DependencyMatcher::new(&NoProperties);
        let matched = strict.match_all(&resolved, &[Dependency::new("g", "a")]).unwrap();
        assert_eq!(matched[0].resolved, resolved[1]);
    }

    #[test]
    fn test_unmatched_item_reports_item_and_superset() {
        let matcher = DependencyMatcher::new(&NoProperties);
        let resolved = vec![Dependency::new("g", "a")];
        let err = matcher
            .match_all(&resolved, &[Dependency::new("g", "missing")])
            .unwrap_err();
        assert_eq!(err.item, "g:missing:compile");
        assert_eq!(err.superset, vec!["g:a:compile"]);
    }

    #[test]
    fn test_type_mismatch_is_unmatched() {
        let matcher = DependencyMatcher::new(&NoProperties);
        let resolved = vec![Dependency::new("g", "a")];
        assert!(matcher
            .match_all(&resolved, &[Dependency::new("g", "a").with_type("war")])
            .is_err());
    }

    #[test]
    fn test_bom_import_matches_itself() {
        let p = props(&[("bom.group", "org.platform")]);
        let matcher = DependencyMatcher::new(&p);
        let bom = Dependency::new("${bom.group}", "platform-bom")
            .with_type("pom")
            .with_scope("import");
        let matched = matcher.match_all(&[], &[bom.clone()]).unwrap();
        assert_eq!(matched[0].declared, bom);
        assert_eq!(matched[0].resolved.group_id, "org.platform");
    }

    #[test]
    fn test_bom_import_with_placeholder_type_and_scope_matches_itself() {
        let p = props(&[("bom.type", "pom"), ("bom.scope", "import")]);
        let matcher = DependencyMatcher::new(&p);
        let bom = Dependency::new("org.platform", "platform-bom")
            .with_type("${bom.type}")
            .with_scope("${bom.scope}");
        let matched = matcher.match_all(&[], &[bom]).unwrap();
        assert_eq!(matched[0].resolved.kind, "pom");
        assert_eq!(matched[0].resolved.scope, "import");

        let unresolved = DependencyMatcher::new(&NoProperties);
        let bom = Dependency::new("org.platform", "platform-bom").with_type("${bom.type}");
        assert!(unresolved.match_all(&[], &[bom]).is_err());
    }

    #[test]
    fn test_plugin_matcher_ignores_version() {
        let p = props(&[("plugin.group", "org.codehaus.mojo")]);
        let matcher = PluginMatcher::new(&p);
        let resolved = vec![Plugin::new("org.codehaus.mojo", "exec-maven-plugin")];
        let mut declared = Plugin::new("${plugin.group}", "exec-maven-plugin");
        declared.version = Some("${exec.version}".into());
        let matched = matcher.match_all(&resolved, &[declared]).unwrap();
        assert_eq!(matched[0].resolved, resolved[0]);

        let err = matcher
            .match_all(&resolved, &[Plugin::new("org.apache.maven.plugins", "exec-maven-plugin")])
            .unwrap_err();
        assert_eq!(err.superset, vec!["org.codehaus.mojo:exec-maven-plugin"]);
    }
}
