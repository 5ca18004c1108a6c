//! Ordering rules and the check runner.
//!
//! A `Rule` is configured once (element sequence and priorities validated
//! up front) and then applied to any number of project snapshots. For each
//! snapshot it matches declared items against resolved ones, compares them
//! in declaration order with its compound ordering, and produces an
//! `OrderReport` carrying the actual and required orders.

use crate::diff;
use crate::errors::{ConfigError, MatchError, PedantError, Result};
use crate::matcher::{DependencyMatcher, OneToOneMatcher, PluginMatcher, PropertyResolver};
use crate::models::{load_snapshot, Dependency, Plugin, ProjectSnapshot, Section};
use crate::ordering::elements::{DEPENDENCY_ELEMENTS, PLUGIN_ELEMENTS};
use crate::ordering::{CompoundOrdering, ItemOrdering, PriorityList};
use crate::utils::{display_path, split_comma_separated};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const ACTUAL_TITLE: &str = "Actual Order";
pub const REQUIRED_TITLE: &str = "Required Order";

/// Configuration key of `RuleSettings::compare_classifier_and_type`.
pub const COMPARE_CLASSIFIER_AND_TYPE: &str = "compareClassifierAndType";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    DependencyOrder,
    DependencyManagementOrder,
    PluginOrder,
    PluginManagementOrder,
}

impl RuleId {
    pub const ALL: [RuleId; 4] = [
        RuleId::DependencyOrder,
        RuleId::DependencyManagementOrder,
        RuleId::PluginOrder,
        RuleId::PluginManagementOrder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::DependencyOrder => "dependency-order",
            RuleId::DependencyManagementOrder => "dependency-management-order",
            RuleId::PluginOrder => "plugin-order",
            RuleId::PluginManagementOrder => "plugin-management-order",
        }
    }

    pub fn parse(name: &str) -> std::result::Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == name)
            .ok_or_else(|| ConfigError::UnknownRule(name.to_string()))
    }

    pub fn default_order_by(self) -> &'static str {
        match self {
            RuleId::DependencyOrder => "scope,groupId,artifactId",
            _ => "groupId,artifactId",
        }
    }

    /// Element names this rule can order by.
    pub fn elements(self) -> Vec<&'static str> {
        match self {
            RuleId::DependencyOrder | RuleId::DependencyManagementOrder => DEPENDENCY_ELEMENTS.names(),
            RuleId::PluginOrder | RuleId::PluginManagementOrder => PLUGIN_ELEMENTS.names(),
        }
    }

    /// What the rule orders, for messages.
    pub fn subject(self) -> &'static str {
        match self {
            RuleId::DependencyOrder => "dependencies",
            RuleId::DependencyManagementOrder => "managed dependencies",
            RuleId::PluginOrder => "plugins",
            RuleId::PluginManagementOrder => "managed plugins",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element sequence and per-element priorities for one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSettings {
    pub order_by: Vec<String>,
    pub priorities: Vec<(String, PriorityList)>,
    /// Dependency rules only: whether classifier and type take part in
    /// matching declared against resolved dependencies.
    pub compare_classifier_and_type: bool,
}

impl RuleSettings {
    pub fn defaults(id: RuleId) -> Self {
        Self {
            order_by: split_comma_separated(id.default_order_by()),
            priorities: Vec::new(),
            compare_classifier_and_type: true,
        }
    }

    pub fn compare_classifier_and_type(mut self, compare: bool) -> Self {
        self.compare_classifier_and_type = compare;
        self
    }

    /// Replace the element sequence with comma-separated `text`.
    pub fn order_by(mut self, text: &str) -> Self {
        self.order_by = split_comma_separated(text);
        self
    }

    /// Set the priorities of `element` from comma-separated `text`.
    pub fn priority(mut self, element: &str, text: &str) -> Self {
        self.priorities.retain(|(name, _)| name != element);
        self.priorities
            .push((element.to_string(), PriorityList::parse(text)));
        self
    }
}

enum RuleOrdering {
    Dependencies(CompoundOrdering<Dependency, String>),
    Plugins(CompoundOrdering<Plugin, String>),
}

/// A configured ordering rule.
pub struct Rule {
    id: RuleId,
    ordering: RuleOrdering,
    compare_classifier_and_type: bool,
}

impl Rule {
    /// Validate `settings` and build the rule's ordering.
    pub fn configure(id: RuleId, settings: &RuleSettings) -> std::result::Result<Self, ConfigError> {
        let ordering = match id {
            RuleId::DependencyOrder | RuleId::DependencyManagementOrder => RuleOrdering::Dependencies(
                DEPENDENCY_ELEMENTS.compound(&settings.order_by, &settings.priorities)?,
            ),
            RuleId::PluginOrder | RuleId::PluginManagementOrder => {
                if !settings.compare_classifier_and_type {
                    return Err(ConfigError::UnsupportedSetting {
                        rule: id.as_str().to_string(),
                        key: COMPARE_CLASSIFIER_AND_TYPE.to_string(),
                    });
                }
                RuleOrdering::Plugins(PLUGIN_ELEMENTS.compound(&settings.order_by, &settings.priorities)?)
            }
        };
        debug!(
            rule = %id,
            order_by = ?settings.order_by,
            compare_classifier_and_type = settings.compare_classifier_and_type,
            "configured rule"
        );
        Ok(Self {
            id,
            ordering,
            compare_classifier_and_type: settings.compare_classifier_and_type,
        })
    }

    pub fn id(&self) -> RuleId {
        self.id
    }

    /// Match the rule's section of `snapshot` and compare its order.
    pub fn check(&self, snapshot: &ProjectSnapshot) -> std::result::Result<OrderReport, MatchError> {
        let resolver: &dyn PropertyResolver = &snapshot.properties;
        match &self.ordering {
            RuleOrdering::Dependencies(ordering) => {
                let section = if self.id == RuleId::DependencyOrder {
                    &snapshot.dependencies
                } else {
                    &snapshot.dependency_management
                };
                let matcher = DependencyMatcher::new(resolver)
                    .compare_classifier_and_type(self.compare_classifier_and_type);
                evaluate(ordering, &matcher, section)
            }
            RuleOrdering::Plugins(ordering) => {
                let section = if self.id == RuleId::PluginOrder {
                    &snapshot.plugins
                } else {
                    &snapshot.plugin_management
                };
                evaluate(ordering, &PluginMatcher::new(resolver), section)
            }
        }
    }
}

fn evaluate<T, M>(
    ordering: &CompoundOrdering<T, String>,
    matcher: &M,
    section: &Section<T>,
) -> std::result::Result<OrderReport, MatchError>
where
    T: Clone + fmt::Display,
    M: OneToOneMatcher<Superset = T, Subset = T>,
{
    let matched = matcher.match_all(section.superset(), &section.declared)?;
    let resolved: Vec<T> = matched.into_iter().map(|m| m.resolved).collect();
    Ok(OrderReport::evaluate(ordering, &resolved))
}

/// Actual order of a section against the order its rule requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReport {
    pub ordered: bool,
    pub actual: Vec<String>,
    pub required: Vec<String>,
}

impl OrderReport {
    pub fn evaluate<T, O>(ordering: &O, items: &[T]) -> Self
    where
        T: Clone + fmt::Display,
        O: ItemOrdering<T>,
    {
        let render = |items: &[T]| items.iter().map(|i| i.to_string()).collect::<Vec<_>>();
        Self {
            ordered: ordering.is_ordered(items),
            actual: render(items),
            required: render(&ordering.sorted_copy(items)),
        }
    }

    /// Side-by-side diff of the actual and required orders.
    pub fn diff(&self) -> String {
        diff::side_by_side(&self.actual, &self.required, ACTUAL_TITLE, REQUIRED_TITLE)
    }
}

/// Result of one rule on one snapshot.
#[derive(Debug)]
pub struct RuleOutcome {
    pub rule: RuleId,
    pub result: std::result::Result<OrderReport, MatchError>,
}

impl RuleOutcome {
    pub fn is_violation(&self) -> bool {
        matches!(&self.result, Ok(report) if !report.ordered)
    }
}

/// Outcomes for one snapshot file. `error` is set when the file could not
/// be loaded, in which case no rule ran.
#[derive(Debug)]
pub struct FileReport {
    pub file: String,
    pub error: Option<String>,
    pub outcomes: Vec<RuleOutcome>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub violations: usize,
    pub match_errors: usize,
    pub unreadable: usize,
    pub files: usize,
}

impl Summary {
    pub fn of(reports: &[FileReport]) -> Self {
        let mut summary = Summary {
            files: reports.len(),
            ..Summary::default()
        };
        for report in reports {
            if report.error.is_some() {
                summary.unreadable += 1;
            }
            for outcome in &report.outcomes {
                match &outcome.result {
                    Ok(r) if !r.ordered => summary.violations += 1,
                    Ok(_) => {}
                    Err(_) => summary.match_errors += 1,
                }
            }
        }
        summary
    }

    pub fn is_clean(&self) -> bool {
        self.violations == 0 && self.match_errors == 0 && self.unreadable == 0
    }
}

/// Apply every rule to one snapshot.
pub fn check_snapshot(rules: &[Rule], snapshot: &ProjectSnapshot) -> Vec<RuleOutcome> {
    rules
        .iter()
        .map(|rule| RuleOutcome {
            rule: rule.id(),
            result: rule.check(snapshot),
        })
        .collect()
}

/// Expand snapshot glob patterns relative to `root`; sorted and deduplicated.
pub fn expand_patterns(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files: BTreeSet<PathBuf> = BTreeSet::new();
    for pat in patterns {
        let pattern = root.join(pat).to_string_lossy().to_string();
        let paths = glob::glob(&pattern).map_err(|source| PedantError::Pattern {
            pattern: pat.clone(),
            source,
        })?;
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => {
                    files.insert(path);
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "skipping unreadable snapshot path"),
            }
        }
    }
    Ok(files.into_iter().collect())
}

/// Check every snapshot matched by `patterns` against `rules`.
///
/// Snapshots are processed in parallel; reports come back sorted by file.
pub fn run_check(root: &Path, patterns: &[String], rules: &[Rule]) -> Result<Vec<FileReport>> {
    let files = expand_patterns(root, patterns)?;
    debug!(files = files.len(), rules = rules.len(), "running check");
    let mut reports: Vec<FileReport> = files
        .par_iter()
        .map(|path| {
            let file = display_path(path, root);
            match load_snapshot(path) {
                Ok(snapshot) => FileReport {
                    file,
                    error: None,
                    outcomes: check_snapshot(rules, &snapshot),
                },
                Err(e) => FileReport {
                    file,
                    error: Some(e.to_string()),
                    outcomes: Vec::new(),
                },
            }
        })
        .collect();
    reports.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn snapshot(json: &str) -> ProjectSnapshot {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_rule_id_round_trip_and_unknown() {
        for id in RuleId::ALL {
            assert_eq!(RuleId::parse(id.as_str()).unwrap(), id);
        }
        assert_eq!(
            RuleId::parse("section-order"),
            Err(ConfigError::UnknownRule("section-order".into()))
        );
    }

    #[test]
    fn test_configure_rejects_unknown_element() {
        let settings = RuleSettings::defaults(RuleId::PluginOrder).order_by("scope,groupId");
        assert!(matches!(
            Rule::configure(RuleId::PluginOrder, &settings),
            Err(ConfigError::UnknownElement { .. })
        ));
        let settings = RuleSettings::defaults(RuleId::DependencyOrder).order_by(" , ");
        assert!(matches!(
            Rule::configure(RuleId::DependencyOrder, &settings),
            Err(ConfigError::EmptyOrdering)
        ));
    }

    #[test]
    fn test_dependency_order_uses_resolved_values() {
        let snap = snapshot(
            r#"{
  "properties": {"acme": "com.acme"},
  "dependencies": {
    "declared": [
      {"groupId": "org.lib", "artifactId": "x", "scope": "test"},
      {"groupId": "${acme}", "artifactId": "core"}
    ],
    "resolved": [
      {"groupId": "com.acme", "artifactId": "core", "version": "1"},
      {"groupId": "org.lib", "artifactId": "x", "scope": "test", "version": "2"}
    ]
  }
}"#,
        );
        let rule = Rule::configure(
            RuleId::DependencyOrder,
            &RuleSettings::defaults(RuleId::DependencyOrder).priority("scope", "compile,test"),
        )
        .unwrap();
        let report = rule.check(&snap).unwrap();
        assert!(!report.ordered);
        assert_eq!(report.actual, vec!["org.lib:x:test", "com.acme:core:compile"]);
        assert_eq!(report.required, vec!["com.acme:core:compile", "org.lib:x:test"]);
        let diff = report.diff();
        assert!(diff.starts_with("Actual Order"));
        assert!(diff.contains("Required Order"));
    }

    #[test]
    fn test_group_priority_orders_plugins() {
        let snap = snapshot(
            r#"{
  "plugins": {
    "declared": [
      {"groupId": "org.bar", "artifactId": "a"},
      {"groupId": "com.foo.x", "artifactId": "b"}
    ]
  }
}"#,
        );
        let settings = RuleSettings::defaults(RuleId::PluginOrder).priority("groupId", "com.foo");
        let rule = Rule::configure(RuleId::PluginOrder, &settings).unwrap();
        let report = rule.check(&snap).unwrap();
        assert_eq!(report.required, vec!["com.foo.x:b", "org.bar:a"]);
        assert!(!report.ordered);
    }

    #[test]
    fn test_management_rule_accepts_bom_import() {
        let snap = snapshot(
            r#"{
  "dependencyManagement": {
    "declared": [
      {"groupId": "com.a", "artifactId": "lib"},
      {"groupId": "org.platform", "artifactId": "bom", "type": "pom", "scope": "import"}
    ],
    "resolved": [{"groupId": "com.a", "artifactId": "lib", "version": "3"}]
  }
}"#,
        );
        let rule = Rule::configure(
            RuleId::DependencyManagementOrder,
            &RuleSettings::defaults(RuleId::DependencyManagementOrder),
        )
        .unwrap();
        let report = rule.check(&snap).unwrap();
        assert!(report.ordered);
        assert_eq!(report.actual.len(), 2);
    }

    #[test]
    fn test_management_rule_can_ignore_classifier_and_type() {
        let snap = snapshot(
            r#"{
  "dependencyManagement": {
    "declared": [
      {"groupId": "org.x", "artifactId": "b", "type": "test-jar"},
      {"groupId": "com.y", "artifactId": "a", "classifier": "tests"}
    ],
    "resolved": [
      {"groupId": "com.y", "artifactId": "a"},
      {"groupId": "org.x", "artifactId": "b"}
    ]
  }
}"#,
        );
        let id = RuleId::DependencyManagementOrder;
        let strict = Rule::configure(id, &RuleSettings::defaults(id)).unwrap();
        assert!(strict.check(&snap).is_err());

        let loose = Rule::configure(
            id,
            &RuleSettings::defaults(id).compare_classifier_and_type(false),
        )
        .unwrap();
        let report = loose.check(&snap).unwrap();
        assert_eq!(report.actual, vec!["org.x:b:compile", "com.y:a:compile"]);
        assert!(!report.ordered);
    }

    #[test]
    fn test_plugin_rule_rejects_classifier_setting() {
        let id = RuleId::PluginOrder;
        assert!(matches!(
            Rule::configure(id, &RuleSettings::defaults(id).compare_classifier_and_type(false)),
            Err(ConfigError::UnsupportedSetting { .. })
        ));
    }

    #[test]
    fn test_unmatched_dependency_is_match_error() {
        let snap = snapshot(
            r#"{"dependencies": {"declared": [{"groupId": "g", "artifactId": "a"}], "resolved": []}}"#,
        );
        let rule = Rule::configure(
            RuleId::DependencyOrder,
            &RuleSettings::defaults(RuleId::DependencyOrder),
        )
        .unwrap();
        let err = rule.check(&snap).unwrap_err();
        assert_eq!(err.item, "g:a:compile");
        assert!(err.superset.is_empty());
    }

    #[test]
    fn test_run_check_collects_sorted_reports() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("snap")).unwrap();
        fs::write(
            root.join("snap/b.json"),
            r#"{"plugins": {"declared": [{"artifactId": "z"}, {"artifactId": "a"}]}}"#,
        )
        .unwrap();
        fs::write(root.join("snap/a.json"), "{}").unwrap();
        fs::write(root.join("snap/c.json"), "not json").unwrap();

        let rules: Vec<Rule> = RuleId::ALL
            .into_iter()
            .map(|id| Rule::configure(id, &RuleSettings::defaults(id)).unwrap())
            .collect();
        let reports = run_check(root, &["snap/*.json".to_string()], &rules).unwrap();
        let files: Vec<&str> = reports.iter().map(|r| r.file.as_str()).collect();
        assert_eq!(files, vec!["snap/a.json", "snap/b.json", "snap/c.json"]);
        assert!(reports[0].outcomes.iter().all(|o| !o.is_violation()));
        assert!(reports[1]
            .outcomes
            .iter()
            .any(|o| o.rule == RuleId::PluginOrder && o.is_violation()));
        assert!(reports[2].error.is_some());

        let summary = Summary::of(&reports);
        assert_eq!(
            summary,
            Summary {
                violations: 1,
                match_errors: 0,
                unreadable: 1,
                files: 3,
            }
        );
        assert!(!summary.is_clean());
    }

    #[test]
    fn test_bad_pattern_is_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            expand_patterns(dir.path(), &["[".to_string()]),
            Err(PedantError::Pattern { .. })
        ));
    }
}
