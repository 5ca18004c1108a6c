//! Dependency and plugin coordinates as they appear in project snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_SCOPE: &str = "compile";
pub const DEFAULT_TYPE: &str = "jar";
pub const DEFAULT_PLUGIN_GROUP: &str = "org.apache.maven.plugins";

fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}

fn default_type() -> String {
    DEFAULT_TYPE.to_string()
}

fn default_plugin_group() -> String {
    DEFAULT_PLUGIN_GROUP.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_type", rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub classifier: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

impl Dependency {
    /// A `compile`-scoped `jar` dependency without version or classifier.
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
            scope: default_scope(),
            kind: default_type(),
            classifier: None,
            optional: false,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Bill-of-materials import (`type = pom`, `scope = import`).
    pub fn is_bom_import(&self) -> bool {
        self.kind == "pom" && self.scope == "import"
    }
}

/// `groupId:artifactId[:classifier]:scope`
impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{}", classifier)?;
        }
        write!(f, ":{}", self.scope)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plugin {
    #[serde(default = "default_plugin_group")]
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl Plugin {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
        }
    }
}

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_defaults_from_json() {
        let dep: Dependency =
            serde_json::from_str(r#"{"groupId":"com.foo","artifactId":"bar"}"#).unwrap();
        assert_eq!(dep.scope, "compile");
        assert_eq!(dep.kind, "jar");
        assert_eq!(dep, Dependency::new("com.foo", "bar"));
        assert_eq!(dep.to_string(), "com.foo:bar:compile");
    }

    #[test]
    fn test_bom_import_detection() {
        let bom = Dependency::new("org.x", "bom").with_type("pom").with_scope("import");
        assert!(bom.is_bom_import());
        assert!(!Dependency::new("org.x", "bom").with_type("pom").is_bom_import());
    }

    #[test]
    fn test_plugin_default_group() {
        let plugin: Plugin = serde_json::from_str(r#"{"artifactId":"maven-jar-plugin"}"#).unwrap();
        assert_eq!(plugin.to_string(), "org.apache.maven.plugins:maven-jar-plugin");
    }

    #[test]
    fn test_dependency_display_includes_classifier() {
        let dep = Dependency::new("a", "b").with_classifier("tests").with_scope("test");
        assert_eq!(dep.to_string(), "a:b:tests:test");
    }
}
