//! Project snapshot: the declared and resolved coordinates an external
//! extractor captured for one project, plus its property table.
//!
//! ```json
//! {
//!   "properties": { "project.groupId": "com.acme" },
//!   "dependencies": {
//!     "declared": [{ "groupId": "${project.groupId}", "artifactId": "core" }],
//!     "resolved": [{ "groupId": "com.acme", "artifactId": "core", "version": "1.0" }]
//!   }
//! }
//! ```

use super::artifact::{Dependency, Plugin};
use crate::errors::{PedantError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
/// Declared items in declaration order, and the resolved items they
/// correspond to. Without `resolved`, declared items are matched against
/// themselves.
pub struct Section<T> {
    #[serde(default = "Vec::new")]
    pub declared: Vec<T>,
    #[serde(default)]
    pub resolved: Option<Vec<T>>,
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Self {
            declared: Vec::new(),
            resolved: None,
        }
    }
}

impl<T> Section<T> {
    /// The collection declared items are matched against.
    pub fn superset(&self) -> &[T] {
        self.resolved.as_deref().unwrap_or(&self.declared)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub dependencies: Section<Dependency>,
    #[serde(default)]
    pub dependency_management: Section<Dependency>,
    #[serde(default)]
    pub plugins: Section<Plugin>,
    #[serde(default)]
    pub plugin_management: Section<Plugin>,
}

/// Read and parse a snapshot file.
pub fn load_snapshot(path: &Path) -> Result<ProjectSnapshot> {
    let data = fs::read_to_string(path).map_err(|source| PedantError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| PedantError::Json {
        path: path.to_path_buf(),
        source,
    })
}
