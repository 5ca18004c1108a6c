//! Configuration discovery and effective settings resolution.
//!
//! Pedant reads `pedant.toml|yaml|yml` from the repository root (or the
//! closest ancestor) and merges it with CLI flags into an `Effective`
//! config. Defaults:
//! - `output`: `human`
//! - `snapshots`: none (must come from CLI or config)
//! - every rule enabled with its default `orderBy` and empty priorities
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::check::{RuleId, RuleSettings};
use crate::errors::{ConfigError, PedantError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILES: [&str; 3] = ["pedant.toml", "pedant.yaml", "pedant.yml"];

const PRIORITIES_SUFFIX: &str = "Priorities";

#[derive(Debug, Default, Deserialize, Clone)]
/// Per-rule section under `[rules.<id>]`.
pub struct RuleCfg {
    pub enabled: Option<bool>,
    #[serde(rename = "orderBy")]
    pub order_by: Option<String>,
    /// Dependency rules only; defaults to `true`.
    #[serde(rename = "compareClassifierAndType")]
    pub compare_classifier_and_type: Option<bool>,
    /// `<element>Priorities = "a,b,c"` entries.
    #[serde(flatten)]
    pub priorities: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `pedant.toml|yaml`.
pub struct PedantConfig {
    pub output: Option<String>,
    #[serde(default)]
    pub snapshots: Vec<String>,
    #[serde(default)]
    pub rules: BTreeMap<String, RuleCfg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn parse(s: &str) -> std::result::Result<Self, ConfigError> {
        match s {
            "human" => Ok(OutputMode::Human),
            "json" => Ok(OutputMode::Json),
            other => Err(ConfigError::UnsupportedOutput(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub output: OutputMode,
    pub snapshots: Vec<String>,
    pub rules: Vec<(RuleId, RuleSettings)>,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `pedant.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// First config file present in `root`, in `CONFIG_FILES` order.
pub fn find_config(root: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|f| root.join(f))
        .find(|p| p.is_file())
}

/// Load `PedantConfig` from a TOML or YAML file, chosen by extension.
pub fn load_config(path: &Path) -> Result<PedantConfig> {
    let s = fs::read_to_string(path).map_err(|source| PedantError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&s).map_err(|source| PedantError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        toml::from_str(&s).map_err(|source| PedantError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Turn one `[rules.<id>]` section into settings on top of the defaults.
pub fn rule_settings(id: RuleId, cfg: &RuleCfg) -> std::result::Result<RuleSettings, ConfigError> {
    let mut settings = RuleSettings::defaults(id);
    if let Some(order_by) = cfg.order_by.as_deref() {
        settings = settings.order_by(order_by);
    }
    if let Some(compare) = cfg.compare_classifier_and_type {
        settings = settings.compare_classifier_and_type(compare);
    }
    for (key, text) in &cfg.priorities {
        let element = key
            .strip_suffix(PRIORITIES_SUFFIX)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ConfigError::UnknownElement {
                name: key.clone(),
                available: id
                    .elements()
                    .into_iter()
                    .map(|e| format!("{e}{PRIORITIES_SUFFIX}"))
                    .collect(),
            })?;
        settings = settings.priority(element, text);
    }
    Ok(settings)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
///
/// `cli_rules`, when non-empty, selects exactly those rules (even ones the
/// config disables). `cli_snapshots`, when non-empty, replaces the
/// configured snapshot patterns.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_config: Option<&str>,
    cli_output: Option<&str>,
    cli_rules: &[String],
    cli_snapshots: &[String],
) -> Result<Effective> {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let config_path = match cli_config {
        Some(p) => Some(repo_root.join(p)),
        None => find_config(&repo_root),
    };
    let cfg = match config_path.as_deref() {
        Some(p) => load_config(p)?,
        None => PedantConfig::default(),
    };

    for name in cfg.rules.keys() {
        RuleId::parse(name)?;
    }

    let output_src = cli_output
        .map(str::to_string)
        .or(cfg.output.clone())
        .unwrap_or_else(|| "human".to_string());
    let output = OutputMode::parse(&output_src)?;

    let snapshots = if cli_snapshots.is_empty() {
        cfg.snapshots.clone()
    } else {
        cli_snapshots.to_vec()
    };

    let selected: Vec<RuleId> = if cli_rules.is_empty() {
        RuleId::ALL
            .into_iter()
            .filter(|id| {
                cfg.rules
                    .get(id.as_str())
                    .and_then(|r| r.enabled)
                    .unwrap_or(true)
            })
            .collect()
    } else {
        cli_rules
            .iter()
            .map(|r| RuleId::parse(r))
            .collect::<std::result::Result<_, _>>()?
    };

    let mut rules = Vec::with_capacity(selected.len());
    for id in selected {
        let settings = match cfg.rules.get(id.as_str()) {
            Some(rule_cfg) => rule_settings(id, rule_cfg)?,
            None => RuleSettings::defaults(id),
        };
        rules.push((id, settings));
    }

    Ok(Effective {
        repo_root,
        config_path,
        output,
        snapshots,
        rules,
    })
}
