//! Output rendering for the check command.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-file, per-rule fields and a top-level summary.

use crate::check::{FileReport, RuleOutcome, Summary};
use crate::config::OutputMode;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: OutputMode) -> bool {
    output != OutputMode::Json && std::env::var_os("NO_COLOR").is_none()
}

/// Print check results in the requested format.
pub fn print_check(reports: &[FileReport], summary: &Summary, output: OutputMode) {
    match output {
        OutputMode::Json => match serde_json::to_string_pretty(&compose_check_json(reports, summary)) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("{} {}", crate::utils::error_prefix(), e),
        },
        OutputMode::Human => {
            let color = use_colors(output);
            for report in reports {
                let file = if color {
                    report.file.clone().bold().to_string()
                } else {
                    report.file.clone()
                };
                if let Some(err) = &report.error {
                    let tag = if color {
                        "⟦unreadable⟧".red().bold().to_string()
                    } else {
                        "⟦unreadable⟧".to_string()
                    };
                    println!("✖ {} {} — {}", tag, file, err);
                    continue;
                }
                for outcome in &report.outcomes {
                    print_outcome(&file, outcome, color);
                }
            }
            let line = format!(
                "— Summary — violations={} match_errors={} unreadable={} files={}",
                summary.violations, summary.match_errors, summary.unreadable, summary.files
            );
            if color {
                println!("{}", line.bold());
            } else {
                println!("{}", line);
            }
        }
    }
}

fn print_outcome(file: &str, outcome: &RuleOutcome, color: bool) {
    match &outcome.result {
        Ok(report) if report.ordered => {}
        Ok(report) => {
            let (icon, tag) = if color {
                ("✖".red().to_string(), "⟦order⟧".red().bold().to_string())
            } else {
                ("✖".to_string(), "⟦order⟧".to_string())
            };
            println!(
                "{} {} {} ❲{}❳ — {} are not in the required order",
                icon,
                tag,
                file,
                outcome.rule,
                outcome.rule.subject()
            );
            println!("{}", report.diff());
        }
        Err(e) => {
            let (icon, tag) = if color {
                ("▲".yellow().to_string(), "⟦match⟧".yellow().bold().to_string())
            } else {
                ("▲".to_string(), "⟦match⟧".to_string())
            };
            println!("{} {} {} ❲{}❳ — {}", icon, tag, file, outcome.rule, e);
        }
    }
}

/// Compose check JSON object (pure) for testing/snapshot purposes.
pub fn compose_check_json(reports: &[FileReport], summary: &Summary) -> JsonVal {
    let items: Vec<_> = reports
        .iter()
        .map(|r| {
            let rules: Vec<_> = r
                .outcomes
                .iter()
                .map(|o| match &o.result {
                    Ok(report) => json!({
                        "rule": o.rule.as_str(),
                        "ordered": report.ordered,
                        "actual": report.actual,
                        "required": report.required,
                        "diff": (!report.ordered).then(|| report.diff()),
                    }),
                    Err(e) => json!({
                        "rule": o.rule.as_str(),
                        "error": e.to_string(),
                    }),
                })
                .collect();
            json!({
                "file": r.file,
                "error": r.error,
                "rules": rules,
            })
        })
        .collect();
    let summary = json!({
        "violations": summary.violations,
        "matchErrors": summary.match_errors,
        "unreadable": summary.unreadable,
        "files": summary.files,
    });
    json!({"results": items, "summary": summary})
}
