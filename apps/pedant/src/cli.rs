//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pedant",
    version,
    about = "Pedant: declaration order checks for build descriptors",
    long_about = "Pedant checks that dependencies and plugins declared in project snapshots follow a configured order, and shows a side-by-side diff when they do not.\n\nConfiguration precedence: CLI > pedant.toml > defaults.",
    after_help = "Examples:\n  pedant check 'target/snapshots/*.json'\n  pedant check --rule plugin-order --output json snapshot.json\n  pedant rules",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(long, global = true, action = clap::ArgAction::SetTrue, help = "Enable debug logging on stderr")]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current pedant version.")]
    Version,
    /// List rules and their ordering elements
    #[command(
        about = "List rules",
        long_about = "List every rule with its default orderBy and the elements it accepts."
    )]
    Rules,
    /// Check snapshot order
    #[command(
        about = "Run order checks",
        long_about = "Match declared items against resolved ones in each snapshot and verify their order. Violations and match errors exit with 1; configuration or input errors exit with 2.",
        after_help = "Examples:\n  pedant check 'build/*.json'\n  pedant check --rule dependency-order --output json build/app.json"
    )]
    Check {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Path to pedant.toml|yaml relative to the repo root")]
        config: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long = "rule", help = "Run only this rule (repeatable)")]
        rules: Vec<String>,
        #[arg(help = "Snapshot glob patterns (default: `snapshots` from config)")]
        snapshots: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_arguments() {
        let cli = Cli::parse_from([
            "pedant",
            "check",
            "--rule",
            "plugin-order",
            "--rule",
            "dependency-order",
            "--output",
            "json",
            "a/*.json",
            "b.json",
            "--verbose",
        ]);
        assert!(cli.verbose);
        match cli.cmd {
            Commands::Check {
                rules,
                snapshots,
                output,
                repo_root,
                ..
            } => {
                assert_eq!(rules, vec!["plugin-order", "dependency-order"]);
                assert_eq!(snapshots, vec!["a/*.json", "b.json"]);
                assert_eq!(output.as_deref(), Some("json"));
                assert!(repo_root.is_none());
            }
            _ => panic!("expected check"),
        }
    }
}
