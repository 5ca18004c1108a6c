//! Pedant CLI binary entry point.
//! Resolves configuration, runs the order checks and prints results.

use clap::Parser;
use pedant::check::{self, Rule, RuleId, Summary};
use pedant::cli::{Cli, Commands};
use pedant::config;
use pedant::errors::PedantError;
use pedant::output;
use pedant::utils::{error_prefix, info_prefix, note_prefix, init_logging};

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", error_prefix(), err);
    std::process::exit(2);
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Rules => {
            for id in RuleId::ALL {
                println!(
                    "{:<28} orderBy={:<28} elements=[{}]",
                    id.as_str(),
                    id.default_order_by(),
                    id.elements().join(", ")
                );
            }
        }
        Commands::Check {
            repo_root,
            config: config_file,
            output: output_mode,
            rules,
            snapshots,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                config_file.as_deref(),
                output_mode.as_deref(),
                &rules,
                &snapshots,
            )
            .unwrap_or_else(|e| fail(e));
            if eff.config_path.is_none() {
                eprintln!("{} No pedant.toml found; using defaults.", note_prefix());
            }
            if eff.snapshots.is_empty() {
                fail("No snapshots given. Pass glob patterns or set `snapshots` in pedant.toml.");
            }
            let rules: Vec<Rule> = eff
                .rules
                .iter()
                .map(|(id, settings)| {
                    Rule::configure(*id, settings).map_err(PedantError::from)
                })
                .collect::<Result<_, _>>()
                .unwrap_or_else(|e| fail(e));
            let reports =
                check::run_check(&eff.repo_root, &eff.snapshots, &rules).unwrap_or_else(|e| fail(e));
            if reports.is_empty() && eff.output != config::OutputMode::Json {
                eprintln!(
                    "{} No snapshot matched [{}].",
                    info_prefix(),
                    eff.snapshots.join(", ")
                );
            }
            let summary = Summary::of(&reports);
            output::print_check(&reports, &summary, eff.output);
            if summary.unreadable > 0 {
                std::process::exit(2);
            }
            if !summary.is_clean() {
                std::process::exit(1);
            }
        }
    }
}
