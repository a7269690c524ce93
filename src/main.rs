mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use oxidized_agents::consistency;
use oxidized_agents::finding::Severity;
use oxidized_agents::rules::Rule;
use oxidized_agents::{audit, config::Config, output, rules, validate};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    initialize_tracing(cli.verbose);

    match cli.command {
        Commands::Audit {
            path,
            format,
            output: output_path,
            config: config_path,
        } => {
            require_exists(&path);
            let config = load_config(config_path.as_deref());

            let report = audit::run_audit(&path, &config).unwrap_or_else(|e| {
                eprintln!("Error: {}: {e}", path.display());
                std::process::exit(1);
            });
            let formatted = output::format_audit(&report, &format);
            write_output(&formatted, output_path);
        }

        Commands::Validate {
            path,
            format,
            strict,
            config: config_path,
        } => {
            let config = load_config(config_path.as_deref());

            // A missing file is reported as a malformed-document error.
            let report = validate::validate_path(&path, strict || config.strict.enabled);
            print!("{}", output::format_validation(&report, &format));

            std::process::exit(if report.passed() { 0 } else { 1 });
        }

        Commands::Check {
            root,
            format,
            strict,
            config: config_path,
        } => {
            let mut config = load_config(config_path.as_deref());
            if strict {
                config.strict.enabled = true;
            }

            let report = match consistency::check_tree(&root, &config) {
                Ok(report) => report,
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(2);
                }
            };
            print!("{}", output::format_consistency(&report, &format));

            std::process::exit(if report.passed() { 0 } else { 1 });
        }

        Commands::ListRules => {
            let rules = rules::catalog();
            let descriptions: HashMap<&str, &str> = rules::all_rules()
                .iter()
                .map(|r| (r.category().as_str(), r.description()))
                .collect();
            println!("{}", "Built-in Rules".bold().underline());
            println!();

            let mut current_group = "";
            for rule in &rules {
                if rule.group != current_group {
                    if !current_group.is_empty() {
                        println!();
                    }
                    match descriptions.get(rule.group) {
                        Some(desc) => println!("  {}  {}", rule.group.bold(), desc.dimmed()),
                        None => println!("  {}", rule.group.bold()),
                    }
                    current_group = rule.group;
                }

                let severity = match rule.severity {
                    Severity::Error => "ERROR".red().bold().to_string(),
                    Severity::Warning => " WARN".yellow().bold().to_string(),
                    Severity::Info => " INFO".blue().to_string(),
                };

                println!(
                    "    [{severity}] {id:<36} {message}",
                    id = rule.id,
                    message = rule.message,
                );
            }

            println!();
            println!("  Total: {} rules", rules.len());
        }

        Commands::Explain { rule_id } => {
            let rules = rules::catalog();
            match rules.iter().find(|r| r.id == rule_id) {
                Some(rule) => {
                    println!("{}", rule.id.bold());
                    println!();
                    println!("  Group:        {}", rule.group);
                    println!("  Severity:     {}", rule.severity);
                    if let Some(deduction) = rule.deduction {
                        println!("  Deduction:    {deduction:.1}");
                    }
                    println!("  Description:  {}", rule.message);
                    println!("  Remediation:  {}", rule.remediation);
                }
                None => {
                    eprintln!("Unknown rule: {rule_id}");
                    eprintln!("Use 'oxidized-agents list-rules' to see all available rules.");
                    std::process::exit(2);
                }
            }
        }
    }
}

/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`. Logs go to
/// stderr so reports on stdout stay machine-readable.
fn initialize_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn require_exists(path: &Path) {
    if !path.exists() {
        eprintln!("Error: path does not exist: {}", path.display());
        std::process::exit(2);
    }
}

fn load_config(path: Option<&Path>) -> Config {
    Config::load(path).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(2);
    })
}

fn write_output(formatted: &str, output_path: Option<PathBuf>) {
    if let Some(out_path) = output_path {
        std::fs::write(&out_path, formatted).unwrap_or_else(|e| {
            eprintln!("Error writing output: {e}");
            std::process::exit(2);
        });
        eprintln!("Output written to {}", out_path.display());
    } else {
        print!("{formatted}");
    }
}
