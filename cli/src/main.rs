//! # supportroute CLI
//!
//! Routes customer-support questions to a retrieval-augmented pipeline, a
//! natural-language-to-SQL pipeline, or both.
//!
//! ## Usage
//!
//! ```bash
//! # Route a question
//! supportroute route "Average order value by month"
//!
//! # Inspect the active rule set
//! supportroute rules show
//!
//! # Validate a rule file
//! supportroute rules check rules.toml
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use supportroute::commands;
use supportroute::errors::display_error;

/// Initialize logger based on verbose flag
fn init_logger(verbose: bool) {
    let mut log_builder = env_logger::Builder::from_default_env();
    if verbose {
        log_builder.filter_level(log::LevelFilter::Debug);
    } else {
        log_builder.filter_level(log::LevelFilter::Info);
    }
    log_builder.init();
}

/// Main CLI structure
#[derive(Parser)]
#[command(name = "supportroute")]
#[command(about = "Route support questions to RAG, NL-to-SQL, or both", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Decide which pipeline(s) should answer a question
    Route {
        /// Natural language support question
        #[arg(value_name = "QUERY")]
        query: String,
        /// Rule file (.toml or .json); overrides SUPPORTROUTE_RULES and the config file
        #[arg(long, short = 'r', value_name = "FILE")]
        rules: Option<PathBuf>,
        /// Customer identifier attached to the query
        #[arg(long, value_name = "ID")]
        customer_id: Option<String>,
        /// Ingress channel (e.g., email, chat, phone)
        #[arg(long, short = 'c', value_name = "CHANNEL")]
        channel: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Enable verbose output
        #[arg(long, short = 'v')]
        verbose: bool,
    },
    /// Show or validate routing rule sets
    Rules {
        #[command(subcommand)]
        command: RulesCommands,
    },
    /// Manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Rules subcommands
#[derive(Subcommand)]
enum RulesCommands {
    /// Show the active rule set
    Show {
        /// Rule file to show instead of the configured one
        #[arg(long, short = 'r', value_name = "FILE")]
        rules: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a rule file
    Check {
        /// Rule file (.toml or .json)
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

/// Config subcommands
#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Use a rule file by default
    SetRules {
        /// Rule file (.toml or .json)
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
    /// Go back to the built-in rule set
    ClearRules,
    /// Set (or clear, when omitted) the default channel
    SetChannel {
        #[arg(value_name = "CHANNEL")]
        channel: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    let exit_code = run_command(cli.command);
    std::process::exit(exit_code);
}

fn run_command(command: Commands) -> i32 {
    use supportroute::exit_codes::*;

    match command {
        Commands::Route {
            query,
            rules,
            customer_id,
            channel,
            json,
            verbose,
        } => {
            init_logger(verbose);
            let args = commands::route::RouteArgs {
                query,
                rules,
                customer_id,
                channel,
                json,
                verbose,
            };
            match commands::route::execute(args) {
                Ok(exit_code) => exit_code,
                Err(e) => {
                    display_error(&format!("Route failed: {e:#}"));
                    EXIT_ERROR
                }
            }
        }
        Commands::Rules { command } => {
            init_logger(false);
            run_rules_command(command)
        }
        Commands::Config { command } => {
            init_logger(false);
            run_config_command(command)
        }
    }
}

fn run_rules_command(command: RulesCommands) -> i32 {
    use supportroute::exit_codes::*;

    let result = match command {
        RulesCommands::Show { rules, json } => {
            commands::rules::execute_show(commands::rules::RulesShowArgs { rules, json })
        }
        RulesCommands::Check { path } => {
            commands::rules::execute_check(commands::rules::RulesCheckArgs { path })
        }
    };

    match result {
        Ok(exit_code) => exit_code,
        Err(e) => {
            display_error(&format!("Rules command failed: {e:#}"));
            EXIT_ERROR
        }
    }
}

fn run_config_command(command: ConfigCommands) -> i32 {
    use supportroute::exit_codes::*;

    let result = match command {
        ConfigCommands::Show => commands::config::execute_show(),
        ConfigCommands::SetRules { path } => commands::config::execute_set_rules(path),
        ConfigCommands::ClearRules => commands::config::execute_clear_rules(),
        ConfigCommands::SetChannel { channel } => commands::config::execute_set_channel(channel),
    };

    match result {
        Ok(exit_code) => exit_code,
        Err(e) => {
            display_error(&format!("Config command failed: {e:#}"));
            EXIT_CONFIG_ERROR
        }
    }
}
