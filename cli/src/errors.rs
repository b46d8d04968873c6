//! # Error Handling
//!
//! User-friendly error display functions for the supportroute CLI, plus the
//! mapping from router errors to exit codes.

use colored::Colorize;
use supportroute_rag::RouterError;

use crate::exit_codes::{EXIT_CONFIG_ERROR, EXIT_INVALID_INPUT};

/// Display a configuration error with helpful suggestions
///
/// # Arguments
///
/// * `message` - The error message to display
pub fn display_config_error(message: &str) {
    eprintln!("{} Configuration error: {}", "✗".red().bold(), message);
    eprintln!();
    eprintln!("{}", "Possible causes:".yellow());
    eprintln!("  • Rule file is empty or unreadable");
    eprintln!("  • Two rules share a name");
    eprintln!("  • A rule has a non-positive weight, a bad regex, or no matcher");
    eprintln!();
    eprintln!(
        "{} Run `supportroute rules check <FILE>` to validate a rule file.",
        "Tip:".cyan().bold()
    );
}

/// Display an invalid-input error with helpful suggestions
///
/// # Arguments
///
/// * `message` - The error message to display
pub fn display_validation_error(message: &str) {
    eprintln!("{} Invalid request: {}", "✗".red().bold(), message);
    eprintln!();
    eprintln!(
        "{} Pass a non-empty question, e.g. `supportroute route \"where is my order?\"`.",
        "Tip:".cyan().bold()
    );
}

/// Display a generic error
pub fn display_error(message: &str) {
    eprintln!("{} Error: {}", "✗".red().bold(), message);
}

/// Display a warning
pub fn display_warning(message: &str) {
    eprintln!("{} Warning: {}", "⚠".yellow().bold(), message);
}

/// Display a success message
pub fn display_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Display an info message
pub fn display_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Render a router error and return the matching exit code.
pub fn report_router_error(err: &RouterError) -> i32 {
    match err {
        RouterError::InvalidInput(msg) => {
            display_validation_error(msg);
            EXIT_INVALID_INPUT
        }
        RouterError::Configuration(msg) => {
            display_config_error(msg);
            EXIT_CONFIG_ERROR
        }
    }
}
