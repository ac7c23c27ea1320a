//! CLI argument parsing and terminal entry helpers.

pub mod args;

use colored::Colorize;

/// Print the startup banner for interactive runs.
pub fn print_banner() {
    eprintln!(
        "  {} {}  {}",
        "ecolens".bold().green(),
        crate::constants::VERSION,
        "JS/TS sustainability audit".dimmed(),
    );
    eprintln!();
}
