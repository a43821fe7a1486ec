//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print section header (cyan bold) to stderr, keeping stdout for tree dumps
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}", msg.to_string().cyan().bold());
}

/// Print plain output (no color, for tree dumps and settings)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    print!("{}", msg);
}
