//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

use crate::application::Row;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Tree row: bold key, cyan type, plain value
pub fn row(row: &Row, show_type: bool) -> String {
    if show_type {
        format!("{}  {}  {}", row.key.bold(), row.value_type.cyan(), row.value)
    } else {
        format!("{}  {}", row.key.bold(), row.value)
    }
}

/// Labelled field (green label)
pub fn field(label: &str, value: &(impl std::fmt::Display + ?Sized)) -> String {
    format!("{}: {}", label.green(), value)
}
