//! Diagnostic output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::io::Write;

use colored::Colorize;

/// Print error (red bold "error:" prefix)
pub fn error(w: &mut dyn Write, msg: &(impl std::fmt::Display + ?Sized)) {
    let _ = writeln!(w, "{}: {}", "error".red().bold(), msg);
}

/// Print informational diagnostic (no color)
pub fn info(w: &mut dyn Write, msg: &(impl std::fmt::Display + ?Sized)) {
    let _ = writeln!(w, "{}", msg);
}

/// Print section header (cyan bold)
pub fn header(w: &mut dyn Write, msg: &(impl std::fmt::Display + ?Sized)) -> std::io::Result<()> {
    writeln!(w, "{}", msg.to_string().cyan().bold())
}

/// Print key/value detail with a dimmed annotation
pub fn detail(
    w: &mut dyn Write,
    key: &str,
    value: &(impl std::fmt::Display + ?Sized),
    note: &str,
) -> std::io::Result<()> {
    writeln!(w, "  {}: {} {}", key, value, format!("({note})").dimmed())
}
