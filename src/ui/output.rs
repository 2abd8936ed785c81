//! Output functions for consistent step formatting

use console::style;

/// Display a section header
pub fn section(title: &str) {
    println!();
    println!("{}", style(title).blue().bold());
}

/// Print a configuration line
pub fn key_value(key: &str, value: &str) {
    println!("- {}: {}", key, style(value).dim());
}

/// Echo a command before running it
pub fn command(printable: &str) {
    println!("{} {}", style("$").green(), style(printable).green());
}

/// Display a success step
pub fn step_ok(message: &str) {
    println!("{} {}", style("[OK]").green(), message);
}

/// Display a warning step
pub fn step_warn(message: &str) {
    println!("{} {}", style("[WARN]").yellow(), message);
}

/// Display an info step
pub fn step_info(message: &str) {
    println!("  {}", style(message).dim());
}
