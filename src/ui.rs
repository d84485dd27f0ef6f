//! Terminal output helpers.
//!
//! Results go to stdout so they can be piped; status lines go to stderr.
//! `console` drops the colours when the stream is not a terminal.

use console::style;

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").for_stderr().red(), message);
}

pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").for_stderr().green(), message);
}

pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").for_stderr().yellow(), message);
}

pub fn display_hint(message: &str) {
    eprintln!("  {} {}", style("hint:").for_stderr().cyan(), message);
}

/// Print the result of a lookup, or a status line when there is none
pub fn display_lookup(value: Option<&str>, missing: &str) {
    match value {
        Some(value) => println!("{}", value),
        None => display_status(missing),
    }
}
