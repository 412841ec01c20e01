//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips the escape codes when the
//! stream is not a terminal.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Semantic styles for CLI output
pub trait Stylize: Display + Sized {
    /// Headings and key terms
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    /// Secondary information
    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    /// Names, URLs and counts
    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    /// Success messages
    fn success(&self) -> String {
        self.green().to_string()
    }

    /// Warnings and failures
    fn warn(&self) -> String {
        self.yellow().to_string()
    }
}

impl<T: Display> Stylize for T {}

pub const CHECK: &str = "✓";
pub const CROSS: &str = "✗";

pub fn check() -> String {
    CHECK.success()
}

pub fn cross() -> String {
    CROSS.warn()
}

pub fn arrow() -> String {
    "→".muted()
}
