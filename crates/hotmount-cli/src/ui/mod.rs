//! Terminal status output.

mod messages;

pub use messages::{error, info, success, warning};

/// Print the banner shown once the dev server listens.
pub fn print_ready(url: &str, entry: &str, adapter: &str) {
    use owo_colors::OwoColorize;

    eprintln!();
    eprintln!("  {} {}", "hotmount".green().bold(), "dev server ready".dimmed());
    eprintln!();
    eprintln!("  {} {}", "➜ Local:  ".bold(), url.cyan());
    eprintln!("  {} {}", "➜ Entry:  ".bold(), entry);
    eprintln!("  {} {}", "➜ Adapter:".bold(), adapter);
    eprintln!();
}
