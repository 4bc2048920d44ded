//! Console output utilities.

use std::fmt::Display;

use console::{style, StyledObject};

fn line(tag: StyledObject<&str>, message: impl Display) -> String {
    format!("{} {}", tag, message)
}

/// Print an info message.
pub fn print_info(message: impl Display) {
    println!("{}", line(style("INFO").cyan().bold(), message));
}

/// Print a success message.
pub fn print_success(message: impl Display) {
    println!("{}", line(style("OK").green().bold(), message));
}

/// Print a warning message.
pub fn print_warning(message: impl Display) {
    println!("{}", line(style("WARN").yellow().bold(), message));
}

/// Print an error message to stderr.
pub fn print_error(message: impl Display) {
    eprintln!("{}", line(style("ERROR").red().bold(), message));
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════╗
║     flux                                  ║
║     search, preview, download             ║
╚═══════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print the effective backend, transfer and cache settings.
pub fn print_config_summary(backend: &str, strategy: &str, download_dir: &str, cache: &str) {
    println!();
    println!("{}", style("Configuration:").bold());
    for (label, value) in [
        ("Backend", backend),
        ("Strategy", strategy),
        ("Directory", download_dir),
        ("Cache", cache),
    ] {
        println!("  {:<10} {}", format!("{}:", label), value);
    }
    println!();
}
