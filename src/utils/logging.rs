// file: src/utils/logging.rs
// description: Tracing subscriber initialization and styled terminal output helpers
// reference: https://docs.rs/tracing-subscriber

use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// HTTP stack crates are capped at warn unless RUST_LOG says otherwise.
fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("{level},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn")
}

pub fn init_logger(colored_output: bool, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .compact()
        .with_ansi(colored_output);

    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}

pub fn format_step(step: usize, total: usize, msg: &str) -> String {
    format!("{} {}", format!("[{}/{}]", step, total).cyan().bold(), msg)
}

/// Speaker prefix for a transcript line.
pub fn format_speaker(is_user: bool) -> String {
    if is_user {
        "you ›".bold().to_string()
    } else {
        "finsight ›".magenta().bold().to_string()
    }
}
