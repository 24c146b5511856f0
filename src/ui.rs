//! Coloured terminal output for the CLI.

use std::path::Path;

use colored::*;

use crate::types::Mode;

/// Progress bar for AI-mode steps
pub mod progress;

pub use progress::ProgressManager;

fn prefix() -> ColoredString {
    "hayagriva-llm".cyan()
}

/// Opening line naming the mode
pub fn print_banner(mode: Mode) {
    let label = match mode {
        Mode::Ai => "AI".magenta(),
        Mode::Static => "static".blue(),
    };
    println!();
    println!("{} {} {}", prefix(), "Generating LLM metadata".dimmed(), format!("({} mode)", label).dimmed());
    println!();
}

/// One pipeline step, with optional dimmed detail
pub fn print_step(label: &str, detail: Option<&str>) {
    match detail {
        Some(detail) => println!("{} {} {} {}", prefix(), "›".blue(), label, detail.dimmed()),
        None => println!("{} {} {}", prefix(), "›".blue(), label),
    }
}

/// Completed step
pub fn print_success(label: &str) {
    println!("{} {} {}", prefix(), "✓".green(), label);
}

/// Created / Updated line for an output file
pub fn print_file_written(path: &Path, existed: bool) {
    let action = if existed { "Updated".yellow() } else { "Created".green() };
    println!("  {} {}", action, path.display().to_string().dimmed());
}

/// Final summary of written files
pub fn print_summary(json_path: &Path, txt_path: &Path, json_existed: bool, txt_existed: bool) {
    println!();
    println!("{} {} {}", prefix(), "Done".green(), "- files written:".dimmed());
    print_file_written(json_path, json_existed);
    print_file_written(txt_path, txt_existed);
    println!();
}

/// Fatal error line on stderr
pub fn print_error(message: &str) {
    eprintln!("{} {} {}", prefix(), "✗".red().bold(), message);
}
