//! CLI output formatting utilities.

use crate::pipeline::{GenerationReport, RunSummary};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print the result breakdown of an audio run.
    pub fn run_summary(summary: &RunSummary) {
        Self::header("Run Summary");
        println!();
        println!(
            "  {} {} processed",
            style("✓").green(),
            summary.processed
        );
        println!("  {} {} skipped", style("-").dim(), summary.skipped);
        println!("  {} {} failed", style("✗").red(), summary.failed());

        if !summary.failures.is_empty() {
            println!();
            for (id, reason) in &summary.failures {
                println!(
                    "  {} note {}: {}",
                    style("✗").red(),
                    style(id.to_string()).bold(),
                    reason
                );
            }
        }
    }

    /// Print the result breakdown of a generation run.
    pub fn generation_report(report: &GenerationReport) {
        println!(
            "  {} {} cards created",
            style("✓").green(),
            report.created
        );
        if report.duplicates > 0 {
            println!(
                "  {} {} duplicates dropped",
                style("-").dim(),
                report.duplicates
            );
        }
        if report.failed > 0 {
            println!("  {} {} failed", style("✗").red(), report.failed);
        }
    }

    /// Create a progress bar.
    pub fn progress_bar(len: u64, msg: &str) -> ProgressBar {
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message(msg.to_string());
        pb
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}
