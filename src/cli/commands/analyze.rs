//! Analyze command - word frequency analysis of a deck export file.

use crate::analysis::{self, stopwords, Analyzer};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::{bail, Result};
use std::path::Path;

/// Run the analyze command.
pub async fn run_analyze(
    input: &str,
    top_n: Option<usize>,
    output_dir: Option<&str>,
    stopword_file: Option<&str>,
    no_stopwords: bool,
    settings: Settings,
) -> Result<()> {
    let input_path = Path::new(input);
    if !input_path.exists() {
        bail!("input file '{}' not found", input);
    }

    let analyzer = if no_stopwords {
        Analyzer::without_stopwords()
    } else if let Some(file) = stopword_file {
        Analyzer::with_stopwords(stopwords::load_from_file(Path::new(file))?)
    } else {
        Analyzer::new()
    };

    Output::info(&format!("Analyzing {}", input));
    let report = analyzer.analyze_file(input_path)?;

    if report.unique_words() == 0 {
        Output::warning("No countable words found in the export.");
        return Ok(());
    }

    let top_n = top_n.unwrap_or(settings.analysis.top_n);

    Output::header("Word Frequency Summary");
    println!();
    Output::kv(
        "Total occurrences",
        &report.total_occurrences().to_string(),
    );
    Output::kv("Unique words", &report.unique_words().to_string());
    Output::kv("Mean frequency", &format!("{:.2}", report.mean_frequency()));
    Output::kv("Hapax legomena", &report.hapax_count().to_string());
    if let Some(top) = report.most_frequent() {
        Output::kv(
            "Most frequent",
            &format!("'{}' ({} times)", top.word, top.count),
        );
    }

    println!();
    print!("{}", analysis::render_bar_chart(&report, top_n));
    println!();

    let out_dir = output_dir
        .map(|d| crate::config::Settings::expand_path(d))
        .unwrap_or_else(|| settings.analysis_output_dir());
    let paths = analysis::write_reports(&report, &out_dir, top_n)?;

    for path in &paths {
        Output::success(&format!("Wrote {}", path.display()));
    }

    Ok(())
}
