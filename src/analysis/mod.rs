//! Word analyzer for deck export files.
//!
//! Parses tab-separated deck exports, tokenizes the first column, counts
//! word frequencies, and writes report files (ranked listing, JSON map,
//! text bar chart).

pub mod deck_file;
pub mod stopwords;

use crate::error::Result;
use crate::text;
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::path::Path;

/// Minimum token length kept by the analyzer.
const MIN_WORD_LEN: usize = 2;

/// Cell count of a full frequency bar.
const BAR_WIDTH: usize = 50;

/// One counted word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Frequency analysis result: counts sorted by descending frequency, ties
/// broken alphabetically.
#[derive(Debug)]
pub struct FrequencyReport {
    counts: Vec<WordCount>,
    total: usize,
}

impl FrequencyReport {
    /// Build a report from a stream of tokens.
    pub fn from_words<I>(words: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut map: HashMap<String, usize> = HashMap::new();
        let mut total = 0;
        for word in words {
            *map.entry(word).or_insert(0) += 1;
            total += 1;
        }

        let mut counts: Vec<WordCount> = map
            .into_iter()
            .map(|(word, count)| WordCount { word, count })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));

        Self { counts, total }
    }

    /// Total word occurrences.
    pub fn total_occurrences(&self) -> usize {
        self.total
    }

    /// Number of distinct words.
    pub fn unique_words(&self) -> usize {
        self.counts.len()
    }

    /// Mean occurrences per distinct word.
    pub fn mean_frequency(&self) -> f64 {
        if self.counts.is_empty() {
            0.0
        } else {
            self.total as f64 / self.counts.len() as f64
        }
    }

    /// The most frequent word, if any.
    pub fn most_frequent(&self) -> Option<&WordCount> {
        self.counts.first()
    }

    /// Number of words occurring exactly once.
    pub fn hapax_count(&self) -> usize {
        self.counts.iter().filter(|w| w.count == 1).count()
    }

    /// The `n` most frequent words.
    pub fn top(&self, n: usize) -> &[WordCount] {
        &self.counts[..n.min(self.counts.len())]
    }

    /// All counts, most frequent first.
    pub fn iter(&self) -> impl Iterator<Item = &WordCount> {
        self.counts.iter()
    }
}

/// Tokenizer and counter over deck export files.
pub struct Analyzer {
    stopwords: HashSet<String>,
}

impl Analyzer {
    /// Analyzer with the built-in German stopword list.
    pub fn new() -> Self {
        Self {
            stopwords: stopwords::german(),
        }
    }

    /// Analyzer with a custom stopword set.
    pub fn with_stopwords(stopwords: HashSet<String>) -> Self {
        Self { stopwords }
    }

    /// Analyzer that keeps every token.
    pub fn without_stopwords() -> Self {
        Self {
            stopwords: HashSet::new(),
        }
    }

    /// Analyze a tab-separated deck export file.
    pub fn analyze_file(&self, path: &Path) -> Result<FrequencyReport> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.analyze_lines(content.lines()))
    }

    /// Analyze export lines: `#key:value` headers and blank lines are
    /// skipped, and only the first tab column of each row is tokenized.
    pub fn analyze_lines<'a>(&self, lines: impl Iterator<Item = &'a str>) -> FrequencyReport {
        let words = lines
            .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
            .flat_map(|line| {
                let front = line.split('\t').next().unwrap_or(line);
                self.tokenize(front)
            });

        FrequencyReport::from_words(words)
    }

    /// Split field text into counted tokens: cleaned and lowercased, then
    /// whitespace-split, dropping short tokens and stopwords.
    pub fn tokenize(&self, field_text: &str) -> Vec<String> {
        text::normalize_for_tokens(field_text)
            .split_whitespace()
            .filter(|word| word.chars().count() >= MIN_WORD_LEN)
            .filter(|word| !self.stopwords.contains(*word))
            .map(str::to_string)
            .collect()
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the ranked plain-text listing.
pub fn render_text_report(report: &FrequencyReport) -> String {
    let mut out = String::new();
    out.push_str("Word Frequency Analysis\n");
    out.push_str("========================================\n\n");
    let _ = writeln!(out, "Total word occurrences: {}", report.total_occurrences());
    let _ = writeln!(out, "Unique words: {}", report.unique_words());
    let _ = writeln!(out, "Mean frequency: {:.2}", report.mean_frequency());
    let _ = writeln!(out, "Words appearing only once: {}", report.hapax_count());
    out.push_str("\nWord Frequency (Most to Least Used):\n");
    out.push_str("----------------------------------------\n");

    for (rank, wc) in report.iter().enumerate() {
        let _ = writeln!(out, "{:4}. {:20} : {:4}", rank + 1, wc.word, wc.count);
    }

    out
}

/// Render the word -> count JSON map.
pub fn render_json(report: &FrequencyReport) -> Result<String> {
    let map: HashMap<&str, usize> = report
        .iter()
        .map(|wc| (wc.word.as_str(), wc.count))
        .collect();
    Ok(serde_json::to_string_pretty(&map)?)
}

/// Render a text bar chart of the `top_n` most frequent words.
///
/// Bars are [`BAR_WIDTH`] cells, scaled to the highest count.
pub fn render_bar_chart(report: &FrequencyReport, top_n: usize) -> String {
    let top = report.top(top_n);
    let Some(max) = top.first().map(|wc| wc.count) else {
        return "No words to chart.\n".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "{:15} | Frequency Bar | Count", "Word");
    let _ = writeln!(out, "{}", "-".repeat(15 + BAR_WIDTH + 12));

    for wc in top {
        let filled = (wc.count * BAR_WIDTH).div_ceil(max).min(BAR_WIDTH);
        let bar: String = "█".repeat(filled) + &"░".repeat(BAR_WIDTH - filled);
        let _ = writeln!(out, "{:15} | {} | {}", wc.word, bar, wc.count);
    }

    out
}

/// Write all three report files into `output_dir`, returning their paths.
pub fn write_reports(
    report: &FrequencyReport,
    output_dir: &Path,
    top_n: usize,
) -> Result<Vec<std::path::PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    let txt_path = output_dir.join("word_frequency.txt");
    std::fs::write(&txt_path, render_text_report(report))?;

    let json_path = output_dir.join("word_frequency.json");
    std::fs::write(&json_path, render_json(report)?)?;

    let chart_path = output_dir.join("word_frequency_chart.txt");
    std::fs::write(&chart_path, render_bar_chart(report, top_n))?;

    Ok(vec![txt_path, json_path, chart_path])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_stopwords_and_short_tokens() {
        let analyzer = Analyzer::new();
        let tokens = analyzer.tokenize("Der große Hund und die Katze a");
        assert_eq!(tokens, vec!["große", "hund", "katze"]);
    }

    #[test]
    fn test_tokenize_without_stopwords_keeps_everything_long_enough() {
        let analyzer = Analyzer::without_stopwords();
        let tokens = analyzer.tokenize("Der Hund");
        assert_eq!(tokens, vec!["der", "hund"]);
    }

    #[test]
    fn test_tokenize_keeps_umlauts() {
        let analyzer = Analyzer::new();
        let tokens = analyzer.tokenize("Über die Straße!");
        assert_eq!(tokens, vec!["über", "straße"]);
    }

    #[test]
    fn test_analyze_lines_skips_headers_and_uses_first_column() {
        let analyzer = Analyzer::without_stopwords();
        let export = "#separator:tab\n\
                      #html:true\n\
                      \n\
                      das Haus [sound:1.mp3]\tthe house\n\
                      <b>das Haus</b>\tthe house again\n\
                      die Katze\tthe cat\n";

        let report = analyzer.analyze_lines(export.lines());
        assert_eq!(report.total_occurrences(), 6);
        assert_eq!(report.unique_words(), 4);
        assert_eq!(report.most_frequent().unwrap().word, "das");
    }

    #[test]
    fn test_report_stats() {
        let report = FrequencyReport::from_words(
            ["haus", "haus", "haus", "katze", "hund"]
                .iter()
                .map(|s| s.to_string()),
        );

        assert_eq!(report.total_occurrences(), 5);
        assert_eq!(report.unique_words(), 3);
        assert!((report.mean_frequency() - 5.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.hapax_count(), 2);
        assert_eq!(report.most_frequent().unwrap().word, "haus");
        // ties sorted alphabetically
        assert_eq!(report.top(3)[1].word, "hund");
        assert_eq!(report.top(3)[2].word, "katze");
    }

    #[test]
    fn test_bar_chart_scales_to_max() {
        let report = FrequencyReport::from_words(
            std::iter::repeat("viel".to_string())
                .take(4)
                .chain(std::iter::once("wenig".to_string())),
        );

        let chart = render_bar_chart(&report, 10);
        let lines: Vec<&str> = chart.lines().collect();
        // top word gets a full bar
        assert!(lines[2].contains(&"█".repeat(50)));
        assert!(lines[3].contains('░'));
        assert!(chart.contains("viel"));
        assert!(chart.contains("wenig"));
    }

    #[test]
    fn test_bar_chart_empty_report() {
        let report = FrequencyReport::from_words(std::iter::empty());
        assert_eq!(render_bar_chart(&report, 10), "No words to chart.\n");
    }

    #[test]
    fn test_write_reports_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let export_path = dir.path().join("deck.txt");
        std::fs::write(&export_path, "#separator:tab\nHaus\tthe house\nHaus\tagain\n").unwrap();

        let analyzer = Analyzer::new();
        let report = analyzer.analyze_file(&export_path).unwrap();
        let out_dir = dir.path().join("out");
        let paths = write_reports(&report, &out_dir, 10).unwrap();
        assert_eq!(paths.len(), 3);

        let json: HashMap<String, usize> =
            serde_json::from_str(&std::fs::read_to_string(&paths[1]).unwrap()).unwrap();
        assert_eq!(json["haus"], 2);

        let listing = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(listing.contains("Unique words: 1"));
    }
}
