//! Anki import-file builder.
//!
//! Writes a tab-separated deck file (`#separator:tab`, `#html:true`) from a
//! frequency-report JSON or from plain word lists, ready for Anki's importer
//! and a later audio run.

use crate::error::{KarteiError, Result};
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::path::Path;

/// Front-side format of a generated card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardFormat {
    /// `word [sound:...]`
    #[default]
    Simple,
    /// `<strong>word</strong> [sound:...]`
    Emphasized,
    /// `<strong>Was bedeutet 'word'?</strong> [sound:...]`
    Question,
}

impl std::str::FromStr for CardFormat {
    type Err = KarteiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(CardFormat::Simple),
            "emphasized" => Ok(CardFormat::Emphasized),
            "question" => Ok(CardFormat::Question),
            other => Err(KarteiError::InvalidInput(format!(
                "unknown card format '{}' (expected simple, emphasized, or question)",
                other
            ))),
        }
    }
}

/// Top `n` words of a frequency-report JSON file (word -> count map),
/// most frequent first.
pub fn words_from_frequency_json(path: &Path, top_n: usize) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let map: HashMap<String, usize> = serde_json::from_str(&content)?;

    let mut pairs: Vec<(String, usize)> = map.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pairs.truncate(top_n);

    Ok(pairs.into_iter().map(|(word, _)| word).collect())
}

/// Words from one or more list files: one word per line, `#` comments and
/// blank lines skipped, lowercased, de-duplicated preserving first-seen
/// order across files.
pub fn words_from_lists(paths: &[impl AsRef<Path>]) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut words = Vec::new();

    for path in paths {
        let content = std::fs::read_to_string(path.as_ref())?;
        for line in content.lines() {
            let word = line.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            let word = word.to_lowercase();
            if seen.insert(word.clone()) {
                words.push(word);
            }
        }
    }

    Ok(words)
}

/// Render a complete import file for `words`.
pub fn render_deck_file(words: &[String], format: CardFormat) -> String {
    let mut out = String::new();
    out.push_str("#separator:tab\n");
    out.push_str("#html:true\n");

    let millis = chrono::Utc::now().timestamp_millis();
    for (i, word) in words.iter().enumerate() {
        // Offset keeps media filenames unique within one build.
        out.push_str(&card_row(word, format, millis + i as i64));
        out.push('\n');
    }

    out
}

/// Write the import file, returning the number of card rows.
pub fn write_deck_file(words: &[String], output: &Path, format: CardFormat) -> Result<usize> {
    if words.is_empty() {
        return Err(KarteiError::InvalidInput(
            "no words to build a deck from".to_string(),
        ));
    }
    std::fs::write(output, render_deck_file(words, format))?;
    Ok(words.len())
}

/// One `front \t back` row. The front carries a timestamped sound tag so an
/// audio run can fill the media in later; the back is left for translations.
fn card_row(word: &str, format: CardFormat, millis: i64) -> String {
    let audio = format!("{}_{}.mp3", word, millis);
    let mut row = String::new();

    match format {
        CardFormat::Simple => {
            let _ = write!(row, "{} [sound:{}]\t", word, audio);
        }
        CardFormat::Emphasized => {
            let _ = write!(row, "<strong>{}</strong> [sound:{}]\t", word, audio);
        }
        CardFormat::Question => {
            let _ = write!(
                row,
                "<strong>Was bedeutet '{}'?</strong> [sound:{}]\t",
                word, audio
            );
        }
    }

    row
}
