//! Build-deck command - write an Anki import file from word sources.

use crate::analysis::deck_file::{
    self, words_from_frequency_json, words_from_lists, CardFormat,
};
use crate::cli::Output;
use anyhow::{bail, Result};
use std::path::Path;

/// Run the build-deck command.
pub async fn run_build_deck(
    frequency_json: Option<&str>,
    word_lists: &[String],
    top_n: usize,
    format: &str,
    output: &str,
) -> Result<()> {
    let format: CardFormat = format.parse()?;

    let words = if let Some(json) = frequency_json {
        Output::info(&format!("Taking top {} words from {}", top_n, json));
        words_from_frequency_json(Path::new(json), top_n)?
    } else if !word_lists.is_empty() {
        words_from_lists(word_lists)?
    } else {
        bail!("provide --frequency-json or at least one --word-list");
    };

    Output::info(&format!("Collected {} unique words", words.len()));

    let count = deck_file::write_deck_file(&words, Path::new(output), format)?;
    Output::success(&format!("Wrote {} card rows to {}", count, output));
    Output::info("Import the file into Anki, then run 'kartei audio' to fill in the sound files.");

    Ok(())
}
