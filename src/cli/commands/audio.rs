//! Audio command - attach synthesized audio to a deck's cards.

use crate::card_store::{AnkiConnectStore, CardStore};
use crate::cli::{interactive, preflight, Output};
use crate::config::Settings;
use crate::pipeline::{Pipeline, RunConfig, RunSummary};
use crate::speech::ElevenLabsSynthesizer;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Run the audio command.
#[allow(clippy::too_many_arguments)]
pub async fn run_audio(
    deck: Option<&str>,
    source: Option<&str>,
    dest: Option<&str>,
    append: bool,
    replace: bool,
    settings: Settings,
) -> Result<()> {
    preflight::check_keys(preflight::Operation::Audio, &settings)?;

    let store: Arc<dyn CardStore> = Arc::new(AnkiConnectStore::new(&settings.store)?);
    let version = preflight::check_store(store.as_ref()).await?;
    Output::info(&format!("AnkiConnect reachable (version {})", version));

    let config = interactive::resolve_run_config(
        store.as_ref(),
        &settings,
        deck,
        source,
        dest,
        append,
        replace,
    )
    .await?;

    let summary = execute_run(store, &settings, &config).await?;
    Output::run_summary(&summary);

    Ok(())
}

/// Drive the pipeline over all notes of the configured deck with a progress
/// bar. Shared with the interactive session and `generate --with-audio`.
pub(crate) async fn execute_run(
    store: Arc<dyn CardStore>,
    settings: &Settings,
    config: &RunConfig,
) -> Result<RunSummary> {
    let api_key = settings
        .elevenlabs_api_key()
        .context("ElevenLabs API key not set")?;
    let synthesizer = Arc::new(ElevenLabsSynthesizer::new(api_key)?);

    let note_ids = store.note_ids(&config.deck).await?;
    if note_ids.is_empty() {
        Output::warning(&format!("Deck '{}' has no notes", config.deck));
        return Ok(RunSummary::default());
    }
    Output::info(&format!("Found {} notes", note_ids.len()));

    let pipeline = Pipeline::new(store, synthesizer);
    let bar = Output::progress_bar(note_ids.len() as u64, "Processing cards");

    let summary = pipeline
        .run(&note_ids, config, |_, _| bar.inc(1))
        .await?;
    bar.finish_and_clear();

    Ok(summary)
}
