//! Generate command - create vocabulary cards for a topic.

use crate::card_store::{AnkiConnectStore, CardStore};
use crate::cli::commands::audio;
use crate::cli::{interactive, preflight, Output};
use crate::config::Settings;
use crate::generation::GeminiGenerator;
use crate::pipeline::{self, GenerateConfig, GenerationReport};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Run the generate command.
pub async fn run_generate(
    topic: &str,
    count: usize,
    deck: Option<&str>,
    source: Option<&str>,
    translation_field: &str,
    with_audio: bool,
    settings: Settings,
) -> Result<()> {
    let operation = if with_audio {
        preflight::Operation::GenerateWithAudio
    } else {
        preflight::Operation::Generate
    };
    preflight::check_keys(operation, &settings)?;

    let store: Arc<dyn CardStore> = Arc::new(AnkiConnectStore::new(&settings.store)?);
    let version = preflight::check_store(store.as_ref()).await?;
    Output::info(&format!("AnkiConnect reachable (version {})", version));

    let deck = interactive::resolve_deck(store.as_ref(), &settings, deck).await?;
    let source_field = source
        .map(str::to_string)
        .or_else(|| settings.audio.source_field.clone())
        .unwrap_or_else(|| "Front".to_string());

    let config = GenerateConfig {
        deck: deck.clone(),
        source_field,
        translation_field: translation_field.to_string(),
        topic: topic.to_string(),
        count,
        language: settings.generation.language.clone(),
    };

    let report = generate_into_deck(store.as_ref(), &settings, &config).await?;
    Output::generation_report(&report);

    if with_audio && report.created > 0 {
        Output::info("Adding audio to the deck...");
        let run_config = interactive::resolve_run_config(
            store.as_ref(),
            &settings,
            Some(&deck),
            Some(&config.source_field),
            None,
            false,
            false,
        )
        .await?;
        let summary = audio::execute_run(store, &settings, &run_config).await?;
        Output::run_summary(&summary);
    }

    Ok(())
}

/// Call the generator and create the cards. Shared with the interactive
/// session.
pub(crate) async fn generate_into_deck(
    store: &dyn CardStore,
    settings: &Settings,
    config: &GenerateConfig,
) -> Result<GenerationReport> {
    let api_key = settings.gemini_api_key().context("Gemini API key not set")?;
    let generator = GeminiGenerator::new(api_key, settings.generation.model.clone())?;

    let spinner = Output::spinner(&format!(
        "Generating {} {} entries about '{}'...",
        config.count, config.language, config.topic
    ));
    let result = pipeline::generate_content(store, &generator, config).await;
    spinner.finish_and_clear();

    Ok(result?)
}
