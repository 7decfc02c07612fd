//! Interactive configuration gathering.
//!
//! Resolution order for every value: command-line flag, then environment,
//! then config file, then a prompt. The result is one immutable `RunConfig`
//! handed to the pipeline; nothing here is consulted again mid-run.

use crate::card_store::CardStore;
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::{RunConfig, WritePolicy};
use anyhow::{bail, Result};
use dialoguer::{Input, Select};

/// Resolve the deck to work on.
///
/// A flag or configured default wins; otherwise the store's decks are
/// offered as a selection list.
pub async fn resolve_deck(
    store: &dyn CardStore,
    settings: &Settings,
    flag: Option<&str>,
) -> Result<String> {
    if let Some(deck) = flag {
        return Ok(deck.to_string());
    }
    if let Some(deck) = &settings.audio.deck {
        Output::info(&format!("Using deck from config: {}", deck));
        return Ok(deck.clone());
    }

    let decks = store.deck_names().await?;
    if decks.is_empty() {
        bail!("the store has no decks");
    }

    let idx = Select::new()
        .with_prompt("Select a deck")
        .items(&decks)
        .default(0)
        .interact()?;

    Ok(decks[idx].clone())
}

/// Resolve the source and destination fields for a deck.
pub async fn resolve_fields(
    store: &dyn CardStore,
    settings: &Settings,
    deck: &str,
    source_flag: Option<&str>,
    dest_flag: Option<&str>,
) -> Result<(String, String)> {
    let fields = store.field_names(deck).await?;

    let source = match source_flag {
        Some(field) => field.to_string(),
        None => match &settings.audio.source_field {
            Some(field) => field.clone(),
            None => select_field("Field containing text to read", &fields)?,
        },
    };

    let dest = match dest_flag {
        Some(field) => field.to_string(),
        None => match &settings.audio.dest_field {
            Some(field) => field.clone(),
            None => select_field("Field the audio should be added to", &fields)?,
        },
    };

    if !fields.is_empty() {
        for field in [&source, &dest] {
            if !fields.contains(field) {
                bail!("deck '{}' has no field '{}'", deck, field);
            }
        }
    }

    Ok((source, dest))
}

/// Pick a field from a list, or type one if the deck had no notes to sample.
fn select_field(prompt: &str, fields: &[String]) -> Result<String> {
    if fields.is_empty() {
        let field: String = Input::new().with_prompt(prompt).interact_text()?;
        return Ok(field);
    }

    let idx = Select::new()
        .with_prompt(prompt)
        .items(fields)
        .default(0)
        .interact()?;
    Ok(fields[idx].clone())
}

/// Resolve the write policy from flags, defaulting per the field pair.
pub fn resolve_policy(
    append: bool,
    replace: bool,
    source_field: &str,
    dest_field: &str,
) -> WritePolicy {
    if append {
        WritePolicy::Append
    } else if replace {
        WritePolicy::Replace
    } else {
        WritePolicy::default_for(source_field, dest_field)
    }
}

/// The ElevenLabs voice id, prompting when neither environment nor config
/// provides one.
pub fn resolve_voice_id(settings: &Settings) -> Result<String> {
    if let Some(voice) = settings.voice_id() {
        return Ok(voice);
    }

    let voice: String = Input::new()
        .with_prompt("ElevenLabs voice id")
        .interact_text()?;
    if voice.trim().is_empty() {
        bail!("a voice id is required for audio runs");
    }
    Ok(voice.trim().to_string())
}

/// Assemble the full audio run configuration.
pub async fn resolve_run_config(
    store: &dyn CardStore,
    settings: &Settings,
    deck_flag: Option<&str>,
    source_flag: Option<&str>,
    dest_flag: Option<&str>,
    append: bool,
    replace: bool,
) -> Result<RunConfig> {
    let deck = resolve_deck(store, settings, deck_flag).await?;
    let (source_field, dest_field) =
        resolve_fields(store, settings, &deck, source_flag, dest_flag).await?;
    let policy = resolve_policy(append, replace, &source_field, &dest_field);
    let voice_id = resolve_voice_id(settings)?;

    let config = RunConfig {
        deck,
        source_field,
        dest_field,
        policy,
        language_code: settings.speech.language_code.clone(),
        voice_id,
        pause_ms: settings.audio.pause_ms,
    };

    Output::kv("Deck", &config.deck);
    Output::kv("Source field", &config.source_field);
    Output::kv("Audio field", &config.dest_field);
    Output::kv(
        "Policy",
        match config.policy {
            WritePolicy::Append => "append",
            WritePolicy::Replace => "replace",
        },
    );
    Output::kv("Language", &config.language_code);

    Ok(config)
}
