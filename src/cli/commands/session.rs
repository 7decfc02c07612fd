//! Interactive session - menu-driven workflow when no subcommand is given.

use crate::card_store::{AnkiConnectStore, CardStore};
use crate::cli::commands::{audio, generate};
use crate::cli::{interactive, preflight, Output};
use crate::config::Settings;
use crate::pipeline::GenerateConfig;
use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use std::sync::Arc;

const MENU_ITEMS: &[&str] = &[
    "Generate vocabulary cards",
    "Add audio to a deck",
    "Generate cards and add audio",
    "Quit",
];

/// Run the interactive session.
pub async fn run_session(settings: Settings) -> Result<()> {
    Output::header("Kartei");
    println!();

    let store: Arc<dyn CardStore> = Arc::new(AnkiConnectStore::new(&settings.store)?);
    let version = preflight::check_store(store.as_ref()).await?;
    Output::info(&format!("AnkiConnect reachable (version {})", version));
    println!();

    loop {
        let choice = Select::new()
            .with_prompt("What would you like to do?")
            .items(MENU_ITEMS)
            .default(0)
            .interact()?;

        let result = match choice {
            0 => session_generate(store.as_ref(), &settings, false).await,
            1 => session_audio(Arc::clone(&store), &settings).await,
            2 => {
                session_generate(store.as_ref(), &settings, true).await?;
                session_audio(Arc::clone(&store), &settings).await
            }
            _ => break,
        };

        // One failed action should not end the session.
        if let Err(e) = result {
            Output::error(&format!("{:#}", e));
        }

        println!();
        let again = Confirm::new()
            .with_prompt("Anything else?")
            .default(true)
            .interact()?;
        if !again {
            break;
        }
        println!();
    }

    Output::info("Bye!");
    Ok(())
}

/// Prompt for topic and count, then generate into a deck.
async fn session_generate(
    store: &dyn CardStore,
    settings: &Settings,
    quiet: bool,
) -> Result<()> {
    preflight::check_keys(preflight::Operation::Generate, settings)?;

    let topic: String = Input::new()
        .with_prompt("Topic (e.g. food, travel)")
        .interact_text()?;
    let count: usize = Input::new()
        .with_prompt("Number of entries")
        .default(10)
        .interact_text()?;

    let deck = interactive::resolve_deck(store, settings, None).await?;
    let source_field = settings
        .audio
        .source_field
        .clone()
        .unwrap_or_else(|| "Front".to_string());

    let config = GenerateConfig {
        deck,
        source_field,
        translation_field: "Back".to_string(),
        topic,
        count,
        language: settings.generation.language.clone(),
    };

    let report = generate::generate_into_deck(store, settings, &config).await?;
    if quiet {
        Output::info(&format!("Created {} cards", report.created));
    } else {
        Output::generation_report(&report);
    }

    Ok(())
}

/// Resolve an audio run interactively and execute it.
async fn session_audio(store: Arc<dyn CardStore>, settings: &Settings) -> Result<()> {
    preflight::check_keys(preflight::Operation::Audio, settings)?;

    let config = interactive::resolve_run_config(
        store.as_ref(),
        settings,
        None,
        None,
        None,
        false,
        false,
    )
    .await?;

    let summary = audio::execute_run(store, settings, &config).await?;
    Output::run_summary(&summary);

    Ok(())
}
