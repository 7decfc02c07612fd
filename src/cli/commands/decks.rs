//! Decks command - list the decks in the store.

use crate::card_store::{AnkiConnectStore, CardStore};
use crate::cli::{preflight, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the decks command.
pub async fn run_decks(settings: Settings) -> Result<()> {
    let store = AnkiConnectStore::new(&settings.store)?;
    preflight::check_store(&store).await?;

    let decks = store.deck_names().await?;
    if decks.is_empty() {
        Output::info("The store has no decks.");
        return Ok(());
    }

    Output::header(&format!("Decks ({})", decks.len()));
    println!();
    for deck in &decks {
        Output::list_item(deck);
    }

    Ok(())
}
