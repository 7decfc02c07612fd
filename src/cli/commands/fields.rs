//! Fields command - list the fields of a deck.

use crate::card_store::{AnkiConnectStore, CardStore};
use crate::cli::{preflight, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the fields command.
pub async fn run_fields(deck: &str, settings: Settings) -> Result<()> {
    let store = AnkiConnectStore::new(&settings.store)?;
    preflight::check_store(&store).await?;

    let fields = store.field_names(deck).await?;
    if fields.is_empty() {
        Output::info(&format!(
            "Deck '{}' has no notes to read field names from.",
            deck
        ));
        return Ok(());
    }

    Output::header(&format!("Fields of '{}'", deck));
    println!();
    for field in &fields {
        Output::list_item(field);
    }

    Ok(())
}
