//! Card store abstraction for Kartei.
//!
//! Provides a trait-based interface over the external flashcard store so the
//! pipeline can be driven against AnkiConnect or an in-memory store in tests.

mod anki_connect;
mod memory;

pub use anki_connect::AnkiConnectStore;
pub use memory::MemoryCardStore;

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Store-assigned note identifier. Opaque to Kartei; never derived locally.
pub type NoteId = u64;

/// Trait for card store implementations.
///
/// Field maps are flat `name -> value` mappings; wire-level detail such as
/// field ordering objects stays inside the implementation.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Protocol version of the store endpoint. Used as a reachability probe.
    async fn version(&self) -> Result<u32>;

    /// Names of all decks in the store.
    async fn deck_names(&self) -> Result<Vec<String>>;

    /// Field names of the notes in a deck, in the order the store defines.
    ///
    /// Empty when the deck has no notes to sample from.
    async fn field_names(&self, deck: &str) -> Result<Vec<String>>;

    /// Ids of all notes in a deck, in store order.
    async fn note_ids(&self, deck: &str) -> Result<Vec<NoteId>>;

    /// Current field values of a note.
    async fn note_fields(&self, id: NoteId) -> Result<HashMap<String, String>>;

    /// Overwrite a single field of a note.
    async fn update_note_field(&self, id: NoteId, field: &str, value: &str) -> Result<()>;

    /// Store a media asset, returning the store-relative reference to embed
    /// in field values.
    async fn store_media(&self, filename: &str, data: &[u8]) -> Result<String>;

    /// Create a new note, returning its store-assigned id.
    async fn add_note(
        &self,
        deck: &str,
        model: &str,
        fields: HashMap<String, String>,
        tags: &[String],
    ) -> Result<NoteId>;

    /// Create a deck. A no-op if the deck already exists.
    async fn create_deck(&self, name: &str) -> Result<()>;

    /// Names of all note models known to the store.
    async fn model_names(&self) -> Result<Vec<String>>;
}
