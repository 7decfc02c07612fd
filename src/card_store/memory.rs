//! In-memory card store implementation.
//!
//! Useful for testing and dry runs without a running store.

use super::{CardStore, NoteId};
use crate::error::{KarteiError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// In-memory card store.
pub struct MemoryCardStore {
    /// Deck name -> note ids, in insertion order.
    decks: RwLock<HashMap<String, Vec<NoteId>>>,
    notes: RwLock<HashMap<NoteId, HashMap<String, String>>>,
    media: RwLock<HashMap<String, Vec<u8>>>,
    models: Vec<String>,
    next_id: AtomicU64,
}

impl MemoryCardStore {
    /// Create a new in-memory card store.
    pub fn new() -> Self {
        Self {
            decks: RwLock::new(HashMap::new()),
            notes: RwLock::new(HashMap::new()),
            media: RwLock::new(HashMap::new()),
            models: vec!["Basic".to_string()],
            next_id: AtomicU64::new(1),
        }
    }

    /// Insert a note directly, bypassing deck/model checks. Test seam.
    pub fn insert_note(&self, deck: &str, fields: HashMap<String, String>) -> NoteId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.decks
            .write()
            .unwrap()
            .entry(deck.to_string())
            .or_default()
            .push(id);
        self.notes.write().unwrap().insert(id, fields);
        id
    }

    /// Number of stored media assets.
    pub fn media_count(&self) -> usize {
        self.media.read().unwrap().len()
    }

    /// Retrieve a stored media asset by filename.
    pub fn media(&self, filename: &str) -> Option<Vec<u8>> {
        self.media.read().unwrap().get(filename).cloned()
    }
}

impl Default for MemoryCardStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CardStore for MemoryCardStore {
    async fn version(&self) -> Result<u32> {
        Ok(6)
    }

    async fn deck_names(&self) -> Result<Vec<String>> {
        let decks = self.decks.read().unwrap();
        let mut names: Vec<String> = decks.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn field_names(&self, deck: &str) -> Result<Vec<String>> {
        let ids = self.note_ids(deck).await?;
        let Some(first) = ids.first() else {
            return Ok(Vec::new());
        };

        let notes = self.notes.read().unwrap();
        let mut fields: Vec<String> = notes
            .get(first)
            .map(|f| f.keys().cloned().collect())
            .unwrap_or_default();
        fields.sort();
        Ok(fields)
    }

    async fn note_ids(&self, deck: &str) -> Result<Vec<NoteId>> {
        let decks = self.decks.read().unwrap();
        Ok(decks.get(deck).cloned().unwrap_or_default())
    }

    async fn note_fields(&self, id: NoteId) -> Result<HashMap<String, String>> {
        let notes = self.notes.read().unwrap();
        notes
            .get(&id)
            .cloned()
            .ok_or_else(|| KarteiError::Store(format!("note {} not found", id)))
    }

    async fn update_note_field(&self, id: NoteId, field: &str, value: &str) -> Result<()> {
        let mut notes = self.notes.write().unwrap();
        let fields = notes
            .get_mut(&id)
            .ok_or_else(|| KarteiError::Store(format!("note {} not found", id)))?;
        fields.insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn store_media(&self, filename: &str, data: &[u8]) -> Result<String> {
        self.media
            .write()
            .unwrap()
            .insert(filename.to_string(), data.to_vec());
        Ok(filename.to_string())
    }

    async fn add_note(
        &self,
        deck: &str,
        _model: &str,
        fields: HashMap<String, String>,
        _tags: &[String],
    ) -> Result<NoteId> {
        if !self.decks.read().unwrap().contains_key(deck) {
            return Err(KarteiError::Store(format!("deck {} not found", deck)));
        }
        Ok(self.insert_note(deck, fields))
    }

    async fn create_deck(&self, name: &str) -> Result<()> {
        self.decks
            .write()
            .unwrap()
            .entry(name.to_string())
            .or_default();
        Ok(())
    }

    async fn model_names(&self) -> Result<Vec<String>> {
        Ok(self.models.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(front: &str, back: &str) -> HashMap<String, String> {
        HashMap::from([
            ("Front".to_string(), front.to_string()),
            ("Back".to_string(), back.to_string()),
        ])
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryCardStore::new();
        let id = store.insert_note("Deutsch", fields("das Haus", "the house"));

        assert_eq!(store.note_ids("Deutsch").await.unwrap(), vec![id]);
        assert_eq!(
            store.note_fields(id).await.unwrap()["Front"],
            "das Haus"
        );

        store
            .update_note_field(id, "Front", "das Haus [sound:1.mp3]")
            .await
            .unwrap();
        assert_eq!(
            store.note_fields(id).await.unwrap()["Front"],
            "das Haus [sound:1.mp3]"
        );
        // untouched field survives a single-field update
        assert_eq!(store.note_fields(id).await.unwrap()["Back"], "the house");
    }

    #[tokio::test]
    async fn test_note_ids_keep_insertion_order() {
        let store = MemoryCardStore::new();
        let a = store.insert_note("Deck", fields("a", ""));
        let b = store.insert_note("Deck", fields("b", ""));
        let c = store.insert_note("Deck", fields("c", ""));

        assert_eq!(store.note_ids("Deck").await.unwrap(), vec![a, b, c]);
    }

    #[tokio::test]
    async fn test_store_media() {
        let store = MemoryCardStore::new();
        let reference = store.store_media("42.mp3", b"mp3-bytes").await.unwrap();
        assert_eq!(reference, "42.mp3");
        assert_eq!(store.media("42.mp3").unwrap(), b"mp3-bytes");
    }

    #[tokio::test]
    async fn test_add_note_requires_deck() {
        let store = MemoryCardStore::new();
        let result = store
            .add_note("Missing", "Basic", fields("x", "y"), &[])
            .await;
        assert!(result.is_err());

        store.create_deck("Missing").await.unwrap();
        let id = store
            .add_note("Missing", "Basic", fields("x", "y"), &[])
            .await
            .unwrap();
        assert_eq!(store.note_ids("Missing").await.unwrap(), vec![id]);
    }
}
