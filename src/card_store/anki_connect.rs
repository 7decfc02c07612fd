//! AnkiConnect card store implementation.
//!
//! Speaks the AnkiConnect JSON protocol: every call is a POST of
//! `{action, version: 6, params}` to a loopback endpoint, every response a
//! `{result, error}` envelope. Envelope decoding happens here; nothing
//! untyped leaves this module.

use super::{CardStore, NoteId};
use crate::config::StoreSettings;
use crate::error::{KarteiError, Result};
use async_trait::async_trait;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Protocol version sent with every request.
const API_VERSION: u32 = 6;

/// AnkiConnect-backed card store.
pub struct AnkiConnectStore {
    client: reqwest::Client,
    endpoint: String,
}

/// Response envelope shared by all AnkiConnect actions.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: Option<T>,
    error: Option<String>,
}

/// Wire shape of a single field in a `notesInfo` response.
#[derive(Debug, Deserialize)]
struct WireField {
    value: String,
    order: u32,
}

/// Wire shape of a note in a `notesInfo` response. Only the parts Kartei
/// reads; the rest of the payload is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireNote {
    #[allow(dead_code)]
    note_id: NoteId,
    fields: HashMap<String, WireField>,
}

impl AnkiConnectStore {
    /// Create a store client from settings.
    pub fn new(settings: &StoreSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
        })
    }

    /// Issue one AnkiConnect action and decode its envelope.
    ///
    /// Transport failures map to `Setup` (the endpoint is unreachable, which
    /// aborts a run before any note is touched); an `error` string in the
    /// envelope maps to `Store`.
    async fn call<T: DeserializeOwned>(
        &self,
        action: &str,
        params: Option<serde_json::Value>,
    ) -> Result<Option<T>> {
        let mut body = serde_json::Map::new();
        body.insert("action".into(), json!(action));
        body.insert("version".into(), json!(API_VERSION));
        if let Some(params) = params {
            body.insert("params".into(), params);
        }

        debug!("AnkiConnect action: {}", action);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    KarteiError::Setup(format!(
                        "Cannot reach AnkiConnect at {}. Is Anki running with the \
                         AnkiConnect add-on installed?",
                        self.endpoint
                    ))
                } else {
                    KarteiError::Http(e)
                }
            })?;

        let envelope: Envelope<T> = response.json().await?;

        if let Some(error) = envelope.error {
            return Err(KarteiError::Store(format!("{}: {}", action, error)));
        }

        Ok(envelope.result)
    }

    /// Like `call`, but the action must return a result.
    async fn call_expect<T: DeserializeOwned>(
        &self,
        action: &str,
        params: Option<serde_json::Value>,
    ) -> Result<T> {
        self.call(action, params).await?.ok_or_else(|| {
            KarteiError::Store(format!("{}: response carried no result", action))
        })
    }

    /// Fetch full note info for a set of ids.
    async fn notes_info(&self, ids: &[NoteId]) -> Result<Vec<WireNote>> {
        self.call_expect("notesInfo", Some(json!({ "notes": ids })))
            .await
    }
}

#[async_trait]
impl CardStore for AnkiConnectStore {
    async fn version(&self) -> Result<u32> {
        self.call_expect("version", None).await
    }

    async fn deck_names(&self) -> Result<Vec<String>> {
        self.call_expect("deckNames", None).await
    }

    async fn field_names(&self, deck: &str) -> Result<Vec<String>> {
        // The store exposes field order per note, so sample one note.
        let ids = self.note_ids(deck).await?;
        let Some(first) = ids.first() else {
            return Ok(Vec::new());
        };

        let notes = self.notes_info(&[*first]).await?;
        let Some(note) = notes.into_iter().next() else {
            return Ok(Vec::new());
        };

        let mut fields: Vec<(String, u32)> = note
            .fields
            .into_iter()
            .map(|(name, field)| (name, field.order))
            .collect();
        fields.sort_by_key(|(_, order)| *order);

        Ok(fields.into_iter().map(|(name, _)| name).collect())
    }

    async fn note_ids(&self, deck: &str) -> Result<Vec<NoteId>> {
        let query = format!("deck:\"{}\"", deck);
        self.call_expect("findNotes", Some(json!({ "query": query })))
            .await
    }

    async fn note_fields(&self, id: NoteId) -> Result<HashMap<String, String>> {
        let notes = self.notes_info(&[id]).await?;
        let note = notes
            .into_iter()
            .next()
            .ok_or_else(|| KarteiError::Store(format!("note {} not found", id)))?;

        Ok(note
            .fields
            .into_iter()
            .map(|(name, field)| (name, field.value))
            .collect())
    }

    async fn update_note_field(&self, id: NoteId, field: &str, value: &str) -> Result<()> {
        let params = json!({
            "note": {
                "id": id,
                "fields": { field: value },
            }
        });
        self.call::<serde_json::Value>("updateNoteFields", Some(params))
            .await?;
        Ok(())
    }

    async fn store_media(&self, filename: &str, data: &[u8]) -> Result<String> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        let stored: String = self
            .call_expect(
                "storeMediaFile",
                Some(json!({ "filename": filename, "data": encoded })),
            )
            .await?;
        Ok(stored)
    }

    async fn add_note(
        &self,
        deck: &str,
        model: &str,
        fields: HashMap<String, String>,
        tags: &[String],
    ) -> Result<NoteId> {
        let params = json!({
            "note": {
                "deckName": deck,
                "modelName": model,
                "fields": fields,
                "tags": tags,
            }
        });
        self.call_expect("addNote", Some(params)).await
    }

    async fn create_deck(&self, name: &str) -> Result<()> {
        self.call::<serde_json::Value>("createDeck", Some(json!({ "deck": name })))
            .await?;
        Ok(())
    }

    async fn model_names(&self) -> Result<Vec<String>> {
        self.call_expect("modelNames", None).await
    }
}
