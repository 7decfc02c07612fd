//! Augmentation pipeline for Kartei.
//!
//! Drives a batch of notes through the existing-audio check, speech
//! synthesis, and write-back, one note at a time, in the order the store
//! returned them. A single note's failure never aborts the batch; the
//! per-note boundary is [`Pipeline::process_note`].

use crate::card_store::{CardStore, NoteId};
use crate::error::Result;
use crate::generation::{GenerationRequest, Generator, VocabEntry};
use crate::speech::SpeechSynthesizer;
use crate::text;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How many notes are sampled when summarizing existing deck content.
const SUMMARY_SAMPLE_CAP: usize = 50;

/// How many sampled words the summary spells out.
const SUMMARY_DISPLAY_CAP: usize = 20;

/// What to do with the destination field's existing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Keep the existing text and append the audio reference after it.
    Append,
    /// Replace the field content with the audio reference alone.
    Replace,
}

impl WritePolicy {
    /// Default policy for a field pair: when text and audio share a field,
    /// the text must survive, so append; a dedicated audio field is replaced.
    pub fn default_for(source_field: &str, dest_field: &str) -> Self {
        if source_field == dest_field {
            WritePolicy::Append
        } else {
            WritePolicy::Replace
        }
    }
}

/// Immutable configuration for one audio run. Constructed once before the
/// pipeline starts; never mutated during processing.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub deck: String,
    pub source_field: String,
    pub dest_field: String,
    pub policy: WritePolicy,
    pub language_code: String,
    pub voice_id: String,
    /// Pause between synthesized notes, in milliseconds. Zero disables it.
    pub pause_ms: u64,
}

/// Per-note outcome of an audio run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteOutcome {
    /// Audio was synthesized and the note was updated.
    Processed,
    /// The note needed no work (marker present, or nothing to read).
    Skipped,
    /// Synthesis or persistence failed; the note was left untouched.
    Failed(String),
}

/// Aggregate result of one audio run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failures: Vec<(NoteId, String)>,
}

impl RunSummary {
    /// Number of failed notes.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Total notes the run looked at.
    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.failures.len()
    }

    fn record(&mut self, id: NoteId, outcome: NoteOutcome) {
        match outcome {
            NoteOutcome::Processed => self.processed += 1,
            NoteOutcome::Skipped => self.skipped += 1,
            NoteOutcome::Failed(reason) => self.failures.push((id, reason)),
        }
    }
}

/// Aggregate result of one generation run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Notes created in the store.
    pub created: usize,
    /// Entries the store rejected.
    pub failed: usize,
    /// Entries dropped because the deck already had the word.
    pub duplicates: usize,
}

/// Configuration for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub deck: String,
    /// Field the generated word is written to.
    pub source_field: String,
    /// Field the translation is written to.
    pub translation_field: String,
    pub topic: String,
    pub count: usize,
    /// Language wording used in the prompt (e.g. "German").
    pub language: String,
}

/// The augmentation pipeline.
pub struct Pipeline {
    store: Arc<dyn CardStore>,
    speech: Arc<dyn SpeechSynthesizer>,
}

impl Pipeline {
    /// Create a pipeline over a card store and a speech backend.
    pub fn new(store: Arc<dyn CardStore>, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { store, speech }
    }

    /// Run the audio loop over `note_ids`, in the given order.
    ///
    /// `progress` is invoked once per note with its outcome, after the note
    /// has been fully handled. The caller fetches the ids up front so that an
    /// unreachable store fails the run before any note is touched.
    pub async fn run(
        &self,
        note_ids: &[NoteId],
        config: &RunConfig,
        mut progress: impl FnMut(NoteId, &NoteOutcome),
    ) -> Result<RunSummary> {
        info!(
            "Processing {} notes in deck '{}' ({} -> {})",
            note_ids.len(),
            config.deck,
            config.source_field,
            config.dest_field
        );

        let mut summary = RunSummary::default();

        for &id in note_ids {
            let outcome = self.process_note(id, config).await;

            if let NoteOutcome::Failed(reason) = &outcome {
                warn!("Note {} failed: {}", id, reason);
            }

            // Politeness pause, only after notes that reached synthesis.
            let synthesized = !matches!(outcome, NoteOutcome::Skipped);

            progress(id, &outcome);
            summary.record(id, outcome);

            if synthesized && config.pause_ms > 0 {
                tokio::time::sleep(Duration::from_millis(config.pause_ms)).await;
            }
        }

        info!(
            "Run complete: {} processed, {} skipped, {} failed",
            summary.processed,
            summary.skipped,
            summary.failed()
        );

        Ok(summary)
    }

    /// Handle a single note. Errors are converted to a `Failed` outcome here
    /// and never propagate to the batch loop.
    async fn process_note(&self, id: NoteId, config: &RunConfig) -> NoteOutcome {
        let fields = match self.store.note_fields(id).await {
            Ok(fields) => fields,
            Err(e) => return NoteOutcome::Failed(e.to_string()),
        };

        let Some(dest_value) = fields.get(&config.dest_field) else {
            return NoteOutcome::Failed(format!(
                "note has no field '{}'",
                config.dest_field
            ));
        };

        // Idempotence guard: audio already attached.
        if text::has_sound_tag(dest_value) {
            debug!("Note {} already has audio, skipping", id);
            return NoteOutcome::Skipped;
        }

        let source_value = fields
            .get(&config.source_field)
            .map(String::as_str)
            .unwrap_or_default();
        let speech_text = text::clean_for_speech(source_value);
        if speech_text.is_empty() {
            debug!("Note {} has no source text, skipping", id);
            return NoteOutcome::Skipped;
        }

        match self.augment(id, &speech_text, dest_value, config).await {
            Ok(()) => NoteOutcome::Processed,
            Err(e) => NoteOutcome::Failed(e.to_string()),
        }
    }

    /// Synthesize, store, and write back one note. The field write is a
    /// single call issued only after media storage succeeded, so the note is
    /// either fully updated or left untouched.
    async fn augment(
        &self,
        id: NoteId,
        speech_text: &str,
        dest_value: &str,
        config: &RunConfig,
    ) -> Result<()> {
        let audio = self
            .speech
            .synthesize(speech_text, &config.language_code, &config.voice_id)
            .await?;

        let filename = format!("{}.mp3", id);
        let reference = self.store.store_media(&filename, &audio).await?;
        let tag = text::sound_tag(&reference);

        let new_value = match config.policy {
            WritePolicy::Append => {
                let existing = text::strip_sound_tags(dest_value);
                if existing.is_empty() {
                    tag
                } else {
                    format!("{} {}", existing, tag)
                }
            }
            WritePolicy::Replace => tag,
        };

        self.store
            .update_note_field(id, &config.dest_field, &new_value)
            .await?;

        Ok(())
    }

}

/// Generate vocabulary with `generator` and create a note per entry.
///
/// A generation failure is fatal to this phase (nothing is created);
/// per-entry store rejections are counted and the loop continues.
pub async fn generate_content(
    store: &dyn CardStore,
    generator: &dyn Generator,
    config: &GenerateConfig,
) -> Result<GenerationReport> {
    let existing = existing_words(store, config).await?;

    let request = GenerationRequest {
        topic: config.topic.clone(),
        count: config.count,
        language: config.language.clone(),
        existing_summary: summarize_existing(&existing),
    };

    let entries = generator.generate(&request).await?;
    info!("Model produced {} entries", entries.len());

    // Best-effort duplicate filter over the sampled source fields.
    let known: HashSet<String> = existing.iter().map(|w| w.to_lowercase()).collect();

    if !store.deck_names().await?.contains(&config.deck) {
        info!("Deck '{}' not found, creating it", config.deck);
        store.create_deck(&config.deck).await?;
    }

    let models = store.model_names().await?;
    let model = models
        .first()
        .ok_or_else(|| crate::error::KarteiError::Store("store has no note models".to_string()))?
        .clone();

    let mut report = GenerationReport::default();

    for entry in entries {
        if known.contains(&entry.word.to_lowercase()) {
            debug!("Dropping duplicate entry '{}'", entry.word);
            report.duplicates += 1;
            continue;
        }

        let fields = note_fields_for(&entry, config);
        match store.add_note(&config.deck, &model, fields, &tags()).await {
            Ok(id) => {
                debug!("Created note {} for '{}'", id, entry.word);
                report.created += 1;
            }
            Err(e) => {
                warn!("Could not create note for '{}': {}", entry.word, e);
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

/// Cleaned source-field values of up to [`SUMMARY_SAMPLE_CAP`] notes.
async fn existing_words(store: &dyn CardStore, config: &GenerateConfig) -> Result<Vec<String>> {
    if !store.deck_names().await?.contains(&config.deck) {
        return Ok(Vec::new());
    }

    let ids = store.note_ids(&config.deck).await?;
    let mut words = Vec::new();

    for id in ids.into_iter().take(SUMMARY_SAMPLE_CAP) {
        let Ok(fields) = store.note_fields(id).await else {
            continue;
        };
        if let Some(value) = fields.get(&config.source_field) {
            let word = text::clean_for_speech(value);
            if !word.is_empty() {
                words.push(word);
            }
        }
    }

    Ok(words)
}

/// Render the exclusion-list summary the generation prompt carries.
fn summarize_existing(words: &[String]) -> String {
    if words.is_empty() {
        return "No existing content found in deck.".to_string();
    }

    let shown: Vec<&str> = words
        .iter()
        .take(SUMMARY_DISPLAY_CAP)
        .map(String::as_str)
        .collect();
    let mut summary = format!(
        "Deck contains {} sampled words/phrases: {}",
        words.len(),
        shown.join(", ")
    );
    if words.len() > SUMMARY_DISPLAY_CAP {
        summary.push_str(&format!(" (and {} more)", words.len() - SUMMARY_DISPLAY_CAP));
    }
    summary
}

/// Build the field map for a generated entry.
fn note_fields_for(entry: &VocabEntry, config: &GenerateConfig) -> HashMap<String, String> {
    let translation = match &entry.example_phrase {
        Some(phrase) => format!("{}<br><i>{}</i>", entry.translation, phrase),
        None => entry.translation.clone(),
    };

    HashMap::from([
        (config.source_field.clone(), entry.word.clone()),
        (config.translation_field.clone(), translation),
    ])
}

fn tags() -> Vec<String> {
    vec!["kartei".to_string(), "generated".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card_store::MemoryCardStore;
    use crate::error::KarteiError;
    use crate::speech::SpeechSynthesizer;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Synthesizer that returns fixed bytes and records every call; texts in
    /// `fail_on` produce a synthesis error instead.
    struct MockSynthesizer {
        calls: AtomicUsize,
        texts: Mutex<Vec<String>>,
        fail_on: Vec<String>,
    }

    impl MockSynthesizer {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                texts: Mutex::new(Vec::new()),
                fail_on: Vec::new(),
            }
        }

        fn failing_on(text: &str) -> Self {
            Self {
                fail_on: vec![text.to_string()],
                ..Self::new()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for MockSynthesizer {
        async fn synthesize(
            &self,
            text: &str,
            _language_code: &str,
            _voice_id: &str,
        ) -> crate::error::Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.texts.lock().unwrap().push(text.to_string());
            if self.fail_on.iter().any(|t| t == text) {
                return Err(KarteiError::Synthesis("voice quota exhausted".to_string()));
            }
            Ok(b"mp3".to_vec())
        }
    }

    /// Generator returning a canned entry list.
    struct MockGenerator {
        entries: Vec<VocabEntry>,
    }

    #[async_trait]
    impl Generator for MockGenerator {
        async fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> crate::error::Result<Vec<VocabEntry>> {
            Ok(self.entries.clone())
        }
    }

    fn fields(front: &str, back: &str) -> HashMap<String, String> {
        HashMap::from([
            ("Front".to_string(), front.to_string()),
            ("Back".to_string(), back.to_string()),
        ])
    }

    fn config(policy: WritePolicy) -> RunConfig {
        RunConfig {
            deck: "Deutsch".to_string(),
            source_field: "Front".to_string(),
            dest_field: "Front".to_string(),
            policy,
            language_code: "de".to_string(),
            voice_id: "voice-1".to_string(),
            pause_ms: 0,
        }
    }

    fn entry(word: &str, translation: &str) -> VocabEntry {
        VocabEntry {
            word: word.to_string(),
            translation: translation.to_string(),
            example_phrase: None,
        }
    }

    async fn run_over_deck(
        store: &Arc<MemoryCardStore>,
        pipeline: &Pipeline,
        config: &RunConfig,
    ) -> RunSummary {
        let ids = store.note_ids(&config.deck).await.unwrap();
        pipeline.run(&ids, config, |_, _| {}).await.unwrap()
    }

    #[tokio::test]
    async fn test_end_to_end_three_note_scenario() {
        let store = Arc::new(MemoryCardStore::new());
        let a = store.insert_note("Deutsch", fields("das Haus", "the house"));
        let b = store.insert_note("Deutsch", fields("", "empty front"));
        let c = store.insert_note("Deutsch", fields("die Katze [sound:old.mp3]", "the cat"));

        let synth = Arc::new(MockSynthesizer::new());
        let pipeline = Pipeline::new(store.clone(), synth.clone());

        let summary = run_over_deck(&store, &pipeline, &config(WritePolicy::Append)).await;

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.failed(), 0);

        // A: text kept, reference appended
        assert_eq!(
            store.note_fields(a).await.unwrap()["Front"],
            format!("das Haus [sound:{}.mp3]", a)
        );
        // B and C untouched
        assert_eq!(store.note_fields(b).await.unwrap()["Front"], "");
        assert_eq!(
            store.note_fields(c).await.unwrap()["Front"],
            "die Katze [sound:old.mp3]"
        );
        // only the one synthesizable note hit the speech client
        assert_eq!(synth.call_count(), 1);
        assert_eq!(store.media_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_source_issues_no_speech_call() {
        let store = Arc::new(MemoryCardStore::new());
        store.insert_note("Deutsch", fields("   ", "blank"));
        store.insert_note("Deutsch", fields("[sound:only.mp3]", "tag only"));

        let synth = Arc::new(MockSynthesizer::new());
        let pipeline = Pipeline::new(store.clone(), synth.clone());

        let summary = run_over_deck(&store, &pipeline, &config(WritePolicy::Replace)).await;

        assert_eq!(summary.processed, 0);
        assert_eq!(summary.skipped, 2);
        assert_eq!(synth.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_does_not_abort_batch() {
        let store = Arc::new(MemoryCardStore::new());
        let ok1 = store.insert_note("Deutsch", fields("der Hund", ""));
        let bad = store.insert_note("Deutsch", fields("kaputt", ""));
        let ok2 = store.insert_note("Deutsch", fields("die Maus", ""));

        let synth = Arc::new(MockSynthesizer::failing_on("kaputt"));
        let pipeline = Pipeline::new(store.clone(), synth.clone());

        let summary = run_over_deck(&store, &pipeline, &config(WritePolicy::Append)).await;

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.failures[0].0, bad);
        assert!(summary.failures[0].1.contains("quota"));

        // the failed note is untouched, the later note still got audio
        assert_eq!(store.note_fields(bad).await.unwrap()["Front"], "kaputt");
        assert!(crate::text::has_sound_tag(
            &store.note_fields(ok1).await.unwrap()["Front"]
        ));
        assert!(crate::text::has_sound_tag(
            &store.note_fields(ok2).await.unwrap()["Front"]
        ));
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let store = Arc::new(MemoryCardStore::new());
        store.insert_note("Deutsch", fields("das Wasser", ""));
        store.insert_note("Deutsch", fields("das Brot", ""));

        let synth = Arc::new(MockSynthesizer::new());
        let pipeline = Pipeline::new(store.clone(), synth.clone());
        let config = config(WritePolicy::Append);

        let first = run_over_deck(&store, &pipeline, &config).await;
        assert_eq!(first.processed, 2);

        let second = run_over_deck(&store, &pipeline, &config).await;
        assert_eq!(second.processed, 0);
        assert_eq!(second.skipped, 2);
        // no further synthesis happened
        assert_eq!(synth.call_count(), 2);
    }

    #[tokio::test]
    async fn test_replace_policy_overwrites_destination() {
        let store = Arc::new(MemoryCardStore::new());
        let id = store.insert_note(
            "Deutsch",
            HashMap::from([
                ("Front".to_string(), "der Tisch".to_string()),
                ("Audio".to_string(), "stale text".to_string()),
            ]),
        );

        let synth = Arc::new(MockSynthesizer::new());
        let pipeline = Pipeline::new(store.clone(), synth);

        let mut cfg = config(WritePolicy::Replace);
        cfg.dest_field = "Audio".to_string();
        let summary = run_over_deck(&store, &pipeline, &cfg).await;

        assert_eq!(summary.processed, 1);
        let note = store.note_fields(id).await.unwrap();
        assert_eq!(note["Audio"], format!("[sound:{}.mp3]", id));
        assert_eq!(note["Front"], "der Tisch");
    }

    #[tokio::test]
    async fn test_append_strips_html_for_speech_but_keeps_it_in_field() {
        let store = Arc::new(MemoryCardStore::new());
        let id = store.insert_note("Deutsch", fields("<b>die Blume</b>", ""));

        let synth = Arc::new(MockSynthesizer::new());
        let pipeline = Pipeline::new(store.clone(), synth.clone());

        run_over_deck(&store, &pipeline, &config(WritePolicy::Append)).await;

        assert_eq!(synth.texts.lock().unwrap()[0], "die Blume");
        assert_eq!(
            store.note_fields(id).await.unwrap()["Front"],
            format!("<b>die Blume</b> [sound:{}.mp3]", id)
        );
    }

    #[tokio::test]
    async fn test_ordering_follows_supplied_ids() {
        let store = Arc::new(MemoryCardStore::new());
        let a = store.insert_note("Deutsch", fields("eins", ""));
        let b = store.insert_note("Deutsch", fields("zwei", ""));
        let c = store.insert_note("Deutsch", fields("drei", ""));

        let synth = Arc::new(MockSynthesizer::new());
        let pipeline = Pipeline::new(store.clone(), synth);

        let mut seen = Vec::new();
        pipeline
            .run(&[c, a, b], &config(WritePolicy::Append), |id, _| {
                seen.push(id)
            })
            .await
            .unwrap();

        assert_eq!(seen, vec![c, a, b]);
    }

    #[tokio::test]
    async fn test_generate_content_creates_notes_and_drops_duplicates() {
        let store = Arc::new(MemoryCardStore::new());
        store.insert_note("Deutsch", fields("das Haus", "the house"));

        let generator = MockGenerator {
            entries: vec![
                entry("das Haus", "the house"),
                entry("der Garten", "the garden"),
                VocabEntry {
                    word: "die Tür".to_string(),
                    translation: "the door".to_string(),
                    example_phrase: Some("Die Tür ist offen.".to_string()),
                },
            ],
        };

        let config = GenerateConfig {
            deck: "Deutsch".to_string(),
            source_field: "Front".to_string(),
            translation_field: "Back".to_string(),
            topic: "home".to_string(),
            count: 3,
            language: "German".to_string(),
        };

        let report = generate_content(store.as_ref(), &generator, &config)
            .await
            .unwrap();
        assert_eq!(report.created, 2);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.failed, 0);

        let ids = store.note_ids("Deutsch").await.unwrap();
        assert_eq!(ids.len(), 3);

        // example phrase lands in the translation field
        let last = store.note_fields(*ids.last().unwrap()).await.unwrap();
        assert_eq!(last["Back"], "the door<br><i>Die Tür ist offen.</i>");
    }

    #[tokio::test]
    async fn test_generate_content_creates_missing_deck() {
        let store = Arc::new(MemoryCardStore::new());

        let generator = MockGenerator {
            entries: vec![entry("neu", "new")],
        };

        let config = GenerateConfig {
            deck: "Frisch".to_string(),
            source_field: "Front".to_string(),
            translation_field: "Back".to_string(),
            topic: "misc".to_string(),
            count: 1,
            language: "German".to_string(),
        };

        let report = generate_content(store.as_ref(), &generator, &config)
            .await
            .unwrap();
        assert_eq!(report.created, 1);
        assert!(store
            .deck_names()
            .await
            .unwrap()
            .contains(&"Frisch".to_string()));
    }

    #[test]
    fn test_default_policy_from_field_pair() {
        assert_eq!(
            WritePolicy::default_for("Front", "Front"),
            WritePolicy::Append
        );
        assert_eq!(
            WritePolicy::default_for("Front", "Audio"),
            WritePolicy::Replace
        );
    }

    #[test]
    fn test_summarize_existing_caps_display() {
        assert_eq!(
            summarize_existing(&[]),
            "No existing content found in deck."
        );

        let words: Vec<String> = (0..25).map(|i| format!("wort{}", i)).collect();
        let summary = summarize_existing(&words);
        assert!(summary.contains("25 sampled"));
        assert!(summary.contains("wort19"));
        assert!(!summary.contains("wort20,"));
        assert!(summary.ends_with("(and 5 more)"));
    }
}
