//! Kartei - Flashcard Content & Audio Generator
//!
//! A CLI tool that fills flashcard decks with generated vocabulary and
//! synthesized audio, talking to a locally running AnkiConnect endpoint.
//!
//! The name "Kartei" is the German word for a card file.
//!
//! # Overview
//!
//! Kartei allows you to:
//! - Attach text-to-speech audio to the cards of a deck
//! - Generate topic-based vocabulary cards with translations
//! - Analyze word frequency in deck exports
//! - Build Anki import files from frequency reports or word lists
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `card_store` - Card store abstraction (AnkiConnect, in-memory)
//! - `speech` - Text-to-speech synthesis
//! - `generation` - Vocabulary generation
//! - `pipeline` - The audio augmentation and content generation runs
//! - `analysis` - Word frequency analysis and deck file building
//! - `text` - Field text utilities (sound tags, HTML stripping)
//!
//! # Example
//!
//! ```rust,no_run
//! use kartei::card_store::MemoryCardStore;
//! use kartei::pipeline::{Pipeline, RunConfig, WritePolicy};
//! use kartei::speech::SpeechSynthesizer;
//! use std::sync::Arc;
//!
//! # async fn demo(speech: Arc<dyn SpeechSynthesizer>) -> anyhow::Result<()> {
//! let store = Arc::new(MemoryCardStore::new());
//! let pipeline = Pipeline::new(store.clone(), speech);
//!
//! let config = RunConfig {
//!     deck: "German".to_string(),
//!     source_field: "Front".to_string(),
//!     dest_field: "Front".to_string(),
//!     policy: WritePolicy::Append,
//!     language_code: "de".to_string(),
//!     voice_id: "voice".to_string(),
//!     pause_ms: 0,
//! };
//!
//! let summary = pipeline.run(&[], &config, |_, _| {}).await?;
//! println!("Processed {} cards", summary.processed);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod card_store;
pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod pipeline;
pub mod speech;
pub mod text;

pub use error::{KarteiError, Result};
