//! CLI module for Kartei.

pub mod commands;
pub mod interactive;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Kartei - Flashcard Content & Audio Generator
///
/// Generates vocabulary with Gemini and attaches ElevenLabs TTS audio to
/// flashcards through a local AnkiConnect endpoint. The name "Kartei" is the
/// German word for a card file.
#[derive(Parser, Debug)]
#[command(name = "kartei")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Without a subcommand, Kartei starts an interactive session.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add synthesized audio to the cards of a deck
    Audio {
        /// Deck to process
        #[arg(short, long)]
        deck: Option<String>,

        /// Field whose text is read aloud
        #[arg(short, long)]
        source: Option<String>,

        /// Field the audio reference is written to (defaults to the source field)
        #[arg(short = 't', long)]
        dest: Option<String>,

        /// Append the audio reference after the existing field text
        #[arg(long, conflicts_with = "replace")]
        append: bool,

        /// Replace the destination field with the audio reference alone
        #[arg(long)]
        replace: bool,
    },

    /// Generate vocabulary cards for a topic
    Generate {
        /// Topic the vocabulary should cover (e.g. "food", "travel")
        topic: String,

        /// Number of entries to generate
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,

        /// Deck to add the cards to
        #[arg(short, long)]
        deck: Option<String>,

        /// Field the generated word is written to
        #[arg(short, long)]
        source: Option<String>,

        /// Field the translation is written to
        #[arg(long, default_value = "Back")]
        translation_field: String,

        /// Run the audio pipeline over the deck afterwards
        #[arg(long)]
        with_audio: bool,
    },

    /// List the decks in the store
    Decks,

    /// List the fields of a deck
    Fields {
        /// Deck to inspect
        deck: String,
    },

    /// Analyze word frequency in a deck export file
    Analyze {
        /// Path to the tab-separated deck export
        input: String,

        /// How many top words listings and charts show
        #[arg(long)]
        top_n: Option<usize>,

        /// Directory report files are written to
        #[arg(short, long)]
        output_dir: Option<String>,

        /// Custom stopword file (one word per line) replacing the built-in list
        #[arg(long)]
        stopwords: Option<String>,

        /// Count every token, including stopwords
        #[arg(long, conflicts_with = "stopwords")]
        no_stopwords: bool,
    },

    /// Build an Anki import file from a frequency report or word lists
    BuildDeck {
        /// Frequency-report JSON produced by `kartei analyze`
        #[arg(long, conflicts_with = "word_list")]
        frequency_json: Option<String>,

        /// Word list files (one word per line, may be repeated)
        #[arg(long)]
        word_list: Vec<String>,

        /// How many top words to take from the frequency report
        #[arg(long, default_value = "50")]
        top_n: usize,

        /// Card front format (simple, emphasized, question)
        #[arg(long, default_value = "simple")]
        format: String,

        /// Output file
        #[arg(short, long, default_value = "generated_deck.txt")]
        output: String,
    },

    /// Check store reachability and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
