//! Speech synthesis abstraction.

mod elevenlabs;

pub use elevenlabs::ElevenLabsSynthesizer;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for text-to-speech backends.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` into audio bytes (MP3).
    async fn synthesize(&self, text: &str, language_code: &str, voice_id: &str)
        -> Result<Vec<u8>>;
}
