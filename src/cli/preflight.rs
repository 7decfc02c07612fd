//! Pre-flight checks before expensive operations.
//!
//! Validates that required credentials and the store endpoint are available
//! before starting operations that would otherwise fail midway.

use crate::card_store::CardStore;
use crate::config::Settings;
use crate::error::{KarteiError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Audio runs require an ElevenLabs key and voice.
    Audio,
    /// Generation requires a Gemini key.
    Generate,
    /// Combined runs require all of the above.
    GenerateWithAudio,
}

/// Check that the credentials an operation needs are configured.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check_keys(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Audio => {
            check_speech_credentials(settings)?;
        }
        Operation::Generate => {
            check_gemini_key(settings)?;
        }
        Operation::GenerateWithAudio => {
            check_gemini_key(settings)?;
            check_speech_credentials(settings)?;
        }
    }
    Ok(())
}

/// Probe the store endpoint, failing fast before any note is touched.
pub async fn check_store(store: &dyn CardStore) -> Result<u32> {
    store.version().await
}

fn check_gemini_key(settings: &Settings) -> Result<()> {
    settings.gemini_api_key().ok_or_else(|| {
        KarteiError::Config(
            "Gemini API key not set. Set GEMINI_API_KEY or add it to the config file."
                .to_string(),
        )
    })?;
    Ok(())
}

fn check_speech_credentials(settings: &Settings) -> Result<()> {
    settings.elevenlabs_api_key().ok_or_else(|| {
        KarteiError::Config(
            "ElevenLabs API key not set. Set ELEVENLABS_API_KEY or add it to the config file."
                .to_string(),
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card_store::MemoryCardStore;

    #[test]
    fn test_audio_requires_speech_key() {
        let mut settings = Settings::default();
        settings.speech.api_key = None;
        // only meaningful when the env override is absent
        if std::env::var("ELEVENLABS_API_KEY").is_err() {
            assert!(check_keys(Operation::Audio, &settings).is_err());
        }

        settings.speech.api_key = Some("xi-key".to_string());
        assert!(check_keys(Operation::Audio, &settings).is_ok());
    }

    #[test]
    fn test_check_store_with_memory_store() {
        let store = MemoryCardStore::new();
        assert_eq!(tokio_test::block_on(check_store(&store)).unwrap(), 6);
    }
}
