//! ElevenLabs speech synthesis implementation.

use super::SpeechSynthesizer;
use crate::error::{KarteiError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Default timeout for synthesis requests (1 minute).
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Voice model used for all requests.
const MODEL_ID: &str = "eleven_turbo_v2_5";

/// ElevenLabs TTS client.
pub struct ElevenLabsSynthesizer {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Serialize)]
struct VoiceSettings {
    stability: f64,
    similarity_boost: f64,
}

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    language_code: &'a str,
    voice_settings: VoiceSettings,
}

impl ElevenLabsSynthesizer {
    /// Create a synthesizer. Fails if the API key is empty.
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(KarteiError::Config(
                "ElevenLabs API key required for speech synthesis".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        language_code: &str,
        voice_id: &str,
    ) -> Result<Vec<u8>> {
        let url = format!(
            "https://api.elevenlabs.io/v1/text-to-speech/{}?output_format=mp3_44100_128",
            voice_id
        );

        let request = SynthesisRequest {
            text,
            model_id: MODEL_ID,
            language_code,
            voice_settings: VoiceSettings {
                stability: 0.8,
                similarity_boost: 0.75,
            },
        };

        debug!("Synthesizing {} characters", text.len());

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| KarteiError::Synthesis(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(KarteiError::Synthesis(format!(
                "ElevenLabs error {}: {}",
                status, body
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| KarteiError::Synthesis(e.to_string()))?;

        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_rejected() {
        let result = ElevenLabsSynthesizer::new(String::new());
        assert!(matches!(result, Err(KarteiError::Config(_))));
    }

    #[test]
    fn test_request_body_shape() {
        let request = SynthesisRequest {
            text: "das Haus",
            model_id: MODEL_ID,
            language_code: "de",
            voice_settings: VoiceSettings {
                stability: 0.8,
                similarity_boost: 0.75,
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["text"], "das Haus");
        assert_eq!(json["model_id"], "eleven_turbo_v2_5");
        assert_eq!(json["voice_settings"]["stability"], 0.8);
    }
}
