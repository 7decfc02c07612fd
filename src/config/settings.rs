//! Configuration settings for Kartei.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreSettings,
    pub generation: GenerationSettings,
    pub speech: SpeechSettings,
    pub audio: AudioSettings,
    pub analysis: AnalysisSettings,
}

/// Card store (AnkiConnect) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// AnkiConnect endpoint URL.
    pub endpoint: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8765".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Vocabulary generation (Gemini) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Gemini API key (GEMINI_API_KEY takes precedence).
    pub api_key: Option<String>,
    /// Gemini model to use.
    pub model: String,
    /// Language the generated vocabulary is in (prompt wording).
    pub language: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash-001".to_string(),
            language: "German".to_string(),
        }
    }
}

/// Speech synthesis (ElevenLabs) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// ElevenLabs API key (ELEVENLABS_API_KEY takes precedence).
    pub api_key: Option<String>,
    /// Voice to synthesize with (ELEVENLABS_VOICE_ID takes precedence).
    pub voice_id: Option<String>,
    /// ISO 639-1 language code passed to the synthesizer.
    pub language_code: String,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            voice_id: None,
            language_code: "en".to_string(),
        }
    }
}

/// Defaults for audio runs over a deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Deck to process when none is given on the command line.
    pub deck: Option<String>,
    /// Field whose text is read aloud.
    pub source_field: Option<String>,
    /// Field the sound tag is written to.
    pub dest_field: Option<String>,
    /// Pause between synthesized notes, in milliseconds.
    pub pause_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            deck: None,
            source_field: None,
            dest_field: None,
            pause_ms: 500,
        }
    }
}

/// Word analyzer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// How many top words listings and charts show by default.
    pub top_n: usize,
    /// Directory report files are written to.
    pub output_dir: String,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            top_n: 30,
            output_dir: ".".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::KarteiError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kartei")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Gemini API key: environment first, then config file.
    pub fn gemini_api_key(&self) -> Option<String> {
        env_nonempty("GEMINI_API_KEY").or_else(|| self.generation.api_key.clone())
    }

    /// ElevenLabs API key: environment first, then config file.
    pub fn elevenlabs_api_key(&self) -> Option<String> {
        env_nonempty("ELEVENLABS_API_KEY").or_else(|| self.speech.api_key.clone())
    }

    /// ElevenLabs voice id: environment first, then config file.
    pub fn voice_id(&self) -> Option<String> {
        env_nonempty("ELEVENLABS_VOICE_ID").or_else(|| self.speech.voice_id.clone())
    }

    /// Get the expanded analyzer output directory.
    pub fn analysis_output_dir(&self) -> PathBuf {
        Self::expand_path(&self.analysis.output_dir)
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.store.endpoint, "http://127.0.0.1:8765");
        assert_eq!(settings.audio.pause_ms, 500);
        assert_eq!(settings.speech.language_code, "en");
        assert_eq!(settings.analysis.top_n, 30);
    }

    #[test]
    fn test_partial_config_parses() {
        let toml_str = r#"
            [store]
            endpoint = "http://127.0.0.1:9999"

            [audio]
            deck = "Deutsch"
            pause_ms = 0
        "#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.store.endpoint, "http://127.0.0.1:9999");
        assert_eq!(settings.audio.deck.as_deref(), Some("Deutsch"));
        assert_eq!(settings.audio.pause_ms, 0);
        // untouched sections fall back to defaults
        assert_eq!(settings.generation.model, "gemini-2.0-flash-001");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.audio.deck = Some("Wortschatz".to_string());
        settings.save_to(&path).unwrap();

        let reloaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(reloaded.audio.deck.as_deref(), Some("Wortschatz"));
    }
}
