//! Gemini vocabulary generator.
//!
//! One prompt, one response. The model is asked for a JSON object; the
//! response text is defensively sliced down to that object because Gemini
//! likes to wrap output in Markdown code fences or surrounding prose.

use super::{GenerationRequest, Generator, VocabEntry};
use crate::error::{KarteiError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for generation requests (2 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Gemini-backed vocabulary generator.
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// The JSON shape the prompt asks the model to produce.
#[derive(Debug, Deserialize)]
struct EntriesPayload {
    entries: Vec<VocabEntry>,
}

impl GeminiGenerator {
    /// Create a generator. Fails if the API key is empty.
    pub fn new(api_key: String, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(KarteiError::Config(
                "Gemini API key required for content generation".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<VocabEntry>> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let body = json!({
            "contents": [{
                "parts": [{ "text": build_prompt(request) }]
            }]
        });

        debug!(
            "Requesting {} {} entries about '{}'",
            request.count, request.language, request.topic
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| KarteiError::Generation(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(KarteiError::Generation(format!(
                "Gemini error {}: {}",
                status, body
            )));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| KarteiError::Generation(format!("malformed response: {}", e)))?;

        let text = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| KarteiError::Generation("model returned no candidates".to_string()))?;

        parse_entries(&text, request.count)
    }
}

/// Assemble the generation prompt from topic, count, and exclusion summary.
fn build_prompt(request: &GenerationRequest) -> String {
    format!(
        "Generate {language} vocabulary for the topic: \"{topic}\"\n\
         \n\
         Requirements:\n\
         - Generate exactly {count} {language} words or short phrases with English translations\n\
         - For each entry, include a short example phrase using the word\n\
         - Respond with JSON only, using this structure:\n\
         {{\n\
           \"entries\": [\n\
             {{\"word\": \"{language} word\", \"translation\": \"English translation\", \
         \"example_phrase\": \"short example\"}}\n\
           ]\n\
         }}\n\
         \n\
         Context from existing deck: {summary}\n\
         \n\
         Make sure the content is relevant to the topic and appropriate for language learning.\n\
         Avoid duplicating words or phrases that might already be in the deck.",
        language = request.language,
        topic = request.topic,
        count = request.count,
        summary = request.existing_summary,
    )
}

/// Extract vocabulary entries from raw model output.
///
/// Tolerates Markdown code fences and surrounding prose by slicing from the
/// first `{` to the last `}` before parsing. A count mismatch against
/// `requested` is logged but not an error; only an empty list is rejected.
fn parse_entries(text: &str, requested: usize) -> Result<Vec<VocabEntry>> {
    let start = text.find('{');
    let end = text.rfind('}');

    let json_slice = match (start, end) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => {
            return Err(KarteiError::Generation(
                "model output contained no JSON object".to_string(),
            ))
        }
    };

    let payload: EntriesPayload = serde_json::from_str(json_slice)
        .map_err(|e| KarteiError::Generation(format!("could not parse model output: {}", e)))?;

    if payload.entries.is_empty() {
        return Err(KarteiError::Generation(
            "model returned an empty entry list".to_string(),
        ));
    }

    if payload.entries.len() != requested {
        warn!(
            "Asked for {} entries, model returned {}",
            requested,
            payload.entries.len()
        );
    }

    Ok(payload.entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            topic: "food".to_string(),
            count: 2,
            language: "German".to_string(),
            existing_summary: "Deck contains: das Haus, die Katze".to_string(),
        }
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let result = GeminiGenerator::new(String::new(), "gemini-2.0-flash-001".to_string());
        assert!(matches!(result, Err(KarteiError::Config(_))));
    }

    #[test]
    fn test_prompt_carries_topic_count_and_summary() {
        let prompt = build_prompt(&request());
        assert!(prompt.contains("\"food\""));
        assert!(prompt.contains("exactly 2 German"));
        assert!(prompt.contains("das Haus, die Katze"));
    }

    #[test]
    fn test_parse_plain_json() {
        let entries = parse_entries(
            r#"{"entries": [
                {"word": "das Brot", "translation": "the bread", "example_phrase": "Ich esse Brot."},
                {"word": "der Apfel", "translation": "the apple"}
            ]}"#,
            2,
        )
        .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].word, "das Brot");
        assert_eq!(entries[0].example_phrase.as_deref(), Some("Ich esse Brot."));
        assert!(entries[1].example_phrase.is_none());
    }

    #[test]
    fn test_parse_strips_code_fences_and_prose() {
        let text = "Here is your vocabulary:\n```json\n\
            {\"entries\": [{\"word\": \"die Milch\", \"translation\": \"the milk\"}]}\n\
            ```\nLet me know if you need more!";

        let entries = parse_entries(text, 1).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].word, "die Milch");
    }

    #[test]
    fn test_parse_tolerates_short_entry_list() {
        // the model under-delivering is logged, never an error
        let entries = parse_entries(
            r#"{"entries": [{"word": "die Butter", "translation": "the butter"}]}"#,
            5,
        )
        .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].word, "die Butter");
    }

    #[test]
    fn test_parse_rejects_empty_output() {
        assert!(matches!(
            parse_entries("", 1),
            Err(KarteiError::Generation(_))
        ));
        assert!(matches!(
            parse_entries("{\"entries\": []}", 1),
            Err(KarteiError::Generation(_))
        ));
        assert!(matches!(
            parse_entries("no json here", 1),
            Err(KarteiError::Generation(_))
        ));
    }
}
