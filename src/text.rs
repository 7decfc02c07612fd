//! Field-text cleanup helpers.
//!
//! Flashcard fields mix display text with markup: HTML tags from the card
//! editor and `[sound:...]` media references added by audio runs. The
//! pipeline and the word analyzer both need the plain text underneath.

use regex::Regex;
use std::sync::LazyLock;

/// Marker prefix identifying a stored audio reference in a field value.
pub const SOUND_TAG_PREFIX: &str = "[sound:";

static SOUND_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[sound:[^\]]+\]").expect("Invalid regex"));

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("Invalid regex"));

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("Invalid regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// Check whether a field value already carries a sound tag.
pub fn has_sound_tag(value: &str) -> bool {
    value.contains(SOUND_TAG_PREFIX)
}

/// Build a sound tag referencing a stored media file.
pub fn sound_tag(filename: &str) -> String {
    format!("[sound:{}]", filename)
}

/// Remove all `[sound:...]` tags from a field value, trimming the result.
///
/// Everything else (HTML included) is preserved, so appending a fresh tag
/// does not destroy card formatting.
pub fn strip_sound_tags(value: &str) -> String {
    SOUND_TAG.replace_all(value, "").trim().to_string()
}

/// Remove HTML tags from a field value.
pub fn strip_html(value: &str) -> String {
    HTML_TAG.replace_all(value, "").to_string()
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(value: &str) -> String {
    WHITESPACE.replace_all(value, " ").trim().to_string()
}

/// Extract the text a speech synthesizer should read from a field value:
/// sound tags and HTML removed, whitespace normalized.
pub fn clean_for_speech(value: &str) -> String {
    collapse_whitespace(&strip_html(&strip_sound_tags(value)))
}

/// Normalize a field value for tokenization: cleaned as for speech, then
/// symbols replaced by spaces and the result lowercased. Unicode letters
/// (umlauts, eszett) survive.
pub fn normalize_for_tokens(value: &str) -> String {
    let cleaned = clean_for_speech(value);
    NON_WORD.replace_all(&cleaned, " ").trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_sound_tag() {
        assert!(has_sound_tag("Haus [sound:123.mp3]"));
        assert!(has_sound_tag("[sound:a.mp3]"));
        assert!(!has_sound_tag("Haus"));
        assert!(!has_sound_tag(""));
    }

    #[test]
    fn test_strip_sound_tags() {
        assert_eq!(strip_sound_tags("Haus [sound:123.mp3]"), "Haus");
        assert_eq!(
            strip_sound_tags("[sound:a.mp3] der Hund [sound:b.mp3]"),
            "der Hund"
        );
        assert_eq!(strip_sound_tags("kein Tag"), "kein Tag");
        // HTML is untouched
        assert_eq!(
            strip_sound_tags("<b>Haus</b> [sound:x.mp3]"),
            "<b>Haus</b>"
        );
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<b>Haus</b>"), "Haus");
        assert_eq!(strip_html("die <i>Katze</i><br>"), "die Katze");
        assert_eq!(strip_html("no markup"), "no markup");
    }

    #[test]
    fn test_clean_for_speech() {
        assert_eq!(
            clean_for_speech("<b>das  Wasser</b> [sound:w.mp3]"),
            "das Wasser"
        );
        assert_eq!(clean_for_speech("  [sound:only.mp3]  "), "");
        assert_eq!(clean_for_speech("\tschon\n gut "), "schon gut");
    }

    #[test]
    fn test_normalize_for_tokens_keeps_umlauts() {
        assert_eq!(normalize_for_tokens("Über die Straße!"), "über die straße");
        assert_eq!(
            normalize_for_tokens("<i>Füße</i>, [sound:f.mp3] gehen."),
            "füße  gehen"
        );
    }

    #[test]
    fn test_sound_tag_round_trip() {
        let tag = sound_tag("1699999.mp3");
        assert_eq!(tag, "[sound:1699999.mp3]");
        assert!(has_sound_tag(&tag));
        assert_eq!(strip_sound_tags(&tag), "");
    }
}
