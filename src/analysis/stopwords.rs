//! Built-in stopword list for the word analyzer.

use crate::error::Result;
use std::collections::HashSet;
use std::path::Path;

/// German function words excluded from frequency counting: articles,
/// pronouns, common modal/auxiliary verb forms, and frequent adverbs.
const GERMAN_STOPWORDS: &[&str] = &[
    // articles and determiners
    "der", "die", "das", "den", "dem", "des", "ein", "eine", "einen", "einem", "einer", "eines",
    "kein", "keine", "keinen", "keinem", "keiner", "keines", "alle", "allem", "allen", "aller",
    "alles", "manche", "manchem", "manchen", "mancher", "manches", "viele", "vieler", "vielen",
    "vieles", "wenige", "weniger", "wenigen", "weniges", "andere", "anderem", "anderen",
    "anderer", "anderes", "jede", "jedem", "jeden", "jeder", "jedes", "jene", "jenem", "jenen",
    "jener", "jenes", "diese", "diesem", "diesen", "dieser", "dieses", "solche", "solchem",
    "solchen", "solcher", "solches", "welche", "welchem", "welchen", "welcher", "welches",
    // conjunctions and prepositions
    "und", "oder", "aber", "mit", "von", "zu", "in", "auf", "für", "an", "obwohl", "falls",
    "während", "sobald", "jedoch",
    // auxiliary and modal verb forms
    "ist", "sind", "war", "waren", "haben", "hat", "hatte", "hatten", "werden", "wird", "wurde",
    "wurden", "können", "kann", "konnte", "konnten", "müssen", "muss", "musste", "mussten",
    "wollen", "will", "wollte", "wollten", "sollen", "soll", "sollte", "sollten", "dürfen",
    "darf", "durfte", "durften", "mögen", "mag", "mochte", "mochten",
    // pronouns and possessives
    "ich", "du", "er", "sie", "es", "wir", "ihr", "mir", "mich", "dir", "dich", "ihm", "ihn",
    "uns", "euch", "ihnen", "mein", "meine", "meinen", "meinem", "meiner", "dein", "deine",
    "deinen", "deinem", "deiner", "sein", "seine", "seinen", "seinem", "seiner", "ihre", "ihren",
    "ihrem", "ihrer", "unser", "unsere", "unseren", "unserem", "unserer", "euer", "eure",
    "euren", "eurem", "eurer",
    // frequent adverbs and particles
    "auch", "nur", "noch", "schon", "erst", "dann", "danach", "deshalb", "deswegen", "trotzdem",
    "überall", "nirgends", "irgendwann", "manchmal", "oft", "selten", "immer", "nie",
    "vielleicht", "wahrscheinlich", "möglich", "unmöglich", "eigentlich", "wirklich", "sogar",
];

/// The built-in German stopword set.
pub fn german() -> HashSet<String> {
    GERMAN_STOPWORDS.iter().map(|w| w.to_string()).collect()
}

/// Load a custom stopword set from a file: one word per line, `#` comments
/// and blank lines skipped, lowercased.
pub fn load_from_file(path: &Path) -> Result<HashSet<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_german_set_contains_articles() {
        let set = german();
        assert!(set.contains("der"));
        assert!(set.contains("können"));
        assert!(!set.contains("haus"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stop.txt");
        std::fs::write(&path, "# comment\nDer\n\nund\n").unwrap();

        let set = load_from_file(&path).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("der"));
        assert!(set.contains("und"));
    }
}
