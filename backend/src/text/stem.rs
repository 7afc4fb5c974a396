//! Stemming (Snowball, via `rust-stemmers`) and a rule-based English lemmatizer.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashMap;
use std::fmt;

/// Languages accepted by `STEM`.
pub const STEMMER_LANGUAGES: &[&str] = &[
    "arabic",
    "danish",
    "dutch",
    "english",
    "finnish",
    "french",
    "german",
    "hungarian",
    "italian",
    "norwegian",
    "portuguese",
    "romanian",
    "russian",
    "spanish",
    "swedish",
];

fn algorithm(language: &str) -> Option<Algorithm> {
    let algorithm = match language {
        "arabic" => Algorithm::Arabic,
        "danish" => Algorithm::Danish,
        "dutch" => Algorithm::Dutch,
        "english" => Algorithm::English,
        "finnish" => Algorithm::Finnish,
        "french" => Algorithm::French,
        "german" => Algorithm::German,
        "hungarian" => Algorithm::Hungarian,
        "italian" => Algorithm::Italian,
        "norwegian" => Algorithm::Norwegian,
        "portuguese" => Algorithm::Portuguese,
        "romanian" => Algorithm::Romanian,
        "russian" => Algorithm::Russian,
        "spanish" => Algorithm::Spanish,
        "swedish" => Algorithm::Swedish,
        _ => return None,
    };
    Some(algorithm)
}

/// Snowball stemmer for one language.
pub struct WordStemmer {
    language: String,
    stemmer: Stemmer,
}

impl fmt::Debug for WordStemmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordStemmer")
            .field("language", &self.language)
            .finish()
    }
}

impl WordStemmer {
    /// Stemmer for a language from [`STEMMER_LANGUAGES`].
    pub fn for_language(language: &str) -> Option<Self> {
        algorithm(language).map(|alg| Self {
            language: language.to_string(),
            stemmer: Stemmer::create(alg),
        })
    }

    pub fn english() -> Self {
        Self {
            language: "english".to_string(),
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Lowercase and stem every space-separated word.
    pub fn stem(&self, text: &str) -> String {
        text.split(' ')
            .map(|word| self.stemmer.stem(&word.to_lowercase()).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+(?:'\w+)?|[^\w\s]").expect("valid token pattern"));

const IRREGULAR: &[(&str, &str)] = &[
    ("am", "be"),
    ("are", "be"),
    ("is", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("has", "have"),
    ("had", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("went", "go"),
    ("gone", "go"),
    ("ran", "run"),
    ("saw", "see"),
    ("seen", "see"),
    ("took", "take"),
    ("taken", "take"),
    ("made", "make"),
    ("said", "say"),
    ("got", "get"),
    ("gotten", "get"),
    ("came", "come"),
    ("knew", "know"),
    ("known", "know"),
    ("thought", "think"),
    ("told", "tell"),
    ("found", "find"),
    ("gave", "give"),
    ("given", "give"),
    ("wrote", "write"),
    ("written", "write"),
    ("better", "good"),
    ("best", "good"),
    ("worse", "bad"),
    ("worst", "bad"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("wolves", "wolf"),
];

/// Words ending in `s` that are not plurals.
const NOT_PLURAL: &[&str] = &[
    "as", "has", "his", "its", "this", "thus", "yes", "us", "bus", "gas", "lens", "news",
    "series", "species", "always", "perhaps", "towards", "whereas", "christmas",
];

/// English lemmatizer: irregular forms first, then plural-noun suffix rules.
///
/// Only lowercase tokens are lemmatized; capitalised words are treated as
/// proper nouns and left alone.
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    irregular: HashMap<&'static str, &'static str>,
}

impl Lemmatizer {
    pub fn new() -> Self {
        Self {
            irregular: IRREGULAR.iter().copied().collect(),
        }
    }

    /// Lemma of a single word.
    pub fn lemma(&self, word: &str) -> String {
        if word.chars().any(|c| c.is_uppercase()) || !word.chars().all(char::is_alphabetic) {
            return word.to_string();
        }
        if let Some(lemma) = self.irregular.get(word) {
            return lemma.to_string();
        }
        if NOT_PLURAL.contains(&word) || word.len() <= 3 {
            return word.to_string();
        }

        if let Some(stem) = word.strip_suffix("ies") {
            if stem.len() > 1 {
                return format!("{}y", stem);
            }
        }
        if word.ends_with("sses") {
            return word[..word.len() - 2].to_string();
        }
        for suffix in ["ches", "shes", "xes", "zes"] {
            if word.ends_with(suffix) {
                return word[..word.len() - 2].to_string();
            }
        }
        if word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("us") && !word.ends_with("is") {
            return word[..word.len() - 1].to_string();
        }
        word.to_string()
    }

    /// Tokenize (words and punctuation), lemmatize, join with spaces.
    pub fn lemmatize(&self, text: &str) -> String {
        TOKEN_PATTERN
            .find_iter(text)
            .map(|token| self.lemma(token.as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_languages() {
        for language in STEMMER_LANGUAGES {
            assert!(WordStemmer::for_language(language).is_some(), "{}", language);
        }
        assert!(WordStemmer::for_language("porter").is_none());
    }

    #[test]
    fn test_english_stemming() {
        let stemmer = WordStemmer::english();
        assert_eq!(stemmer.stem("running cats"), "run cat");
        assert_eq!(stemmer.stem("Connected"), "connect");
    }

    #[test]
    fn test_stemming_keeps_spacing() {
        let stemmer = WordStemmer::english();
        assert_eq!(stemmer.stem("cats  dogs"), "cat  dog");
    }

    #[test]
    fn test_lemma_rules() {
        let lemmatizer = Lemmatizer::new();
        assert_eq!(lemmatizer.lemma("stories"), "story");
        assert_eq!(lemmatizer.lemma("boxes"), "box");
        assert_eq!(lemmatizer.lemma("classes"), "class");
        assert_eq!(lemmatizer.lemma("cats"), "cat");
        assert_eq!(lemmatizer.lemma("mice"), "mouse");
        assert_eq!(lemmatizer.lemma("was"), "be");
        assert_eq!(lemmatizer.lemma("glass"), "glass");
        assert_eq!(lemmatizer.lemma("Paris"), "Paris");
    }

    #[test]
    fn test_lemmatize_sentence() {
        let lemmatizer = Lemmatizer::new();
        assert_eq!(
            lemmatizer.lemmatize("the children were playing with boxes."),
            "the child be playing with box ."
        );
    }
}
