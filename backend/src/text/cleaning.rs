//! Character-level cleaning: case, punctuation, URLs and HTML tags.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// ASCII punctuation removed by `REMOVE_PUNCT` when no set is given.
pub const DEFAULT_PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+|www\.\S+").expect("valid URL pattern"));

static HTML_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<.*?>").expect("valid HTML pattern"));

/// Lowercase the whole text.
pub fn lowercase(text: &str) -> String {
    text.to_lowercase()
}

/// Remove `http(s)://...` and `www....` links.
pub fn remove_urls(text: &str) -> String {
    URL_PATTERN.replace_all(text, "").into_owned()
}

/// Remove HTML tags, keeping their text content.
pub fn remove_html(text: &str) -> String {
    HTML_PATTERN.replace_all(text, "").into_owned()
}

/// A set of characters to strip from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Punctuation {
    chars: HashSet<char>,
}

impl Punctuation {
    /// Strip exactly the characters of `chars`.
    pub fn new(chars: &str) -> Self {
        Self {
            chars: chars.chars().collect(),
        }
    }

    pub fn strip(&self, text: &str) -> String {
        text.chars().filter(|c| !self.chars.contains(c)).collect()
    }
}

impl Default for Punctuation {
    fn default() -> Self {
        Self::new(DEFAULT_PUNCTUATION)
    }
}
