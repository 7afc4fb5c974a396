//! Word frequency ranking over a whole column.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Which end of the ranking to select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyMode {
    Frequent,
    Rare,
}

/// Rank whitespace-separated tokens across `texts` by count, most frequent
/// first. Ties keep the order in which words were first seen.
pub fn rank_words<'a, I>(texts: I) -> Vec<WordCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut ranking: Vec<WordCount> = Vec::new();

    for text in texts {
        for word in tokens(text) {
            match index.get(word) {
                Some(&i) => ranking[i].count += 1,
                None => {
                    index.insert(word, ranking.len());
                    ranking.push(WordCount {
                        word: word.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    // stable: equal counts stay in first-seen order
    ranking.sort_by(|a, b| b.count.cmp(&a.count));
    ranking
}

/// The `n` most frequent or `n` rarest entries, in ranking order. Zero or a
/// negative `n` selects nothing.
pub fn select_words(ranking: &[WordCount], mode: FrequencyMode, n: i64) -> &[WordCount] {
    let n = usize::try_from(n).unwrap_or(0).min(ranking.len());
    match mode {
        FrequencyMode::Frequent => &ranking[..n],
        FrequencyMode::Rare => &ranking[ranking.len() - n..],
    }
}

/// Whitespace-separated tokens, as counted by [`rank_words`].
pub fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Split `text` into its leading whitespace and `(token, separator)` pairs,
/// where each separator is the whitespace run following the token.
fn segments(text: &str) -> (&str, Vec<(&str, &str)>) {
    let body = text.trim_start();
    let leading = &text[..text.len() - body.len()];

    let mut pairs = Vec::new();
    let mut rest = body;
    while !rest.is_empty() {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (token, tail) = rest.split_at(end);
        let next = tail.trim_start();
        pairs.push((token, &tail[..tail.len() - next.len()]));
        rest = next;
    }
    (leading, pairs)
}

/// Drop every token of `text` found in `words`.
///
/// Tokens are the ones [`rank_words`] counts. A kept token keeps the
/// separator that followed it; the last kept token gets the text's trailing
/// whitespace.
pub fn remove_words(text: &str, words: &HashSet<String>) -> String {
    let (leading, pairs) = segments(text);
    if !pairs.iter().any(|(token, _)| words.contains(*token)) {
        return text.to_string();
    }

    let trailing = pairs.last().map(|(_, sep)| *sep).unwrap_or("");
    let kept: Vec<(&str, &str)> = pairs
        .into_iter()
        .filter(|(token, _)| !words.contains(*token))
        .collect();
    if kept.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(text.len());
    out.push_str(leading);
    for (i, (token, sep)) in kept.iter().enumerate() {
        out.push_str(token);
        out.push_str(if i + 1 == kept.len() { trailing } else { *sep });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<&'static str> {
        vec!["the cat sat", "the dog sat", "the end"]
    }

    #[test]
    fn test_rank_words() {
        let ranking = rank_words(corpus());
        let words: Vec<(&str, usize)> =
            ranking.iter().map(|w| (w.word.as_str(), w.count)).collect();
        assert_eq!(
            words,
            vec![("the", 3), ("sat", 2), ("cat", 1), ("dog", 1), ("end", 1)]
        );
    }

    fn words(selected: &[WordCount]) -> Vec<&str> {
        selected.iter().map(|w| w.word.as_str()).collect()
    }

    #[test]
    fn test_select_frequent_and_rare() {
        let ranking = rank_words(corpus());
        assert_eq!(words(select_words(&ranking, FrequencyMode::Frequent, 2)), vec!["the", "sat"]);
        assert_eq!(words(select_words(&ranking, FrequencyMode::Rare, 2)), vec!["dog", "end"]);
    }

    #[test]
    fn test_select_bounds() {
        let ranking = rank_words(corpus());
        assert!(select_words(&ranking, FrequencyMode::Frequent, -1).is_empty());
        assert!(select_words(&ranking, FrequencyMode::Rare, 0).is_empty());
        assert_eq!(select_words(&ranking, FrequencyMode::Frequent, 99).len(), 5);
    }

    #[test]
    fn test_remove_words() {
        let words: HashSet<String> = ["the".to_string()].into_iter().collect();
        assert_eq!(remove_words("the cat the end", &words), "cat end");
        assert_eq!(remove_words("other", &words), "other");
    }

    #[test]
    fn test_remove_words_across_tabs_and_newlines() {
        let column = ["the\tcat", "the dog", "the\nend", "a\tthe\nb "];
        let ranking = rank_words(column);
        let selected = select_words(&ranking, FrequencyMode::Frequent, 1);
        assert_eq!(selected, &[WordCount { word: "the".into(), count: 4 }]);

        let words: HashSet<String> = selected.iter().map(|w| w.word.clone()).collect();
        let cleaned: Vec<String> = column.iter().map(|t| remove_words(t, &words)).collect();
        assert_eq!(cleaned, vec!["cat", "dog", "end", "a\tb "]);
        for text in &cleaned {
            assert!(!tokens(text).any(|t| t == "the"), "{:?}", text);
        }
    }

    #[test]
    fn test_remove_words_keeps_untouched_text() {
        let words: HashSet<String> = ["the".to_string()].into_iter().collect();
        assert_eq!(remove_words("  spaced\tout  ", &words), "  spaced\tout  ");
        assert_eq!(remove_words(" the ", &words), "");
    }
}
