//! Dictionary-based spell correction.
//!
//! Unknown words are replaced by the closest vocabulary word within two
//! edits; ties go to the more frequent word.

use std::collections::HashMap;

/// English vocabulary, most frequent first.
const VOCABULARY: &str = "the of and to a in is it you that he was for on are with as i his they be at one \
have this from or had by not word but what some we can out other were all there when up use your how said \
an each she which do their time if will way about many then them write would like so these her long make \
thing see him two has look more day could go come did number sound no most people my over know water than \
call first who may down side been now find any new work part take get place made live where after back \
little only round man year came show every good me give our under name very through just form sentence \
great think say help low line differ turn cause much mean before move right boy old too same tell does set \
three want air well also play small end put home read hand port large spell add even land here must big \
high such follow act why ask men change went light kind off need house picture try us again animal point \
mother world near build self earth father head stand own page should country found answer school grow \
study still learn plant cover food sun four between state keep eye never last let thought city tree cross \
farm hard start might story saw far sea draw left late run while press close night real life few north \
open seem together next white children begin got walk example ease paper group always music those both \
mark often letter until mile river car feet care second book carry took science eat room friend began idea \
fish mountain stop once base hear horse cut sure watch color face wood main enough plain girl usual young \
ready above ever red list though feel talk bird soon body dog family direct pose leave song measure door \
product black short numeral class wind question happen complete ship area half rock order fire south \
problem piece told knew pass since top whole king space heard best hour better true during hundred five \
remember step early hold west ground interest reach fast verb sing listen six table travel less morning \
ten simple several vowel toward war lay against pattern slow center love person money serve appear road \
map rain rule govern pull cold notice voice unit power town fine certain fly fall lead cry dark machine \
note wait plan figure star box noun field rest correct able pound done beauty drive stood contain front \
teach week final gave green quick develop ocean warm free minute strong special mind behind clear tail \
produce fact street inch multiply nothing course stay wheel full force blue object decide surface deep \
moon island foot system busy test record boat common gold possible plane stead dry wonder laugh thousand \
ago ran check game shape equate hot miss brought heat snow tire bring yes distant fill east paint language \
among hello thanks thank please sorry today tomorrow yesterday happy sad nice bad movie film phone email \
price buy sell shop store customer service order delivery quality product review great awesome terrible \
spelling correct mistake text data file word words";

/// Maximum edit distance considered for a correction.
const MAX_DISTANCE: usize = 2;

/// Spell checker over an embedded English vocabulary.
#[derive(Debug, Clone)]
pub struct SpellChecker {
    rank: HashMap<&'static str, usize>,
}

impl SpellChecker {
    pub fn english() -> Self {
        let mut rank = HashMap::new();
        for (i, word) in VOCABULARY.split_whitespace().enumerate() {
            rank.entry(word).or_insert(i);
        }
        Self { rank }
    }

    /// Whether the lowercase form of `word` is in the vocabulary.
    pub fn is_known(&self, word: &str) -> bool {
        self.rank.contains_key(word.to_lowercase().as_str())
    }

    /// Best correction for an unknown word, if any lies within reach.
    pub fn correction(&self, word: &str) -> Option<&'static str> {
        let lower = word.to_lowercase();
        let target: Vec<char> = lower.chars().collect();
        self.rank
            .iter()
            .filter_map(|(candidate, rank)| {
                let chars: Vec<char> = candidate.chars().collect();
                if chars.len().abs_diff(target.len()) > MAX_DISTANCE {
                    return None;
                }
                let distance = edit_distance(&target, &chars);
                (distance <= MAX_DISTANCE).then_some((distance, *rank, *candidate))
            })
            .min()
            .map(|(_, _, candidate)| candidate)
    }

    /// Correct every space-separated word. Known words, empty words and words
    /// with non-alphabetic characters are kept as they are.
    pub fn correct(&self, text: &str) -> String {
        text.split(' ')
            .map(|word| {
                if word.is_empty() || !word.chars().all(char::is_alphabetic) || self.is_known(word) {
                    return word.to_string();
                }
                self.correction(word)
                    .map(str::to_string)
                    .unwrap_or_else(|| word.to_string())
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for SpellChecker {
    fn default() -> Self {
        Self::english()
    }
}

/// Optimal string alignment distance (Damerau-Levenshtein with adjacent
/// transpositions).
fn edit_distance(a: &[char], b: &[char]) -> usize {
    let (n, m) = (a.len(), b.len());
    let mut d = vec![vec![0usize; m + 1]; n + 1];
    for (i, row) in d.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=m {
        d[0][j] = j;
    }
    for i in 1..=n {
        for j in 1..=m {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut best = (d[i - 1][j] + 1).min(d[i][j - 1] + 1).min(d[i - 1][j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(d[i - 2][j - 2] + 1);
            }
            d[i][j] = best;
        }
    }
    d[n][m]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance(&chars("kitten"), &chars("sitting")), 3);
        assert_eq!(edit_distance(&chars("teh"), &chars("the")), 1);
        assert_eq!(edit_distance(&chars(""), &chars("ab")), 2);
    }

    #[test]
    fn test_correct_sentence() {
        let checker = SpellChecker::english();
        assert_eq!(checker.correct("speling mistake"), "spelling mistake");
        assert_eq!(checker.correct("teh water"), "the water");
    }

    #[test]
    fn test_known_and_unreachable_words_kept() {
        let checker = SpellChecker::english();
        assert_eq!(checker.correct("Hello"), "Hello");
        assert_eq!(checker.correct("xyzzyplugh"), "xyzzyplugh");
        assert_eq!(checker.correct("42 abc123"), "42 abc123");
    }
}
