//! Word lists: stopwords per language and chat-word (slang) expansions.

use std::collections::{HashMap, HashSet};

/// Languages accepted by `REMOVE_STOPWORDS`.
pub const STOPWORD_LANGUAGES: &[&str] = &[
    "dutch",
    "english",
    "french",
    "german",
    "italian",
    "portuguese",
    "spanish",
];

const ENGLISH: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

const FRENCH: &[&str] = &[
    "au", "aux", "avec", "ce", "ces", "dans", "de", "des", "du", "elle", "en", "et", "eux", "il",
    "ils", "je", "la", "le", "les", "leur", "lui", "ma", "mais", "me", "même", "mes", "moi",
    "mon", "ne", "nos", "notre", "nous", "on", "ou", "par", "pas", "pour", "qu", "que", "qui",
    "sa", "se", "ses", "son", "sur", "ta", "te", "tes", "toi", "ton", "tu", "un", "une", "vos",
    "votre", "vous", "c", "d", "j", "l", "à", "m", "n", "s", "t", "y", "été", "était", "étaient",
    "suis", "es", "est", "sommes", "êtes", "sont", "ai", "as", "avons", "avez", "ont", "avait",
];

const GERMAN: &[&str] = &[
    "aber", "alle", "als", "also", "am", "an", "auch", "auf", "aus", "bei", "bin", "bis", "bist",
    "da", "damit", "dann", "der", "den", "des", "dem", "die", "das", "dass", "du", "er", "es",
    "ein", "eine", "einem", "einen", "einer", "eines", "für", "hat", "hatte", "ich", "ihr", "im",
    "in", "ist", "ja", "kein", "mich", "mir", "mit", "nach", "nicht", "noch", "nur", "oder",
    "sich", "sie", "sind", "so", "und", "uns", "von", "vor", "war", "was", "wir", "wie", "zu",
    "zum", "zur",
];

const SPANISH: &[&str] = &[
    "de", "la", "que", "el", "en", "y", "a", "los", "del", "se", "las", "por", "un", "para",
    "con", "no", "una", "su", "al", "lo", "como", "más", "pero", "sus", "le", "ya", "o", "este",
    "sí", "porque", "esta", "entre", "cuando", "muy", "sin", "sobre", "también", "me", "hasta",
    "hay", "donde", "quien", "desde", "todo", "nos", "durante", "todos", "uno", "les", "ni",
    "contra", "otros", "ese", "eso", "ante", "ellos", "e", "esto", "mí", "antes", "algunos",
    "qué", "unos", "yo", "otro", "otras", "otra", "él", "tanto", "esa", "estos", "mucho",
];

const ITALIAN: &[&str] = &[
    "ad", "al", "allo", "ai", "agli", "all", "alla", "alle", "con", "col", "da", "dal", "dallo",
    "dai", "dagli", "dall", "dalla", "dalle", "di", "del", "dello", "dei", "degli", "dell",
    "della", "delle", "in", "nel", "nello", "nei", "negli", "nell", "nella", "nelle", "su",
    "sul", "sullo", "sui", "sugli", "sull", "sulla", "sulle", "per", "tra", "contro", "io", "tu",
    "lui", "lei", "noi", "voi", "loro", "mio", "mia", "il", "lo", "la", "le", "gli", "un", "uno",
    "una", "e", "ed", "ma", "o", "che", "non", "è", "sono", "come", "anche", "più",
];

const PORTUGUESE: &[&str] = &[
    "de", "a", "o", "que", "e", "do", "da", "em", "um", "para", "com", "não", "uma", "os", "no",
    "se", "na", "por", "mais", "as", "dos", "como", "mas", "ao", "ele", "das", "à", "seu", "sua",
    "ou", "quando", "muito", "nos", "já", "eu", "também", "só", "pelo", "pela", "até", "isso",
    "ela", "entre", "depois", "sem", "mesmo", "aos", "seus", "quem", "nas", "me", "esse", "eles",
    "você", "essa", "num", "nem", "suas", "meu", "às", "minha", "numa", "pelos", "elas",
];

const DUTCH: &[&str] = &[
    "de", "en", "van", "ik", "te", "dat", "die", "in", "een", "hij", "het", "niet", "zijn", "is",
    "was", "op", "aan", "met", "als", "voor", "had", "er", "maar", "om", "hem", "dan", "zou",
    "of", "wat", "mijn", "men", "dit", "zo", "door", "over", "ze", "zich", "bij", "ook", "tot",
    "je", "mij", "uit", "der", "daar", "haar", "naar", "heb", "hoe", "heeft", "hebben", "deze",
    "u", "want", "nog", "zal", "me", "zij", "nu", "ge", "geen", "omdat", "iets", "worden",
];

/// Chat abbreviation -> expansion.
const CHAT_WORDS: &[(&str, &str)] = &[
    ("AFAIK", "As Far As I Know"),
    ("AFK", "Away From Keyboard"),
    ("ASAP", "As Soon As Possible"),
    ("ATK", "At The Keyboard"),
    ("ATM", "At The Moment"),
    ("A3", "Anytime, Anywhere, Anyplace"),
    ("BAK", "Back At Keyboard"),
    ("BBL", "Be Back Later"),
    ("BBS", "Be Back Soon"),
    ("BFN", "Bye For Now"),
    ("B4N", "Bye For Now"),
    ("BRB", "Be Right Back"),
    ("BRT", "Be Right There"),
    ("BTW", "By The Way"),
    ("B4", "Before"),
    ("CU", "See You"),
    ("CUL8R", "See You Later"),
    ("CYA", "See You"),
    ("FAQ", "Frequently Asked Questions"),
    ("FC", "Fingers Crossed"),
    ("FWIW", "For What It's Worth"),
    ("FYI", "For Your Information"),
    ("GAL", "Get A Life"),
    ("GG", "Good Game"),
    ("GN", "Good Night"),
    ("GMTA", "Great Minds Think Alike"),
    ("GR8", "Great!"),
    ("G9", "Genius"),
    ("IC", "I See"),
    ("ICQ", "I Seek you"),
    ("ILU", "I Love You"),
    ("IMHO", "In My Honest/Humble Opinion"),
    ("IMO", "In My Opinion"),
    ("IOW", "In Other Words"),
    ("IRL", "In Real Life"),
    ("KISS", "Keep It Simple, Stupid"),
    ("LDR", "Long Distance Relationship"),
    ("LMAO", "Laugh My A.. Off"),
    ("LOL", "Laughing Out Loud"),
    ("LTNS", "Long Time No See"),
    ("L8R", "Later"),
    ("MTE", "My Thoughts Exactly"),
    ("M8", "Mate"),
    ("NRN", "No Reply Necessary"),
    ("OIC", "Oh I See"),
    ("PITA", "Pain In The A.."),
    ("PRT", "Party"),
    ("PRW", "Parents Are Watching"),
    ("ROFL", "Rolling On The Floor Laughing"),
    ("ROFLOL", "Rolling On The Floor Laughing Out Loud"),
    ("ROTFLMAO", "Rolling On The Floor Laughing My A.. Off"),
    ("SK8", "Skate"),
    ("STATS", "Your sex and age"),
    ("ASL", "Age, Sex, Location"),
    ("THX", "Thank You"),
    ("TTFN", "Ta-Ta For Now!"),
    ("TTYL", "Talk To You Later"),
    ("U", "You"),
    ("U2", "You Too"),
    ("U4E", "Yours For Ever"),
    ("WB", "Welcome Back"),
    ("WTF", "What The F..."),
    ("WTG", "Way To Go!"),
    ("WUF", "Where Are You From?"),
    ("W8", "Wait..."),
    ("7K", "Sick:-D Laugher"),
    ("TFW", "That feeling when"),
    ("MFW", "My face when"),
    ("MRW", "My reaction when"),
    ("IFYP", "I feel your pain"),
    ("TNTL", "Trying not to laugh"),
    ("JK", "Just kidding"),
    ("IDC", "I don't care"),
    ("ILY", "I love you"),
    ("IMU", "I miss you"),
    ("ADIH", "Another day in hell"),
    ("ZZZ", "Sleeping, bored, tired"),
    ("WYWH", "Wish you were here"),
    ("TIME", "Tears in my eyes"),
    ("BAE", "Before anyone else"),
    ("FIMH", "Forever in my heart"),
    ("BSAAW", "Big smile and a wink"),
    ("BWL", "Bursting with laughter"),
    ("BFF", "Best friends forever"),
    ("CSL", "Can't stop laughing"),
];

/// A stopword set for one language.
#[derive(Debug, Clone)]
pub struct Stopwords {
    language: String,
    words: HashSet<&'static str>,
}

impl Stopwords {
    /// Stopwords for a language from [`STOPWORD_LANGUAGES`].
    pub fn for_language(language: &str) -> Option<Self> {
        let list = match language {
            "english" => ENGLISH,
            "french" => FRENCH,
            "german" => GERMAN,
            "spanish" => SPANISH,
            "italian" => ITALIAN,
            "portuguese" => PORTUGUESE,
            "dutch" => DUTCH,
            _ => return None,
        };
        Some(Self {
            language: language.to_string(),
            words: list.iter().copied().collect(),
        })
    }

    /// English stopwords.
    pub fn english() -> Self {
        Self {
            language: "english".to_string(),
            words: ENGLISH.iter().copied().collect(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Drop stopwords from space-separated text. Matching is case-sensitive.
    pub fn remove(&self, text: &str) -> String {
        text.split(' ')
            .filter(|word| !self.words.contains(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Chat-word expansion table.
#[derive(Debug, Clone)]
pub struct ChatWords {
    table: HashMap<&'static str, &'static str>,
}

impl ChatWords {
    pub fn new() -> Self {
        Self {
            table: CHAT_WORDS.iter().copied().collect(),
        }
    }

    /// Expand every space-separated word whose uppercase form is a chat word.
    pub fn expand(&self, text: &str) -> String {
        text.split(' ')
            .map(|word| {
                self.table
                    .get(word.to_uppercase().as_str())
                    .map(|expansion| expansion.to_string())
                    .unwrap_or_else(|| word.to_string())
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for ChatWords {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_a_list() {
        for language in STOPWORD_LANGUAGES {
            assert!(Stopwords::for_language(language).is_some(), "{}", language);
        }
        assert!(Stopwords::for_language("klingon").is_none());
    }

    #[test]
    fn test_remove_english_stopwords() {
        let stopwords = Stopwords::english();
        assert_eq!(stopwords.remove("this is a test of the system"), "test system");
    }

    #[test]
    fn test_stopwords_are_case_sensitive() {
        let stopwords = Stopwords::english();
        assert_eq!(stopwords.remove("The cat and the hat"), "The cat hat");
    }

    #[test]
    fn test_french_stopwords() {
        let stopwords = Stopwords::for_language("french").unwrap();
        assert_eq!(stopwords.remove("le chat est sur la table"), "chat table");
    }

    #[test]
    fn test_chat_words() {
        let chat = ChatWords::new();
        assert_eq!(chat.expand("brb imo"), "Be Right Back In My Opinion");
        assert_eq!(chat.expand("hello world"), "hello world");
    }
}
