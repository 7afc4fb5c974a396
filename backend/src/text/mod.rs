//! Text transformation library.
//!
//! Pure functions and small prepared objects used by the pipeline executor.
//! Everything here works on `&str` and knows nothing about tables or
//! instruction documents:
//!
//! - [`cleaning`] - lowercasing, punctuation, URL and HTML removal
//! - [`emoji`] - emoji and emoticon removal / conversion
//! - [`lexicon`] - stopword lists and chat-word expansion
//! - [`stem`] - Snowball stemming and English lemmatization
//! - [`spelling`] - dictionary-based spell correction
//! - [`dates`] - fuzzy date / datetime parsing
//! - [`extract`] - regex extraction with typed results
//! - [`frequency`] - word frequency ranking and removal
//!
//! Objects that are expensive to build (stopword sets, stemmers, the spell
//! checker, compiled patterns) are constructed once per instruction and then
//! applied to every cell.

pub mod cleaning;
pub mod dates;
pub mod emoji;
pub mod extract;
pub mod frequency;
pub mod lexicon;
pub mod spelling;
pub mod stem;

pub use cleaning::{lowercase, remove_html, remove_urls, Punctuation, DEFAULT_PUNCTUATION};
pub use dates::{parse_date, parse_datetime, to_date_or_datetime};
pub use emoji::{convert_emojis, convert_emoticons, remove_emoji, remove_emoticons};
pub use extract::{RegexExtraction, ResultType};
pub use frequency::{rank_words, remove_words, select_words, FrequencyMode, WordCount};
pub use lexicon::{ChatWords, Stopwords, STOPWORD_LANGUAGES};
pub use spelling::SpellChecker;
pub use stem::{Lemmatizer, WordStemmer, STEMMER_LANGUAGES};
