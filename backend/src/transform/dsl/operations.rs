//! Typed operations and the execution plan.
//!
//! A validated [`InstructionDocument`] is turned into a [`Plan`]: every
//! occurrence becomes an [`Operation`] whose resources (stopword set,
//! stemmer, spell checker, compiled patterns) are built once, before any cell
//! is touched.

use serde_json::Value;

use super::document::{InstructionDocument, InstructionOccurrence};
use super::registry::Registry;
use super::target::TargetSelector;
use crate::error::PlanError;
use crate::table::Cell;
use crate::text::{
    convert_emojis, convert_emoticons, lowercase, remove_emoji, remove_emoticons, remove_html,
    remove_urls, to_date_or_datetime, ChatWords, FrequencyMode, Lemmatizer, Punctuation,
    RegexExtraction, ResultType, SpellChecker, Stopwords, WordStemmer,
};
use crate::validation::{coerce_int, scalar_text, value_text, NEW_COLUMN_ARG};

/// An instruction applied to each cell independently.
#[derive(Debug)]
pub enum CellOp {
    Lowercase,
    RemovePunct(Punctuation),
    RemoveStopwords(Stopwords),
    Stem(WordStemmer),
    Lemmatize(Lemmatizer),
    RemoveEmoji,
    RemoveEmoticons,
    ConvertEmojis,
    ConvertEmoticons,
    RemoveUrls,
    RemoveHtml,
    ChatWords(ChatWords),
    SpellCorrection(SpellChecker),
    ToDateOrDatetime,
}

impl CellOp {
    /// Apply to one cell. `Null` stays `Null`; other non-text cells are
    /// rendered to text first.
    pub fn apply(&self, cell: &Cell) -> Cell {
        let Some(text) = cell.render() else {
            return Cell::Null;
        };

        match self {
            CellOp::ToDateOrDatetime => to_date_or_datetime(&text),
            other => Cell::Text(other.apply_text(&text)),
        }
    }

    fn apply_text(&self, text: &str) -> String {
        match self {
            CellOp::Lowercase => lowercase(text),
            CellOp::RemovePunct(punctuation) => punctuation.strip(text),
            CellOp::RemoveStopwords(stopwords) => stopwords.remove(text),
            CellOp::Stem(stemmer) => stemmer.stem(text),
            CellOp::Lemmatize(lemmatizer) => lemmatizer.lemmatize(text),
            CellOp::RemoveEmoji => remove_emoji(text),
            CellOp::RemoveEmoticons => remove_emoticons(text),
            CellOp::ConvertEmojis => convert_emojis(text),
            CellOp::ConvertEmoticons => convert_emoticons(text),
            CellOp::RemoveUrls => remove_urls(text),
            CellOp::RemoveHtml => remove_html(text),
            CellOp::ChatWords(chat_words) => chat_words.expand(text),
            CellOp::SpellCorrection(checker) => checker.correct(text),
            CellOp::ToDateOrDatetime => text.to_string(),
        }
    }
}

/// `REMOVE_FREQUENT` / `REMOVE_RARE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyOp {
    pub mode: FrequencyMode,
    pub nb_words: i64,
    /// Remove the selected words instead of only reporting them.
    pub apply: bool,
}

/// `EXTRACT_REGEX_PATTERN`.
#[derive(Debug, Clone)]
pub struct ExtractOp {
    pub extraction: RegexExtraction,
    /// Output column per resolved column; `None` writes back in place.
    pub new_columns: Option<Vec<String>>,
}

/// What an instruction does to the table.
#[derive(Debug)]
pub enum Operation {
    /// Element-wise
    Cell(CellOp),
    /// Ranks words over whole columns
    Frequency(FrequencyOp),
    /// Regex extraction, possibly into new columns
    Extract(ExtractOp),
}

impl Operation {
    /// Build the operation for `occurrence`, whose name resolved to `instruction`.
    pub fn from_occurrence(instruction: &str, occurrence: &InstructionOccurrence) -> Result<Self, PlanError> {
        let args = Args { instruction: &occurrence.name, occurrence };

        let cell = |op: CellOp| Ok(Operation::Cell(op));
        match instruction {
            "LOWERCASE" => cell(CellOp::Lowercase),
            "REMOVE_PUNCT" => cell(CellOp::RemovePunct(
                args.text("punctuation")?
                    .map(|chars| Punctuation::new(&chars))
                    .unwrap_or_default(),
            )),
            "REMOVE_STOPWORDS" => {
                let stopwords = match args.text("language")? {
                    Some(language) => Stopwords::for_language(&language)
                        .ok_or_else(|| args.invalid("language", format!("no stopwords for '{}'", language)))?,
                    None => Stopwords::english(),
                };
                cell(CellOp::RemoveStopwords(stopwords))
            }
            "STEM" => {
                let stemmer = match args.text("language")? {
                    Some(language) => WordStemmer::for_language(&language)
                        .ok_or_else(|| args.invalid("language", format!("no stemmer for '{}'", language)))?,
                    None => WordStemmer::english(),
                };
                cell(CellOp::Stem(stemmer))
            }
            "LEMMATIZE_ENGLISH" => cell(CellOp::Lemmatize(Lemmatizer::new())),
            "REMOVE_EMOJI" => cell(CellOp::RemoveEmoji),
            "REMOVE_EMOTICONS" => cell(CellOp::RemoveEmoticons),
            "CONVERT_EMOJIS" => cell(CellOp::ConvertEmojis),
            "CONVERT_EMOTICONS" => cell(CellOp::ConvertEmoticons),
            "REMOVE_URLS" => cell(CellOp::RemoveUrls),
            "REMOVE_HTML" => cell(CellOp::RemoveHtml),
            "CHAT_WORDS_CONVERSION" => cell(CellOp::ChatWords(ChatWords::new())),
            "SPELL_CORRECTION" => cell(CellOp::SpellCorrection(SpellChecker::english())),
            "CONVERT_TO_DATE_OR_DATETIME" => cell(CellOp::ToDateOrDatetime),
            "REMOVE_FREQUENT" | "REMOVE_RARE" => {
                let mode = if instruction == "REMOVE_FREQUENT" {
                    FrequencyMode::Frequent
                } else {
                    FrequencyMode::Rare
                };
                let nb_words = args
                    .int("nb_words")?
                    .ok_or_else(|| args.invalid("nb_words", "argument is mandatory"))?;
                Ok(Operation::Frequency(FrequencyOp {
                    mode,
                    nb_words,
                    // any value switches destructive mode on
                    apply: occurrence.has_arg("apply"),
                }))
            }
            "EXTRACT_REGEX_PATTERN" => {
                let pattern = args
                    .text("regex_pattern")?
                    .ok_or_else(|| args.invalid("regex_pattern", "argument is mandatory"))?;
                let secondary = args.text("secondary_regex_pattern")?;
                let result_type = match args.text("result_type")? {
                    Some(name) => name
                        .parse::<ResultType>()
                        .map_err(|e| args.invalid("result_type", e))?,
                    None => ResultType::default(),
                };
                let extraction = RegexExtraction::new(&pattern, secondary.as_deref(), result_type)
                    .map_err(|e| args.invalid("regex_pattern", e.to_string()))?;
                let new_columns = match occurrence.arg(NEW_COLUMN_ARG) {
                    Some(Value::Array(items)) => Some(items.iter().map(value_text).collect()),
                    Some(_) => return Err(args.invalid(NEW_COLUMN_ARG, "must be a list")),
                    None => None,
                };
                Ok(Operation::Extract(ExtractOp { extraction, new_columns }))
            }
            other => Err(PlanError::Unsupported(other.to_string())),
        }
    }
}

/// Typed access to an occurrence's arguments.
struct Args<'a> {
    instruction: &'a str,
    occurrence: &'a InstructionOccurrence,
}

impl Args<'_> {
    fn invalid(&self, argument: &str, message: impl Into<String>) -> PlanError {
        PlanError::InvalidArgument {
            instruction: self.instruction.to_string(),
            argument: argument.to_string(),
            message: message.into(),
        }
    }

    fn text(&self, key: &str) -> Result<Option<String>, PlanError> {
        self.occurrence
            .arg(key)
            .map(|value| scalar_text(value).ok_or_else(|| self.invalid(key, "must be a string")))
            .transpose()
    }

    fn int(&self, key: &str) -> Result<Option<i64>, PlanError> {
        self.occurrence
            .arg(key)
            .map(|value| coerce_int(value).ok_or_else(|| self.invalid(key, "must be an integer")))
            .transpose()
    }
}

/// One occurrence, ready to run.
#[derive(Debug)]
pub struct Step {
    /// Name as written in the document (`REMOVE_PUNCT_1`).
    pub name: String,
    /// Registry name it resolved to (`REMOVE_PUNCT`).
    pub instruction: String,
    pub operation: Operation,
}

#[derive(Debug)]
pub struct PlannedTarget {
    pub selector: TargetSelector,
    pub steps: Vec<Step>,
}

/// A document turned into typed steps, in document order.
#[derive(Debug, Default)]
pub struct Plan {
    targets: Vec<PlannedTarget>,
}

impl Plan {
    /// Build the plan for a document that passed validation.
    pub fn build(registry: &Registry, document: &InstructionDocument) -> Result<Self, PlanError> {
        let mut targets = Vec::with_capacity(document.targets().len());

        for target in document.targets() {
            let mut steps = Vec::with_capacity(target.instructions.len());
            for occurrence in &target.instructions {
                let schema = registry
                    .resolve(&occurrence.name)
                    .ok_or_else(|| PlanError::Unsupported(occurrence.name.clone()))?;
                steps.push(Step {
                    name: occurrence.name.clone(),
                    instruction: schema.name().to_string(),
                    operation: Operation::from_occurrence(schema.name(), occurrence)?,
                });
            }
            targets.push(PlannedTarget {
                selector: target.selector.clone(),
                steps,
            });
        }

        Ok(Self { targets })
    }

    pub fn targets(&self) -> &[PlannedTarget] {
        &self.targets
    }

    pub fn step_count(&self) -> usize {
        self.targets.iter().map(|t| t.steps.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn occurrence(name: &str, args: Value) -> InstructionOccurrence {
        match args {
            Value::Object(map) => InstructionOccurrence::new(name, map),
            _ => panic!("arguments must be an object"),
        }
    }

    fn cell_op(name: &str, args: Value) -> CellOp {
        match Operation::from_occurrence(name, &occurrence(name, args)).unwrap() {
            Operation::Cell(op) => op,
            other => panic!("expected a cell operation, got {other:?}"),
        }
    }

    #[test]
    fn test_lowercase_is_idempotent() {
        let op = cell_op("LOWERCASE", json!({}));
        let once = op.apply(&Cell::text("Hello World"));
        assert_eq!(once, Cell::text("hello world"));
        assert_eq!(op.apply(&once), once);
    }

    #[test]
    fn test_remove_punct_default_and_custom() {
        let op = cell_op("REMOVE_PUNCT", json!({}));
        assert_eq!(op.apply(&Cell::text("Hi! Are you, ok?")), Cell::text("Hi Are you ok"));

        let op = cell_op("REMOVE_PUNCT", json!({"punctuation": "!"}));
        assert_eq!(op.apply(&Cell::text("Hi! ok?")), Cell::text("Hi ok?"));
    }

    #[test]
    fn test_null_passes_through() {
        let op = cell_op("STEM", json!({"language": "english"}));
        assert_eq!(op.apply(&Cell::Null), Cell::Null);
        let op = cell_op("CONVERT_TO_DATE_OR_DATETIME", json!({}));
        assert_eq!(op.apply(&Cell::Null), Cell::Null);
    }

    #[test]
    fn test_non_text_cells_are_rendered() {
        let op = cell_op("LOWERCASE", json!({}));
        assert_eq!(op.apply(&Cell::Int(42)), Cell::text("42"));
    }

    #[test]
    fn test_frequency_apply_flag() {
        let op = Operation::from_occurrence(
            "REMOVE_RARE",
            &occurrence("REMOVE_RARE_1", json!({"nb_words": "3", "apply": "anything"})),
        )
        .unwrap();
        match op {
            Operation::Frequency(f) => {
                assert_eq!(f.mode, FrequencyMode::Rare);
                assert_eq!(f.nb_words, 3);
                assert!(f.apply);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_extract_defaults_to_list_in_place() {
        let op = Operation::from_occurrence(
            "EXTRACT_REGEX_PATTERN",
            &occurrence("EXTRACT_REGEX_PATTERN", json!({"regex_pattern": "\\d+"})),
        )
        .unwrap();
        match op {
            Operation::Extract(extract) => {
                assert_eq!(extract.extraction.result_type(), ResultType::List);
                assert!(extract.new_columns.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_plan_build() {
        let doc = InstructionDocument::from_value(&json!({
            "ALL": {"LOWERCASE": {}, "REMOVE_PUNCT_1": {}},
            "a": {"REMOVE_FREQUENT": {"nb_words": 2}}
        }))
        .unwrap();
        let plan = Plan::build(&Registry::builtin(), &doc).unwrap();
        assert_eq!(plan.step_count(), 3);
        let step = &plan.targets()[0].steps[1];
        assert_eq!(step.name, "REMOVE_PUNCT_1");
        assert_eq!(step.instruction, "REMOVE_PUNCT");
    }

    #[test]
    fn test_plan_rejects_unknown() {
        let doc = InstructionDocument::from_value(&json!({"ALL": {"SHOUT": {}}})).unwrap();
        assert!(matches!(
            Plan::build(&Registry::builtin(), &doc),
            Err(PlanError::Unsupported(name)) if name == "SHOUT"
        ));
    }
}
