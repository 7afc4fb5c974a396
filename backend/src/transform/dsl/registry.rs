//! Instruction registry.
//!
//! Every instruction a document may use is declared here with the arguments
//! it accepts. The validator checks documents against a [`Registry`]; the
//! plan builder only ever sees documents that passed that check.

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::text::{ResultType, STEMMER_LANGUAGES, STOPWORD_LANGUAGES};

/// Type tag of an argument, with its allowed values where relevant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "allowed")]
pub enum ArgType {
    /// Any value, never checked.
    #[serde(rename = "none")]
    None,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "str")]
    Str,
    /// A string that must compile as a regular expression.
    #[serde(rename = "regex")]
    Regex,
    #[serde(rename = "list")]
    List,
    #[serde(rename = "str_inlist")]
    StrInList(Vec<String>),
    #[serde(rename = "int_inlist")]
    IntInList(Vec<i64>),
    /// Existing directory.
    #[serde(rename = "dir")]
    Dir,
    /// Existing file.
    #[serde(rename = "file")]
    File,
    /// Directory, created when absent.
    #[serde(rename = "dir+")]
    DirCreate,
    /// File, created empty when absent.
    #[serde(rename = "file+")]
    FileCreate,
}

impl ArgType {
    pub fn str_in(allowed: &[&str]) -> Self {
        ArgType::StrInList(allowed.iter().map(|s| s.to_string()).collect())
    }

    /// The tag as written in descriptions (`int`, `str_inlist`, `dir+`, ...).
    pub fn tag(&self) -> &'static str {
        match self {
            ArgType::None => "none",
            ArgType::Int => "int",
            ArgType::Float => "float",
            ArgType::Str => "str",
            ArgType::Regex => "regex",
            ArgType::List => "list",
            ArgType::StrInList(_) => "str_inlist",
            ArgType::IntInList(_) => "int_inlist",
            ArgType::Dir => "dir",
            ArgType::File => "file",
            ArgType::DirCreate => "dir+",
            ArgType::FileCreate => "file+",
        }
    }
}

/// Type and presence requirement of one argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgSpec {
    #[serde(flatten)]
    pub arg_type: ArgType,
    pub mandatory: bool,
}

impl ArgSpec {
    pub fn optional(arg_type: ArgType) -> Self {
        Self { arg_type, mandatory: false }
    }

    pub fn mandatory(arg_type: ArgType) -> Self {
        Self { arg_type, mandatory: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Argument {
    pub name: String,
    #[serde(flatten)]
    pub spec: ArgSpec,
}

/// Registry entry: an instruction name and the arguments it accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstructionSchema {
    name: String,
    description: String,
    arguments: Vec<Argument>,
}

impl InstructionSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            arguments: Vec::new(),
        }
    }

    /// Add an argument (builder style).
    pub fn with_arg(mut self, name: impl Into<String>, spec: ArgSpec) -> Self {
        self.arguments.push(Argument { name: name.into(), spec });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Spec of the argument called `name`.
    pub fn arg(&self, name: &str) -> Option<&ArgSpec> {
        self.arguments.iter().find(|a| a.name == name).map(|a| &a.spec)
    }

    pub fn mandatory_args(&self) -> impl Iterator<Item = &str> {
        self.arguments
            .iter()
            .filter(|a| a.spec.mandatory)
            .map(|a| a.name.as_str())
    }
}

/// The set of known instructions, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    instructions: Vec<InstructionSchema>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an instruction.
    pub fn with_instruction(mut self, schema: InstructionSchema) -> Self {
        match self.index.get(schema.name()) {
            Some(&i) => self.instructions[i] = schema,
            None => {
                self.index.insert(schema.name().to_string(), self.instructions.len());
                self.instructions.push(schema);
            }
        }
        self
    }

    /// Exact lookup.
    pub fn lookup(&self, name: &str) -> Option<&InstructionSchema> {
        self.index.get(name).map(|&i| &self.instructions[i])
    }

    /// Look `raw` up, falling back to the name without its `_<digit>` suffix.
    ///
    /// `EXTRACT_REGEX_PATTERN_1` resolves to `EXTRACT_REGEX_PATTERN` unless
    /// the registry has an entry for the suffixed name itself.
    pub fn resolve(&self, raw: &str) -> Option<&InstructionSchema> {
        if let Some(schema) = self.lookup(raw) {
            return Some(schema);
        }
        strip_suffix(raw).and_then(|base| self.lookup(base))
    }

    pub fn instructions(&self) -> impl Iterator<Item = &InstructionSchema> {
        self.instructions.iter()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Every instruction as JSON, for the HTTP API.
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.instructions
                .iter()
                .filter_map(|s| serde_json::to_value(s).ok())
                .collect(),
        )
    }

    /// Human-readable table of instructions and their arguments.
    pub fn description(&self) -> String {
        let mut out = String::from(
            "Available instructions:\n\n| Instruction | Description | Arguments |\n|-------------|-------------|-----------|\n",
        );
        for schema in &self.instructions {
            let args = if schema.arguments.is_empty() {
                "-".to_string()
            } else {
                schema
                    .arguments
                    .iter()
                    .map(describe_argument)
                    .collect::<Vec<_>>()
                    .join("; ")
            };
            out.push_str(&format!("| {} | {} | {} |\n", schema.name, schema.description, args));
        }
        out.push_str(
            "\nTargets: ALL (every column), COLUMNS;a;b (listed columns) or a column name.\n\
             Repeat an instruction in one target with a numeric suffix, e.g. REMOVE_PUNCT_1.\n",
        );
        out
    }

    /// The instructions shipped with textprep.
    pub fn builtin() -> Self {
        let language = |languages: &[&str]| ArgSpec::optional(ArgType::str_in(languages));
        let apply = || ArgSpec::optional(ArgType::str_in(&["-e"]));

        Registry::new()
            .with_instruction(InstructionSchema::new("LOWERCASE", "Lowercase the text"))
            .with_instruction(
                InstructionSchema::new("REMOVE_PUNCT", "Remove punctuation characters")
                    .with_arg("punctuation", ArgSpec::optional(ArgType::Str)),
            )
            .with_instruction(
                InstructionSchema::new("REMOVE_STOPWORDS", "Remove stopwords (default english)")
                    .with_arg("language", language(STOPWORD_LANGUAGES)),
            )
            .with_instruction(
                InstructionSchema::new(
                    "REMOVE_FREQUENT",
                    "Report the most frequent words of each column, remove them with apply",
                )
                .with_arg("nb_words", ArgSpec::mandatory(ArgType::Int))
                .with_arg("apply", apply()),
            )
            .with_instruction(
                InstructionSchema::new(
                    "REMOVE_RARE",
                    "Report the rarest words of each column, remove them with apply",
                )
                .with_arg("nb_words", ArgSpec::mandatory(ArgType::Int))
                .with_arg("apply", apply()),
            )
            .with_instruction(
                InstructionSchema::new("STEM", "Lowercase and stem each word (default english)")
                    .with_arg("language", language(STEMMER_LANGUAGES)),
            )
            .with_instruction(InstructionSchema::new(
                "LEMMATIZE_ENGLISH",
                "Reduce English words to their lemma",
            ))
            .with_instruction(InstructionSchema::new("REMOVE_EMOJI", "Remove emojis"))
            .with_instruction(InstructionSchema::new("REMOVE_EMOTICONS", "Remove emoticons"))
            .with_instruction(InstructionSchema::new("CONVERT_EMOJIS", "Replace emojis with their name"))
            .with_instruction(InstructionSchema::new(
                "CONVERT_EMOTICONS",
                "Replace emoticons with their meaning",
            ))
            .with_instruction(InstructionSchema::new("REMOVE_URLS", "Remove URLs"))
            .with_instruction(InstructionSchema::new("REMOVE_HTML", "Remove HTML tags"))
            .with_instruction(InstructionSchema::new(
                "CHAT_WORDS_CONVERSION",
                "Expand chat abbreviations (BRB, IMO, ...)",
            ))
            .with_instruction(InstructionSchema::new("SPELL_CORRECTION", "Correct English spelling"))
            .with_instruction(InstructionSchema::new(
                "CONVERT_TO_DATE_OR_DATETIME",
                "Parse dates; midnight gives a date, anything else a datetime",
            ))
            .with_instruction(
                InstructionSchema::new(
                    "EXTRACT_REGEX_PATTERN",
                    "Extract regex matches, in place or into new columns",
                )
                .with_arg("regex_pattern", ArgSpec::mandatory(ArgType::Regex))
                .with_arg("secondary_regex_pattern", ArgSpec::optional(ArgType::Regex))
                .with_arg("new_column_name", ArgSpec::optional(ArgType::List))
                .with_arg("result_type", ArgSpec::optional(ArgType::str_in(ResultType::NAMES))),
            )
    }
}

/// `NAME_1` -> `NAME`.
fn strip_suffix(raw: &str) -> Option<&str> {
    let bytes = raw.as_bytes();
    let n = bytes.len();
    if n > 2 && bytes[n - 2] == b'_' && bytes[n - 1].is_ascii_digit() {
        Some(&raw[..n - 2])
    } else {
        None
    }
}

fn describe_argument(arg: &Argument) -> String {
    let mut text = format!("{}: {}", arg.name, arg.spec.arg_type.tag());
    match &arg.spec.arg_type {
        ArgType::StrInList(allowed) => text.push_str(&format!(" [{}]", allowed.join(", "))),
        ArgType::IntInList(allowed) => {
            let allowed: Vec<String> = allowed.iter().map(i64::to_string).collect();
            text.push_str(&format!(" [{}]", allowed.join(", ")));
        }
        _ => {}
    }
    if arg.spec.mandatory {
        text.push_str(", mandatory");
    }
    text
}

/// An example instruction document for documentation.
pub fn example_document() -> Value {
    json!({
        "ALL": {
            "LOWERCASE": {},
            "REMOVE_URLS": {},
            "REMOVE_HTML": {},
            "CONVERT_EMOTICONS": {},
            "REMOVE_PUNCT": {}
        },
        "COLUMNS;review;title": {
            "REMOVE_STOPWORDS": {"language": "english"},
            "REMOVE_FREQUENT": {"nb_words": 5},
            "REMOVE_RARE": {"nb_words": 10, "apply": "-e"},
            "STEM": {"language": "english"}
        },
        "comment": {
            "EXTRACT_REGEX_PATTERN": {
                "regex_pattern": "\\d+ ?(?:€|EUR|\\$)",
                "secondary_regex_pattern": "\\d+",
                "new_column_name": ["price"],
                "result_type": "int"
            },
            "EXTRACT_REGEX_PATTERN_1": {
                "regex_pattern": "\\d{4}-\\d{2}-\\d{2}",
                "new_column_name": ["date"],
                "result_type": "date"
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_contents() {
        let registry = Registry::builtin();
        assert_eq!(registry.len(), 17);
        let freq = registry.lookup("REMOVE_FREQUENT").unwrap();
        assert_eq!(freq.mandatory_args().collect::<Vec<_>>(), vec!["nb_words"]);
        assert!(freq.arg("apply").is_some());
        assert!(registry.lookup("LOWERCASE").unwrap().arguments().is_empty());
    }

    #[test]
    fn test_resolve_suffix() {
        let registry = Registry::builtin();
        assert_eq!(registry.resolve("REMOVE_PUNCT_1").unwrap().name(), "REMOVE_PUNCT");
        assert_eq!(registry.resolve("LOWERCASE").unwrap().name(), "LOWERCASE");
        assert!(registry.resolve("LOWERCASE_12").is_none());
        assert!(registry.resolve("LOWERCASE_x").is_none());
        assert!(registry.resolve("UNKNOWN_1").is_none());
    }

    #[test]
    fn test_exact_name_wins_over_suffix() {
        let registry = Registry::new()
            .with_instruction(InstructionSchema::new("FOO", "base"))
            .with_instruction(InstructionSchema::new("FOO_1", "own entry"));
        assert_eq!(registry.resolve("FOO_1").unwrap().description(), "own entry");
        assert_eq!(registry.resolve("FOO_2").unwrap().description(), "base");
    }

    #[test]
    fn test_description_lists_everything() {
        let registry = Registry::builtin();
        let description = registry.description();
        for schema in registry.instructions() {
            assert!(description.contains(schema.name()));
        }
        assert!(description.contains("nb_words: int, mandatory"));
    }

    #[test]
    fn test_json_shape() {
        let json = Registry::builtin().to_json();
        let extract = json
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["name"] == "EXTRACT_REGEX_PATTERN")
            .unwrap();
        let first = &extract["arguments"][0];
        assert_eq!(first["name"], "regex_pattern");
        assert_eq!(first["type"], "regex");
        assert_eq!(first["mandatory"], true);
    }
}
