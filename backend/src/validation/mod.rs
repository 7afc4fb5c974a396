//! Instruction document validation.
//!
//! A document is checked against a [`Registry`] and the columns of the table
//! it will run on. Validation never stops at the first problem: every
//! unknown column, unknown instruction and bad argument in the whole document
//! is collected into one [`ValidationReport`], so a user can fix everything
//! from a single run.
//!
//! # Checks
//!
//! - every column a target names must exist (columns created earlier in the
//!   document by `new_column_name` count as existing)
//! - every instruction must resolve in the registry, optionally through a
//!   `_<digit>` suffix
//! - mandatory arguments must be present, unknown arguments are rejected
//! - every argument value must satisfy its type tag
//!
//! `dir+` and `file+` arguments are created on the spot when missing.
//!
//! # Example
//!
//! ```rust,ignore
//! use textprep::{validate, InstructionDocument, Registry};
//!
//! let doc = InstructionDocument::from_json(r#"{"ALL": {"REMOVE_FREQUENT": {}}}"#)?;
//! let report = validate(&Registry::builtin(), &doc, &["review".to_string()]);
//! assert_eq!(report.to_string(), "Error: REMOVE_FREQUENT : argument nb_words is mandatory.");
//! ```

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::transform::dsl::document::{InstructionDocument, InstructionOccurrence};
use crate::transform::dsl::registry::{ArgType, InstructionSchema, Registry};
use crate::transform::dsl::target::resolve;

/// Argument holding the names of the columns an instruction creates.
pub const NEW_COLUMN_ARG: &str = "new_column_name";

/// What a mistyped argument should have been.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Integer,
    Float,
    String,
    List,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Expected::Integer => "an integer",
            Expected::Float => "a float",
            Expected::String => "a string",
            Expected::List => "a list",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Directory,
    File,
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PathKind::Directory => "directory",
            PathKind::File => "file",
        })
    }
}

/// One problem found in an instruction document.
///
/// `instruction` is always the name as written in the document, suffix
/// included.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Error: {column} : unknown column.")]
    UnknownColumn { column: String },

    #[error("Error: {instruction} : unknown instruction.")]
    UnknownInstruction { instruction: String },

    #[error("Error: {instruction} : argument {argument} is mandatory.")]
    MissingMandatoryArgument { instruction: String, argument: String },

    #[error("Error: {instruction} : argument {argument} is not a valid argument.")]
    UnknownArgument { instruction: String, argument: String },

    #[error("Error: {instruction} : argument {argument} must be {expected}.")]
    TypeMismatch {
        instruction: String,
        argument: String,
        expected: Expected,
    },

    #[error("Error: {instruction} : argument {argument} must be a valid regular expression ({reason}).")]
    InvalidPattern {
        instruction: String,
        argument: String,
        reason: String,
    },

    #[error("Error: {instruction} : argument {argument} must be in [{}].", .allowed.join(", "))]
    ValueNotAllowed {
        instruction: String,
        argument: String,
        allowed: Vec<String>,
    },

    #[error("Error: {instruction} : argument {argument} must be a valid {kind}.")]
    PathNotFound {
        instruction: String,
        argument: String,
        kind: PathKind,
    },

    #[error("Error: {instruction} : argument {argument} : unable to create {kind} '{path}'.")]
    CreationFailed {
        instruction: String,
        argument: String,
        kind: PathKind,
        path: String,
    },

    #[error("Error: {instruction} : argument new_column_name must name {expected} column(s), got {found}.")]
    ColumnCountMismatch {
        instruction: String,
        expected: usize,
        found: usize,
    },
}

/// Every error found in a document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// One line per error.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("\n"))
    }
}

impl std::error::Error for ValidationReport {}

/// Validate `document` against `registry` for a table with `columns`.
pub fn validate(registry: &Registry, document: &InstructionDocument, columns: &[String]) -> ValidationReport {
    let mut errors = Vec::new();
    // Grows as EXTRACT_REGEX_PATTERN occurrences name new columns.
    let mut known: Vec<String> = columns.to_vec();

    for target in document.targets() {
        for column in target.selector.named_columns() {
            if !known.iter().any(|k| k == column) {
                errors.push(ValidationError::UnknownColumn {
                    column: column.to_string(),
                });
            }
        }

        for occurrence in &target.instructions {
            let Some(schema) = registry.resolve(&occurrence.name) else {
                errors.push(ValidationError::UnknownInstruction {
                    instruction: occurrence.name.clone(),
                });
                continue;
            };

            check_occurrence(schema, occurrence, &mut errors);

            if let Some(new_columns) = new_column_names(schema, occurrence) {
                let resolved = resolve(&target.selector, &known);
                if new_columns.len() != resolved.len() {
                    errors.push(ValidationError::ColumnCountMismatch {
                        instruction: occurrence.name.clone(),
                        expected: resolved.len(),
                        found: new_columns.len(),
                    });
                } else {
                    for column in new_columns {
                        if !known.contains(&column) {
                            known.push(column);
                        }
                    }
                }
            }
        }
    }

    ValidationReport::new(errors)
}

/// Mandatory presence, then every supplied argument.
fn check_occurrence(schema: &InstructionSchema, occurrence: &InstructionOccurrence, errors: &mut Vec<ValidationError>) {
    for argument in schema.mandatory_args() {
        if !occurrence.has_arg(argument) {
            errors.push(ValidationError::MissingMandatoryArgument {
                instruction: occurrence.name.clone(),
                argument: argument.to_string(),
            });
        }
    }

    for (argument, value) in &occurrence.args {
        match schema.arg(argument) {
            None => errors.push(ValidationError::UnknownArgument {
                instruction: occurrence.name.clone(),
                argument: argument.clone(),
            }),
            Some(spec) => {
                if let Err(error) = check_value(&spec.arg_type, &occurrence.name, argument, value) {
                    errors.push(error);
                }
            }
        }
    }
}

/// Names in a well-typed `new_column_name` list.
fn new_column_names(schema: &InstructionSchema, occurrence: &InstructionOccurrence) -> Option<Vec<String>> {
    schema.arg(NEW_COLUMN_ARG)?;
    match occurrence.arg(NEW_COLUMN_ARG)? {
        Value::Array(items) => Some(items.iter().map(value_text).collect()),
        _ => None,
    }
}

/// Text of a JSON value as used for column names and paths.
pub(crate) fn value_text(value: &Value) -> String {
    scalar_text(value).unwrap_or_else(|| value.to_string())
}

/// Strings, numbers and booleans as text; `None` for everything else.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integer coercion: JSON integers, floats without fraction, numeric strings.
pub(crate) fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn check_value(arg_type: &ArgType, instruction: &str, argument: &str, value: &Value) -> Result<(), ValidationError> {
    let mismatch = |expected| ValidationError::TypeMismatch {
        instruction: instruction.to_string(),
        argument: argument.to_string(),
        expected,
    };
    let not_allowed = |allowed: Vec<String>| ValidationError::ValueNotAllowed {
        instruction: instruction.to_string(),
        argument: argument.to_string(),
        allowed,
    };

    match arg_type {
        ArgType::None => Ok(()),
        ArgType::Int => coerce_int(value).map(|_| ()).ok_or(mismatch(Expected::Integer)),
        ArgType::Float => coerce_float(value).map(|_| ()).ok_or(mismatch(Expected::Float)),
        ArgType::Str => scalar_text(value).map(|_| ()).ok_or(mismatch(Expected::String)),
        ArgType::Regex => {
            let pattern = scalar_text(value).ok_or(mismatch(Expected::String))?;
            Regex::new(&pattern)
                .map(|_| ())
                .map_err(|e| ValidationError::InvalidPattern {
                    instruction: instruction.to_string(),
                    argument: argument.to_string(),
                    reason: regex_reason(&e),
                })
        }
        ArgType::List => {
            if value.is_array() {
                Ok(())
            } else {
                Err(mismatch(Expected::List))
            }
        }
        ArgType::StrInList(allowed) => match value.as_str() {
            Some(s) if allowed.iter().any(|a| a == s) => Ok(()),
            _ => Err(not_allowed(allowed.iter().map(|a| format!("'{}'", a)).collect())),
        },
        ArgType::IntInList(allowed) => {
            let n = coerce_int(value).ok_or(mismatch(Expected::Integer))?;
            if allowed.contains(&n) {
                Ok(())
            } else {
                Err(not_allowed(allowed.iter().map(i64::to_string).collect()))
            }
        }
        ArgType::Dir | ArgType::File => {
            let kind = if matches!(arg_type, ArgType::Dir) { PathKind::Directory } else { PathKind::File };
            let path = scalar_text(value).ok_or(mismatch(Expected::String))?;
            let path = Path::new(&path);
            let exists = match kind {
                PathKind::Directory => path.is_dir(),
                PathKind::File => path.is_file(),
            };
            if exists {
                Ok(())
            } else {
                Err(ValidationError::PathNotFound {
                    instruction: instruction.to_string(),
                    argument: argument.to_string(),
                    kind,
                })
            }
        }
        ArgType::DirCreate | ArgType::FileCreate => {
            let kind = if matches!(arg_type, ArgType::DirCreate) { PathKind::Directory } else { PathKind::File };
            let raw = scalar_text(value).ok_or(mismatch(Expected::String))?;
            ensure_path(Path::new(&raw), kind).map_err(|_| ValidationError::CreationFailed {
                instruction: instruction.to_string(),
                argument: argument.to_string(),
                kind,
                path: raw.clone(),
            })
        }
    }
}

/// Create a missing directory tree or empty file.
fn ensure_path(path: &Path, kind: PathKind) -> std::io::Result<()> {
    match kind {
        PathKind::Directory if path.is_dir() => Ok(()),
        PathKind::Directory => fs::create_dir_all(path),
        PathKind::File if path.is_file() => Ok(()),
        PathKind::File => fs::File::create(path).map(|_| ()),
    }
}

/// Last line of a regex error (the multi-line form points into the pattern).
fn regex_reason(error: &regex::Error) -> String {
    let text = error.to_string();
    text.lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.trim().trim_start_matches("error: ").to_string())
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::dsl::registry::{ArgSpec, InstructionSchema};
    use serde_json::json;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn check(doc: Value, cols: &[&str]) -> ValidationReport {
        let doc = InstructionDocument::from_value(&doc).unwrap();
        validate(&Registry::builtin(), &doc, &columns(cols))
    }

    #[test]
    fn test_valid_document() {
        let report = check(
            json!({
                "ALL": {"LOWERCASE": {}, "REMOVE_PUNCT": {"punctuation": "!?"}},
                "COLUMNS;a;b": {"REMOVE_FREQUENT": {"nb_words": 3, "apply": "-e"}},
                "a": {"STEM": {"language": "french"}}
            }),
            &["a", "b"],
        );
        assert!(report.is_empty(), "{}", report);
    }

    #[test]
    fn test_unknown_columns_reported_once_each() {
        let report = check(
            json!({
                "COLUMNS;a;x;y": {"LOWERCASE": {}},
                "z": {"LOWERCASE": {}}
            }),
            &["a"],
        );
        assert_eq!(
            report.messages(),
            vec![
                "Error: x : unknown column.",
                "Error: y : unknown column.",
                "Error: z : unknown column.",
            ]
        );
    }

    #[test]
    fn test_repeated_unknown_column_in_one_selector() {
        let report = check(json!({"COLUMNS;x;a;x": {"LOWERCASE": {}}}), &["a"]);
        assert_eq!(report.messages(), vec!["Error: x : unknown column."]);
    }

    #[test]
    fn test_unknown_instruction_skips_argument_checks() {
        let report = check(json!({"ALL": {"SHOUT": {"volume": 11}}}), &["a"]);
        assert_eq!(report.messages(), vec!["Error: SHOUT : unknown instruction."]);
    }

    #[test]
    fn test_missing_mandatory_argument_exactly_once() {
        let report = check(
            json!({"ALL": {"REMOVE_FREQUENT": {"apply": "-e"}}}),
            &["a"],
        );
        assert_eq!(
            report.errors(),
            &[ValidationError::MissingMandatoryArgument {
                instruction: "REMOVE_FREQUENT".into(),
                argument: "nb_words".into(),
            }]
        );
    }

    #[test]
    fn test_suffixed_name_in_messages() {
        let report = check(
            json!({"ALL": {"REMOVE_RARE": {"nb_words": 2}, "REMOVE_RARE_1": {"count": 2}}}),
            &["a"],
        );
        assert_eq!(
            report.messages(),
            vec![
                "Error: REMOVE_RARE_1 : argument nb_words is mandatory.",
                "Error: REMOVE_RARE_1 : argument count is not a valid argument.",
            ]
        );
    }

    #[test]
    fn test_type_checks() {
        let report = check(
            json!({
                "ALL": {
                    "REMOVE_FREQUENT": {"nb_words": "ten"},
                    "REMOVE_RARE": {"nb_words": "10"},
                    "REMOVE_PUNCT": {"punctuation": ["!"]},
                    "EXTRACT_REGEX_PATTERN": {"regex_pattern": "\\d", "new_column_name": "n"}
                }
            }),
            &["a"],
        );
        assert_eq!(
            report.messages(),
            vec![
                "Error: REMOVE_FREQUENT : argument nb_words must be an integer.",
                "Error: REMOVE_PUNCT : argument punctuation must be a string.",
                "Error: EXTRACT_REGEX_PATTERN : argument new_column_name must be a list.",
            ]
        );
    }

    #[test]
    fn test_int_accepts_whole_floats() {
        let report = check(json!({"ALL": {"REMOVE_RARE": {"nb_words": 4.0}}}), &["a"]);
        assert!(report.is_empty());
        let report = check(json!({"ALL": {"REMOVE_RARE": {"nb_words": 4.5}}}), &["a"]);
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_value_not_allowed() {
        let report = check(
            json!({"ALL": {"STEM": {"language": "klingon"}, "REMOVE_FREQUENT": {"nb_words": 1, "apply": "yes"}}}),
            &["a"],
        );
        assert_eq!(report.len(), 2);
        assert_eq!(
            report.messages()[1],
            "Error: REMOVE_FREQUENT : argument apply must be in ['-e']."
        );
    }

    #[test]
    fn test_invalid_regex() {
        let report = check(
            json!({"a": {"EXTRACT_REGEX_PATTERN": {"regex_pattern": "(unclosed"}}}),
            &["a"],
        );
        assert!(matches!(report.errors()[0], ValidationError::InvalidPattern { .. }));
        assert!(report.to_string().starts_with(
            "Error: EXTRACT_REGEX_PATTERN : argument regex_pattern must be a valid regular expression ("
        ));
    }

    #[test]
    fn test_errors_are_collected_across_targets() {
        let report = check(
            json!({
                "missing": {"LOWERCASE": {}},
                "ALL": {"NOPE": {}, "REMOVE_FREQUENT": {}},
                "COLUMNS;a;gone": {"STEM": {"language": 3}}
            }),
            &["a"],
        );
        assert_eq!(report.len(), 5);
        assert_eq!(report.to_string().lines().count(), 5);
    }

    #[test]
    fn test_new_columns_become_known() {
        let report = check(
            json!({
                "a": {"EXTRACT_REGEX_PATTERN": {"regex_pattern": "\\d+", "new_column_name": ["digits"]}},
                "digits": {"LOWERCASE": {}}
            }),
            &["a"],
        );
        assert!(report.is_empty(), "{}", report);
    }

    #[test]
    fn test_new_column_count_must_match() {
        let report = check(
            json!({
                "COLUMNS;a;b": {"EXTRACT_REGEX_PATTERN": {"regex_pattern": "\\d+", "new_column_name": ["only_one"]}},
                "only_one": {"LOWERCASE": {}}
            }),
            &["a", "b"],
        );
        assert_eq!(
            report.messages(),
            vec![
                "Error: EXTRACT_REGEX_PATTERN : argument new_column_name must name 2 column(s), got 1.",
                "Error: only_one : unknown column.",
            ]
        );
    }

    fn path_registry() -> Registry {
        Registry::new().with_instruction(
            InstructionSchema::new("EXPORT", "test")
                .with_arg("dir", ArgSpec::optional(ArgType::Dir))
                .with_arg("file", ArgSpec::optional(ArgType::File))
                .with_arg("out_dir", ArgSpec::optional(ArgType::DirCreate))
                .with_arg("out_file", ArgSpec::optional(ArgType::FileCreate))
                .with_arg("level", ArgSpec::optional(ArgType::IntInList(vec![1, 2, 3])))
                .with_arg("ratio", ArgSpec::optional(ArgType::Float)),
        )
    }

    fn check_with(registry: &Registry, args: Value) -> ValidationReport {
        let doc = InstructionDocument::from_value(&json!({"ALL": {"EXPORT": args}})).unwrap();
        validate(registry, &doc, &columns(&["a"]))
    }

    #[test]
    fn test_existing_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("words.txt");
        fs::write(&file, "x").unwrap();

        let registry = path_registry();
        let ok = check_with(&registry, json!({"dir": tmp.path().to_str(), "file": file.to_str()}));
        assert!(ok.is_empty(), "{}", ok);

        let bad = check_with(&registry, json!({"dir": file.to_str(), "file": tmp.path().to_str()}));
        assert_eq!(
            bad.messages(),
            vec![
                "Error: EXPORT : argument dir must be a valid directory.",
                "Error: EXPORT : argument file must be a valid file.",
            ]
        );
    }

    #[test]
    fn test_paths_created_when_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let out_dir = tmp.path().join("nested").join("out");
        let out_file = tmp.path().join("report.txt");

        let report = check_with(
            &path_registry(),
            json!({"out_dir": out_dir.to_str(), "out_file": out_file.to_str()}),
        );
        assert!(report.is_empty(), "{}", report);
        assert!(out_dir.is_dir());
        assert!(out_file.is_file());
    }

    #[test]
    fn test_creation_failure_is_collected() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let impossible = blocker.join("child.txt");

        let report = check_with(
            &path_registry(),
            json!({"out_file": impossible.to_str(), "level": 7, "ratio": "fast"}),
        );
        assert_eq!(report.len(), 3);
        assert!(matches!(
            report.errors()[0],
            ValidationError::CreationFailed { kind: PathKind::File, .. }
        ));
        assert_eq!(report.messages()[1], "Error: EXPORT : argument level must be in [1, 2, 3].");
        assert_eq!(report.messages()[2], "Error: EXPORT : argument ratio must be a float.");
    }
}
