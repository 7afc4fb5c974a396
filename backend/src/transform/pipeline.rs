//! High-level pipeline API: load, validate, plan, execute.
//!
//! Validation is a hard gate. A document with any error never reaches the
//! executor; the caller gets [`PipelineError::Validation`] carrying every
//! error found.
//!
//! # Example
//!
//! ```rust,ignore
//! use textprep::preprocess_csv;
//!
//! let outcome = preprocess_csv("reviews.csv", "instructions.json")?;
//! outcome.table.write_csv(std::io::stdout(), b',')?;
//! ```

use serde::Serialize;
use std::path::Path;

use crate::api::logs::{log_info, log_success};
use crate::error::{PipelineError, PipelineResult};
use crate::parser::{parse_bytes_auto, parse_csv_file_auto, ParseResult};
use crate::table::Table;
use crate::transform::dsl::{execute, ExecutionResult, FrequencyReport, InstructionDocument, Plan, Registry};
use crate::validation::{validate, ValidationReport};

/// CSV file information
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

impl CsvInfo {
    fn from_parse(parse: &ParseResult) -> Self {
        Self {
            encoding: parse.encoding.clone(),
            delimiter: parse.delimiter,
            headers: parse.headers(),
            row_count: parse.table.row_count(),
        }
    }
}

/// Result of a complete preprocessing run
#[derive(Debug)]
pub struct PipelineOutcome {
    /// The preprocessed table
    pub table: Table,
    /// Frequency reports of REMOVE_FREQUENT / REMOVE_RARE steps
    pub rankings: Vec<FrequencyReport>,
    /// CSV parsing metadata
    pub csv_info: CsvInfo,
}

/// Validate `document` for `table` without running anything.
pub fn check_document(registry: &Registry, document: &InstructionDocument, table: &Table) -> ValidationReport {
    validate(registry, document, &table.column_names())
}

/// Validate, plan and execute `document` on a copy of `table`.
pub fn preprocess_table(
    registry: &Registry,
    document: &InstructionDocument,
    table: &Table,
) -> PipelineResult<ExecutionResult> {
    log_info("Checking instructions...");
    let report = check_document(registry, document, table);
    if !report.is_empty() {
        return Err(PipelineError::Validation(report));
    }
    log_success(format!(
        "{} instruction(s) on {} target(s) are valid",
        document.instruction_count(),
        document.targets().len()
    ));

    let plan = Plan::build(registry, document)?;
    let result = execute(&plan, table)?;
    log_success(result.summary());
    Ok(result)
}

/// Load a CSV file and an instruction document file, then preprocess.
pub fn preprocess_csv(csv_path: impl AsRef<Path>, document_path: impl AsRef<Path>) -> PipelineResult<PipelineOutcome> {
    let parsed = load_csv(csv_path.as_ref())?;
    let document = InstructionDocument::from_file(document_path)?;
    preprocess_parsed(parsed, &document)
}

/// Same as [`preprocess_csv`] with the CSV and the document given as bytes.
pub fn preprocess_bytes(csv: &[u8], document: &[u8]) -> PipelineResult<PipelineOutcome> {
    let parsed = parse_bytes_auto(csv)?;
    log_csv_info(&parsed);
    let document = InstructionDocument::from_bytes(document)?;
    preprocess_parsed(parsed, &document)
}

/// Validation only, from files.
pub fn check_csv(csv_path: impl AsRef<Path>, document_path: impl AsRef<Path>) -> PipelineResult<ValidationReport> {
    let parsed = load_csv(csv_path.as_ref())?;
    let document = InstructionDocument::from_file(document_path)?;
    Ok(check_document(&Registry::builtin(), &document, &parsed.table))
}

/// Validation only, from bytes.
pub fn check_bytes(csv: &[u8], document: &[u8]) -> PipelineResult<ValidationReport> {
    let parsed = parse_bytes_auto(csv)?;
    let document = InstructionDocument::from_bytes(document)?;
    Ok(check_document(&Registry::builtin(), &document, &parsed.table))
}

/// Parse a CSV file with auto-detection and log what was found.
pub fn load_csv(path: &Path) -> PipelineResult<ParseResult> {
    log_info(format!("Reading {}...", path.display()));
    let parsed = parse_csv_file_auto(path)?;
    log_csv_info(&parsed);
    Ok(parsed)
}

fn preprocess_parsed(parsed: ParseResult, document: &InstructionDocument) -> PipelineResult<PipelineOutcome> {
    if parsed.table.row_count() == 0 {
        return Err(PipelineError::EmptyInput);
    }

    let csv_info = CsvInfo::from_parse(&parsed);
    let result = preprocess_table(&Registry::builtin(), document, &parsed.table)?;

    Ok(PipelineOutcome {
        table: result.table,
        rankings: result.rankings,
        csv_info,
    })
}

fn log_csv_info(parsed: &ParseResult) {
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!("Detected separator: '{}'", format_delimiter(parsed.delimiter)));
    log_success(format!(
        "Read {} rows, {} columns",
        parsed.table.row_count(),
        parsed.table.column_count()
    ));
}

/// Format delimiter for display
fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;
    use std::fs;

    fn write_inputs(dir: &Path, csv: &str, doc: &str) -> (std::path::PathBuf, std::path::PathBuf) {
        let csv_path = dir.join("input.csv");
        let doc_path = dir.join("instructions.json");
        fs::write(&csv_path, csv).unwrap();
        fs::write(&doc_path, doc).unwrap();
        (csv_path, doc_path)
    }

    #[test]
    fn test_preprocess_csv() {
        let dir = tempfile::tempdir().unwrap();
        let (csv_path, doc_path) = write_inputs(
            dir.path(),
            "id;review\n1;Great PRODUCT!!\n2;Bad, really BAD\n",
            r#"{"review": {"LOWERCASE": {}, "REMOVE_PUNCT": {}}}"#,
        );

        let outcome = preprocess_csv(&csv_path, &doc_path).unwrap();
        assert_eq!(outcome.csv_info.delimiter, ';');
        assert_eq!(outcome.csv_info.row_count, 2);
        assert_eq!(
            outcome.table.column("review").unwrap(),
            &[Cell::text("great product"), Cell::text("bad really bad")]
        );
        assert_eq!(outcome.table.column("id").unwrap(), &[Cell::text("1"), Cell::text("2")]);
    }

    #[test]
    fn test_validation_failure_stops_before_execution() {
        let table = Table::from_text_columns(&[("a", &["Text"])]).unwrap();
        let doc = InstructionDocument::from_json(
            r#"{"missing": {"LOWERCASE": {}}, "ALL": {"REMOVE_RARE": {}}}"#,
        )
        .unwrap();

        let err = preprocess_table(&Registry::builtin(), &doc, &table).unwrap_err();
        match err {
            PipelineError::Validation(report) => {
                assert_eq!(
                    report.to_string(),
                    "Error: missing : unknown column.\nError: REMOVE_RARE : argument nb_words is mandatory."
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_preprocess_bytes_with_rankings() {
        let outcome = preprocess_bytes(
            b"text\nthe cat\nthe dog\n",
            br#"{"text": {"REMOVE_FREQUENT": {"nb_words": 1}}}"#,
        )
        .unwrap();
        assert_eq!(outcome.rankings.len(), 1);
        assert_eq!(outcome.rankings[0].words[0].word, "the");
    }

    #[test]
    fn test_check_bytes() {
        let report = check_bytes(b"a,b\n1,2\n", br#"{"c": {"LOWERCASE": {}}}"#).unwrap();
        assert_eq!(report.messages(), vec!["Error: c : unknown column."]);
    }

    #[test]
    fn test_malformed_document() {
        let err = preprocess_bytes(b"a\nx\n", br#"{"ALL": []}"#).unwrap_err();
        assert!(matches!(err, PipelineError::Document(_)));
    }

    #[test]
    fn test_empty_input() {
        let err = preprocess_bytes(b"a,b\n", br#"{"ALL": {"LOWERCASE": {}}}"#).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
    }
}
