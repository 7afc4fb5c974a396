//! Error types for the textprep pipeline.
//!
//! This module defines the error hierarchy shared by the library and the CLI:
//!
//! - [`TableError`] - Table construction errors
//! - [`DocumentError`] - Instruction document loading errors
//! - [`PlanError`] - Document to execution plan conversion errors
//! - [`PipelineError`] - Top-level orchestration errors
//! - [`ServerError`] - HTTP surface errors
//!
//! Validation problems are not errors of this hierarchy: they are collected
//! exhaustively as [`crate::validation::ValidationError`] values and only
//! become fatal once wrapped in [`PipelineError::Validation`].
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

use crate::parser::CsvError;
use crate::validation::ValidationReport;

// =============================================================================
// Table Errors
// =============================================================================

/// Errors while building or reshaping a table.
#[derive(Debug, Error)]
pub enum TableError {
    /// Column length differs from the table's row count.
    #[error("Column '{column}' has {found} cells, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },

    /// Column name already used.
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),
}

// =============================================================================
// Document Errors
// =============================================================================

/// Errors while reading an instruction document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read the document file.
    #[error("Failed to read instruction document: {0}")]
    IoError(#[from] std::io::Error),

    /// Document is not valid JSON.
    #[error("Invalid JSON in instruction document: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Document is JSON but not shaped as target -> instruction -> arguments.
    #[error("Malformed instruction document:\n{}", .errors.join("\n"))]
    Malformed { errors: Vec<String> },
}

// =============================================================================
// Plan Errors
// =============================================================================

/// Errors while turning a validated document into typed operations.
///
/// These cannot happen for a document that passed validation against the
/// built-in registry.
#[derive(Debug, Error)]
pub enum PlanError {
    /// No operation exists for this instruction.
    #[error("Unsupported instruction: {0}")]
    Unsupported(String),

    /// Argument value cannot be converted.
    #[error("Invalid argument '{argument}' for {instruction}: {message}")]
    InvalidArgument {
        instruction: String,
        argument: String,
        message: String,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by [`crate::transform::pipeline::preprocess_csv`].
/// It wraps all lower-level errors and adds pipeline-specific variants.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Instruction document error.
    #[error("{0}")]
    Document(#[from] DocumentError),

    /// The document failed validation; carries the full report.
    #[error("{0}")]
    Validation(ValidationReport),

    /// Plan construction error.
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Table error.
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// No rows to preprocess.
    #[error("No rows to preprocess")]
    EmptyInput,

    /// Output could not be written.
    #[error("Output error: {0}")]
    Output(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for document loading.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    #[test]
    fn test_error_conversion_chain() {
        // TableError -> PipelineError
        let table_err = TableError::DuplicateColumn("title".into());
        let pipeline_err: PipelineError = table_err.into();
        assert!(pipeline_err.to_string().contains("title"));

        // DocumentError -> PipelineError
        let doc_err = DocumentError::Malformed {
            errors: vec!["/ALL: must be an object".into()],
        };
        let pipeline_err: PipelineError = doc_err.into();
        assert!(pipeline_err.to_string().contains("/ALL"));
    }

    #[test]
    fn test_validation_error_is_reported_verbatim() {
        let report = ValidationReport::new(vec![ValidationError::UnknownColumn {
            column: "missing".into(),
        }]);
        let err = PipelineError::Validation(report);
        assert_eq!(err.to_string(), "Error: missing : unknown column.");
    }
}
