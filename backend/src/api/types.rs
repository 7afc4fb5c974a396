//! REST API types for frontend integration.
//!
//! Rows are returned as JSON records keyed by column name, in column order.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::transform::dsl::FrequencyReport;
use crate::transform::pipeline::PipelineOutcome;
use crate::validation::ValidationReport;

/// Response sent after a successful preprocessing run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreprocessResponse {
    /// Unique job identifier
    pub job_id: String,

    /// Always "done" for a successful run
    pub status: String,

    /// Column names of the preprocessed table, in order
    pub columns: Vec<String>,

    /// One JSON object per row
    pub rows: Vec<Value>,

    /// Word rankings reported by REMOVE_FREQUENT / REMOVE_RARE
    pub rankings: Vec<FrequencyReport>,

    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Input CSV info
    pub csv_info: CsvMetadata,
    /// Rows after preprocessing
    pub row_count: usize,
    /// Columns created by the instructions
    pub added_columns: Vec<String>,
}

/// CSV file metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvMetadata {
    pub encoding: String,
    pub delimiter: String,
    pub row_count: usize,
    pub columns: Vec<String>,
}

/// Result of `POST /api/validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    /// One line per error, as printed by the CLI
    pub errors: Vec<String>,
}

impl From<&ValidationReport> for ValidateResponse {
    fn from(report: &ValidationReport) -> Self {
        Self {
            valid: report.is_empty(),
            errors: report.messages(),
        }
    }
}

impl From<PipelineOutcome> for PreprocessResponse {
    fn from(outcome: PipelineOutcome) -> Self {
        let columns = outcome.table.column_names();
        let added_columns = columns
            .iter()
            .filter(|c| !outcome.csv_info.headers.contains(c))
            .cloned()
            .collect();

        PreprocessResponse {
            job_id: Uuid::new_v4().to_string(),
            status: "done".to_string(),
            rows: outcome.table.to_records(),
            rankings: outcome.rankings,
            metadata: ResponseMetadata {
                row_count: outcome.table.row_count(),
                added_columns,
                csv_info: CsvMetadata {
                    encoding: outcome.csv_info.encoding,
                    delimiter: outcome.csv_info.delimiter.to_string(),
                    row_count: outcome.csv_info.row_count,
                    columns: outcome.csv_info.headers,
                },
            },
            columns,
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "errors": [],
    })
}

/// Create the response for a document that failed validation
pub fn invalid_response(report: &ValidationReport) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "invalid",
        "error": format!("{} validation error(s)", report.len()),
        "errors": report.messages(),
    })
}
