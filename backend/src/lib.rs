//! # textprep - declarative text preprocessing for CSV tables
//!
//! A JSON instruction document names target columns and the preprocessing
//! instructions to run on them. The document is validated against a registry
//! of known instructions (collecting every error), then executed in document
//! order on a copy of the table.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Validator  │────▶│  Executor   │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │ (all errors)│     │ (new table) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                                ▲
//!                              instruction document (JSON)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use textprep::preprocess_csv;
//!
//! let outcome = preprocess_csv("reviews.csv", "instructions.json")?;
//! outcome.table.write_csv(std::io::stdout(), b',')?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`table`] - Column-oriented table of typed cells
//! - [`parser`] - CSV parsing with auto-detection
//! - [`text`] - Text primitives (cleaning, stemming, dates, regex extraction)
//! - [`transform`] - Instruction DSL and pipeline
//! - [`validation`] - Exhaustive document validation
//! - [`config`] - Environment settings
//! - [`api`] - HTTP API server and progress log

// Core modules
pub mod error;
pub mod table;

// Parsing
pub mod parser;

// Text primitives
pub mod text;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// Settings
pub mod config;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    DocumentError,
    PipelineError,
    PipelineResult,
    PlanError,
    ServerError,
    TableError,
};

// =============================================================================
// Re-exports - Table
// =============================================================================

pub use table::{Cell, Table};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    parse_csv_str,
    parse_csv_file_auto,
    parse_bytes_auto,
    detect_encoding,
    detect_delimiter,
    decode_content,
    CsvError,
    ParseResult,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{validate, ValidationError, ValidationReport};

// =============================================================================
// Re-exports - DSL
// =============================================================================

pub use transform::dsl::{
    example_document,
    execute,
    ArgType,
    ExecutionResult,
    FrequencyReport,
    InstructionDocument,
    Plan,
    Registry,
    TargetSelector,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    check_bytes,
    check_csv,
    preprocess_bytes,
    preprocess_csv,
    preprocess_table,
    CsvInfo,
    PipelineOutcome,
};

// =============================================================================
// Re-exports - Settings
// =============================================================================

pub use config::Settings;

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
