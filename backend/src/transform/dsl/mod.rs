//! Instruction DSL: documents, registry, plan and executor.
//!
//! This module provides:
//! - `document`: the instruction document (targets -> instructions -> arguments)
//! - `registry`: known instructions and their argument specs
//! - `target`: target selectors and column resolution
//! - `operations`: typed operations and the execution plan
//! - `executor`: runs a plan over a copy of a table
//!
//! ## Usage Flow
//!
//! ```text
//! JSON → InstructionDocument → validate(Registry, columns) → Plan::build → execute → Table
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use textprep::transform::dsl::{execute, InstructionDocument, Plan, Registry};
//! use textprep::validation::validate;
//!
//! let registry = Registry::builtin();
//! let document = InstructionDocument::from_json(r#"{"ALL": {"LOWERCASE": {}}}"#)?;
//!
//! let report = validate(&registry, &document, &table.column_names());
//! if report.is_empty() {
//!     let plan = Plan::build(&registry, &document)?;
//!     let result = execute(&plan, &table)?;
//! }
//! ```

pub mod document;
pub mod executor;
pub mod operations;
pub mod registry;
pub mod target;

pub use document::{check_shape, InstructionDocument, InstructionOccurrence, TargetBlock};
pub use executor::{execute, ExecutionResult, FrequencyReport};
pub use operations::{CellOp, ExtractOp, FrequencyOp, Operation, Plan, PlannedTarget, Step};
pub use registry::{example_document, ArgSpec, ArgType, Argument, InstructionSchema, Registry};
pub use target::{resolve, TargetSelector};
