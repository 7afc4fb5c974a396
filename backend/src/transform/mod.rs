//! Transformation module.
//!
//! - DSL: instruction documents, registry, plan and executor
//! - Pipeline: load, validate and execute in one call

pub mod dsl;
pub mod pipeline;

pub use dsl::*;
pub use pipeline::*;
