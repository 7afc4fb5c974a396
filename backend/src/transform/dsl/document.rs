//! Instruction document definition
//!
//! A document maps targets to instructions and instructions to their
//! arguments:
//!
//! ```json
//! {
//!   "ALL": { "LOWERCASE": {}, "REMOVE_PUNCT": { "punctuation": "!?" } },
//!   "COLUMNS;title;body": { "REMOVE_FREQUENT": { "nb_words": 5 } }
//! }
//! ```
//!
//! Key order is execution order. The JSON is parsed with an order-preserving
//! map and turned into plain vectors right away.

use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::path::Path;

use super::target::TargetSelector;
use crate::error::{DocumentError, DocumentResult};

static DOCUMENT_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../../schemas/instruction-document.json"))
        .expect("Invalid embedded schema")
});

/// One instruction as written in a target block.
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionOccurrence {
    /// Name as written, suffix included (`REMOVE_PUNCT_1`).
    pub name: String,
    pub args: Map<String, Value>,
}

impl InstructionOccurrence {
    pub fn new(name: impl Into<String>, args: Map<String, Value>) -> Self {
        Self { name: name.into(), args }
    }

    pub fn arg(&self, key: &str) -> Option<&Value> {
        self.args.get(key)
    }

    pub fn has_arg(&self, key: &str) -> bool {
        self.args.contains_key(key)
    }
}

/// A target selector with its instructions, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetBlock {
    /// Key as written in the document.
    pub raw: String,
    pub selector: TargetSelector,
    pub instructions: Vec<InstructionOccurrence>,
}

impl TargetBlock {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            selector: TargetSelector::parse(&raw),
            raw,
            instructions: Vec::new(),
        }
    }

    /// Append an instruction (builder style).
    pub fn with_instruction(mut self, name: &str, args: Value) -> Self {
        let args = match args {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.instructions.push(InstructionOccurrence::new(name, args));
        self
    }
}

/// A parsed instruction document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructionDocument {
    targets: Vec<TargetBlock>,
}

impl InstructionDocument {
    pub fn new(targets: Vec<TargetBlock>) -> Self {
        Self { targets }
    }

    /// Parse a document from a JSON string
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Parse a document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> DocumentResult<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(&value)
    }

    /// Read and parse a document file
    pub fn from_file(path: impl AsRef<Path>) -> DocumentResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Build a document from a JSON value, checking its shape first.
    pub fn from_value(value: &Value) -> DocumentResult<Self> {
        check_shape(value).map_err(|errors| DocumentError::Malformed { errors })?;

        let mut targets = Vec::new();
        if let Value::Object(root) = value {
            for (raw, block) in root {
                let mut target = TargetBlock::new(raw.as_str());
                if let Value::Object(instructions) = block {
                    for (name, args) in instructions {
                        target = target.with_instruction(name, args.clone());
                    }
                }
                targets.push(target);
            }
        }
        Ok(Self { targets })
    }

    pub fn targets(&self) -> &[TargetBlock] {
        &self.targets
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of instruction occurrences across all targets.
    pub fn instruction_count(&self) -> usize {
        self.targets.iter().map(|t| t.instructions.len()).sum()
    }

    /// Back to JSON, keeping order.
    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        for target in &self.targets {
            let mut block = Map::new();
            for occurrence in &target.instructions {
                block.insert(occurrence.name.clone(), Value::Object(occurrence.args.clone()));
            }
            root.insert(target.raw.clone(), Value::Object(block));
        }
        Value::Object(root)
    }
}

/// Check that `value` is an object of objects of objects.
///
/// Returns every violation, not only the first.
pub fn check_shape(value: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(&DOCUMENT_SCHEMA)
        .map_err(|e| vec![format!("Invalid document schema: {}", e)])?;

    let errors: Vec<String> = validator.iter_errors(value).map(|e| e.to_string()).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_is_preserved() {
        let doc = InstructionDocument::from_json(
            r#"{"ZETA": {"STEM": {}, "LOWERCASE": {}}, "ALL": {"REMOVE_HTML": {}}}"#,
        )
        .unwrap();
        let targets: Vec<&str> = doc.targets().iter().map(|t| t.raw.as_str()).collect();
        assert_eq!(targets, vec!["ZETA", "ALL"]);
        let names: Vec<&str> = doc.targets()[0]
            .instructions
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["STEM", "LOWERCASE"]);
        assert_eq!(doc.instruction_count(), 3);
    }

    #[test]
    fn test_selectors_parsed() {
        let doc = InstructionDocument::from_value(&json!({
            "ALL": {},
            "COLUMNS;a;b": {},
            "title": {}
        }))
        .unwrap();
        let selectors: Vec<&TargetSelector> = doc.targets().iter().map(|t| &t.selector).collect();
        assert_eq!(selectors[0], &TargetSelector::All);
        assert_eq!(selectors[1], &TargetSelector::Columns(vec!["a".into(), "b".into()]));
        assert_eq!(selectors[2], &TargetSelector::Column("title".into()));
    }

    #[test]
    fn test_suffixed_occurrences_keep_their_arguments() {
        let doc = InstructionDocument::from_value(&json!({
            "ALL": {
                "REMOVE_PUNCT": {"punctuation": "!"},
                "REMOVE_PUNCT_1": {"punctuation": "?"}
            }
        }))
        .unwrap();
        let block = &doc.targets()[0];
        assert_eq!(block.instructions[0].arg("punctuation"), Some(&json!("!")));
        assert_eq!(block.instructions[1].arg("punctuation"), Some(&json!("?")));
    }

    #[test]
    fn test_malformed_shapes() {
        let err = InstructionDocument::from_value(&json!(["ALL"])).unwrap_err();
        assert!(matches!(err, DocumentError::Malformed { .. }));

        let err = InstructionDocument::from_value(&json!({
            "ALL": {"LOWERCASE": 1},
            "title": "STEM"
        }))
        .unwrap_err();
        match err {
            DocumentError::Malformed { errors } => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_json() {
        let err = InstructionDocument::from_json("{ not json").unwrap_err();
        assert!(matches!(err, DocumentError::JsonError(_)));
    }

    #[test]
    fn test_to_value_round_trip() {
        let value = json!({"COLUMNS;b;a": {"STEM": {"language": "french"}}, "ALL": {}});
        let doc = InstructionDocument::from_value(&value).unwrap();
        assert_eq!(doc.to_value(), value);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("instructions.json");
        std::fs::write(&path, r#"{"ALL": {"LOWERCASE": {}}}"#).unwrap();
        let doc = InstructionDocument::from_file(&path).unwrap();
        assert_eq!(doc.instruction_count(), 1);

        let missing = InstructionDocument::from_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(DocumentError::IoError(_))));
    }
}
