//! Plan executor
//!
//! Runs a [`Plan`] over a copy of a table. Targets are re-resolved against
//! the working copy before every step, so columns created by an extraction
//! are visible to everything that follows.

use serde::Serialize;
use std::collections::HashSet;

use super::operations::{CellOp, ExtractOp, FrequencyOp, Operation, Plan, Step};
use super::target::{resolve, TargetSelector};
use crate::api::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::error::TableError;
use crate::table::{Cell, Table};
use crate::text::{rank_words, remove_words, select_words, FrequencyMode, WordCount};

/// Words selected by a `REMOVE_FREQUENT` / `REMOVE_RARE` step for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyReport {
    /// Instruction name as written.
    pub instruction: String,
    pub column: String,
    pub mode: FrequencyMode,
    /// Selected words with their counts, in ranking order.
    pub words: Vec<WordCount>,
    /// Whether the words were removed from the column.
    pub applied: bool,
}

/// Result of executing a plan
#[derive(Debug)]
pub struct ExecutionResult {
    /// The transformed copy
    pub table: Table,
    /// One report per column per frequency step
    pub rankings: Vec<FrequencyReport>,
}

impl ExecutionResult {
    /// Get summary statistics
    pub fn summary(&self) -> String {
        format!(
            "Preprocessed: {} rows, {} columns, {} frequency reports",
            self.table.row_count(),
            self.table.column_count(),
            self.rankings.len()
        )
    }
}

/// Execute `plan` on a copy of `table`; `table` itself is never modified.
///
/// The document must have passed validation. Columns that are still missing
/// at run time are skipped with a warning.
pub fn execute(plan: &Plan, table: &Table) -> Result<ExecutionResult, TableError> {
    let mut working = table.clone();
    let mut rankings = Vec::new();

    for target in plan.targets() {
        for step in &target.steps {
            log_info(format!("Instruction {} in progress...", step.name));
            let columns = resolve(&target.selector, &working.column_names());

            match &step.operation {
                Operation::Cell(op) => apply_cell_op(&mut working, &columns, op),
                Operation::Frequency(op) => {
                    rankings.extend(apply_frequency(&mut working, &columns, step, op));
                }
                Operation::Extract(op) => apply_extract(&mut working, &columns, op)?,
            }
        }
        log_success(target_done_message(&target.selector));
    }

    log_success("All instructions have been applied.");
    Ok(ExecutionResult {
        table: working,
        rankings,
    })
}

fn target_done_message(selector: &TargetSelector) -> String {
    match selector {
        TargetSelector::All => "All instructions have been applied to all columns.".to_string(),
        TargetSelector::Columns(columns) => format!(
            "All instructions have been applied to the columns [{}].",
            columns.join(", ")
        ),
        TargetSelector::Column(column) => {
            format!("All instructions have been applied to the column {}.", column)
        }
    }
}

fn apply_cell_op(table: &mut Table, columns: &[String], op: &CellOp) {
    for column in columns {
        match table.column_mut(column) {
            Some(cells) => {
                for cell in cells.iter_mut() {
                    *cell = op.apply(cell);
                }
            }
            None => log_warning(format!("Column '{}' not found, skipped", column)),
        }
    }
}

fn apply_frequency(table: &mut Table, columns: &[String], step: &Step, op: &FrequencyOp) -> Vec<FrequencyReport> {
    let mut reports = Vec::new();

    for column in columns {
        let Some(cells) = table.column_mut(column) else {
            log_warning(format!("Column '{}' not found, skipped", column));
            continue;
        };

        // only text cells are ranked, so the selection is exactly what removal can touch
        let ranking = rank_words(cells.iter().filter_map(|cell| match cell {
            Cell::Text(text) => Some(text.as_str()),
            _ => None,
        }));
        let selected = select_words(&ranking, op.mode, op.nb_words);

        let heading = match op.mode {
            FrequencyMode::Frequent => "Most frequent words in the column",
            FrequencyMode::Rare => "Most rare words in the column",
        };
        log_info(format!("{} {}", heading, column));
        for entry in selected {
            log_info_indent(format!("{} ({})", entry.word, entry.count), 1);
        }

        if op.apply {
            let words: HashSet<String> = selected.iter().map(|w| w.word.clone()).collect();
            for cell in cells.iter_mut() {
                if let Cell::Text(text) = cell {
                    *text = remove_words(text, &words);
                }
            }
        }

        reports.push(FrequencyReport {
            instruction: step.name.clone(),
            column: column.clone(),
            mode: op.mode,
            words: selected.to_vec(),
            applied: op.apply,
        });
    }

    reports
}

fn apply_extract(table: &mut Table, columns: &[String], op: &ExtractOp) -> Result<(), TableError> {
    // All outputs are computed from the sources before any column is written.
    let mut outputs = Vec::with_capacity(columns.len());
    for (i, column) in columns.iter().enumerate() {
        let Some(cells) = table.column(column) else {
            log_warning(format!("Column '{}' not found, skipped", column));
            continue;
        };
        let extracted: Vec<Cell> = cells
            .iter()
            .map(|cell| match cell.render() {
                Some(text) => op.extraction.extract(&text),
                None => Cell::Null,
            })
            .collect();
        let destination = op
            .new_columns
            .as_ref()
            .and_then(|names| names.get(i))
            .unwrap_or(column)
            .clone();
        outputs.push((destination, extracted));
    }

    for (destination, cells) in outputs {
        table.set_column(&destination, cells)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::dsl::document::InstructionDocument;
    use crate::transform::dsl::registry::Registry;
    use serde_json::{json, Value};

    fn run(doc: Value, table: &Table) -> ExecutionResult {
        let doc = InstructionDocument::from_value(&doc).unwrap();
        let plan = Plan::build(&Registry::builtin(), &doc).unwrap();
        execute(&plan, table).unwrap()
    }

    fn texts(table: &Table, column: &str) -> Vec<String> {
        table
            .column(column)
            .unwrap()
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    #[test]
    fn test_lowercase_all() {
        let table = Table::from_text_columns(&[("a", &["Hello World", "FOO"])]).unwrap();
        let result = run(json!({"ALL": {"LOWERCASE": {}}}), &table);
        assert_eq!(texts(&result.table, "a"), vec!["hello world", "foo"]);
        // the input is untouched
        assert_eq!(texts(&table, "a"), vec!["Hello World", "FOO"]);
    }

    #[test]
    fn test_extract_int_in_place() {
        let table = Table::from_text_columns(&[("a", &["x12y"]), ("b", &["no digits"])]).unwrap();
        let result = run(
            json!({"COLUMNS;a;b": {"EXTRACT_REGEX_PATTERN": {"regex_pattern": "\\d+", "result_type": "int"}}}),
            &table,
        );
        assert_eq!(result.table.column("a").unwrap(), &[Cell::Int(12)]);
        assert_eq!(result.table.column("b").unwrap(), &[Cell::Int(0)]);
    }

    #[test]
    fn test_extract_into_new_column_visible_later() {
        let table = Table::from_text_columns(&[("text", &["Order 66 SHIPPED", "none"])]).unwrap();
        let result = run(
            json!({
                "text": {
                    "EXTRACT_REGEX_PATTERN": {
                        "regex_pattern": "[A-Z]{2,}",
                        "new_column_name": ["status"],
                        "result_type": "str"
                    }
                },
                "ALL": {"LOWERCASE": {}}
            }),
            &table,
        );
        assert_eq!(result.table.column_names(), vec!["text", "status"]);
        assert_eq!(texts(&result.table, "text"), vec!["order 66 shipped", "none"]);
        assert_eq!(result.table.column("status").unwrap(), &[Cell::text("shipped"), Cell::Null]);
    }

    #[test]
    fn test_frequency_report_without_apply() {
        let table = Table::from_text_columns(&[("a", &["the cat", "the dog", "a bird"])]).unwrap();
        let result = run(json!({"a": {"REMOVE_FREQUENT": {"nb_words": 1}}}), &table);
        assert_eq!(texts(&result.table, "a"), texts(&table, "a"));
        assert_eq!(result.rankings.len(), 1);
        let report = &result.rankings[0];
        assert_eq!(report.column, "a");
        assert_eq!(report.words, vec![WordCount { word: "the".into(), count: 2 }]);
        assert!(!report.applied);
    }

    #[test]
    fn test_frequency_apply_removes_selected() {
        let table = Table::from_text_columns(&[("a", &["the cat", "the dog", "the cat sat"])]).unwrap();
        let result = run(
            json!({"a": {"REMOVE_FREQUENT": {"nb_words": 2, "apply": "-e"}}}),
            &table,
        );
        for text in texts(&result.table, "a") {
            assert!(!text.split(' ').any(|w| w == "the" || w == "cat"), "{}", text);
        }
        assert_eq!(texts(&result.table, "a"), vec!["", "dog", "sat"]);
    }

    #[test]
    fn test_frequency_apply_across_tabs_and_newlines() {
        let table = Table::from_text_columns(&[("a", &["the\tcat", "the dog", "the\nend"])]).unwrap();
        let result = run(
            json!({"a": {"REMOVE_FREQUENT": {"nb_words": 1, "apply": "-e"}}}),
            &table,
        );
        assert_eq!(result.rankings[0].words, vec![WordCount { word: "the".into(), count: 3 }]);
        assert_eq!(texts(&result.table, "a"), vec!["cat", "dog", "end"]);
    }

    #[test]
    fn test_frequency_ignores_non_text_cells() {
        let table = Table::from_text_columns(&[("a", &["x12", "y12", "z7"])]).unwrap();
        let result = run(
            json!({
                "a": {
                    "EXTRACT_REGEX_PATTERN": {"regex_pattern": "\\d+", "result_type": "int"},
                    "REMOVE_FREQUENT": {"nb_words": 1, "apply": "-e"}
                }
            }),
            &table,
        );
        assert!(result.rankings[0].words.is_empty());
        assert_eq!(
            result.table.column("a").unwrap(),
            &[Cell::Int(12), Cell::Int(12), Cell::Int(7)]
        );
    }

    #[test]
    fn test_rare_without_apply_reports_only() {
        let table = Table::from_text_columns(&[("a", &["the cat", "the dog", "a bird"])]).unwrap();
        let result = run(json!({"a": {"REMOVE_RARE": {"nb_words": 2}}}), &table);
        assert_eq!(texts(&result.table, "a"), texts(&table, "a"));
        let report = &result.rankings[0];
        assert_eq!(report.mode, FrequencyMode::Rare);
        let words: Vec<&str> = report.words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, vec!["a", "bird"]);
        assert!(!report.applied);
    }

    #[test]
    fn test_frequency_nb_words_bounds() {
        let column: &[&str] = &["the cat", "the\tdog", "a bird"];
        let table = Table::from_text_columns(&[("a", column)]).unwrap();

        for instruction in ["REMOVE_FREQUENT", "REMOVE_RARE"] {
            for nb_words in [0, -3, 99] {
                let dry = run(json!({"a": {instruction: {"nb_words": nb_words}}}), &table);
                assert_eq!(texts(&dry.table, "a"), texts(&table, "a"), "{} {}", instruction, nb_words);

                let applied = run(
                    json!({"a": {instruction: {"nb_words": nb_words, "apply": "-e"}}}),
                    &table,
                );
                let expected: Vec<String> = if nb_words > 0 {
                    // the whole vocabulary is selected
                    vec![String::new(); 3]
                } else {
                    texts(&table, "a")
                };
                assert_eq!(texts(&applied.table, "a"), expected, "{} {}", instruction, nb_words);
                assert_eq!(applied.rankings[0].words.len(), if nb_words > 0 { 5 } else { 0 });
            }
        }
    }

    #[test]
    fn test_suffixed_steps_run_in_order() {
        let table = Table::from_text_columns(&[("a", &["a!b?c."])]).unwrap();
        let result = run(
            json!({"ALL": {"REMOVE_PUNCT": {"punctuation": "!"}, "REMOVE_PUNCT_1": {"punctuation": "?"}}}),
            &table,
        );
        assert_eq!(texts(&result.table, "a"), vec!["abc."]);
    }

    #[test]
    fn test_missing_column_is_skipped() {
        let table = Table::from_text_columns(&[("a", &["X"])]).unwrap();
        let result = run(json!({"COLUMNS;a;ghost": {"LOWERCASE": {}}}), &table);
        assert_eq!(texts(&result.table, "a"), vec!["x"]);
        assert!(!result.table.has_column("ghost"));
    }
}
