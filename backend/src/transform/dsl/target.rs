//! Target selectors and column resolution.

use std::fmt;

/// Which columns a target block applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelector {
    /// Every column of the table, in table order.
    All,
    /// `COLUMNS;a;b`: the listed columns, in listed order.
    Columns(Vec<String>),
    /// A single column name.
    Column(String),
}

impl TargetSelector {
    pub fn parse(raw: &str) -> Self {
        if raw == "ALL" {
            return TargetSelector::All;
        }
        match raw.strip_prefix("COLUMNS") {
            Some("") => TargetSelector::Columns(Vec::new()),
            Some(rest) if rest.starts_with(';') => {
                TargetSelector::Columns(rest[1..].split(';').map(str::to_string).collect())
            }
            _ => TargetSelector::Column(raw.to_string()),
        }
    }

    /// Distinct column names the selector refers to explicitly, in first
    /// listed order (empty for `ALL`).
    pub fn named_columns(&self) -> Vec<&str> {
        match self {
            TargetSelector::All => Vec::new(),
            TargetSelector::Columns(columns) => {
                let mut names: Vec<&str> = Vec::with_capacity(columns.len());
                for column in columns {
                    if !names.contains(&column.as_str()) {
                        names.push(column);
                    }
                }
                names
            }
            TargetSelector::Column(column) => vec![column.as_str()],
        }
    }
}

impl fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSelector::All => f.write_str("ALL"),
            TargetSelector::Columns(columns) => write!(f, "COLUMNS;{}", columns.join(";")),
            TargetSelector::Column(column) => f.write_str(column),
        }
    }
}

/// Columns a selector denotes for a table whose columns are `table_columns`.
///
/// Called again before every instruction, so `ALL` picks up columns created
/// earlier in the document.
pub fn resolve(selector: &TargetSelector, table_columns: &[String]) -> Vec<String> {
    match selector {
        TargetSelector::All => table_columns.to_vec(),
        TargetSelector::Columns(columns) => columns.clone(),
        TargetSelector::Column(column) => vec![column.clone()],
    }
}
