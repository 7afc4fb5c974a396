use regex::Regex;
use std::fmt;
use std::str::FromStr;

use super::dates::{parse_date, parse_datetime};
use crate::table::Cell;

/// Shape of the value produced by a regex extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultType {
    #[default]
    List,
    Str,
    Int,
    Float,
    Date,
    DateTime,
}

impl ResultType {
    pub const NAMES: &'static [&'static str] = &["list", "str", "int", "float", "date", "datetime"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultType::List => "list",
            ResultType::Str => "str",
            ResultType::Int => "int",
            ResultType::Float => "float",
            ResultType::Date => "date",
            ResultType::DateTime => "datetime",
        }
    }
}

impl FromStr for ResultType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(ResultType::List),
            "str" => Ok(ResultType::Str),
            "int" => Ok(ResultType::Int),
            "float" => Ok(ResultType::Float),
            "date" => Ok(ResultType::Date),
            "datetime" => Ok(ResultType::DateTime),
            other => Err(format!("unknown result type '{}'", other)),
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled primary pattern, an optional secondary pattern run over each
/// primary match, and the coercion applied to the result.
#[derive(Debug, Clone)]
pub struct RegexExtraction {
    primary: Regex,
    secondary: Option<Regex>,
    result_type: ResultType,
}

/// Whole match, or capture group 1 when the pattern has groups.
fn find_all(pattern: &Regex, text: &str) -> Vec<String> {
    if pattern.captures_len() > 1 {
        pattern
            .captures_iter(text)
            .map(|caps| caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect()
    } else {
        pattern.find_iter(text).map(|m| m.as_str().to_string()).collect()
    }
}

impl RegexExtraction {
    pub fn new(
        primary: &str,
        secondary: Option<&str>,
        result_type: ResultType,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            primary: Regex::new(primary)?,
            secondary: secondary.map(Regex::new).transpose()?,
            result_type,
        })
    }

    pub fn result_type(&self) -> ResultType {
        self.result_type
    }

    /// All matches in `text`, in order.
    pub fn matches(&self, text: &str) -> Vec<String> {
        let primary = find_all(&self.primary, text);
        match &self.secondary {
            Some(secondary) => primary
                .iter()
                .flat_map(|m| find_all(secondary, m))
                .collect(),
            None => primary,
        }
    }

    /// Extract and coerce. No match gives `0` for `int`, `0.0` for `float`
    /// and `Null` otherwise; an unparseable first match gives `Null`.
    pub fn extract(&self, text: &str) -> Cell {
        let matches = self.matches(text);
        match self.result_type {
            ResultType::List | ResultType::Str if matches.is_empty() => Cell::Null,
            ResultType::List => Cell::List(matches),
            ResultType::Str => Cell::Text(matches.join(" ")),
            ResultType::Int => match matches.first() {
                None => Cell::Int(0),
                Some(first) => first.trim().parse().map(Cell::Int).unwrap_or(Cell::Null),
            },
            ResultType::Float => match matches.first() {
                None => Cell::Float(0.0),
                Some(first) => first.trim().parse().map(Cell::Float).unwrap_or(Cell::Null),
            },
            ResultType::Date => matches
                .first()
                .and_then(|first| parse_date(first))
                .map(Cell::Date)
                .unwrap_or(Cell::Null),
            ResultType::DateTime => matches
                .first()
                .and_then(|first| parse_datetime(first))
                .map(Cell::DateTime)
                .unwrap_or(Cell::Null),
        }
    }
}
