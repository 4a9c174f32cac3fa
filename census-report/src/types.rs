//! Core types for the census report library
//!
//! This module defines the fixed-schema record that every row of the input table is
//! parsed into, and the error type shared by loading and metric computation.

use std::fmt;

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Column names of the input table, in file order
pub const COLUMNS: [&str; 15] = [
    "age",
    "workclass",
    "fnlwgt",
    "education",
    "education-num",
    "marital-status",
    "occupation",
    "relationship",
    "race",
    "sex",
    "capital-gain",
    "capital-loss",
    "hours-per-week",
    "native-country",
    "salary",
];

/// Salary bracket of a record
///
/// Only the two literal values `<=50K` and `>50K` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Salary {
    AtMost50K,
    Above50K,
}

impl Salary {
    /// Parse the exact literal used in the data file
    pub fn from_literal(value: &str) -> Option<Self> {
        match value {
            "<=50K" => Some(Salary::AtMost50K),
            ">50K" => Some(Salary::Above50K),
            _ => None,
        }
    }

    /// The literal as written in the data file
    pub fn as_str(&self) -> &'static str {
        match self {
            Salary::AtMost50K => "<=50K",
            Salary::Above50K => ">50K",
        }
    }
}

impl fmt::Display for Salary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the demographic table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub age: i64,
    pub workclass: String,
    /// Final sampling weight
    pub fnlwgt: i64,
    pub education: String,
    pub education_num: i64,
    pub marital_status: String,
    pub occupation: String,
    pub relationship: String,
    pub race: String,
    pub sex: String,
    pub capital_gain: i64,
    pub capital_loss: i64,
    pub hours_per_week: i64,
    pub native_country: String,
    pub salary: Salary,
}

impl Record {
    /// True if this record earns more than 50K
    pub fn is_rich(&self) -> bool {
        self.salary == Salary::Above50K
    }

    /// True if this record holds a Bachelors, Masters or Doctorate degree
    pub fn has_higher_education(&self) -> bool {
        matches!(
            self.education.as_str(),
            "Bachelors" | "Masters" | "Doctorate"
        )
    }

    pub fn is_male(&self) -> bool {
        self.sex == "Male"
    }
}

/// Errors that can occur while loading a table or computing a report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read delimited input: {0}")]
    Csv(#[from] csv::Error),

    #[error("Line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: column '{column}' is not an integer: '{value}'")]
    InvalidInteger {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("Line {line}: unknown salary value '{value}' (expected '<=50K' or '>50K')")]
    InvalidSalary { line: u64, value: String },

    #[error("Input table contains no records")]
    EmptyTable,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Metric '{metric}' has an empty subset and cannot be computed")]
    EmptySubset { metric: &'static str },
}

impl ReportError {
    /// True for errors caused by a missing, unreadable or malformed input table
    pub fn is_malformed_input(&self) -> bool {
        !matches!(
            self,
            ReportError::EmptySubset { .. } | ReportError::InvalidConfig(_)
        )
    }
}
