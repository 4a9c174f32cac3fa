//! Report configuration types
//!
//! This module defines the options the library needs to load a table and compute a
//! report. Command-line and file handling live in the application layer.

use serde::{Deserialize, Serialize};

/// Configuration for loading and reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Field delimiter (single ASCII character)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// How to treat the first row of the input
    #[serde(default)]
    pub header: HeaderMode,

    /// What to do when a metric's subset is empty
    #[serde(default)]
    pub empty_subset: EmptySubsetPolicy,

    /// Print the text rendering to stdout after generation
    #[serde(default)]
    pub emit_text: bool,
}

fn default_delimiter() -> char {
    ','
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            header: HeaderMode::default(),
            empty_subset: EmptySubsetPolicy::default(),
            emit_text: false,
        }
    }
}

/// Header detection mode for the first row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderMode {
    /// Treat the first row as a header if its `age` field is not an integer
    #[default]
    Auto,
    /// The first row is always a header
    Present,
    /// Every row is a record
    Absent,
}

/// Policy for metrics whose denominator (subset) is empty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptySubsetPolicy {
    /// Report the metric as missing
    #[default]
    Missing,
    /// Fail the whole report with `ReportError::EmptySubset`
    Fail,
}

impl ReportConfig {
    /// Create a new report configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the field delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder method: set header handling
    pub fn with_header_mode(mut self, header: HeaderMode) -> Self {
        self.header = header;
        self
    }

    /// Builder method: set the empty-subset policy
    pub fn with_empty_subset_policy(mut self, policy: EmptySubsetPolicy) -> Self {
        self.empty_subset = policy;
        self
    }

    /// Builder method: enable or disable printing the text report
    pub fn with_text_output(mut self, enabled: bool) -> Self {
        self.emit_text = enabled;
        self
    }

    /// Delimiter as the byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Option<u8> {
        if self.delimiter.is_ascii() {
            Some(self.delimiter as u8)
        } else {
            None
        }
    }
}
