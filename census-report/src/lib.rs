//! Census Report Library
//!
//! Loads a fixed-schema demographic table (the "adult" census extract) and computes a
//! fixed set of summary statistics over it.
//!
//! # Architecture
//!
//! The library is a single batch pass:
//! - Parses the delimited file into an in-memory [`Table`] of typed [`Record`]s
//! - Computes ten independent metrics (counts, means, percentages, group maxima)
//! - Assembles them into a [`Report`], optionally printing the text summary
//!
//! Empty subsets (for example no male records) are reported as missing values or as an
//! error, depending on [`EmptySubsetPolicy`]. Ties in group maxima and modes resolve to
//! the value seen first in the data.
//!
//! Command-line handling, config files and JSON output live in the application layer
//! (census-report-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use census_report::{EmptySubsetPolicy, HeaderMode, ReportConfig, ReportGenerator};
//! use std::path::Path;
//!
//! let config = ReportConfig::new()
//!     .with_header_mode(HeaderMode::Present)
//!     .with_empty_subset_policy(EmptySubsetPolicy::Fail);
//!
//! let report = ReportGenerator::new(config)
//!     .generate(Path::new("adult.data.csv"))
//!     .unwrap();
//!
//! for (key, value) in report.entries() {
//!     println!("{}: {}", key, value);
//! }
//! ```

// Public modules
pub mod config;
pub mod generator;
pub mod metrics;
pub mod report;
pub mod table;
pub mod types;

// Re-export main types for convenience
pub use config::{EmptySubsetPolicy, HeaderMode, ReportConfig};
pub use generator::{generate, ReportGenerator};
pub use report::{FrequencyTable, MetricValue, Report};
pub use table::Table;
pub use types::{Record, ReportError, Result, Salary, COLUMNS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
