//! Main report generator API
//!
//! This module provides the primary interface for the library. The ReportGenerator
//! loads a census table and computes every metric of the [`Report`] in one pass.

use crate::config::{EmptySubsetPolicy, ReportConfig};
use crate::metrics;
use crate::report::Report;
use crate::table::Table;
use crate::types::{ReportError, Result};
use std::io::{self, Read, Write};
use std::path::Path;

/// Load `path`, compute the report and optionally print it to stdout
///
/// Uses the default configuration otherwise (auto header detection, comma delimiter,
/// missing values for empty subsets).
///
/// # Example
/// ```no_run
/// use std::path::Path;
///
/// let report = census_report::generate(Path::new("adult.data.csv"), true).unwrap();
/// println!("{}", report.average_age_men.unwrap_or_default());
/// ```
pub fn generate(source: &Path, emit_text: bool) -> Result<Report> {
    ReportGenerator::new(ReportConfig::new().with_text_output(emit_text)).generate(source)
}

/// Entry point for report generation
pub struct ReportGenerator {
    config: ReportConfig,
}

impl ReportGenerator {
    /// Create a new generator with the given configuration
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Generate a report from a file on disk
    ///
    /// # Example
    /// ```no_run
    /// use census_report::{ReportConfig, ReportGenerator};
    /// use std::path::Path;
    ///
    /// let generator = ReportGenerator::new(ReportConfig::new().with_delimiter(';'));
    /// let report = generator.generate(Path::new("census.csv")).unwrap();
    /// println!("{}", report);
    /// ```
    pub fn generate(&self, path: &Path) -> Result<Report> {
        let table = Table::from_path(path, &self.config)?;
        self.generate_from_table(&table)
    }

    /// Generate a report from any reader
    pub fn generate_from_reader<R: Read>(&self, reader: R) -> Result<Report> {
        let table = Table::from_reader(reader, &self.config)?;
        self.generate_from_table(&table)
    }

    /// Compute all metrics over an already loaded table, printing to stdout if enabled
    pub fn generate_from_table(&self, table: &Table) -> Result<Report> {
        let stdout = io::stdout();
        self.generate_from_table_to(table, &mut stdout.lock())
    }

    /// Compute all metrics, writing the text summary to `out` if `emit_text` is set
    pub fn generate_from_table_to<W: Write>(&self, table: &Table, out: &mut W) -> Result<Report> {
        let report = self.compute(table)?;

        if self.config.emit_text {
            report.write_text(out)?;
            out.flush()?;
        }

        Ok(report)
    }

    fn compute(&self, table: &Table) -> Result<Report> {
        let records = table.records();
        log::debug!("Computing report over {} records", records.len());

        // A table is never empty, so these metrics always have a value
        let min_work_hours = metrics::min_work_hours(records).ok_or(ReportError::EmptyTable)?;
        let percentage_bachelors =
            metrics::percentage_bachelors(records).ok_or(ReportError::EmptyTable)?;
        let rich_percentage = metrics::rich_percentage(records, min_work_hours)
            .ok_or(ReportError::EmptyTable)?;
        let (highest_earning_country, highest_earning_country_percentage) =
            metrics::highest_earning_country(records).ok_or(ReportError::EmptyTable)?;

        let report = Report {
            race_count: metrics::race_count(records),
            average_age_men: self.resolve(
                "average_age_men",
                metrics::average_age_men(records),
            )?,
            percentage_bachelors,
            higher_education_rich: self.resolve(
                "higher_education_rich",
                metrics::higher_education_rich(records),
            )?,
            lower_education_rich: self.resolve(
                "lower_education_rich",
                metrics::lower_education_rich(records),
            )?,
            min_work_hours,
            rich_percentage,
            highest_earning_country,
            highest_earning_country_percentage,
            top_in_occupation: self.resolve(
                "top_IN_occupation",
                metrics::top_occupation(records, metrics::TOP_OCCUPATION_COUNTRY),
            )?,
        };

        log::info!(
            "Report computed: {} races, highest earning country {}",
            report.race_count.len(),
            report.highest_earning_country
        );
        Ok(report)
    }

    /// Apply the empty-subset policy to a metric that may be undefined
    fn resolve<T>(&self, metric: &'static str, value: Option<T>) -> Result<Option<T>> {
        match (value, self.config.empty_subset) {
            (Some(v), _) => Ok(Some(v)),
            (None, EmptySubsetPolicy::Missing) => {
                log::warn!("Metric '{}' has an empty subset, reporting it as missing", metric);
                Ok(None)
            }
            (None, EmptySubsetPolicy::Fail) => Err(ReportError::EmptySubset { metric }),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(ReportConfig::default())
    }
}
