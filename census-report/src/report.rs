//! Report types and rendering
//!
//! A [`Report`] holds the ten computed metrics. It can be viewed as a key → value mapping
//! through [`Report::entries`], serialized with serde (JSON object with the fixed keys), or
//! rendered as the labelled text summary.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};

/// Ordered value → count mapping, most frequent first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
}

impl FrequencyTable {
    /// Wrap entries that are already in report order
    pub fn new(entries: Vec<(String, usize)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, value: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(key, _)| key == value)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (String, usize)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

/// A single metric value, as seen through the key → value view of a report
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue<'a> {
    Integer(i64),
    /// Already rounded to one decimal place
    Float(f64),
    Text(&'a str),
    Frequencies(&'a FrequencyTable),
    /// The metric's subset was empty
    Missing,
}

impl fmt::Display for MetricValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Integer(v) => write!(f, "{}", v),
            MetricValue::Float(v) => write!(f, "{:.1}", v),
            MetricValue::Text(v) => write!(f, "{}", v),
            MetricValue::Frequencies(table) => {
                let parts: Vec<String> = table
                    .iter()
                    .map(|(key, count)| format!("{}: {}", key, count))
                    .collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            MetricValue::Missing => write!(f, "n/a"),
        }
    }
}

impl From<Option<f64>> for MetricValue<'_> {
    fn from(value: Option<f64>) -> Self {
        value.map_or(MetricValue::Missing, MetricValue::Float)
    }
}

/// The ten demographic metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub race_count: FrequencyTable,
    pub average_age_men: Option<f64>,
    pub percentage_bachelors: f64,
    pub higher_education_rich: Option<f64>,
    pub lower_education_rich: Option<f64>,
    pub min_work_hours: i64,
    pub rich_percentage: f64,
    pub highest_earning_country: String,
    pub highest_earning_country_percentage: f64,
    #[serde(rename = "top_IN_occupation")]
    pub top_in_occupation: Option<String>,
}

impl Report {
    /// Metric keys in report order
    pub const KEYS: [&'static str; 10] = [
        "race_count",
        "average_age_men",
        "percentage_bachelors",
        "higher_education_rich",
        "lower_education_rich",
        "min_work_hours",
        "rich_percentage",
        "highest_earning_country",
        "highest_earning_country_percentage",
        "top_IN_occupation",
    ];

    /// All metrics as (key, value) pairs in report order
    pub fn entries(&self) -> Vec<(&'static str, MetricValue<'_>)> {
        let values = [
            MetricValue::Frequencies(&self.race_count),
            self.average_age_men.into(),
            MetricValue::Float(self.percentage_bachelors),
            self.higher_education_rich.into(),
            self.lower_education_rich.into(),
            MetricValue::Integer(self.min_work_hours),
            MetricValue::Float(self.rich_percentage),
            MetricValue::Text(&self.highest_earning_country),
            MetricValue::Float(self.highest_earning_country_percentage),
            self.top_in_occupation
                .as_deref()
                .map_or(MetricValue::Missing, MetricValue::Text),
        ];
        Self::KEYS.into_iter().zip(values).collect()
    }

    /// Look up a metric by key
    pub fn get(&self, key: &str) -> Option<MetricValue<'_>> {
        self.entries()
            .into_iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }

    /// Write the labelled text summary
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Number of each race:")?;
        for (race, count) in self.race_count.iter() {
            writeln!(out, " {} {}", race, count)?;
        }
        writeln!(
            out,
            "Average age of men: {}",
            MetricValue::from(self.average_age_men)
        )?;
        writeln!(
            out,
            "Percentage with Bachelors degrees: {}",
            percent(Some(self.percentage_bachelors))
        )?;
        writeln!(
            out,
            "Percentage with higher education that earn >50K: {}",
            percent(self.higher_education_rich)
        )?;
        writeln!(
            out,
            "Percentage without higher education that earn >50K: {}",
            percent(self.lower_education_rich)
        )?;
        writeln!(out, "Min work time: {} hours/week", self.min_work_hours)?;
        writeln!(
            out,
            "Percentage of rich among those who work fewest hours: {}",
            percent(Some(self.rich_percentage))
        )?;
        writeln!(
            out,
            "Country with highest percentage of rich: {}",
            self.highest_earning_country
        )?;
        writeln!(
            out,
            "Highest percentage of rich people in country: {}",
            percent(Some(self.highest_earning_country_percentage))
        )?;
        writeln!(
            out,
            "Top occupations in India: {}",
            self.top_in_occupation.as_deref().unwrap_or("n/a")
        )?;
        Ok(())
    }

    /// Text summary as a string
    pub fn to_text(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_text(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// One-decimal percentage with a trailing `%`, or `n/a`
fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v),
        None => "n/a".to_string(),
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
