//! Metric computations
//!
//! Each function computes one metric over a slice of records. Functions return `None`
//! when the subset the metric is defined over is empty; the generator decides what that
//! means for the report (see `EmptySubsetPolicy`).
//!
//! Grouping keeps groups in first-seen order and reductions only replace the current best
//! on a strictly greater value, so every tie resolves to the value seen first in the data.

use crate::report::FrequencyTable;
use crate::types::Record;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Country used for the top-occupation metric
pub const TOP_OCCUPATION_COUNTRY: &str = "India";

/// Round to one decimal place
///
/// The decision is made on the exact binary value of `value`, and exact ties go to the
/// even digit: 6.25 rounds to 6.2, while 0.45 (stored slightly above the tie) rounds to 0.5.
pub fn round_one_decimal(value: f64) -> f64 {
    let magnitude = value.abs();
    // Already a whole number of tenths at this size, or not a number at all
    if !magnitude.is_finite() || magnitude >= 1e15 {
        return value;
    }
    // Too small to reach the 0.05 midpoint
    if magnitude < 1e-3 {
        return 0.0f64.copysign(value);
    }

    // Find k with k/10 <= magnitude < (k+1)/10, correcting the float estimate exactly
    let mut tenths = (magnitude * 10.0).floor() as u64;
    if compare_exact(magnitude, tenths, 10) == Ordering::Less {
        tenths -= 1;
    } else if compare_exact(magnitude, tenths + 1, 10) != Ordering::Less {
        tenths += 1;
    }

    let rounded = match compare_exact(magnitude, 2 * tenths + 1, 20) {
        Ordering::Less => tenths,
        Ordering::Greater => tenths + 1,
        Ordering::Equal if tenths % 2 == 0 => tenths,
        Ordering::Equal => tenths + 1,
    };

    (rounded as f64 / 10.0).copysign(value)
}

/// Compare a positive normal float with `numerator / denominator` without rounding
fn compare_exact(value: f64, numerator: u64, denominator: u64) -> Ordering {
    let bits = value.to_bits();
    let mantissa = (bits & ((1u64 << 52) - 1)) | (1u64 << 52);
    let exponent = ((bits >> 52) & 0x7ff) as i32 - 1075;

    // value = mantissa * 2^exponent; callers keep the shifts inside u128
    let lhs = mantissa as u128 * denominator as u128;
    let rhs = numerator as u128;
    if exponent >= 0 {
        (lhs << exponent).cmp(&rhs)
    } else {
        lhs.cmp(&(rhs << -exponent))
    }
}

/// `part / whole * 100`, unrounded
fn percentage_of(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64 * 100.0
}

/// Running count of records and how many of them are rich
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RichTally {
    pub total: usize,
    pub rich: usize,
}

impl RichTally {
    pub fn add(&mut self, record: &Record) {
        self.total += 1;
        if record.is_rich() {
            self.rich += 1;
        }
    }

    /// Unrounded rich percentage, `None` for an empty tally
    pub fn raw_percentage(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(percentage_of(self.rich, self.total))
        }
    }

    /// Rich percentage rounded to one decimal place
    pub fn percentage(&self) -> Option<f64> {
        self.raw_percentage().map(round_one_decimal)
    }

    /// Exact ratio comparison (rich/total) without going through floats
    fn beats(&self, other: &RichTally) -> bool {
        (self.rich as u128) * (other.total as u128) > (other.rich as u128) * (self.total as u128)
    }
}

impl<'a> FromIterator<&'a Record> for RichTally {
    fn from_iter<T: IntoIterator<Item = &'a Record>>(iter: T) -> Self {
        let mut tally = RichTally::default();
        for record in iter {
            tally.add(record);
        }
        tally
    }
}

/// Count occurrences of a key, keeping first-seen order
fn count_in_order<'a, F>(records: impl IntoIterator<Item = &'a Record>, key: F) -> Vec<(&'a str, usize)>
where
    F: Fn(&'a Record) -> &'a str,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(&'a str, usize)> = Vec::new();

    for record in records {
        let value = key(record);
        match index.get(value) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }

    counts
}

/// Number of records per race, most frequent first
pub fn race_count(records: &[Record]) -> FrequencyTable {
    let mut counts = count_in_order(records, |r| r.race.as_str());
    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    FrequencyTable::new(
        counts
            .into_iter()
            .map(|(race, count)| (race.to_string(), count))
            .collect(),
    )
}

/// Mean age of male records, rounded to one decimal
pub fn average_age_men(records: &[Record]) -> Option<f64> {
    let (sum, count) = records
        .iter()
        .filter(|r| r.is_male())
        .fold((0i64, 0usize), |(sum, count), r| (sum + r.age, count + 1));

    if count == 0 {
        return None;
    }
    Some(round_one_decimal(sum as f64 / count as f64))
}

/// Share of all records with a Bachelors degree
pub fn percentage_bachelors(records: &[Record]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let bachelors = records.iter().filter(|r| r.education == "Bachelors").count();
    Some(round_one_decimal(percentage_of(bachelors, records.len())))
}

/// Rich percentage among Bachelors, Masters and Doctorate holders
pub fn higher_education_rich(records: &[Record]) -> Option<f64> {
    records
        .iter()
        .filter(|r| r.has_higher_education())
        .collect::<RichTally>()
        .percentage()
}

/// Rich percentage among everyone without higher education
pub fn lower_education_rich(records: &[Record]) -> Option<f64> {
    records
        .iter()
        .filter(|r| !r.has_higher_education())
        .collect::<RichTally>()
        .percentage()
}

pub fn min_work_hours(records: &[Record]) -> Option<i64> {
    records.iter().map(|r| r.hours_per_week).min()
}

/// Rich percentage among records working exactly `hours` per week
pub fn rich_percentage(records: &[Record], hours: i64) -> Option<f64> {
    records
        .iter()
        .filter(|r| r.hours_per_week == hours)
        .collect::<RichTally>()
        .percentage()
}

/// Country with the highest rich percentage and that percentage (rounded)
///
/// Ties go to the country that appears first in the data.
pub fn highest_earning_country(records: &[Record]) -> Option<(String, f64)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, RichTally)> = Vec::new();

    for record in records {
        let country = record.native_country.as_str();
        let idx = *index.entry(country).or_insert_with(|| {
            groups.push((country, RichTally::default()));
            groups.len() - 1
        });
        groups[idx].1.add(record);
    }

    let mut best: Option<&(&str, RichTally)> = None;
    for group in &groups {
        match best {
            Some((_, best_tally)) if !group.1.beats(best_tally) => {}
            _ => best = Some(group),
        }
    }

    log::trace!("Grouped {} countries", groups.len());

    best.and_then(|(country, tally)| {
        tally
            .percentage()
            .map(|percentage| (country.to_string(), percentage))
    })
}

/// Most frequent occupation among rich records from `country`
///
/// Ties go to the occupation whose first occurrence comes first.
pub fn top_occupation(records: &[Record], country: &str) -> Option<String> {
    let counts = count_in_order(
        records
            .iter()
            .filter(|r| r.is_rich() && r.native_country == country),
        |r| r.occupation.as_str(),
    );

    let mut best: Option<(&str, usize)> = None;
    for (occupation, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((occupation, count)),
        }
    }

    best.map(|(occupation, _)| occupation.to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::Salary;

    /// Build a record with only the fields the metrics look at
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn record(
        age: i64,
        sex: &str,
        education: &str,
        race: &str,
        hours: i64,
        country: &str,
        occupation: &str,
        rich: bool,
    ) -> Record {
        Record {
            age,
            workclass: "Private".to_string(),
            fnlwgt: 100_000,
            education: education.to_string(),
            education_num: 10,
            marital_status: "Never-married".to_string(),
            occupation: occupation.to_string(),
            relationship: "Not-in-family".to_string(),
            race: race.to_string(),
            sex: sex.to_string(),
            capital_gain: 0,
            capital_loss: 0,
            hours_per_week: hours,
            native_country: country.to_string(),
            salary: if rich { Salary::Above50K } else { Salary::AtMost50K },
        }
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_one_decimal(100.0 / 3.0), 33.3);
        assert_eq!(round_one_decimal(200.0 / 3.0), 66.7);
        assert_eq!(round_one_decimal(0.0), 0.0);
        assert_eq!(round_one_decimal(100.0), 100.0);
    }

    #[test]
    fn test_rounding_exact_ties_go_to_even() {
        assert_eq!(round_one_decimal(12.25), 12.2);
        assert_eq!(round_one_decimal(6.25), 6.2);
        assert_eq!(round_one_decimal(30.25), 30.2);
        assert_eq!(round_one_decimal(30.75), 30.8);
        assert_eq!(round_one_decimal(-6.25), -6.2);
    }

    #[test]
    fn test_rounding_uses_stored_binary_value() {
        // 0.35 and 0.15 are stored just below the midpoint, 0.45 and 0.05 just above
        assert_eq!(round_one_decimal(0.35), 0.3);
        assert_eq!(round_one_decimal(0.15), 0.1);
        assert_eq!(round_one_decimal(0.45), 0.5);
        assert_eq!(round_one_decimal(0.05), 0.1);
        assert_eq!(round_one_decimal(0.0004), 0.0);
    }

    #[test]
    fn test_average_age_tie_rounds_to_even() {
        let records = vec![
            record(30, "Male", "HS-grad", "White", 40, "US", "Sales", false),
            record(30, "Male", "HS-grad", "White", 40, "US", "Sales", false),
            record(30, "Male", "HS-grad", "White", 40, "US", "Sales", false),
            record(31, "Male", "HS-grad", "White", 40, "US", "Sales", false),
        ];
        assert_eq!(average_age_men(&records), Some(30.2));
    }

    #[test]
    fn test_race_count_orders_by_count_then_first_seen() {
        let records = vec![
            record(30, "Male", "HS-grad", "Black", 40, "US", "Sales", false),
            record(30, "Male", "HS-grad", "White", 40, "US", "Sales", false),
            record(30, "Male", "HS-grad", "Asian", 40, "US", "Sales", false),
            record(30, "Male", "HS-grad", "White", 40, "US", "Sales", false),
            record(30, "Male", "HS-grad", "Asian", 40, "US", "Sales", false),
            record(30, "Male", "HS-grad", "Other", 40, "US", "Sales", false),
        ];

        let counts = race_count(&records);
        let entries: Vec<(&str, usize)> =
            counts.iter().map(|(race, n)| (race.as_str(), *n)).collect();
        assert_eq!(
            entries,
            vec![("White", 2), ("Asian", 2), ("Black", 1), ("Other", 1)]
        );
        assert_eq!(counts.total(), records.len());
    }

    #[test]
    fn test_average_age_men() {
        let records = vec![
            record(30, "Male", "HS-grad", "White", 40, "US", "Sales", false),
            record(50, "Female", "HS-grad", "White", 40, "US", "Sales", false),
            record(41, "Male", "HS-grad", "White", 40, "US", "Sales", false),
            record(44, "Male", "HS-grad", "White", 40, "US", "Sales", false),
        ];
        assert_eq!(average_age_men(&records), Some(38.3));

        let women = vec![record(50, "Female", "HS-grad", "White", 40, "US", "Sales", false)];
        assert_eq!(average_age_men(&women), None);
    }

    #[test]
    fn test_average_age_ignores_order() {
        let mut records = vec![
            record(23, "Male", "HS-grad", "White", 40, "US", "Sales", false),
            record(67, "Male", "HS-grad", "White", 40, "US", "Sales", false),
            record(35, "Female", "HS-grad", "White", 40, "US", "Sales", false),
            record(48, "Male", "HS-grad", "White", 40, "US", "Sales", false),
        ];
        let forward = average_age_men(&records);
        records.reverse();
        assert_eq!(average_age_men(&records), forward);
        assert_eq!(forward, Some(46.0));
    }

    #[test]
    fn test_education_split() {
        let records = vec![
            record(30, "Male", "Bachelors", "White", 40, "US", "Sales", true),
            record(30, "Male", "Doctorate", "White", 40, "US", "Sales", false),
            record(30, "Male", "HS-grad", "White", 40, "US", "Sales", true),
            record(30, "Male", "HS-grad", "White", 40, "US", "Sales", false),
            record(30, "Male", "11th", "White", 40, "US", "Sales", false),
        ];
        assert_eq!(percentage_bachelors(&records), Some(20.0));
        assert_eq!(higher_education_rich(&records), Some(50.0));
        assert_eq!(lower_education_rich(&records), Some(33.3));
    }

    #[test]
    fn test_education_split_empty_side() {
        let records = vec![record(30, "Male", "Masters", "White", 40, "US", "Sales", true)];
        assert_eq!(higher_education_rich(&records), Some(100.0));
        assert_eq!(lower_education_rich(&records), None);
        assert_eq!(percentage_bachelors(&records), Some(0.0));
        assert_eq!(percentage_bachelors(&[]), None);
    }

    #[test]
    fn test_min_hours_and_rich_percentage() {
        let records = vec![
            record(30, "Male", "HS-grad", "White", 1, "US", "Sales", true),
            record(30, "Male", "HS-grad", "White", 40, "US", "Sales", true),
            record(30, "Male", "HS-grad", "White", 1, "US", "Sales", false),
            record(30, "Male", "HS-grad", "White", 1, "US", "Sales", false),
        ];
        assert_eq!(min_work_hours(&records), Some(1));
        assert_eq!(rich_percentage(&records, 1), Some(33.3));
        assert_eq!(rich_percentage(&records, 99), None);
        assert_eq!(min_work_hours(&[]), None);
    }

    #[test]
    fn test_highest_earning_country() {
        let records = vec![
            record(30, "Male", "HS-grad", "White", 40, "United-States", "Sales", true),
            record(30, "Male", "HS-grad", "White", 40, "United-States", "Sales", false),
            record(30, "Male", "HS-grad", "White", 40, "United-States", "Sales", false),
            record(30, "Male", "HS-grad", "White", 40, "Iran", "Sales", true),
            record(30, "Male", "HS-grad", "White", 40, "Iran", "Sales", true),
            record(30, "Male", "HS-grad", "White", 40, "Iran", "Sales", false),
            record(30, "Male", "HS-grad", "White", 40, "Cuba", "Sales", false),
        ];
        assert_eq!(
            highest_earning_country(&records),
            Some(("Iran".to_string(), 66.7))
        );
    }

    #[test]
    fn test_highest_earning_country_tie_goes_to_first_seen() {
        let records = vec![
            record(30, "Male", "HS-grad", "White", 40, "Peru", "Sales", false),
            record(30, "Male", "HS-grad", "White", 40, "Japan", "Sales", true),
            record(30, "Male", "HS-grad", "White", 40, "Japan", "Sales", false),
            record(30, "Male", "HS-grad", "White", 40, "Canada", "Sales", true),
            record(30, "Male", "HS-grad", "White", 40, "Canada", "Sales", true),
            record(30, "Male", "HS-grad", "White", 40, "Canada", "Sales", false),
            record(30, "Male", "HS-grad", "White", 40, "Canada", "Sales", false),
        ];
        // Japan 1/2 and Canada 2/4 tie exactly
        assert_eq!(
            highest_earning_country(&records),
            Some(("Japan".to_string(), 50.0))
        );
    }

    #[test]
    fn test_highest_earning_country_nobody_rich() {
        let records = vec![
            record(30, "Male", "HS-grad", "White", 40, "Peru", "Sales", false),
            record(30, "Male", "HS-grad", "White", 40, "Japan", "Sales", false),
        ];
        assert_eq!(
            highest_earning_country(&records),
            Some(("Peru".to_string(), 0.0))
        );
        assert_eq!(highest_earning_country(&[]), None);
    }

    #[test]
    fn test_top_occupation() {
        let records = vec![
            record(30, "Male", "HS-grad", "Asian-Pac-Islander", 40, "India", "Sales", true),
            record(30, "Male", "HS-grad", "Asian-Pac-Islander", 40, "India", "Prof-specialty", true),
            record(30, "Male", "HS-grad", "Asian-Pac-Islander", 40, "India", "Prof-specialty", true),
            record(30, "Male", "HS-grad", "Asian-Pac-Islander", 40, "India", "Sales", false),
            record(30, "Male", "HS-grad", "Asian-Pac-Islander", 40, "India", "Sales", false),
            record(30, "Male", "HS-grad", "White", 40, "England", "Sales", true),
            record(30, "Male", "HS-grad", "White", 40, "England", "Sales", true),
        ];
        assert_eq!(
            top_occupation(&records, TOP_OCCUPATION_COUNTRY),
            Some("Prof-specialty".to_string())
        );
    }

    #[test]
    fn test_top_occupation_tie_goes_to_first_seen() {
        let records = vec![
            record(30, "Male", "HS-grad", "White", 40, "India", "Tech-support", true),
            record(30, "Male", "HS-grad", "White", 40, "India", "Exec-managerial", true),
            record(30, "Male", "HS-grad", "White", 40, "India", "Exec-managerial", true),
            record(30, "Male", "HS-grad", "White", 40, "India", "Tech-support", true),
        ];
        assert_eq!(
            top_occupation(&records, "India"),
            Some("Tech-support".to_string())
        );
    }

    #[test]
    fn test_top_occupation_empty_subset() {
        let records = vec![
            record(30, "Male", "HS-grad", "White", 40, "India", "Sales", false),
            record(30, "Male", "HS-grad", "White", 40, "Mexico", "Sales", true),
        ];
        assert_eq!(top_occupation(&records, "India"), None);
    }
}
