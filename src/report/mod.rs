//! Retained-range reports across all known ages.
//!
//! The report is the batch artifact consumed by downstream data
//! cleaning: one row per age with the window center, the real-valued
//! window, and the integer retained range. It renders as TSV or CSV
//! (means and bounds at two decimals, range as `min-max`) and parses
//! back from either, so exported tables can be re-read and checked.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiestaError};
use crate::prior::{PriorTable, ReferenceMeanTable};
use crate::retention::RetentionPolicy;

/// One age line of the retained-range report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Age in months.
    pub age: u32,
    /// Window center (curated or prior-derived mean).
    pub mean: f64,
    /// Real-valued window lower edge.
    pub lower: f64,
    /// Real-valued window upper edge.
    pub upper: f64,
    /// Smallest retained nap count.
    pub min: u8,
    /// Largest retained nap count.
    pub max: u8,
}

/// Retained-range rows for every age known to either input table.
///
/// # Example
///
/// ```
/// use siesta::{PriorTable, ReferenceMeanTable, RetentionPolicy, RetentionReport};
///
/// let report = RetentionReport::build(
///     &PriorTable::bundled(),
///     &ReferenceMeanTable::curated(),
///     &RetentionPolicy::fixed(2.5).unwrap(),
/// );
/// let month_seven = report.get(7).expect("age 7 is covered");
/// assert_eq!((month_seven.min, month_seven.max), (1, 5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetentionReport {
    rows: Vec<ReportRow>,
}

impl RetentionReport {
    /// Builds the report under `policy`.
    ///
    /// Ages are the union of both tables' ages, ascending. An age with
    /// neither a curated mean nor any prior mass has no meaningful
    /// window and is skipped.
    #[must_use]
    pub fn build(
        priors: &PriorTable,
        reference: &ReferenceMeanTable,
        policy: &RetentionPolicy,
    ) -> Self {
        let mut ages: BTreeSet<u32> = priors.ages().collect();
        ages.extend(reference.ages());

        let mut rows = Vec::new();
        for age in ages {
            let prior = priors.distribution(age);
            let reference_mean = reference.get(age);
            if prior.is_empty() && reference_mean.is_none() {
                continue;
            }
            let range = policy.retained_range(&prior, reference_mean);
            rows.push(ReportRow {
                age,
                mean: range.center,
                lower: range.lower,
                upper: range.upper,
                min: range.min,
                max: range.max,
            });
        }
        Self { rows }
    }

    /// All rows, ascending by age.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Row for `age`, if covered.
    #[must_use]
    pub fn get(&self, age: u32) -> Option<&ReportRow> {
        self.rows.iter().find(|row| row.age == age)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the report has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the report as tab-separated text.
    #[must_use]
    pub fn to_tsv(&self) -> String {
        self.render('\t')
    }

    /// Renders the report as comma-separated text.
    #[must_use]
    pub fn to_csv(&self) -> String {
        self.render(',')
    }

    /// Renders the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns a `Serialization` error if JSON encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.rows)
            .map_err(|e| SiestaError::Serialization(e.to_string()))
    }

    fn render(&self, sep: char) -> String {
        let mut out = String::new();
        out.push_str(&format!("age{sep}mean{sep}lower{sep}upper{sep}retained\n"));
        for row in &self.rows {
            out.push_str(&format!(
                "{}{sep}{:.2}{sep}{:.2}{sep}{:.2}{sep}{}-{}\n",
                row.age, row.mean, row.lower, row.upper, row.min, row.max
            ));
        }
        out
    }

    /// Parses a report previously rendered by [`to_tsv`](Self::to_tsv)
    /// or [`to_csv`](Self::to_csv).
    ///
    /// The header line is skipped and blank lines are ignored; the
    /// separator is detected per line.
    ///
    /// # Errors
    ///
    /// Returns a `FormatError` naming the offending line when a row has
    /// fewer than five columns, an unparseable number, or a range cell
    /// not shaped like `min-max`.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut rows = Vec::new();

        for (idx, line) in text.lines().enumerate().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let line_no = idx + 1;
            let sep = if line.contains('\t') { '\t' } else { ',' };
            let cells: Vec<&str> = line.split(sep).map(str::trim).collect();
            if cells.len() < 5 {
                return Err(SiestaError::bad_report_line(
                    line_no,
                    &format!("expected 5 columns, got {}", cells.len()),
                ));
            }

            let age = cells[0].parse::<u32>().map_err(|_| {
                SiestaError::bad_report_line(line_no, &format!("unparseable age '{}'", cells[0]))
            })?;
            let mean = parse_bound(cells[1], line_no, "mean")?;
            let lower = parse_bound(cells[2], line_no, "lower")?;
            let upper = parse_bound(cells[3], line_no, "upper")?;

            let (min_cell, max_cell) = cells[4].split_once('-').ok_or_else(|| {
                SiestaError::bad_report_line(
                    line_no,
                    &format!("range '{}' is not min-max", cells[4]),
                )
            })?;
            let min = min_cell.trim().parse::<u8>().map_err(|_| {
                SiestaError::bad_report_line(line_no, &format!("unparseable min '{min_cell}'"))
            })?;
            let max = max_cell.trim().parse::<u8>().map_err(|_| {
                SiestaError::bad_report_line(line_no, &format!("unparseable max '{max_cell}'"))
            })?;

            rows.push(ReportRow {
                age,
                mean,
                lower,
                upper,
                min,
                max,
            });
        }

        Ok(Self { rows })
    }
}

fn parse_bound(cell: &str, line_no: usize, what: &str) -> Result<f64> {
    cell.parse::<f64>().map_err(|_| {
        SiestaError::bad_report_line(line_no, &format!("unparseable {what} '{cell}'"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_report() -> RetentionReport {
        RetentionReport::build(
            &PriorTable::bundled(),
            &ReferenceMeanTable::curated(),
            &RetentionPolicy::fixed(2.5).expect("valid threshold"),
        )
    }

    #[test]
    fn test_build_unions_ages_of_both_tables() {
        let report = fixed_report();
        // Curated means cover 1..=24, the survey covers 3..=35.
        assert_eq!(report.len(), 35);
        assert!(report.get(1).is_some());
        assert!(report.get(2).is_some());
        assert!(report.get(35).is_some());
        assert!(report.get(36).is_none());
    }

    #[test]
    fn test_build_month_seven_row() {
        let report = fixed_report();
        let row = report.get(7).expect("age 7 covered");
        // Curated mean 2.90 beats the prior-derived 2.85.
        assert!((row.mean - 2.90).abs() < 1e-12);
        assert!((row.lower - 0.40).abs() < 1e-12);
        assert!((row.upper - 5.40).abs() < 1e-12);
        assert_eq!((row.min, row.max), (1, 5));
    }

    #[test]
    fn test_build_reference_only_age() {
        let report = fixed_report();
        // Age 1 has no survey row: curated mean 4.7, window [2.2, 7.2].
        let row = report.get(1).expect("age 1 covered");
        assert!((row.mean - 4.7).abs() < 1e-12);
        assert_eq!((row.min, row.max), (3, 6));
    }

    #[test]
    fn test_build_prior_only_age() {
        let report = fixed_report();
        // Age 35 is past the curated range: raw mean (0.46 + 2*0.01) = 0.48.
        let row = report.get(35).expect("age 35 covered");
        assert!((row.mean - 0.48).abs() < 1e-9);
        assert_eq!((row.min, row.max), (0, 2));
    }

    #[test]
    fn test_build_skips_age_with_no_mean_source() {
        let priors = PriorTable::parse("age,0,1\n4,,\n5,20,80\n");
        let report = RetentionReport::build(
            &priors,
            &ReferenceMeanTable::empty(),
            &RetentionPolicy::fixed(2.5).expect("valid threshold"),
        );
        assert!(report.get(4).is_none());
        assert!(report.get(5).is_some());
    }

    #[test]
    fn test_tsv_layout() {
        let report = fixed_report();
        let tsv = report.to_tsv();
        let mut lines = tsv.lines();
        assert_eq!(lines.next(), Some("age\tmean\tlower\tupper\tretained"));
        let age_seven = tsv
            .lines()
            .find(|l| l.starts_with("7\t"))
            .expect("age 7 line");
        assert_eq!(age_seven, "7\t2.90\t0.40\t5.40\t1-5");
    }

    #[test]
    fn test_csv_layout() {
        let csv = fixed_report().to_csv();
        let age_seven = csv
            .lines()
            .find(|l| l.starts_with("7,"))
            .expect("age 7 line");
        assert_eq!(age_seven, "7,2.90,0.40,5.40,1-5");
    }

    #[test]
    fn test_roundtrip_preserves_ranges() {
        let report = fixed_report();
        let reparsed = RetentionReport::parse(&report.to_tsv()).expect("own output parses");
        assert_eq!(reparsed.len(), report.len());
        for (original, parsed) in report.rows().iter().zip(reparsed.rows()) {
            assert_eq!(original.age, parsed.age);
            assert_eq!((original.min, original.max), (parsed.min, parsed.max));
            // Bounds survive at two-decimal precision.
            assert!((original.mean - parsed.mean).abs() <= 0.005);
            assert!((original.lower - parsed.lower).abs() <= 0.005);
            assert!((original.upper - parsed.upper).abs() <= 0.005);
        }
    }

    #[test]
    fn test_parse_accepts_csv() {
        let parsed =
            RetentionReport::parse("age,mean,lower,upper,retained\n7,2.90,0.40,5.40,1-5\n")
                .expect("csv parses");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.rows()[0].age, 7);
    }

    #[test]
    fn test_parse_handles_negative_lower_bound() {
        let parsed =
            RetentionReport::parse("age\tmean\tlower\tupper\tretained\n24\t0.95\t-1.55\t3.45\t0-3\n")
                .expect("negative bound parses");
        assert!((parsed.rows()[0].lower + 1.55).abs() < 1e-12);
    }

    #[test]
    fn test_parse_rejects_short_row() {
        let err = RetentionReport::parse("age\tmean\tlower\tupper\tretained\n7\t2.90\n");
        let msg = err.expect_err("short row").to_string();
        assert!(msg.contains("line 2"));
        assert!(msg.contains("5 columns"));
    }

    #[test]
    fn test_parse_rejects_bad_range_cell() {
        let err = RetentionReport::parse("age\tmean\tlower\tupper\tretained\n7\t2.90\t0.40\t5.40\tall\n");
        assert!(err.expect_err("bad range").to_string().contains("min-max"));
    }

    #[test]
    fn test_parse_rejects_bad_number() {
        let err = RetentionReport::parse("age\tmean\tlower\tupper\tretained\nseven\t2.90\t0.40\t5.40\t1-5\n");
        assert!(err.expect_err("bad age").to_string().contains("age"));
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let parsed = RetentionReport::parse("age,mean,lower,upper,retained\n\n7,2.90,0.40,5.40,1-5\n\n")
            .expect("blank lines ignored");
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_json_rendering() {
        let json = fixed_report().to_json().expect("serializable");
        assert!(json.contains("\"age\": 7"));
        assert!(json.contains("\"min\": 1"));
    }

    #[test]
    fn test_hdi_policy_report() {
        let report = RetentionReport::build(
            &PriorTable::bundled(),
            &ReferenceMeanTable::curated(),
            &RetentionPolicy::default(),
        );
        let row = report.get(7).expect("age 7 covered");
        // 95% HDI of the bundled month-7 prior.
        assert_eq!((row.min, row.max), (1, 4));
        // HDI bounds are support points.
        assert_eq!(row.lower, 1.0);
        assert_eq!(row.upper, 4.0);
    }
}
