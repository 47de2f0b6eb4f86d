//! Population nap-count priors and curated reference means.
//!
//! A [`PriorTable`] maps an age in months to the observed frequency of
//! each daily nap count, parsed from survey-style tabular text. Parsing
//! is best effort: rows and cells that do not parse are skipped, never
//! fatal, so one stray line cannot take down a whole table load.
//!
//! A [`ReferenceMeanTable`] carries externally curated average nap counts
//! per age. Where present, a curated mean takes precedence over the
//! prior-derived raw mean as the center of the fixed retention window.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::distribution::{CountDistribution, MAX_NAP_COUNT};
use crate::error::Result;

/// Bundled illustrative nap survey covering ages 3..=35 months.
const BUNDLED_PRIORS: &str = include_str!("../../data/nap_priors.csv");

/// Curated average daily nap count per age in months, ages 1..=24.
const CURATED_GROUP_MEANS: [(u32, f64); 24] = [
    (1, 4.7),
    (2, 4.3),
    (3, 3.95),
    (4, 3.55),
    (5, 3.2),
    (6, 3.2),
    (7, 2.9),
    (8, 2.55),
    (9, 2.25),
    (10, 2.15),
    (11, 1.95),
    (12, 1.85),
    (13, 1.65),
    (14, 1.5),
    (15, 1.4),
    (16, 1.25),
    (17, 1.15),
    (18, 1.15),
    (19, 1.1),
    (20, 1.1),
    (21, 1.1),
    (22, 1.05),
    (23, 1.0),
    (24, 0.95),
];

/// Per-age population prior over daily nap counts.
///
/// Built once from tabular text and read-only afterwards. Distributions
/// are stored exactly as parsed (unnormalized): blank or zero cells carry
/// no mass, so a row's total can fall below 1.
///
/// # Example
///
/// ```
/// use siesta::PriorTable;
///
/// let table = PriorTable::parse("age,0,1,2\n12,10,60,30\n");
/// let prior = table.get(12).expect("row parsed");
/// assert!((prior.get(1) - 0.60).abs() < 1e-12);
/// assert_eq!(table.get(99), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriorTable {
    by_age: BTreeMap<u32, CountDistribution>,
}

impl PriorTable {
    /// Parses survey-style tabular text into a prior table.
    ///
    /// Expected shape: one header line (skipped), then rows of
    /// `age, p0, p1, ..., p6` where each probability cell is a percentage
    /// (an optional trailing `%` is accepted) divided by 100. Trailing
    /// probability columns may be omitted.
    ///
    /// Parsing never fails: rows with an unparseable age are skipped,
    /// blank or malformed cells contribute no mass, non-finite and
    /// negative percentages are dropped cell-wise, and a leading UTF-8
    /// byte-order mark is stripped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut by_age = BTreeMap::new();

        for line in text.lines().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut cells = line.split(',');
            let age_cell = cells.next().unwrap_or_default();
            let Ok(age) = age_cell.trim().parse::<u32>() else {
                continue;
            };

            let mut dist = CountDistribution::new();
            for (k, cell) in cells.take(usize::from(MAX_NAP_COUNT) + 1).enumerate() {
                let cell = cell.trim().trim_end_matches('%');
                if cell.is_empty() {
                    continue;
                }
                let Ok(percent) = cell.parse::<f64>() else {
                    continue;
                };
                let p = percent / 100.0;
                if p.is_finite() && p > 0.0 {
                    dist.set(k as u8, p);
                }
            }
            by_age.insert(age, dist);
        }

        Self { by_age }
    }

    /// Reads and parses a prior table from a file.
    ///
    /// # Errors
    ///
    /// Returns an error only when the file cannot be read; the parse
    /// itself is best effort.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Returns the compiled-in illustrative survey table.
    ///
    /// Lets demos and tests run without any external files.
    #[must_use]
    pub fn bundled() -> Self {
        Self::parse(BUNDLED_PRIORS)
    }

    /// Prior for `age`, if the table has a row for it.
    #[must_use]
    pub fn get(&self, age: u32) -> Option<&CountDistribution> {
        self.by_age.get(&age)
    }

    /// Prior for `age`, degrading to the empty distribution for unknown
    /// ages.
    ///
    /// The empty distribution propagates the "no data" behavior: no mode,
    /// zero means, degenerate intervals.
    #[must_use]
    pub fn distribution(&self, age: u32) -> CountDistribution {
        self.by_age
            .get(&age)
            .copied()
            .unwrap_or_else(CountDistribution::new)
    }

    /// Ages with a parsed row, ascending.
    pub fn ages(&self) -> impl Iterator<Item = u32> + '_ {
        self.by_age.keys().copied()
    }

    /// Iterates `(age, prior)` pairs in ascending age order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &CountDistribution)> {
        self.by_age.iter().map(|(&age, dist)| (age, dist))
    }

    /// Number of parsed rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_age.len()
    }

    /// Whether the table holds no rows at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_age.is_empty()
    }
}

/// Curated average nap counts per age in months.
///
/// Ages present here override the prior-derived raw mean when centering
/// the fixed retention window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceMeanTable {
    by_age: BTreeMap<u32, f64>,
}

impl ReferenceMeanTable {
    /// Returns the curated table for ages 1..=24 months.
    ///
    /// # Example
    ///
    /// ```
    /// use siesta::ReferenceMeanTable;
    ///
    /// let means = ReferenceMeanTable::curated();
    /// assert_eq!(means.get(7), Some(2.9));
    /// assert_eq!(means.get(30), None);
    /// ```
    #[must_use]
    pub fn curated() -> Self {
        Self::from_pairs(&CURATED_GROUP_MEANS)
    }

    /// Builds a table from `(age, mean)` pairs.
    ///
    /// Non-finite and non-positive means are ignored; a duplicate age
    /// keeps the last value.
    #[must_use]
    pub fn from_pairs(pairs: &[(u32, f64)]) -> Self {
        let mut by_age = BTreeMap::new();
        for &(age, mean) in pairs {
            if mean.is_finite() && mean > 0.0 {
                by_age.insert(age, mean);
            }
        }
        Self { by_age }
    }

    /// An empty table; every lookup falls back to the prior-derived mean.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Curated mean for `age`, if present.
    #[must_use]
    pub fn get(&self, age: u32) -> Option<f64> {
        self.by_age.get(&age).copied()
    }

    /// Ages with a curated mean, ascending.
    pub fn ages(&self) -> impl Iterator<Item = u32> + '_ {
        self.by_age.keys().copied()
    }

    /// Number of curated entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_age.len()
    }

    /// Whether the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_age.is_empty()
    }
}
