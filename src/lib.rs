//! Siesta: empirical-Bayes estimation of infant daily nap counts.
//!
//! Siesta blends a population prior (how often infants of a given age
//! take 0..=6 naps a day) with an individual's observed nap history to
//! predict the most likely daily nap count, and derives per-age
//! retention ranges for cleaning raw nap logs before analysis.
//!
//! # Quick Start
//!
//! ```
//! use siesta::prelude::*;
//!
//! // Population prior for a 7-month-old.
//! let priors = PriorTable::bundled();
//! let prior = priors.distribution(7);
//!
//! // No observations yet: predict the population mode.
//! let estimator = EbEstimator::new();
//! assert_eq!(estimator.posterior(&prior, 3, 0).mode(), Some(3));
//!
//! // After a week of 4-nap days the individual evidence wins out.
//! let posterior = estimator.posterior(&prior, 4, 7);
//! assert_eq!(posterior.mode(), Some(4));
//!
//! // Plausible-count range for data cleaning (95% HDI by default).
//! let range = RetentionPolicy::default().retained_range(&prior, Some(2.9));
//! assert_eq!((range.min, range.max), (1, 4));
//! ```
//!
//! # Modules
//!
//! - [`distribution`]: Discrete distributions over the 0..=6 nap support
//! - [`prior`]: Population prior tables and curated reference means
//! - [`estimator`]: Empirical-Bayes shrinkage with day down-weighting
//! - [`retention`]: Fixed, sigma, and HDI retained-range policies
//! - [`scenario`]: Illustrative per-age scenario grids
//! - [`report`]: Retained-range reports (TSV/CSV/JSON, with a parser)
//! - [`error`]: Error types and the crate-wide `Result` alias

pub mod distribution;
pub mod error;
pub mod estimator;
pub mod prelude;
pub mod prior;
pub mod report;
pub mod retention;
pub mod scenario;

pub use distribution::{CountDistribution, HdiInterval, Moments, MAX_NAP_COUNT, SUPPORT_SIZE};
pub use error::{Result, SiestaError};
pub use estimator::EbEstimator;
pub use prior::{PriorTable, ReferenceMeanTable};
pub use report::{ReportRow, RetentionReport};
pub use retention::{RetentionMode, RetentionPolicy, RetentionRange};
pub use scenario::{Scenario, ScenarioGenerator};
