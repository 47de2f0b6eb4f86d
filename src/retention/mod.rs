//! Retention-range policies for filtering implausible nap counts.
//!
//! Raw nap logs contain outliers (a stray 6-nap day logged for a
//! toddler). Before analysis, each age gets an inclusive range of
//! plausible daily counts; observations outside it are set aside. Three
//! interchangeable policies compute that range from the population prior:
//!
//! - **Fixed**: a constant-width window around the raw population mean.
//! - **Sigma**: mean +/- a multiple of the standard deviation of the
//!   normalized prior.
//! - **Hdi**: the narrowest contiguous range holding a target share of
//!   the normalized prior's mass.

use serde::{Deserialize, Serialize};

use crate::distribution::{CountDistribution, MAX_NAP_COUNT};
use crate::error::{Result, SiestaError};

/// Default half-width of the fixed retention window.
pub const DEFAULT_FIXED_THRESHOLD: f64 = 2.5;

/// Default standard-deviation multiplier for the sigma mode.
pub const DEFAULT_SIGMA_MULTIPLIER: f64 = 2.0;

/// Default probability mass targeted by the HDI mode.
pub const DEFAULT_HDI_MASS: f64 = 0.95;

/// Retention window selection, with the per-mode parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetentionMode {
    /// Constant-width window `mean +/- threshold` around the raw mean
    /// (curated reference mean where available, otherwise the
    /// unnormalized prior's weighted mean).
    Fixed {
        /// Window half-width in naps, > 0.
        threshold: f64,
    },

    /// Window `mean +/- multiplier * sd` over the normalized prior.
    Sigma {
        /// Standard-deviation multiplier, in `[0.5, 4]`.
        multiplier: f64,
    },

    /// Narrowest contiguous range of the normalized prior reaching the
    /// target mass.
    Hdi {
        /// Target probability mass, in `(0, 1]`.
        mass: f64,
    },
}

impl Default for RetentionMode {
    fn default() -> Self {
        Self::Hdi {
            mass: DEFAULT_HDI_MASS,
        }
    }
}

/// Inclusive range of plausible nap counts for one age.
///
/// `min..=max` is the integer range actually applied to observations;
/// `lower..upper` is the real-valued window it was clamped from, and
/// `center` the value the window was built around. The rationale restates
/// the computation for human readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionRange {
    /// Smallest retained nap count.
    pub min: u8,
    /// Largest retained nap count.
    pub max: u8,
    /// Window center (raw mean for fixed, normalized mean otherwise).
    pub center: f64,
    /// Real-valued window lower edge before clamping.
    pub lower: f64,
    /// Real-valued window upper edge before clamping.
    pub upper: f64,
    /// Human-readable summary of how the range was derived.
    pub rationale: String,
}

impl RetentionRange {
    /// Whether `count` falls inside the retained range.
    #[must_use]
    pub fn contains(&self, count: u8) -> bool {
        self.min <= count && count <= self.max
    }

    /// Iterates the retained counts in ascending order.
    pub fn counts(&self) -> impl Iterator<Item = u8> {
        self.min..=self.max
    }
}

/// Computes per-age retention ranges under a validated [`RetentionMode`].
///
/// # Example
///
/// ```
/// use siesta::{CountDistribution, RetentionMode, RetentionPolicy};
///
/// let prior = CountDistribution::from_pairs(&[(1, 0.10), (2, 0.25), (3, 0.40), (4, 0.20), (5, 0.05)]);
/// let policy = RetentionPolicy::new(RetentionMode::Fixed { threshold: 2.5 }).unwrap();
///
/// // Curated reference mean for the age takes precedence as the center.
/// let range = policy.retained_range(&prior, Some(2.9));
/// assert_eq!((range.min, range.max), (1, 5));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetentionPolicy {
    mode: RetentionMode,
}

impl RetentionPolicy {
    /// Creates a policy, validating the mode parameter.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHyperparameter` if:
    /// - fixed `threshold` is not finite or not > 0
    /// - sigma `multiplier` lies outside `[0.5, 4]`
    /// - HDI `mass` is not finite or lies outside `(0, 1]`
    pub fn new(mode: RetentionMode) -> Result<Self> {
        match mode {
            RetentionMode::Fixed { threshold } => {
                if !threshold.is_finite() || threshold <= 0.0 {
                    return Err(SiestaError::invalid_hyperparameter(
                        "threshold",
                        threshold,
                        ">0",
                    ));
                }
            }
            RetentionMode::Sigma { multiplier } => {
                if !(0.5..=4.0).contains(&multiplier) {
                    return Err(SiestaError::invalid_hyperparameter(
                        "multiplier",
                        multiplier,
                        "in [0.5, 4]",
                    ));
                }
            }
            RetentionMode::Hdi { mass } => {
                if !mass.is_finite() || mass <= 0.0 || mass > 1.0 {
                    return Err(SiestaError::invalid_hyperparameter(
                        "mass",
                        mass,
                        "in (0, 1]",
                    ));
                }
            }
        }
        Ok(Self { mode })
    }

    /// Fixed-window policy with the given half-width.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHyperparameter` if `threshold` is not > 0.
    pub fn fixed(threshold: f64) -> Result<Self> {
        Self::new(RetentionMode::Fixed { threshold })
    }

    /// Sigma-window policy with the given multiplier.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHyperparameter` if `multiplier` is outside `[0.5, 4]`.
    pub fn sigma(multiplier: f64) -> Result<Self> {
        Self::new(RetentionMode::Sigma { multiplier })
    }

    /// HDI policy targeting the given mass.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHyperparameter` if `mass` is outside `(0, 1]`.
    pub fn hdi(mass: f64) -> Result<Self> {
        Self::new(RetentionMode::Hdi { mass })
    }

    /// The validated mode this policy applies.
    #[must_use]
    pub fn mode(&self) -> RetentionMode {
        self.mode
    }

    /// Computes the retained range for one age.
    ///
    /// `reference_mean` is the curated mean for the age, if any; only the
    /// fixed mode uses it, centering on the unnormalized prior's raw mean
    /// when it is absent. Never fails: degenerate priors produce
    /// degenerate but well-formed ranges.
    #[must_use]
    pub fn retained_range(
        &self,
        prior: &CountDistribution,
        reference_mean: Option<f64>,
    ) -> RetentionRange {
        match self.mode {
            RetentionMode::Fixed { threshold } => {
                let center = reference_mean.unwrap_or_else(|| prior.raw_mean());
                let lower = center - threshold;
                let upper = center + threshold;
                let (min, max) = clamp_window(center, lower, upper);
                RetentionRange {
                    min,
                    max,
                    center,
                    lower,
                    upper,
                    rationale: format!(
                        "fixed window {lower:.2}..{upper:.2} around mean {center:.2}"
                    ),
                }
            }
            RetentionMode::Sigma { multiplier } => {
                let moments = prior.normalize().moments();
                let center = moments.mean;
                let spread = multiplier * moments.std_dev();
                let lower = center - spread;
                let upper = center + spread;
                let (min, max) = clamp_window(center, lower, upper);
                RetentionRange {
                    min,
                    max,
                    center,
                    lower,
                    upper,
                    rationale: format!(
                        "sigma window mean {center:.2} +/- {multiplier:.1} sd = {lower:.2}..{upper:.2}"
                    ),
                }
            }
            RetentionMode::Hdi { mass } => {
                let normalized = prior.normalize();
                let interval = normalized.hdi(mass);
                let center = normalized.moments().mean;
                RetentionRange {
                    min: interval.low,
                    max: interval.high,
                    center,
                    lower: f64::from(interval.low),
                    upper: f64::from(interval.high),
                    rationale: format!(
                        "{:.0}% HDI covering {:.2} of mass",
                        mass * 100.0,
                        interval.covered
                    ),
                }
            }
        }
    }
}

/// Clamps a real-valued window into the integer support.
///
/// min = ceil(lower) floored at 0, max = floor(upper) capped at the
/// support maximum. An inverted result collapses to the single point
/// nearest the window center.
fn clamp_window(center: f64, lower: f64, upper: f64) -> (u8, u8) {
    let top = f64::from(MAX_NAP_COUNT);
    let min = lower.ceil().max(0.0);
    let max = upper.floor().min(top);
    if min > max {
        let mid = center.round().clamp(0.0, top) as u8;
        return (mid, mid);
    }
    (min as u8, max as u8)
}
