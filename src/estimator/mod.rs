//! Empirical-Bayes shrinkage estimation of daily nap counts.
//!
//! The estimator blends a population prior with an individual's observed
//! nap history. With few observed days the posterior stays close to the
//! population; as evidence accumulates it converges to the individual:
//!
//! ```text
//! posterior(k) = S/(S+n) * prior(k) + n/(S+n) * individual(k)
//! ```
//!
//! where `S` is the prior strength in pseudo-days and `n` the effective
//! number of observed days.
//!
//! Days reporting an atypically high count (above the population mode)
//! are suspected short-nap-heavy logs and contribute less than a full
//! day of evidence; see [`EbEstimator::day_weight`].

use crate::distribution::{CountDistribution, MAX_NAP_COUNT};
use crate::error::{Result, SiestaError};

/// Default prior strength `S` in pseudo-days.
pub const DEFAULT_PRIOR_STRENGTH: f64 = 7.0;

/// Default coefficient scaling the atypical-day penalty.
pub const DEFAULT_DOWN_WEIGHT_COEFF: f64 = 0.5;

/// Default floor below which a day's weight never drops.
pub const DEFAULT_MIN_DAY_WEIGHT: f64 = 0.5;

/// Conservative lower bound on the share of short naps in a day whose
/// count exceeds the population baseline.
const SHORT_NAP_SHARE: f64 = 1.0 / 3.0;

/// Empirical-Bayes estimator configuration and operations.
///
/// Construction starts from the standard configuration; the `with_*`
/// setters validate replacements.
///
/// # Example
///
/// ```
/// use siesta::{CountDistribution, EbEstimator};
///
/// let prior = CountDistribution::from_pairs(&[(1, 0.10), (2, 0.25), (3, 0.40), (4, 0.20), (5, 0.05)]);
/// let estimator = EbEstimator::new();
///
/// // No observations: the posterior is the population prior.
/// assert_eq!(estimator.posterior(&prior, 3, 0).mode(), Some(3));
///
/// // A week of 4-nap days moves the estimate to the individual.
/// assert_eq!(estimator.posterior(&prior, 4, 7).mode(), Some(4));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EbEstimator {
    prior_strength: f64,
    down_weight_coeff: f64,
    min_day_weight: f64,
}

impl Default for EbEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl EbEstimator {
    /// Creates an estimator with the standard configuration
    /// (`S = 7`, penalty coefficient `0.5`, weight floor `0.5`).
    #[must_use]
    pub fn new() -> Self {
        Self {
            prior_strength: DEFAULT_PRIOR_STRENGTH,
            down_weight_coeff: DEFAULT_DOWN_WEIGHT_COEFF,
            min_day_weight: DEFAULT_MIN_DAY_WEIGHT,
        }
    }

    /// Replaces the prior strength `S`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHyperparameter` unless `strength` is finite and > 0.
    pub fn with_prior_strength(mut self, strength: f64) -> Result<Self> {
        if !strength.is_finite() || strength <= 0.0 {
            return Err(SiestaError::invalid_hyperparameter(
                "prior_strength",
                strength,
                ">0",
            ));
        }
        self.prior_strength = strength;
        Ok(self)
    }

    /// Replaces the atypical-day penalty coefficient and weight floor.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHyperparameter` unless `coeff` is finite and >= 0
    /// and `floor` lies in `[0, 1]`.
    pub fn with_down_weighting(mut self, coeff: f64, floor: f64) -> Result<Self> {
        if !coeff.is_finite() || coeff < 0.0 {
            return Err(SiestaError::invalid_hyperparameter(
                "down_weight_coeff",
                coeff,
                ">=0",
            ));
        }
        if !floor.is_finite() || !(0.0..=1.0).contains(&floor) {
            return Err(SiestaError::invalid_hyperparameter(
                "min_day_weight",
                floor,
                "in [0, 1]",
            ));
        }
        self.down_weight_coeff = coeff;
        self.min_day_weight = floor;
        Ok(self)
    }

    /// Prior strength `S` in pseudo-days.
    #[must_use]
    pub fn prior_strength(&self) -> f64 {
        self.prior_strength
    }

    /// Atypical-day penalty coefficient.
    #[must_use]
    pub fn down_weight_coeff(&self) -> f64 {
        self.down_weight_coeff
    }

    /// Floor below which a day's weight never drops.
    #[must_use]
    pub fn min_day_weight(&self) -> f64 {
        self.min_day_weight
    }

    /// Prior and individual blend weights for an effective sample size.
    ///
    /// Returns `(S/(S+n), n/(S+n))`; the pair always sums to 1. Negative
    /// or non-finite `effective_n` is treated as zero.
    #[must_use]
    pub fn weights(&self, effective_n: f64) -> (f64, f64) {
        let n = if effective_n.is_finite() {
            effective_n.max(0.0)
        } else {
            0.0
        };
        let denom = self.prior_strength + n;
        (self.prior_strength / denom, n / denom)
    }

    /// Blends the prior with an individual distribution.
    ///
    /// Computed pointwise over the whole support, so counts present in
    /// only one of the two inputs contribute through their side's weight
    /// alone. With `effective_n = 0` the result equals the prior exactly;
    /// as `effective_n` grows it converges to `individual`.
    #[must_use]
    pub fn blend(
        &self,
        prior: &CountDistribution,
        individual: &CountDistribution,
        effective_n: f64,
    ) -> CountDistribution {
        let (prior_w, individual_w) = self.weights(effective_n);
        let mut posterior = CountDistribution::new();
        for k in 0..=MAX_NAP_COUNT {
            posterior.set(k, prior_w * prior.get(k) + individual_w * individual.get(k));
        }
        posterior
    }

    /// Evidence weight of one observed day.
    ///
    /// `baseline_mode` is the most common count in the population (the
    /// zero-evidence prediction). A day whose count strictly exceeds it
    /// is treated as short-nap-heavy and weighted
    /// `max(floor, 1 - coeff * 1/3)`; all other days weigh 1.0. Without a
    /// baseline (empty population prior) no day is atypical.
    #[must_use]
    pub fn day_weight(&self, nap_count: u8, baseline_mode: Option<u8>) -> f64 {
        let Some(baseline) = baseline_mode else {
            return 1.0;
        };
        if nap_count <= baseline {
            return 1.0;
        }
        (1.0 - self.down_weight_coeff * SHORT_NAP_SHARE).max(self.min_day_weight)
    }

    /// Effective number of observed days after down-weighting.
    #[must_use]
    pub fn effective_sample_size(
        &self,
        n_days: u32,
        nap_count: u8,
        baseline_mode: Option<u8>,
    ) -> f64 {
        f64::from(n_days) * self.day_weight(nap_count, baseline_mode)
    }

    /// Full posterior for an individual observed at `nap_count` naps on
    /// each of `n_days` days.
    ///
    /// Derives the baseline from the prior's mode, down-weights the days,
    /// and blends against the one-hot individual distribution.
    ///
    /// # Panics
    ///
    /// Panics if `nap_count` exceeds [`MAX_NAP_COUNT`].
    #[must_use]
    pub fn posterior(
        &self,
        prior: &CountDistribution,
        nap_count: u8,
        n_days: u32,
    ) -> CountDistribution {
        let baseline = prior.mode();
        let effective_n = self.effective_sample_size(n_days, nap_count, baseline);
        let individual = CountDistribution::point_mass(nap_count);
        self.blend(prior, &individual, effective_n)
    }
}

#[cfg(test)]
mod tests;
