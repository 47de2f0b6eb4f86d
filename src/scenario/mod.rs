//! Illustrative estimation scenarios for one age.
//!
//! A scenario grid answers "what would the estimator conclude?" for a
//! fixed set of observation histories: no data at all, then every
//! retained nap count observed uniformly over a short and a full week.
//! The grid drives the demos and doubles as a validation harness; the
//! general-purpose API remains [`EbEstimator`] and [`RetentionPolicy`].

use serde::{Deserialize, Serialize};

use crate::distribution::CountDistribution;
use crate::estimator::EbEstimator;
use crate::prior::{PriorTable, ReferenceMeanTable};
use crate::retention::{RetentionPolicy, RetentionRange};

/// Observation-day counts enumerated by the grid, besides the
/// prior-only case.
const OBSERVED_DAY_COUNTS: [u32; 2] = [3, 7];

/// One estimated scenario: an observation history and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Number of observed days (0 for the prior-only scenario).
    pub n_days: u32,
    /// The nap count observed on every day, absent for prior-only.
    pub observed_count: Option<u8>,
    /// Human-readable description of the scenario.
    pub label: String,
    /// Blended posterior distribution.
    pub posterior: CountDistribution,
    /// Most likely nap count, if the posterior carries any mass.
    pub predicted: Option<u8>,
    /// Prior/individual weight split, plus the down-weighting detail
    /// when the observed count was penalized.
    pub weight_note: String,
}

/// Builds scenario grids from a prior table and curated means.
///
/// # Example
///
/// ```
/// use siesta::{PriorTable, ReferenceMeanTable, ScenarioGenerator};
///
/// let priors = PriorTable::bundled();
/// let means = ReferenceMeanTable::curated();
/// let generator = ScenarioGenerator::new(&priors, &means);
///
/// let scenarios = generator.generate(7);
/// assert_eq!(scenarios[0].n_days, 0);
/// assert_eq!(scenarios[0].predicted, Some(3));
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioGenerator<'a> {
    priors: &'a PriorTable,
    reference: &'a ReferenceMeanTable,
    policy: RetentionPolicy,
    estimator: EbEstimator,
}

impl<'a> ScenarioGenerator<'a> {
    /// Creates a generator with the default retention policy and
    /// estimator configuration.
    #[must_use]
    pub fn new(priors: &'a PriorTable, reference: &'a ReferenceMeanTable) -> Self {
        Self {
            priors,
            reference,
            policy: RetentionPolicy::default(),
            estimator: EbEstimator::new(),
        }
    }

    /// Replaces the retention policy deciding which counts to enumerate.
    #[must_use]
    pub fn with_policy(mut self, policy: RetentionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the estimator configuration.
    #[must_use]
    pub fn with_estimator(mut self, estimator: EbEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Retained range for `age` under the generator's policy.
    #[must_use]
    pub fn retained_range(&self, age: u32) -> RetentionRange {
        let prior = self.priors.distribution(age);
        self.policy.retained_range(&prior, self.reference.get(age))
    }

    /// Builds the scenario grid for one age.
    ///
    /// The first scenario is the pure population prior (zero observed
    /// days). Then, for 3 and for 7 observed days, one scenario per nap
    /// count in the retained range, each assuming that count was logged
    /// on every day. Ages unknown to the prior table degrade to the
    /// empty prior: the prior-only scenario predicts nothing.
    #[must_use]
    pub fn generate(&self, age: u32) -> Vec<Scenario> {
        let prior = self.priors.distribution(age);
        let baseline = prior.mode();
        let range = self.policy.retained_range(&prior, self.reference.get(age));

        let mut scenarios = Vec::new();

        let (prior_w, individual_w) = self.estimator.weights(0.0);
        scenarios.push(Scenario {
            n_days: 0,
            observed_count: None,
            label: format!("month {age}: population prior only"),
            posterior: prior,
            predicted: baseline,
            weight_note: weight_note(prior_w, individual_w, None),
        });

        for n_days in OBSERVED_DAY_COUNTS {
            for count in range.counts() {
                let weight = self.estimator.day_weight(count, baseline);
                let effective_n = f64::from(n_days) * weight;
                let posterior =
                    self.estimator
                        .blend(&prior, &CountDistribution::point_mass(count), effective_n);
                let (prior_w, individual_w) = self.estimator.weights(effective_n);
                let penalty = (weight < 1.0).then_some((weight, effective_n));
                scenarios.push(Scenario {
                    n_days,
                    observed_count: Some(count),
                    label: format!("month {age}: {count} naps logged over {n_days} days"),
                    posterior,
                    predicted: posterior.mode(),
                    weight_note: weight_note(prior_w, individual_w, penalty),
                });
            }
        }

        scenarios
    }
}

/// Formats the prior/individual split, with the down-weighting detail
/// when a penalty applies.
fn weight_note(prior_w: f64, individual_w: f64, penalty: Option<(f64, f64)>) -> String {
    let mut note = format!(
        "prior {:.0}% | individual {:.0}%",
        prior_w * 100.0,
        individual_w * 100.0
    );
    if let Some((weight, effective_n)) = penalty {
        note.push_str(&format!(
            " (day weight {weight:.2}, effective days {effective_n:.2})"
        ));
    }
    note
}
