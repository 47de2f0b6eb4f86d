use super::*;

fn month_seven_prior() -> CountDistribution {
    CountDistribution::from_pairs(&[(1, 0.10), (2, 0.25), (3, 0.40), (4, 0.20), (5, 0.05)])
}

#[test]
fn test_standard_configuration() {
    let estimator = EbEstimator::new();
    assert_eq!(estimator.prior_strength(), DEFAULT_PRIOR_STRENGTH);
    assert_eq!(estimator.down_weight_coeff(), DEFAULT_DOWN_WEIGHT_COEFF);
    assert_eq!(estimator.min_day_weight(), DEFAULT_MIN_DAY_WEIGHT);
    assert_eq!(EbEstimator::default(), estimator);
}

#[test]
fn test_prior_strength_validation() {
    assert!(EbEstimator::new().with_prior_strength(0.0).is_err());
    assert!(EbEstimator::new().with_prior_strength(-1.0).is_err());
    assert!(EbEstimator::new().with_prior_strength(f64::NAN).is_err());
    assert!(EbEstimator::new().with_prior_strength(f64::INFINITY).is_err());

    let estimator = EbEstimator::new()
        .with_prior_strength(3.0)
        .expect("positive strength");
    assert_eq!(estimator.prior_strength(), 3.0);
}

#[test]
fn test_down_weighting_validation() {
    assert!(EbEstimator::new().with_down_weighting(-0.1, 0.5).is_err());
    assert!(EbEstimator::new().with_down_weighting(f64::NAN, 0.5).is_err());
    assert!(EbEstimator::new().with_down_weighting(0.5, -0.1).is_err());
    assert!(EbEstimator::new().with_down_weighting(0.5, 1.5).is_err());
    assert!(EbEstimator::new().with_down_weighting(0.5, f64::NAN).is_err());

    let estimator = EbEstimator::new()
        .with_down_weighting(0.0, 1.0)
        .expect("penalty disabled");
    assert_eq!(estimator.down_weight_coeff(), 0.0);
    assert_eq!(estimator.min_day_weight(), 1.0);
}

#[test]
fn test_weights_no_evidence() {
    let (prior_w, individual_w) = EbEstimator::new().weights(0.0);
    assert_eq!(prior_w, 1.0);
    assert_eq!(individual_w, 0.0);
}

#[test]
fn test_weights_equal_split_at_prior_strength() {
    // n = S means the prior counts as exactly one more week of evidence.
    let (prior_w, individual_w) = EbEstimator::new().weights(7.0);
    assert!((prior_w - 0.5).abs() < 1e-12);
    assert!((individual_w - 0.5).abs() < 1e-12);
}

#[test]
fn test_weights_sum_to_one() {
    let estimator = EbEstimator::new();
    for n in [0.0, 0.5, 3.0, 5.833, 100.0, 1e6] {
        let (prior_w, individual_w) = estimator.weights(n);
        assert!((prior_w + individual_w - 1.0).abs() < 1e-12);
    }
}

#[test]
fn test_weights_sanitize_pathological_input() {
    let estimator = EbEstimator::new();
    assert_eq!(estimator.weights(-4.0), (1.0, 0.0));
    assert_eq!(estimator.weights(f64::NAN), (1.0, 0.0));
    assert_eq!(estimator.weights(f64::INFINITY), (1.0, 0.0));
}

#[test]
fn test_blend_zero_days_returns_prior_exactly() {
    let prior = month_seven_prior();
    let individual = CountDistribution::point_mass(4);
    let posterior = EbEstimator::new().blend(&prior, &individual, 0.0);
    for k in 0..=MAX_NAP_COUNT {
        assert_eq!(posterior.get(k), prior.get(k));
    }
}

#[test]
fn test_blend_large_n_converges_to_individual() {
    let prior = month_seven_prior();
    let individual = CountDistribution::point_mass(5);
    let posterior = EbEstimator::new().blend(&prior, &individual, 1000.0);
    assert_eq!(posterior.mode(), Some(5));
    assert!(posterior.get(5) > 0.99);
}

#[test]
fn test_blend_equal_weights_averages_pointwise() {
    let prior = month_seven_prior();
    let individual = CountDistribution::point_mass(4);
    // n = S = 7: posterior is the plain average of the two inputs.
    let posterior = EbEstimator::new().blend(&prior, &individual, 7.0);
    assert!((posterior.get(3) - 0.20).abs() < 1e-12);
    assert!((posterior.get(4) - 0.60).abs() < 1e-12);
    assert!((posterior.get(1) - 0.05).abs() < 1e-12);
}

#[test]
fn test_blend_covers_counts_unique_to_either_side() {
    let prior = CountDistribution::from_pairs(&[(2, 1.0)]);
    let individual = CountDistribution::point_mass(6);
    let posterior = EbEstimator::new().blend(&prior, &individual, 7.0);
    assert!((posterior.get(2) - 0.5).abs() < 1e-12);
    assert!((posterior.get(6) - 0.5).abs() < 1e-12);
}

#[test]
fn test_day_weight_above_baseline_is_penalized() {
    let estimator = EbEstimator::new();
    // Baseline mode 3: counts of 4+ come from suspiciously nap-dense days.
    let penalized = estimator.day_weight(4, Some(3));
    assert!((penalized - 5.0 / 6.0).abs() < 1e-12);
    assert_eq!(estimator.day_weight(6, Some(3)), penalized);
}

#[test]
fn test_day_weight_at_or_below_baseline_is_full() {
    let estimator = EbEstimator::new();
    assert_eq!(estimator.day_weight(3, Some(3)), 1.0);
    assert_eq!(estimator.day_weight(2, Some(3)), 1.0);
    assert_eq!(estimator.day_weight(0, Some(3)), 1.0);
}

#[test]
fn test_day_weight_floor_binds() {
    let estimator = EbEstimator::new()
        .with_down_weighting(2.0, 0.5)
        .expect("valid penalty");
    // 1 - 2.0/3 = 1/3 would undercut the floor.
    assert_eq!(estimator.day_weight(4, Some(3)), 0.5);
}

#[test]
fn test_day_weight_without_baseline() {
    let estimator = EbEstimator::new();
    assert_eq!(estimator.day_weight(6, None), 1.0);
    assert_eq!(estimator.day_weight(0, None), 1.0);
}

#[test]
fn test_effective_sample_size_week_of_fours() {
    // Canonical: baseline 3, a week of 4-nap days => 7 * 5/6.
    let n_eff = EbEstimator::new().effective_sample_size(7, 4, Some(3));
    assert!((n_eff - 35.0 / 6.0).abs() < 1e-12);
}

#[test]
fn test_effective_sample_size_typical_days_count_fully() {
    let n_eff = EbEstimator::new().effective_sample_size(7, 2, Some(3));
    assert_eq!(n_eff, 7.0);
}

#[test]
fn test_posterior_no_observations_keeps_prior_mode() {
    let prior = month_seven_prior();
    let posterior = EbEstimator::new().posterior(&prior, 5, 0);
    assert_eq!(posterior.mode(), Some(3));
    for k in 0..=MAX_NAP_COUNT {
        assert_eq!(posterior.get(k), prior.get(k));
    }
}

#[test]
fn test_posterior_week_of_fours_flips_prediction() {
    let prior = month_seven_prior();
    let posterior = EbEstimator::new().posterior(&prior, 4, 7);
    // Down-weighted week (n_eff = 35/6) still outweighs the prior peak.
    assert_eq!(posterior.mode(), Some(4));
}

#[test]
fn test_posterior_single_day_cannot_flip_prediction() {
    let prior = month_seven_prior();
    let posterior = EbEstimator::new().posterior(&prior, 4, 1);
    // One penalized day (n_eff = 5/6): prior weight 7/7.83 keeps the peak.
    assert_eq!(posterior.mode(), Some(3));
}

#[test]
fn test_posterior_empty_prior_no_data_sentinel() {
    let empty = CountDistribution::new();
    let estimator = EbEstimator::new();
    assert_eq!(estimator.posterior(&empty, 2, 0).mode(), None);
    // With observations the posterior carries individual mass only.
    assert_eq!(estimator.posterior(&empty, 2, 7).mode(), Some(2));
}

#[test]
fn test_posterior_mass_is_conserved() {
    let prior = month_seven_prior();
    let posterior = EbEstimator::new().posterior(&prior, 4, 7);
    // Both inputs sum to 1, so every blend does too.
    assert!((posterior.total() - 1.0).abs() < 1e-12);
}
