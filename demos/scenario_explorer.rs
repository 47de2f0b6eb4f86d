//! Scenario walkthrough for the empirical-Bayes nap estimator.
//!
//! Shows, for one age, the population prior, the retained range under
//! each policy, and the full scenario grid: what the estimator predicts
//! after 0, 3, and 7 observed days of each plausible nap count.
//!
//! # Run
//!
//! ```bash
//! cargo run --example scenario_explorer -- [age] [--json]
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use siesta::prelude::*;

fn main() {
    let mut age: u32 = 7;
    let mut as_json = false;
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            as_json = true;
        } else if let Ok(parsed) = arg.parse() {
            age = parsed;
        }
    }

    let priors = PriorTable::bundled();
    let means = ReferenceMeanTable::curated();
    let generator = ScenarioGenerator::new(&priors, &means);
    let scenarios = generator.generate(age);

    if as_json {
        let json = serde_json::to_string_pretty(&scenarios).expect("scenarios serialize");
        println!("{json}");
        return;
    }

    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║ Empirical-Bayes Nap Scenarios: month {age:<26}║");
    println!("╚════════════════════════════════════════════════════════════════╝\n");

    let prior = priors.distribution(age);
    show_prior(&prior, means.get(age));

    println!("\n{}", "═".repeat(64));
    show_retention(&prior, means.get(age));

    println!("\n{}", "═".repeat(64));
    show_grid(&scenarios);

    println!("\n{}", "═".repeat(64));
    show_simulated_week(&prior, age);
}

/// Population prior summary.
fn show_prior(prior: &CountDistribution, reference_mean: Option<f64>) {
    println!("📊 Population prior");
    println!("{}", "─".repeat(64));

    if prior.is_empty() {
        println!("   no survey data for this age");
        return;
    }

    for (count, p) in prior.iter() {
        if p > 0.0 {
            println!("   {count} naps  {:5.1}%  {}", p * 100.0, bar(p));
        }
    }

    let normalized = prior.normalize();
    let moments = normalized.moments();
    match prior.mode() {
        Some(mode) => println!("\n   population mode: {mode} naps"),
        None => println!("\n   population mode: undefined"),
    }
    println!("   raw mean:        {:.2}", prior.raw_mean());
    if let Some(mean) = reference_mean {
        println!("   curated mean:    {mean:.2}");
    }
    println!(
        "   normalized mean: {:.2} (sd {:.2})",
        moments.mean,
        moments.std_dev()
    );
}

/// Retained range under each of the three policies.
fn show_retention(prior: &CountDistribution, reference_mean: Option<f64>) {
    println!("🔧 Retention ranges");
    println!("{}", "─".repeat(64));

    let policies = [
        ("fixed", RetentionPolicy::fixed(2.5).expect("valid threshold")),
        ("sigma", RetentionPolicy::sigma(2.0).expect("valid multiplier")),
        ("hdi", RetentionPolicy::hdi(0.95).expect("valid mass")),
    ];
    for (name, policy) in policies {
        let range = policy.retained_range(prior, reference_mean);
        println!(
            "   {name:<6} [{}, {}]  ({})",
            range.min, range.max, range.rationale
        );
    }
}

/// The full scenario grid.
fn show_grid(scenarios: &[Scenario]) {
    println!("📈 Scenario grid");
    println!("{}", "─".repeat(64));

    for scenario in scenarios {
        let observed = match scenario.observed_count {
            Some(count) => format!("{count} naps"),
            None => "prior only".to_string(),
        };
        let predicted = match scenario.predicted {
            Some(count) => format!("{count}"),
            None => "-".to_string(),
        };
        println!(
            "   days {:>1}  {:<10} -> predicts {:<2} ({})",
            scenario.n_days, observed, predicted, scenario.weight_note
        );
    }
}

/// A seeded simulated week drawn from the prior itself.
fn show_simulated_week(prior: &CountDistribution, age: u32) {
    println!("🎲 Simulated week (seeded)");
    println!("{}", "─".repeat(64));

    let mut rng = StdRng::seed_from_u64(42);
    let draws: Vec<u8> = (0..7).filter_map(|_| prior.sample(&mut rng)).collect();
    if draws.is_empty() {
        println!("   nothing to simulate for month {age}");
        return;
    }

    println!("   drawn counts: {draws:?}");
    let observed = CountDistribution::from_pairs(
        &draws.iter().map(|&count| (count, 1.0)).collect::<Vec<_>>(),
    );
    let typical = observed.mode().expect("draws are nonempty");

    let estimator = EbEstimator::new();
    let posterior = estimator.posterior(prior, typical, draws.len() as u32);
    match posterior.mode() {
        Some(mode) => println!(
            "   most frequent draw {typical} over {} days -> posterior predicts {mode}",
            draws.len()
        ),
        None => println!("   no posterior prediction"),
    }
}

/// Crude proportional bar for terminal output.
fn bar(p: f64) -> String {
    "#".repeat((p * 50.0).round() as usize)
}
