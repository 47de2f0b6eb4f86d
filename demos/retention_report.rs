//! Batch retained-range report across all known ages.
//!
//! Builds the per-age plausible-count table (the artifact consumed by
//! nap-log cleaning) from the bundled survey and curated means, prints
//! it as TSV, and optionally writes it to a file or emits JSON.
//!
//! # Run
//!
//! ```bash
//! cargo run --example retention_report -- [fixed|sigma|hdi] [--json] [--out PATH]
//! ```

use std::fs;

use siesta::prelude::*;
use siesta::retention::{DEFAULT_FIXED_THRESHOLD, DEFAULT_HDI_MASS, DEFAULT_SIGMA_MULTIPLIER};

fn main() {
    let mut mode = "fixed".to_string();
    let mut as_json = false;
    let mut out_path: Option<String> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => as_json = true,
            "--out" => out_path = args.next(),
            "fixed" | "sigma" | "hdi" => mode = arg,
            other => {
                eprintln!("ignoring unknown argument '{other}'");
            }
        }
    }

    let policy = match mode.as_str() {
        "sigma" => RetentionPolicy::sigma(DEFAULT_SIGMA_MULTIPLIER),
        "hdi" => RetentionPolicy::hdi(DEFAULT_HDI_MASS),
        _ => RetentionPolicy::fixed(DEFAULT_FIXED_THRESHOLD),
    }
    .expect("default parameters are valid");

    let report = RetentionReport::build(
        &PriorTable::bundled(),
        &ReferenceMeanTable::curated(),
        &policy,
    );

    let rendered = if as_json {
        report.to_json().expect("report serializes")
    } else {
        report.to_tsv()
    };

    print!("{rendered}");
    eprintln!(
        "# {} ages under the {mode} policy",
        report.len()
    );

    if let Some(path) = out_path {
        fs::write(&path, &rendered).expect("report file is writable");
        eprintln!("# written to {path}");
    }
}
