use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader};

use distinct_estimator::Estimator;

fn accuracy(estimate: u64, actual: u64) -> f64 {
    100.0 - (estimate as f64 - actual as f64).abs() / actual as f64 * 100.0
}

fn main() -> Result<(), distinct_estimator::ConfigurationError> {
    // Synthetic numeric keys.
    for precision in [4, 5, 6, 8, 12] {
        let mut estimator = Estimator::<u64>::new(precision)?;
        for key in 0..10_000u64 {
            estimator.insert(&key);
        }
        println!(
            "numbers: registers = {}, true count = 10000, estimate = {}, accuracy = {:.1} %",
            estimator.registers(),
            estimator.calculate(),
            accuracy(estimator.calculate(), 10_000),
        );
    }

    // A fixed set of literal strings.
    let names = [
        "sean", "rebekka", "john", "sweaty", "jimmy", "vasya", "nikita", "alex", "smell", "papa",
    ];
    let mut estimator = Estimator::<str, _>::with_key_adapter(5, str::as_bytes)?;
    for name in names {
        estimator.insert(name);
    }
    println!(
        "strings: registers = {}, true count = {}, estimate = {}, accuracy = {:.1} %",
        estimator.registers(),
        names.len(),
        estimator.calculate(),
        accuracy(estimator.calculate(), names.len() as u64),
    );

    // Merging estimators fed from disjoint streams.
    let mut morning = Estimator::<u64>::new(12)?;
    for key in 0..5_000u64 {
        morning.insert(&key);
    }
    let mut evening = Estimator::<u64>::new(12)?;
    for key in 2_500..7_500u64 {
        evening.insert(&key);
    }
    morning.merge(&evening)?;
    println!(
        "merged: true count = 7500, estimate = {}, accuracy = {:.1} %",
        morning.calculate(),
        accuracy(morning.calculate(), 7_500),
    );

    // Newline-delimited strings streamed from a file, when a path is given:
    // cargo run --example estimator -- dataset.txt
    if let Some(path) = env::args().nth(1) {
        let file = File::open(&path).expect("cannot open dataset file");
        let mut estimator = Estimator::<str, _>::with_key_adapter(12, str::as_bytes)?;
        let mut lines = 0u64;
        for line in BufReader::new(file).lines() {
            let line = line.expect("cannot read dataset line");
            estimator.insert(&line);
            lines += 1;
        }
        println!(
            "dataset {path}: registers = {}, lines read = {}, estimate = {}, accuracy = {:.1} %",
            estimator.registers(),
            lines,
            estimator.calculate(),
            accuracy(estimator.calculate(), lines),
        );
    }

    Ok(())
}
