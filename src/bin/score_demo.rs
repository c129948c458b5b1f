//! Demo that scores a small built-in batch and prints the CSV export to stdout.

use std::io;
use std::process::ExitCode;

use credit_risk_scoring::config::ScoringConfig;
use credit_risk_scoring::export::write_scored_csv;
use credit_risk_scoring::table::ApplicantTable;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = match ScoringConfig::load_default() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config: {e:#}");
            return ExitCode::from(2);
        }
    };

    let mut table = ApplicantTable::blank(0);
    for row in [
        ["100001", "Ana", "29", "24000", "6000", "2"],
        ["100002", "Bruno", "47", "1000", "10000", "5"],
        ["100003", "Carla", "61", "100000", "0", "30"],
        ["100004", "", "", "", "", ""],
    ] {
        table.push_row(row.iter().map(|c| c.to_string()).collect());
    }

    let result = table
        .score(&config.scorecard())
        .map_err(anyhow::Error::from)
        .and_then(|scored| write_scored_csv(io::stdout().lock(), &scored));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("score-demo failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}
