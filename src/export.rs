//! Export scored batches to CSV.
//!
//! Layout: header row, original columns followed by `PD`, `SCORE`, `DECISION`,
//! one row per applicant. Floats use Rust's shortest round-trip formatting so a
//! re-parse yields the same values.

use std::io::Write;

use anyhow::{Context, Result};

use crate::table::ScoredTable;

pub const DEFAULT_FILE_NAME: &str = "scoring_results.csv";
pub const CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Write `table` as CSV into `out`.
pub fn write_scored_csv<W: Write>(out: W, table: &ScoredTable) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(table.header())
        .context("writing CSV header")?;

    for (i, row) in table.rows.iter().enumerate() {
        let s = &row.scored;
        let record = row.cells.iter().cloned().chain([
            s.probability_of_default.to_string(),
            s.credit_score.to_string(),
            s.decision.code().to_string(),
        ]);
        wtr.write_record(record)
            .with_context(|| format!("writing CSV row {i}"))?;
    }

    wtr.flush().context("flushing CSV")?;
    Ok(())
}

/// CSV bytes (UTF-8) for a scored table.
pub fn scored_csv_bytes(table: &ScoredTable) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_scored_csv(&mut buf, table)?;
    Ok(buf)
}
