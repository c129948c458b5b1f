//! Tabular batch input and its scored counterpart.
//!
//! A table is a list of named columns plus string cells, exactly as it comes
//! out of the batch editor or a JSON body. Recognized columns are mapped onto
//! `ApplicantInput`; all cells (recognized or not) are kept verbatim so the
//! export can reproduce the original table with the derived columns appended.

use serde::{Deserialize, Deserializer, Serialize};

use crate::applicant::{format_number, parse_number, ApplicantInput, ApplicantRecord};
use crate::decision::ScoredRecord;
use crate::engine::{self, BatchSummary};
use crate::error::ScoringError;
use crate::scorecard::Scorecard;

/// Columns offered by the batch editor.
pub const DEFAULT_COLUMNS: [&str; 6] = [
    "SK_ID_CURR",
    "NAME",
    "AGE",
    "AMT_INCOME_TOTAL",
    "AMT_CREDIT",
    "YEARS_ACTUAL_WORK",
];

/// Derived columns appended to every scored table, in this order.
pub const DERIVED_COLUMNS: [&str; 3] = ["PD", "SCORE", "DECISION"];

/// Which applicant field a column feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Name,
    Age,
    Gender,
    Education,
    Children,
    Income,
    CreditAmount,
    YearsInCurrentJob,
}

impl Field {
    pub fn for_column(name: &str) -> Option<Self> {
        let key = name.trim();
        let field = match key.to_ascii_uppercase().as_str() {
            "SK_ID_CURR" | "ID" => Self::Id,
            "NAME" => Self::Name,
            "AGE" => Self::Age,
            "CODE_GENDER" | "GENDER" => Self::Gender,
            "NAME_EDUCATION_TYPE" | "EDUCATION" => Self::Education,
            "CNT_CHILDREN" | "CHILDREN" => Self::Children,
            "AMT_INCOME_TOTAL" | "INCOME" => Self::Income,
            "AMT_CREDIT" | "CREDITAMOUNT" | "CREDIT_AMOUNT" => Self::CreditAmount,
            "YEARS_ACTUAL_WORK" | "YEARSINCURRENTJOB" | "YEARS_IN_CURRENT_JOB" => {
                Self::YearsInCurrentJob
            }
            _ => return None,
        };
        Some(field)
    }

    fn assign(self, input: &mut ApplicantInput, cell: &str) {
        let text = Some(cell.to_string());
        match self {
            Self::Id => input.id = text,
            Self::Name => input.name = text,
            Self::Age => input.age = parse_number(cell),
            Self::Gender => input.gender = text,
            Self::Education => input.education = text,
            Self::Children => input.children = text,
            Self::Income => input.income = parse_number(cell),
            Self::CreditAmount => input.credit_amount = parse_number(cell),
            Self::YearsInCurrentJob => input.years_in_current_job = parse_number(cell),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApplicantTable {
    pub columns: Vec<String>,
    #[serde(deserialize_with = "loose_rows")]
    pub rows: Vec<Vec<String>>,
}

impl ApplicantTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Table with the default columns and `n` blank rows.
    pub fn blank(n: usize) -> Self {
        let columns: Vec<String> = DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect();
        let rows = vec![vec![String::new(); columns.len()]; n];
        Self { columns, rows }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell value, `""` for cells a short row does not have.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Typed records, one per row, in order.
    pub fn records(&self) -> Vec<ApplicantRecord> {
        let mapping: Vec<Option<Field>> =
            self.columns.iter().map(|c| Field::for_column(c)).collect();

        (0..self.rows.len())
            .map(|row| {
                let mut input = ApplicantInput::default();
                for (col, field) in mapping.iter().enumerate() {
                    if let Some(field) = field {
                        field.assign(&mut input, self.cell(row, col));
                    }
                }
                input.into_record()
            })
            .collect()
    }

    /// Score every row; rows stay in order, cells are copied verbatim.
    pub fn score(&self, scorecard: &Scorecard) -> Result<ScoredTable, ScoringError> {
        let scored = engine::score_batch(self.records(), scorecard)?;
        let width = self.columns.len();
        let rows = self
            .rows
            .iter()
            .zip(scored)
            .map(|(cells, scored)| {
                let mut cells = cells.clone();
                cells.resize(width, String::new());
                ScoredRow { cells, scored }
            })
            .collect();

        Ok(ScoredTable {
            columns: self.columns.clone(),
            rows,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRow {
    /// Original cells, padded to the column count.
    pub cells: Vec<String>,
    pub scored: ScoredRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTable {
    /// Original columns (without the derived ones).
    pub columns: Vec<String>,
    pub rows: Vec<ScoredRow>,
}

impl ScoredTable {
    /// Original columns followed by `PD`, `SCORE`, `DECISION`.
    pub fn header(&self) -> Vec<String> {
        self.columns
            .iter()
            .cloned()
            .chain(DERIVED_COLUMNS.iter().map(|c| c.to_string()))
            .collect()
    }

    pub fn summary(&self) -> BatchSummary {
        let scored: Vec<ScoredRecord> = self.rows.iter().map(|r| r.scored.clone()).collect();
        BatchSummary::of(&scored)
    }
}

/// JSON shape returned by the batch API.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredTableView {
    pub columns: Vec<String>,
    pub rows: Vec<ScoredRowView>,
    pub summary: BatchSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredRowView {
    pub cells: Vec<String>,
    pub pd: f64,
    pub score: f64,
    pub decision: crate::decision::Decision,
}

impl From<&ScoredTable> for ScoredTableView {
    fn from(t: &ScoredTable) -> Self {
        Self {
            columns: t.header(),
            rows: t
                .rows
                .iter()
                .map(|r| ScoredRowView {
                    cells: r.cells.clone(),
                    pd: r.scored.probability_of_default,
                    score: r.scored.credit_score,
                    decision: r.scored.decision,
                })
                .collect(),
            summary: t.summary(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseCell {
    Number(f64),
    Text(String),
    Flag(bool),
}

fn loose_rows<'de, D>(d: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Vec<Option<LooseCell>>>::deserialize(d)?;
    Ok(raw
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| match cell {
                    Some(LooseCell::Number(n)) => format_number(n),
                    Some(LooseCell::Text(s)) => s,
                    Some(LooseCell::Flag(b)) => b.to_string(),
                    None => String::new(),
                })
                .collect()
        })
        .collect())
}
