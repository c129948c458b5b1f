//! Server-rendered HTML for the three pages: About us, single applicant, batch.
//!
//! Pages are plain strings; every user-supplied value goes through
//! `html_escape` before it is embedded. Batch state lives entirely in the
//! submitted form (`<COLUMN>__<row>` fields), so the server stays stateless.

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::applicant::{format_number, ApplicantRecord, Education, Gender, MAX_CHILDREN};
use crate::decision::{Decision, Recommendation, ScoredRecord};
use crate::engine::BatchSummary;
use crate::table::{ApplicantTable, ScoredTable, DEFAULT_COLUMNS};

pub const APP_TITLE: &str = "Credit Risk Scoring";
const CELL_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    About,
    Individual,
    Batch,
}

impl Page {
    const NAV: [Page; 3] = [Page::About, Page::Individual, Page::Batch];

    fn href(self) -> &'static str {
        match self {
            Page::About => "/",
            Page::Individual => "/individual",
            Page::Batch => "/batch",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Page::About => "About us",
            Page::Individual => "Single applicant",
            Page::Batch => "Batch scoring",
        }
    }
}

/// PD as a percentage with two decimals, e.g. `15.00%`.
pub fn format_pd(pd: f64) -> String {
    format!("{:.2}%", pd * 100.0)
}

/// Score rounded to an integer.
pub fn format_score(score: f64) -> String {
    format!("{:.0}", score)
}

fn layout(active: Page, title: &str, body: &str) -> String {
    let mut nav = String::new();
    for page in Page::NAV {
        let class = if page == active { " class=\"active\"" } else { "" };
        let _ = write!(
            nav,
            "<li><a href=\"{}\"{class}>{}</a></li>",
            page.href(),
            page.label()
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · {APP_TITLE}</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<aside class="sidebar">
<h2>{APP_TITLE}</h2>
<nav><ul>{nav}</ul></nav>
<p class="caption">Smart solutions for financial decisions</p>
</aside>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = text(title),
    )
}

pub fn about_page() -> String {
    let body = r#"<p>We are a company specialized in <strong>advanced analytics and data-driven financial decision solutions</strong>.
Our goal is to help financial institutions and organizations <strong>assess credit risk accurately,
transparently and efficiently</strong>, using modern Machine Learning and Data Science techniques.</p>
<p>Our <strong>Credit Scoring</strong> platform analyses financial, employment and demographic variables to estimate an
applicant's <strong>probability of default</strong> and to produce objective recommendations that support decision making.
The system is designed to plug into existing evaluation processes with fast, scalable and consistent results.</p>
<p>We believe in the responsible use of technology to drive <strong>fairer, more sustainable and evidence-based financial decisions</strong>,
reducing uncertainty and improving risk management.</p>
<div class="info">Technology at the service of smarter, more efficient financial decisions.</div>"#;
    layout(Page::About, "About us", body)
}

pub fn individual_form_page() -> String {
    let body = individual_form(&ApplicantRecord::default());
    layout(Page::Individual, "Loan application (1 applicant)", &body)
}

/// Result panel below the form, which keeps the submitted values.
pub fn individual_result_page(scored: &ScoredRecord) -> String {
    let mut body = individual_form(&scored.applicant);
    body.push_str("<hr>\n");
    body.push_str(&result_panel(scored));
    layout(Page::Individual, "Loan application (1 applicant)", &body)
}

fn selected(is: bool) -> &'static str {
    if is {
        " selected"
    } else {
        ""
    }
}

fn individual_form(current: &ApplicantRecord) -> String {
    let mut gender = String::new();
    for g in Gender::ALL {
        let _ = write!(
            gender,
            "<option value=\"{}\"{}>{}</option>",
            g.code(),
            selected(current.gender == Some(g)),
            g.label()
        );
    }

    let kids = current.children.unwrap_or(0);
    let mut children = String::new();
    for n in 0..MAX_CHILDREN {
        let _ = write!(children, "<option value=\"{n}\"{}>{n}</option>", selected(kids == n));
    }
    let _ = write!(
        children,
        "<option value=\"{MAX_CHILDREN}\"{}>{MAX_CHILDREN} or more</option>",
        selected(kids >= MAX_CHILDREN)
    );

    let mut education = String::new();
    for e in Education::ALL {
        let _ = write!(
            education,
            "<option value=\"{}\"{}>{}</option>",
            attr(e.label()),
            selected(current.education == Some(e)),
            text(e.label())
        );
    }

    let id = attr(current.id.as_deref().unwrap_or(""));
    let name = attr(current.name.as_deref().unwrap_or(""));
    let age = current.age.unwrap_or(30);
    let income = format_number(current.income);
    let credit = format_number(current.credit_amount);
    let years = format_number(current.years_in_current_job);

    format!(
        r#"<form method="post" action="/individual" class="applicant">
<label>Applicant ID <input type="text" name="id" value="{id}"></label>
<label>Applicant name <input type="text" name="name" value="{name}"></label>
<label>Age <input type="number" name="age" min="18" max="100" value="{age}"></label>
<label>Gender <select name="gender">{gender}</select></label>
<label>Number of children <select name="children">{children}</select></label>
<label>Education level <select name="education">{education}</select></label>
<label>Annual income <input type="number" name="income" min="0" step="100" value="{income}"></label>
<label>Requested credit <input type="number" name="creditAmount" min="0" step="100" value="{credit}"></label>
<label>Years in current job <input type="number" name="yearsInCurrentJob" min="0" step="0.5" value="{years}"></label>
<button type="submit">Process application</button>
</form>
"#
    )
}

fn result_panel(scored: &ScoredRecord) -> String {
    let decision_class = match scored.decision {
        Decision::HighRisk => "high",
        Decision::LowRisk => "low",
    };
    let recommendation = scored.recommendation();
    let rec_class = match recommendation {
        Recommendation::Approve => "success",
        Recommendation::ManualReview => "warning",
        Recommendation::Reject => "error",
    };

    let age_band = match scored.applicant.age_band() {
        Some(band) => format!("<p class=\"caption\">Age band {}</p>\n", band.number()),
        None => String::new(),
    };

    format!(
        r#"<section class="result">
<h2>Analysis result</h2>
<div class="metrics">
<div class="metric"><span class="label">PD</span><span class="value">{pd}</span></div>
<div class="metric"><span class="label">Score</span><span class="value">{score}</span></div>
<div class="metric {decision_class}"><span class="label">Decision</span><span class="value">{decision}</span></div>
</div>
{age_band}<div class="{rec_class}">{message}</div>
</section>
"#,
        pd = format_pd(scored.probability_of_default),
        score = format_score(scored.credit_score),
        decision = scored.decision.label(),
        message = recommendation.message(),
    )
}

fn cell_name(column: &str, row: usize) -> String {
    format!("{column}{CELL_SEPARATOR}{row}")
}

fn rows_picker(rows: usize, min: usize, max: usize) -> String {
    format!(
        r#"<form method="get" action="/batch" class="rows">
<label>Number of applicants <input type="number" name="rows" min="{min}" max="{max}" value="{rows}"></label>
<button type="submit">Update</button>
</form>
"#
    )
}

fn hidden_cells(table: &ApplicantTable) -> String {
    let mut out = String::new();
    for row in 0..table.len() {
        for (col, column) in table.columns.iter().enumerate() {
            let _ = write!(
                out,
                "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
                attr(&cell_name(column, row)),
                attr(table.cell(row, col))
            );
        }
    }
    out
}

pub fn batch_editor_page(table: &ApplicantTable, min_rows: usize, max_rows: usize) -> String {
    let mut body = rows_picker(table.len(), min_rows, max_rows);

    body.push_str("<form method=\"post\" action=\"/batch\">\n<table class=\"editor\"><thead><tr><th>#</th>");
    for column in &table.columns {
        let _ = write!(body, "<th>{}</th>", text(column));
    }
    body.push_str("</tr></thead><tbody>\n");
    for row in 0..table.len() {
        let _ = write!(body, "<tr><td>{}</td>", row + 1);
        for (col, column) in table.columns.iter().enumerate() {
            let _ = write!(
                body,
                "<td><input type=\"text\" name=\"{}\" value=\"{}\"></td>",
                attr(&cell_name(column, row)),
                attr(table.cell(row, col))
            );
        }
        body.push_str("</tr>\n");
    }
    body.push_str("</tbody></table>\n<button type=\"submit\">Process applications</button>\n</form>\n");

    layout(Page::Batch, "Batch applications", &body)
}

pub fn batch_result_page(
    input: &ApplicantTable,
    scored: &ScoredTable,
    min_rows: usize,
    max_rows: usize,
) -> String {
    let mut body = rows_picker(input.len(), min_rows, max_rows);
    body.push_str("<h2>Results</h2>\n<table class=\"results\"><thead><tr>");
    for column in scored.header() {
        let _ = write!(body, "<th>{}</th>", text(&column));
    }
    body.push_str("</tr></thead><tbody>\n");
    for row in &scored.rows {
        body.push_str("<tr>");
        for cell in &row.cells {
            let _ = write!(body, "<td>{}</td>", text(cell));
        }
        let class = if row.scored.is_high_risk() { "high" } else { "low" };
        let _ = write!(
            body,
            "<td>{}</td><td>{}</td><td class=\"{class}\">{}</td></tr>\n",
            format_pd(row.scored.probability_of_default),
            format_score(row.scored.credit_score),
            row.scored.decision.label()
        );
    }
    body.push_str("</tbody></table>\n");
    body.push_str(&summary_line(&scored.summary()));

    let _ = write!(
        body,
        "<form method=\"post\" action=\"/batch/export\">{}<button type=\"submit\">Download CSV</button></form>\n",
        hidden_cells(input)
    );

    layout(Page::Batch, "Batch applications", &body)
}

fn summary_line(summary: &BatchSummary) -> String {
    let mean = summary
        .mean_pd
        .map(format_pd)
        .unwrap_or_else(|| "-".to_string());
    format!(
        "<p class=\"summary\">{} applicants · {} high risk · {} low risk · mean PD {}</p>\n",
        summary.rows, summary.high_risk, summary.low_risk, mean
    )
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchFormError {
    #[error("batch has {rows} rows, the maximum is {max}")]
    TooManyRows { rows: usize, max: usize },
}

/// Rebuild the editor table from submitted `<COLUMN>__<row>` fields.
///
/// Unknown field names are ignored; rows that were not submitted at all stay blank.
pub fn parse_batch_form(
    fields: &[(String, String)],
    max_rows: usize,
) -> Result<ApplicantTable, BatchFormError> {
    let mut cells: Vec<(usize, usize, &str)> = Vec::new();
    for (key, value) in fields {
        let Some((column, row)) = key.rsplit_once(CELL_SEPARATOR) else {
            continue;
        };
        let Some(col) = DEFAULT_COLUMNS.iter().position(|c| *c == column) else {
            continue;
        };
        let Ok(row) = row.parse::<usize>() else {
            continue;
        };
        if row >= max_rows {
            return Err(BatchFormError::TooManyRows {
                rows: row + 1,
                max: max_rows,
            });
        }
        cells.push((row, col, value.as_str()));
    }

    let n = cells.iter().map(|(row, _, _)| row + 1).max().unwrap_or(0);
    let mut table = ApplicantTable::blank(n);
    for (row, col, value) in cells {
        if let Some(slot) = table.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = value.to_string();
        }
    }
    Ok(table)
}
