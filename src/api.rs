use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::applicant::ApplicantInput;
use crate::config::ScoringConfig;
use crate::decision::{Decision, Recommendation};
use crate::engine;
use crate::error::ScoringError;
use crate::export;
use crate::metrics;
use crate::pages::{self, BatchFormError};
use crate::scorecard::Scorecard;
use crate::table::{ApplicantTable, ScoredTable, ScoredTableView};

pub const STATIC_DIR: &str = "static";

#[derive(Clone)]
pub struct AppState {
    config: Arc<ScoringConfig>,
    scorecard: Scorecard,
}

impl AppState {
    pub fn new(config: ScoringConfig) -> Self {
        let scorecard = config.scorecard();
        Self {
            config: Arc::new(config),
            scorecard,
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/", get(about))
        .route("/individual", get(individual_form).post(individual_submit))
        .route("/batch", get(batch_editor).post(batch_submit))
        .route("/batch/export", post(batch_export))
        .route("/api/score", post(api_score))
        .route("/api/batch", post(api_batch))
        .route("/api/batch/csv", post(api_batch_csv))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/* ----------------------------
Errors
---------------------------- */

#[derive(Debug)]
pub enum ApiError {
    Scoring(ScoringError),
    TooManyRows { rows: usize, max: usize },
    Export(anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    row: Option<usize>,
}

impl From<ScoringError> for ApiError {
    fn from(e: ScoringError) -> Self {
        Self::Scoring(e)
    }
}

impl From<BatchFormError> for ApiError {
    fn from(e: BatchFormError) -> Self {
        match e {
            BatchFormError::TooManyRows { rows, max } => Self::TooManyRows { rows, max },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body, kind) = match self {
            ApiError::Scoring(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    row: e.row(),
                    error: e.to_string(),
                },
                "scoring",
            ),
            ApiError::TooManyRows { rows, max } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: format!("batch has {rows} rows, the maximum is {max}"),
                    row: None,
                },
                "too_many_rows",
            ),
            ApiError::Export(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: format!("{e:#}"),
                    row: None,
                },
                "export",
            ),
        };
        warn!(status = status.as_u16(), error = %body.error, "request failed");
        metrics::record_failure(kind);
        (status, Json(body)).into_response()
    }
}

/* ----------------------------
HTML pages
---------------------------- */

async fn about() -> Html<String> {
    Html(pages::about_page())
}

async fn individual_form() -> Html<String> {
    Html(pages::individual_form_page())
}

async fn individual_submit(
    State(state): State<AppState>,
    Form(input): Form<ApplicantInput>,
) -> Result<Html<String>, ApiError> {
    let scored = engine::score_applicant(input.into_record(), &state.scorecard)?;
    metrics::record_applicant(scored.decision);
    Ok(Html(pages::individual_result_page(&scored)))
}

/// `rows` stays a string so a cleared number field (`?rows=`) falls back to the default.
#[derive(Debug, Deserialize)]
struct BatchQuery {
    rows: Option<String>,
}

impl BatchQuery {
    fn rows(&self) -> Option<usize> {
        self.rows.as_deref().and_then(|r| r.trim().parse().ok())
    }
}

async fn batch_editor(
    State(state): State<AppState>,
    Query(q): Query<BatchQuery>,
) -> Html<String> {
    let cfg = state.config();
    let table = ApplicantTable::blank(cfg.clamp_rows(q.rows()));
    Html(pages::batch_editor_page(
        &table,
        cfg.batch.min_rows,
        cfg.batch.max_rows,
    ))
}

async fn batch_submit(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Html<String>, ApiError> {
    let cfg = state.config();
    let table = pages::parse_batch_form(&fields, cfg.batch.max_rows)?;
    let scored = score_table(&state, &table)?;
    Ok(Html(pages::batch_result_page(
        &table,
        &scored,
        cfg.batch.min_rows,
        cfg.batch.max_rows,
    )))
}

async fn batch_export(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let table = pages::parse_batch_form(&fields, state.config().batch.max_rows)?;
    let scored = score_table(&state, &table)?;
    csv_response(&state, &scored)
}

/* ----------------------------
JSON API
---------------------------- */

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub probability_of_default: f64,
    pub credit_score: f64,
    pub decision: Decision,
    pub recommendation: Recommendation,
    pub pd_display: String,
    pub score_display: String,
}

async fn api_score(
    State(state): State<AppState>,
    Json(input): Json<ApplicantInput>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let scored = engine::score_applicant(input.into_record(), &state.scorecard)?;
    metrics::record_applicant(scored.decision);
    Ok(Json(ScoreResponse {
        probability_of_default: scored.probability_of_default,
        credit_score: scored.credit_score,
        decision: scored.decision,
        recommendation: scored.recommendation(),
        pd_display: pages::format_pd(scored.probability_of_default),
        score_display: pages::format_score(scored.credit_score),
    }))
}

async fn api_batch(
    State(state): State<AppState>,
    Json(table): Json<ApplicantTable>,
) -> Result<Json<ScoredTableView>, ApiError> {
    check_batch_size(&state, &table)?;
    let scored = score_table(&state, &table)?;
    Ok(Json(ScoredTableView::from(&scored)))
}

async fn api_batch_csv(
    State(state): State<AppState>,
    Json(table): Json<ApplicantTable>,
) -> Result<Response, ApiError> {
    check_batch_size(&state, &table)?;
    let scored = score_table(&state, &table)?;
    csv_response(&state, &scored)
}

/* ----------------------------
Helpers
---------------------------- */

fn check_batch_size(state: &AppState, table: &ApplicantTable) -> Result<(), ApiError> {
    let max = state.config().batch.max_rows;
    if table.len() > max {
        return Err(ApiError::TooManyRows {
            rows: table.len(),
            max,
        });
    }
    Ok(())
}

fn score_table(state: &AppState, table: &ApplicantTable) -> Result<ScoredTable, ApiError> {
    let scored = table.score(&state.scorecard)?;
    let summary = scored.summary();

    metrics::record_batch(summary.rows);
    for row in &scored.rows {
        metrics::record_applicant(row.scored.decision);
    }
    // Counts only; cells may carry personal data.
    info!(
        rows = summary.rows,
        high_risk = summary.high_risk,
        low_risk = summary.low_risk,
        "batch scored"
    );
    Ok(scored)
}

fn csv_response(state: &AppState, scored: &ScoredTable) -> Result<Response, ApiError> {
    let bytes = export::scored_csv_bytes(scored).map_err(ApiError::Export)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        state.config().export.file_name.replace('"', "")
    );
    Ok((
        [
            (header::CONTENT_TYPE, export::CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
