// tests/api_http.rs
//
// HTTP-level tests for the public Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health, GET /
// - GET/POST /individual
// - GET/POST /batch, POST /batch/export
// - POST /api/score, /api/batch, /api/batch/csv

use axum::{
    body::{self, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::json;
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use credit_risk_scoring::api::{self, AppState};
use credit_risk_scoring::config::ScoringConfig;
use credit_risk_scoring::pages::format_score;
use credit_risk_scoring::to_score;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Build the same Router the binary uses (minus /metrics).
fn test_router() -> Router {
    api::create_router(AppState::new(ScoringConfig::default()))
}

async fn body_string(resp: axum::response::Response) -> String {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    String::from_utf8(bytes).expect("utf8")
}

fn form_post(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("build form POST")
}

fn json_post(uri: &str, payload: &Json) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build JSON POST")
}

#[tokio::test]
async fn health_returns_200_and_ok_body() {
    let req = Request::get("/health").body(Body::empty()).unwrap();
    let resp = test_router().oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await.trim(), "ok");
}

#[tokio::test]
async fn about_page_is_served_at_root() {
    let req = Request::get("/").body(Body::empty()).unwrap();
    let resp = test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("<h1>About us</h1>"), "{html}");
    assert!(html.contains("href=\"/individual\""));
    assert!(html.contains("href=\"/batch\""));
}

#[tokio::test]
async fn individual_form_lists_all_inputs() {
    let req = Request::get("/individual").body(Body::empty()).unwrap();
    let resp = test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    for name in [
        "id",
        "name",
        "age",
        "gender",
        "children",
        "education",
        "income",
        "creditAmount",
        "yearsInCurrentJob",
    ] {
        assert!(html.contains(&format!("name=\"{name}\"")), "missing field {name}");
    }
    assert!(html.contains("4 or more"));
}

#[tokio::test]
async fn individual_submit_high_risk() {
    let form = "id=7&name=Ana&age=41&gender=F&children=2&education=Higher+education\
                &income=1000&creditAmount=10000&yearsInCurrentJob=5";
    let resp = test_router()
        .oneshot(form_post("/individual", form))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("95.00%"), "{html}");
    assert!(html.contains("High risk"));
    assert!(html.contains("Rejection recommended"));
    assert!(html.contains("Age band 2"));
}

#[tokio::test]
async fn individual_result_keeps_submitted_values() {
    let form = "id=A-9&name=Bea+%3Cb%3E&age=58&gender=M&children=6&education=Academic+degree\
                &income=1234&creditAmount=500&yearsInCurrentJob=2.5";
    let resp = test_router()
        .oneshot(form_post("/individual", form))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains(r#"name="income" min="0" step="100" value="1234""#), "{html}");
    assert!(html.contains(r#"name="creditAmount" min="0" step="100" value="500""#));
    assert!(html.contains(r#"step="0.5" value="2.5""#));
    assert!(html.contains(r#"name="age" min="18" max="100" value="58""#));
    assert!(html.contains(r#"name="id" value="A-9""#));
    assert!(html.contains(r#"value="Bea &lt;b&gt;""#));
    assert!(html.contains(r#"<option value="M" selected>"#));
    assert!(html.contains(r#"<option value="4" selected>"#));
    assert!(html.contains(r#"<option value="Academic degree" selected>"#));
}

#[tokio::test]
async fn individual_submit_blank_and_invalid_numbers_default_to_zero() {
    let resp = test_router()
        .oneshot(form_post(
            "/individual",
            "income=&creditAmount=abc&yearsInCurrentJob=",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("15.00%"), "{html}");
    let score = format_score(to_score(0.15).unwrap());
    assert!(html.contains(&format!(">{score}<")), "score {score} missing");
    assert!(html.contains("Low risk"));
    assert!(html.contains("Approval recommended"));
}

#[tokio::test]
async fn api_score_returns_expected_json_fields() {
    let payload = json!({
        "name": "Luis",
        "income": 50000,
        "creditAmount": "10000",
        "yearsInCurrentJob": 10
    });
    let resp = test_router()
        .oneshot(json_post("/api/score", &payload))
        .await
        .unwrap();
    assert!(resp.status().is_success(), "got {}", resp.status());

    let v: Json = serde_json::from_str(&body_string(resp).await).expect("parse json");
    let pd = v["probability_of_default"].as_f64().unwrap();
    assert!((pd - 0.07).abs() < 1e-6, "pd={pd}");
    assert_eq!(v["decision"], json!("LOW_RISK"));
    assert_eq!(v["recommendation"], json!("approve"));
    assert_eq!(v["pd_display"], json!("7.00%"));
    // odds 13.3:1 sit below the 20:1 anchor, so the score is under 600
    let score = v["credit_score"].as_f64().unwrap();
    assert!(score > 570.0 && score < 571.0, "score={score}");
    assert!(v.get("score_display").is_some());
}

#[tokio::test]
async fn batch_editor_clamps_row_count() {
    let cfg = ScoringConfig::default();
    for (query, expected) in [
        ("", cfg.batch.default_rows),
        ("?rows=", cfg.batch.default_rows),
        ("?rows=3", 3),
        ("?rows=1", cfg.batch.min_rows),
        ("?rows=1000", cfg.batch.max_rows),
    ] {
        let req = Request::get(format!("/batch{query}"))
            .body(Body::empty())
            .unwrap();
        let resp = test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        let inputs = html.matches("<input type=\"text\"").count();
        assert_eq!(inputs, expected * 6, "query '{query}'");
    }
}

#[tokio::test]
async fn batch_submit_renders_results_table() {
    let form = "SK_ID_CURR__0=1&NAME__0=Ana&AMT_INCOME_TOTAL__0=1000&AMT_CREDIT__0=10000&YEARS_ACTUAL_WORK__0=5\
                &SK_ID_CURR__1=2&NAME__1=Bruno&AMT_INCOME_TOTAL__1=100000&AMT_CREDIT__1=0&YEARS_ACTUAL_WORK__1=30";
    let resp = test_router().oneshot(form_post("/batch", form)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("<th>PD</th><th>SCORE</th><th>DECISION</th>"), "{html}");
    assert!(html.contains("95.00%"));
    assert!(html.contains("1.00%"));
    assert!(html.contains("2 applicants · 1 high risk · 1 low risk"));
    // Ana (row 0) must be listed before Bruno (row 1)
    let ana = html.find(">Ana<").unwrap();
    let bruno = html.find(">Bruno<").unwrap();
    assert!(ana < bruno);
    assert!(html.contains("action=\"/batch/export\""));
}

#[tokio::test]
async fn batch_export_returns_csv_attachment() {
    let form = "SK_ID_CURR__0=1&NAME__0=Ana&AMT_INCOME_TOTAL__0=1000&AMT_CREDIT__0=10000&YEARS_ACTUAL_WORK__0=5";
    let resp = test_router()
        .oneshot(form_post("/batch/export", form))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let ct = resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap();
    assert!(ct.starts_with("text/csv"), "content-type {ct}");
    let cd = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cd.contains("scoring_results.csv"), "{cd}");

    let csv = body_string(resp).await;
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("SK_ID_CURR,NAME,AGE,AMT_INCOME_TOTAL,AMT_CREDIT,YEARS_ACTUAL_WORK,PD,SCORE,DECISION")
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("1,Ana,,1000,10000,5,0.95,"), "{row}");
    assert!(row.ends_with(",HIGH_RISK"));
}

#[tokio::test]
async fn batch_form_beyond_max_rows_is_rejected() {
    let resp = test_router()
        .oneshot(form_post("/batch", "NAME__200=x"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn api_batch_scores_rows_in_order() {
    let payload = json!({
        "columns": ["SK_ID_CURR", "AMT_INCOME_TOTAL", "AMT_CREDIT", "YEARS_ACTUAL_WORK"],
        "rows": [
            [1, 0, 0, 0],
            [2, 1000, 10000, 5],
            [3, 100000, 0, 30],
            ["4"]
        ]
    });
    let resp = test_router()
        .oneshot(json_post("/api/batch", &payload))
        .await
        .unwrap();
    assert!(resp.status().is_success(), "got {}", resp.status());

    let v: Json = serde_json::from_str(&body_string(resp).await).unwrap();
    let rows = v["rows"].as_array().expect("rows array");
    assert_eq!(rows.len(), 4, "batch response length should match input");
    assert_eq!(v["columns"].as_array().unwrap().len(), 7);
    assert_eq!(rows[0]["cells"][0], json!("1"));
    assert_eq!(rows[1]["decision"], json!("HIGH_RISK"));
    assert_eq!(rows[2]["decision"], json!("LOW_RISK"));
    assert!((rows[2]["pd"].as_f64().unwrap() - 0.01).abs() < 1e-12);
    assert!((rows[3]["pd"].as_f64().unwrap() - 0.15).abs() < 1e-12);
    assert_eq!(v["summary"]["rows"], json!(4));
    assert_eq!(v["summary"]["high_risk"], json!(1));
}

#[tokio::test]
async fn api_batch_above_limit_returns_400_with_error() {
    let rows: Vec<Json> = (0..201).map(|i| json!([i, 1000, 100, 1])).collect();
    let payload = json!({
        "columns": ["SK_ID_CURR", "AMT_INCOME_TOTAL", "AMT_CREDIT", "YEARS_ACTUAL_WORK"],
        "rows": rows
    });
    let resp = test_router()
        .oneshot(json_post("/api/batch", &payload))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let v: Json = serde_json::from_str(&body_string(resp).await).unwrap();
    assert!(v["error"].as_str().unwrap().contains("maximum is 200"));
}

#[tokio::test]
async fn api_batch_csv_has_header_and_one_line_per_row() {
    let payload = json!({
        "columns": ["NAME", "AMT_INCOME_TOTAL", "AMT_CREDIT"],
        "rows": [["a", 1, 1], ["b", 2, 2], ["c", 3, 3]]
    });
    let resp = test_router()
        .oneshot(json_post("/api/batch/csv", &payload))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let csv = body_string(resp).await;
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.starts_with("NAME,AMT_INCOME_TOTAL,AMT_CREDIT,PD,SCORE,DECISION\n"));
}
