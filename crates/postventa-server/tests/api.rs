//! End-to-end tests for the JSON API routes.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use postventa_core::{DataSource, Dataset, Item, LoadOutcome};
use postventa_server::refresh::RefreshController;
use postventa_server::routes;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tower::ServiceExt;

struct FixedSource(LoadOutcome);

#[async_trait]
impl DataSource for FixedSource {
    async fn load(&self) -> LoadOutcome {
        self.0.clone()
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

async fn app() -> axum::Router {
    let dataset = Dataset::new(vec![
        Item::new("RN 1", "Backlog", date(2024, 5, 1), date(2024, 5, 20)),
        Item::new("RN 2", "Entregado", date(2024, 4, 1), date(2024, 5, 5)),
    ]);
    let controller = Arc::new(RefreshController::new(Arc::new(FixedSource(
        LoadOutcome::success(dataset),
    ))));
    controller.refresh().await;
    routes::router(controller)
}

async fn get_json(app: axum::Router, uri: &str) -> serde_json::Value {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn healthz_responds() {
    let response = app()
        .await
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn chart_defaults_to_unfiltered_light() {
    let body = get_json(app().await, "/api/chart").await;
    assert_eq!(body["title"], "Postventa - Todos los estados | Todos los meses");
    assert_eq!(body["theme"], "light");
    assert_eq!(body["row_count"], 2);
    assert_eq!(body["height_px"], 400);
    // Ordered by start: RN 2 (April) before RN 1 (May)
    assert_eq!(body["bars"][0]["id"], "RN 2");
    assert_eq!(body["bars"][1]["id"], "RN 1");
}

#[tokio::test]
async fn chart_applies_filters_and_theme() {
    let body = get_json(app().await, "/api/chart?estado=Backlog&tema=dark").await;
    assert_eq!(body["title"], "Postventa - Backlog | Todos los meses");
    assert_eq!(body["row_count"], 1);
    assert_eq!(body["bars"][0]["status"], "Backlog");
    assert_eq!(body["palette"]["plot_background"], "#23272f");
}

#[tokio::test]
async fn chart_with_unmatched_filter_returns_sentinel() {
    let body = get_json(app().await, "/api/chart?mes=2030-01").await;
    assert_eq!(body["title"], "Sin datos con los filtros seleccionados");
    assert_eq!(body["bars"].as_array().unwrap().len(), 0);
    assert_eq!(body["height_px"], 400);
}

#[tokio::test]
async fn refresh_route_republishes_options() {
    let response = app()
        .await
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/refresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["succeeded"], true);
    assert_eq!(body["month_options"][0], "Todos");
    assert_eq!(body["status_options"], serde_json::json!(["Todos", "Backlog", "Entregado"]));
}
