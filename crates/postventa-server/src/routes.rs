//! JSON API consumed by the rendering surface.
//!
//! The UI collaborator sends its three inputs (month, status, theme) as
//! query parameters and receives a [`ChartDescription`] to draw; the two
//! refresh triggers map to `POST /api/refresh` and the server-side timer.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Local;
use postventa_core::{filter, FilterSelection, TODOS};
use postventa_render::{chart_title, ChartDescription, ChartLayout, Theme};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::refresh::{RefreshController, RefreshSummary};

pub type AppState = Arc<RefreshController>;

/// Filter/theme inputs as sent by the UI dropdowns.
#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    /// `YYYY-MM` bucket or `Todos`
    #[serde(default = "todos")]
    pub mes: String,
    /// Status label or `Todos`
    #[serde(default = "todos")]
    pub estado: String,
    /// `light` or `dark`
    #[serde(default)]
    pub tema: String,
}

fn todos() -> String {
    TODOS.to_string()
}

pub fn router(controller: AppState) -> Router {
    Router::new()
        .route("/api/chart", get(chart))
        .route("/api/options", get(options))
        .route("/api/refresh", post(refresh))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(controller)
}

/// Filter the current dataset and lay out the chart.
async fn chart(State(controller): State<AppState>, Query(query): Query<ChartQuery>) -> Json<ChartDescription> {
    let selection = FilterSelection::all().month(query.mes).status(query.estado);
    let theme = Theme::parse(&query.tema);
    let dataset = controller.dataset().await;
    let filtered = filter(&dataset, &selection);

    let today = Local::now().date_naive();
    let description = ChartLayout::new()
        .title(chart_title(&selection))
        .layout(&filtered, theme, today);
    Json(description)
}

/// Current dropdown option lists, without reloading.
async fn options(State(controller): State<AppState>) -> Json<RefreshSummary> {
    Json(controller.summary().await)
}

/// Manual refresh trigger.
async fn refresh(State(controller): State<AppState>) -> Json<RefreshSummary> {
    Json(controller.refresh().await)
}

async fn healthz() -> &'static str {
    "ok"
}
