//! Refresh controller behavior with a stub data source.

use async_trait::async_trait;
use chrono::NaiveDate;
use postventa_core::{filter, DataSource, Dataset, FilterSelection, Item, LoadOutcome};
use postventa_render::{ChartLayout, Theme, NO_DATA_TITLE};
use postventa_server::refresh::RefreshController;
use pretty_assertions::assert_eq;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Returns canned outcomes in order, repeating the last one.
struct StubSource {
    outcomes: Mutex<VecDeque<LoadOutcome>>,
    last: LoadOutcome,
}

impl StubSource {
    fn new(outcomes: Vec<LoadOutcome>) -> Self {
        let last = outcomes.last().cloned().unwrap_or_else(LoadOutcome::failure);
        Self {
            outcomes: Mutex::new(outcomes.into()),
            last,
        }
    }
}

#[async_trait]
impl DataSource for StubSource {
    async fn load(&self) -> LoadOutcome {
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.last.clone())
    }
}

fn may_dataset() -> Dataset {
    Dataset::new(vec![
        Item::new("RN 1", "Backlog", date(2024, 5, 1), date(2024, 5, 20)),
        Item::new("RN 2", "Entregado", date(2024, 4, 1), date(2024, 5, 5)),
    ])
}

fn june_dataset() -> Dataset {
    Dataset::new(vec![Item::new(
        "RN 3",
        "En desarrollo",
        date(2024, 6, 1),
        date(2024, 6, 15),
    )])
}

#[tokio::test]
async fn refresh_publishes_sorted_options_with_sentinel() {
    let source = StubSource::new(vec![LoadOutcome::success(may_dataset())]);
    let controller = RefreshController::new(Arc::new(source));

    let summary = controller.refresh().await;

    assert!(summary.succeeded);
    assert_eq!(summary.month_options, vec!["Todos", "2024-05"]);
    assert_eq!(summary.status_options, vec!["Todos", "Backlog", "Entregado"]);
    assert!(summary.last_updated.starts_with("Última actualización: "));
}

#[tokio::test]
async fn refresh_replaces_dataset_wholesale() {
    let source = StubSource::new(vec![
        LoadOutcome::success(may_dataset()),
        LoadOutcome::success(june_dataset()),
    ]);
    let controller = RefreshController::new(Arc::new(source));

    controller.refresh().await;
    assert_eq!(controller.dataset().await.len(), 2);

    let summary = controller.refresh().await;
    assert_eq!(controller.dataset().await, june_dataset());
    assert_eq!(summary.month_options, vec!["Todos", "2024-06"]);
}

#[tokio::test]
async fn failed_load_swaps_in_error_dataset() {
    let source = StubSource::new(vec![LoadOutcome::failure()]);
    let controller = RefreshController::new(Arc::new(source));

    let summary = controller.refresh().await;

    assert!(!summary.succeeded);
    assert_eq!(summary.status_options, vec!["Todos", "Error"]);
    assert!(controller.dataset().await.items.iter().all(|i| i.status == "Error"));
}

#[tokio::test]
async fn stale_selection_is_kept_and_renders_sentinel() {
    // Selection referencing a month that disappears after a refresh is not
    // reconciled; it just filters to nothing.
    let source = StubSource::new(vec![
        LoadOutcome::success(may_dataset()),
        LoadOutcome::success(june_dataset()),
    ]);
    let controller = RefreshController::new(Arc::new(source));
    controller.refresh().await;

    let stale = FilterSelection::all().month("2024-05");
    controller.refresh().await;

    let filtered = filter(&controller.dataset().await, &stale);
    assert!(filtered.is_empty());

    let desc = ChartLayout::new().layout(&filtered, Theme::Light, date(2024, 6, 20));
    assert_eq!(desc.title, NO_DATA_TITLE);
    assert_eq!(desc.height_px, 400);
}

#[tokio::test]
async fn summary_reflects_current_state_without_loading() {
    let source = StubSource::new(vec![LoadOutcome::success(may_dataset())]);
    let controller = RefreshController::new(Arc::new(source));

    // Before any load: empty option lists beyond the sentinel.
    let before = controller.summary().await;
    assert_eq!(before.month_options, vec!["Todos"]);
    assert!(!before.succeeded);

    controller.refresh().await;
    let after = controller.summary().await;
    assert_eq!(after.month_options, vec!["Todos", "2024-05"]);
    assert!(after.succeeded);
}
