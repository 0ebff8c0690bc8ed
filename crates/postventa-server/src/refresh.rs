//! Refresh orchestration: drives the data source and owns the dataset.

use chrono::Local;
use postventa_core::{DataSource, Dataset, TODOS};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// What a refresh republishes: the dropdown option lists derived from the
/// just-loaded dataset, plus the last-updated label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub month_options: Vec<String>,
    pub status_options: Vec<String>,
    pub last_updated: String,
    pub succeeded: bool,
}

struct Shared {
    dataset: Dataset,
    last_updated: String,
    succeeded: bool,
}

/// Owns the single mutable dataset and re-invokes the data source on
/// manual triggers and timer ticks.
///
/// The dataset is replaced wholesale behind the lock after each load, so
/// concurrent readers always see a fully-formed dataset. Overlapping
/// refreshes are not deduplicated; each fetches independently and the
/// last swap wins.
pub struct RefreshController {
    source: Arc<dyn DataSource>,
    state: RwLock<Shared>,
}

impl RefreshController {
    /// Create a controller with an empty dataset; call [`refresh`] to
    /// perform the initial load.
    ///
    /// [`refresh`]: RefreshController::refresh
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            state: RwLock::new(Shared {
                dataset: Dataset::default(),
                last_updated: String::new(),
                succeeded: false,
            }),
        }
    }

    /// Load a fresh dataset, swap it in, and republish the option lists.
    ///
    /// The fetch runs without holding the lock. Previously selected filter
    /// values are not reconciled against the new option set; a stale
    /// selection simply filters to an empty dataset.
    pub async fn refresh(&self) -> RefreshSummary {
        let outcome = self.source.load().await;
        let last_updated = format!(
            "Última actualización: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        let summary = RefreshSummary {
            month_options: with_all_sentinel(outcome.dataset.months()),
            status_options: with_all_sentinel(outcome.dataset.statuses()),
            last_updated: last_updated.clone(),
            succeeded: outcome.succeeded,
        };

        let mut state = self.state.write().await;
        *state = Shared {
            dataset: outcome.dataset,
            last_updated,
            succeeded: outcome.succeeded,
        };
        summary
    }

    /// Snapshot of the current dataset.
    pub async fn dataset(&self) -> Dataset {
        self.state.read().await.dataset.clone()
    }

    /// Option lists and label for the currently held dataset, without
    /// triggering a load.
    pub async fn summary(&self) -> RefreshSummary {
        let state = self.state.read().await;
        RefreshSummary {
            month_options: with_all_sentinel(state.dataset.months()),
            status_options: with_all_sentinel(state.dataset.statuses()),
            last_updated: state.last_updated.clone(),
            succeeded: state.succeeded,
        }
    }
}

/// Prefix an option list with the `Todos` sentinel.
fn with_all_sentinel(values: Vec<String>) -> Vec<String> {
    let mut options = Vec::with_capacity(values.len() + 1);
    options.push(TODOS.to_string());
    options.extend(values);
    options
}
