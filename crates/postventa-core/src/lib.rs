//! # postventa-core
//!
//! Core domain model for the postventa Gantt timeline service.
//!
//! This crate provides:
//! - Domain types: `Item`, `Dataset`, `LoadOutcome`, `FilterSelection`
//! - The row normalizer that turns raw sheet rows into well-formed items
//! - The month/status filter engine
//! - The fixed status color table and fallback datasets
//! - The `DataSource` trait implemented by loaders
//!
//! ## Example
//!
//! ```rust
//! use postventa_core::{filter, FilterSelection, Item, RawRow};
//!
//! let raw = RawRow {
//!     rn: "RN 101".into(),
//!     estado: "En desarrollo".into(),
//!     inicio: "05/01/2024".into(),
//!     fin: "05/20/2024".into(),
//! };
//! let item = Item::from_raw(&raw).unwrap();
//! assert_eq!(item.duration_days, 19);
//! assert_eq!(item.month_bucket, "2024-05");
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub mod colors;

pub use colors::{status_color, DEFAULT_STATUS_COLOR};

/// Sentinel dropdown value meaning "no constraint" (the UI literal).
pub const TODOS: &str = "Todos";

/// Date pattern used by the source sheet (`Inicio`/`Fin` columns).
pub const SOURCE_DATE_FORMAT: &str = "%m/%d/%Y";

/// Fixed-format pattern for the human-readable date labels.
pub const LABEL_DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Raw Rows & Items
// ============================================================================

/// One row as it comes out of the sheet, before cleaning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRow {
    /// Requirement identifier (free text, may contain NBSP runs)
    pub rn: String,
    /// Status label
    pub estado: String,
    /// Start date string, `MM/DD/YYYY`
    pub inicio: String,
    /// End date string, `MM/DD/YYYY`
    pub fin: String,
}

/// A normalized requirement/ticket row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Requirement identifier with whitespace runs collapsed
    pub id: String,
    /// Status label (known-but-open set, e.g. "Backlog", "Entregado")
    pub status: String,
    /// Development start date
    pub start: NaiveDate,
    /// Development end date
    pub end: NaiveDate,
    /// `end - start` in days; negative if the source data is inconsistent
    pub duration_days: i64,
    /// `YYYY-MM` grouping key derived from `end`
    pub month_bucket: String,
    /// `YYYY-MM-DD` rendering of `start`
    pub start_label: String,
    /// `YYYY-MM-DD` rendering of `end`
    pub end_label: String,
}

impl Item {
    /// Build an item from already-parsed fields, deriving the computed ones.
    pub fn new(id: impl Into<String>, status: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            start,
            end,
            duration_days: (end - start).num_days(),
            month_bucket: end.format("%Y-%m").to_string(),
            start_label: start.format(LABEL_DATE_FORMAT).to_string(),
            end_label: end.format(LABEL_DATE_FORMAT).to_string(),
        }
    }

    /// Normalize a raw sheet row into an item.
    ///
    /// Returns `None` when either date fails to parse; callers drop such
    /// rows rather than failing the batch. Pure and deterministic.
    pub fn from_raw(raw: &RawRow) -> Option<Self> {
        let start = parse_source_date(&raw.inicio)?;
        let end = parse_source_date(&raw.fin)?;
        Some(Self::new(normalize_id(&raw.rn), raw.estado.trim(), start, end))
    }
}

/// Parse a `MM/DD/YYYY` source date.
pub fn parse_source_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), SOURCE_DATE_FORMAT).ok()
}

/// Collapse runs of whitespace (including NBSP) into single ASCII spaces
/// and trim the ends.
pub fn normalize_id(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Dataset
// ============================================================================

/// An ordered collection of items; replaced wholesale on each refresh.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub items: Vec<Item>,
}

impl Dataset {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sorted distinct `YYYY-MM` buckets present in the dataset.
    pub fn months(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|i| i.month_bucket.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted distinct status labels present in the dataset.
    pub fn statuses(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|i| i.status.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// The fixed placeholder dataset used when cleaning leaves zero rows.
pub fn sample_dataset() -> Dataset {
    let statuses = ["En desarrollo", "Entregado", "Backlog"];
    Dataset::new(
        statuses
            .iter()
            .enumerate()
            .map(|(n, status)| {
                let start = sample_start_date(n as i64);
                Item::new(format!("Ejemplo {}", n + 1), *status, start, start + chrono::Duration::days(30))
            })
            .collect(),
    )
}

/// The fixed placeholder dataset used when the fetch or parse fails.
/// All rows carry the `Error` status so the failure is visible in the chart.
pub fn error_dataset() -> Dataset {
    let ids = ["Error - Sin datos", "Ejemplo 2", "Ejemplo 3"];
    Dataset::new(
        ids.iter()
            .enumerate()
            .map(|(n, id)| {
                let start = sample_start_date(n as i64);
                Item::new(*id, "Error", start, start + chrono::Duration::days(30))
            })
            .collect(),
    )
}

fn sample_start_date(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Duration::days(offset)
}

// ============================================================================
// Load Outcome
// ============================================================================

/// Result of a load cycle: the dataset plus whether the fetch succeeded.
///
/// `succeeded == false` marks the error fallback; the empty-after-cleaning
/// sample fallback still counts as a successful load. The two stay
/// distinguishable downstream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOutcome {
    pub dataset: Dataset,
    pub succeeded: bool,
}

impl LoadOutcome {
    /// A successful load. Substitutes the sample dataset if `dataset` is
    /// empty after cleaning.
    pub fn success(dataset: Dataset) -> Self {
        let dataset = if dataset.is_empty() { sample_dataset() } else { dataset };
        Self { dataset, succeeded: true }
    }

    /// A failed load: the fixed all-`Error` placeholder.
    pub fn failure() -> Self {
        Self {
            dataset: error_dataset(),
            succeeded: false,
        }
    }
}

// ============================================================================
// Filtering
// ============================================================================

/// Month/status constraint selected by the consumer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// `YYYY-MM` bucket or [`TODOS`]
    pub month: String,
    /// Status label or [`TODOS`]
    pub status: String,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl FilterSelection {
    /// No constraints on either axis.
    pub fn all() -> Self {
        Self {
            month: TODOS.into(),
            status: TODOS.into(),
        }
    }

    pub fn month(mut self, month: impl Into<String>) -> Self {
        self.month = month.into();
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Whether an item passes both constraints (AND composition,
    /// exact string equality).
    pub fn matches(&self, item: &Item) -> bool {
        (self.month == TODOS || item.month_bucket == self.month)
            && (self.status == TODOS || item.status == self.status)
    }
}

/// Apply a selection to a dataset, producing a new dataset.
///
/// `Todos` on an axis means no constraint there. The input is not mutated;
/// relative order is preserved. May return an empty dataset.
pub fn filter(dataset: &Dataset, selection: &FilterSelection) -> Dataset {
    Dataset::new(
        dataset
            .items
            .iter()
            .filter(|item| selection.matches(item))
            .cloned()
            .collect(),
    )
}

// ============================================================================
// Data Source
// ============================================================================

/// Anything that can produce a fresh [`LoadOutcome`].
///
/// The refresh controller drives implementations of this trait; the real
/// one fetches the published sheet, test doubles return canned outcomes.
/// Implementations never fail outward — fallback datasets stand in for
/// errors.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn load(&self) -> LoadOutcome;
}

// ============================================================================
// Tests
// ============================================================================
