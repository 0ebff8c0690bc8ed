//! # postventa-render
//!
//! Chart layout engine for the postventa Gantt timeline.
//!
//! Turns a filtered [`Dataset`] into a language-neutral
//! [`ChartDescription`]: ordered bars with tooltips, a dynamic chart
//! height, a "today" marker and a theme palette. The layout is a pure,
//! total function over a valid dataset — empty input yields a "no data"
//! sentinel instead of an error, and the description is recomputed fresh
//! on every render request.

use chrono::NaiveDate;
use postventa_core::{status_color, Dataset, FilterSelection, Item, TODOS};
use serde::{Deserialize, Serialize};

/// Visual theme selected by the consumer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Parse the UI's theme value; anything unknown falls back to light.
    pub fn parse(value: &str) -> Self {
        match value {
            "dark" => Self::Dark,
            _ => Self::Light,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Light => Palette::light(),
            Self::Dark => Palette::dark(),
        }
    }
}

/// Fixed color palette for a theme. Configuration constants, not computed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub plot_background: String,
    pub paper_background: String,
    pub font_color: String,
    pub grid_color: String,
    /// Background behind the today-marker label
    pub marker_label_background: String,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            plot_background: "white".into(),
            paper_background: "white".into(),
            font_color: "#222".into(),
            grid_color: "#eee".into(),
            marker_label_background: "white".into(),
        }
    }

    pub fn dark() -> Self {
        Self {
            plot_background: "#23272f".into(),
            paper_background: "#23272f".into(),
            font_color: "#f0f0f0".into(),
            grid_color: "#444".into(),
            marker_label_background: "#23272f".into(),
        }
    }
}

/// One rendered bar of the timeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartBar {
    pub id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub status: String,
    pub color: String,
    pub duration_days: i64,
    /// Days from today until `end`, clamped at zero
    pub days_remaining: i64,
    pub tooltip: String,
}

/// Complete description of one chart render.
///
/// Bar order is the fixed category order for the vertical axis; consumers
/// must not resort it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDescription {
    pub bars: Vec<ChartBar>,
    pub row_count: usize,
    pub height_px: u32,
    /// X position of the vertical "today" reference line
    pub today: NaiveDate,
    pub today_label: String,
    pub title: String,
    pub theme: Theme,
    pub palette: Palette,
}

/// Title shown when the filtered dataset is empty.
pub const NO_DATA_TITLE: &str = "Sin datos con los filtros seleccionados";

/// Chart title for a filter selection, e.g. `Postventa - Backlog | 2024-05`.
pub fn chart_title(selection: &FilterSelection) -> String {
    let estado = if selection.status == TODOS {
        "Todos los estados"
    } else {
        selection.status.as_str()
    };
    let mes = if selection.month == TODOS {
        "Todos los meses"
    } else {
        selection.month.as_str()
    };
    format!("Postventa - {estado} | {mes}")
}

/// Layout configuration: row sizing and height bounds.
#[derive(Clone, Debug)]
pub struct ChartLayout {
    /// Height per bar row in pixels
    pub row_height: u32,
    /// Lower bound on the chart height
    pub min_height: u32,
    /// Upper bound on the chart height
    pub max_height: u32,
    /// Chart title; the no-data sentinel overrides it
    pub title: Option<String>,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            row_height: 25,
            min_height: 400,
            max_height: 1200,
            title: None,
        }
    }
}

impl ChartLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chart title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Dynamic chart height, clamped to the configured bounds.
    fn height_for(&self, row_count: usize) -> u32 {
        (self.row_height * row_count as u32).clamp(self.min_height, self.max_height)
    }

    /// Compute the chart description for an already-filtered dataset.
    ///
    /// Bars are sorted ascending by start date; ties keep their original
    /// relative order so the category axis stays stable across re-renders.
    /// `today` is expected to be the caller's date normalized to midnight.
    pub fn layout(&self, dataset: &Dataset, theme: Theme, today: NaiveDate) -> ChartDescription {
        let today_label = format!("Hoy: {}", today.format("%Y-%m-%d"));

        if dataset.is_empty() {
            return ChartDescription {
                bars: Vec::new(),
                row_count: 0,
                height_px: self.min_height,
                today,
                today_label,
                title: NO_DATA_TITLE.into(),
                theme,
                palette: theme.palette(),
            };
        }

        let mut ordered: Vec<&Item> = dataset.items.iter().collect();
        ordered.sort_by_key(|item| item.start);

        let bars: Vec<ChartBar> = ordered.into_iter().map(|item| bar_for(item, today)).collect();
        let row_count = bars.len();

        ChartDescription {
            row_count,
            height_px: self.height_for(row_count),
            bars,
            today,
            today_label,
            title: self.title.clone().unwrap_or_else(|| chart_title(&FilterSelection::all())),
            theme,
            palette: theme.palette(),
        }
    }
}

fn bar_for(item: &Item, today: NaiveDate) -> ChartBar {
    let days_remaining = (item.end - today).num_days().max(0);
    ChartBar {
        id: item.id.clone(),
        start: item.start,
        end: item.end,
        status: item.status.clone(),
        color: status_color(&item.status).into(),
        duration_days: item.duration_days,
        days_remaining,
        tooltip: tooltip(item, days_remaining),
    }
}

/// The per-bar hover text, with fixed captions and field order.
fn tooltip(item: &Item, days_remaining: i64) -> String {
    format!(
        "{}\nInicio de desarrollo: {}\nFin de desarrollo OK QA: {}\nDuración: {} días\nDías restantes: {} días",
        item.id, item.start_label, item.end_label, item.duration_days, days_remaining
    )
}
