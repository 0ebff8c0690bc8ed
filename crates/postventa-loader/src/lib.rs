//! # postventa-loader
//!
//! Fetches the published sheet CSV export and turns it into a clean
//! [`Dataset`].
//!
//! The loader never fails outward: every fetch or parse error is converted
//! into the fixed error fallback dataset at this boundary, so downstream
//! consumers always hold a renderable dataset. Rows with unparseable dates
//! are dropped individually without failing the batch.
//!
//! ## Example
//!
//! ```rust
//! use postventa_loader::parse_sheet;
//!
//! let body = "RN,Estado,Inicio,Fin\nRN 101,Backlog,05/01/2024,05/20/2024\n";
//! let rows = parse_sheet(body).unwrap();
//! assert_eq!(rows[0].estado, "Backlog");
//! ```

use async_trait::async_trait;
use postventa_core::{DataSource, Dataset, Item, LoadOutcome, RawRow};
use std::time::Duration;
use thiserror::Error;

/// Published CSV export consumed by the service.
pub const SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vTRvUazuzfWjGl5VWuZJUJslZEf-PpYyHZ_5G2SXwPtu16R71mPSKVQTYjen9UBwQ/pub?gid=865145678&single=true&output=csv";

/// Bound on the whole fetch, including connect time. No retries.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Loading error, caught at the loader boundary and never propagated
/// past [`DataSource::load`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column: {0}")]
    MissingColumn(&'static str),
}

/// Parse the CSV body into raw rows.
///
/// Header names are trimmed before lookup; the sheet export carries
/// incidental whitespace around them. Requires the `RN`, `Estado`,
/// `Inicio` and `Fin` columns.
pub fn parse_sheet(body: &str) -> Result<Vec<RawRow>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(body.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };
    let rn = column("RN")?;
    let estado = column("Estado")?;
    let inicio = column("Inicio")?;
    let fin = column("Fin")?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();
        rows.push(RawRow {
            rn: field(rn),
            estado: field(estado),
            inicio: field(inicio),
            fin: field(fin),
        });
    }
    Ok(rows)
}

/// Normalize raw rows, silently dropping any with unparseable dates.
pub fn clean(rows: &[RawRow]) -> Dataset {
    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        match Item::from_raw(row) {
            Some(item) => items.push(item),
            None => tracing::debug!(rn = %row.rn, "dropping row with unparseable dates"),
        }
    }
    Dataset::new(items)
}

/// Loader for the published sheet export.
#[derive(Clone, Debug)]
pub struct SheetLoader {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl SheetLoader {
    /// Create a loader for the given export URL with the default timeout.
    pub fn new(url: impl Into<String>) -> Result<Self, LoadError> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            url: url.into(),
            timeout: FETCH_TIMEOUT,
        })
    }

    /// Override the fetch timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn try_load(&self) -> Result<Dataset, LoadError> {
        let body = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(clean(&parse_sheet(&body)?))
    }
}

#[async_trait]
impl DataSource for SheetLoader {
    /// One load cycle: fetch, parse, clean, apply the fallback policy.
    ///
    /// A timed-out or failed fetch surfaces as the error fallback, not as
    /// a dangling request. An empty-after-cleaning result becomes the
    /// sample fallback and still counts as a success.
    async fn load(&self) -> LoadOutcome {
        match self.try_load().await {
            Ok(dataset) => {
                tracing::info!(rows = dataset.len(), "sheet loaded");
                LoadOutcome::success(dataset)
            }
            Err(err) => {
                tracing::warn!(%err, "load failed, substituting error dataset");
                LoadOutcome::failure()
            }
        }
    }
}
