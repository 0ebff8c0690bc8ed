//! # postventa-server
//!
//! HTTP service around the load → filter → layout pipeline: the
//! [`refresh::RefreshController`] owns the dataset and the [`routes`]
//! module exposes it as a JSON API.

pub mod refresh;
pub mod routes;
