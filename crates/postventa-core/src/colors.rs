//! Fixed status-to-color mapping for chart bars.
//!
//! The table mirrors the legend the consumers already know; unknown status
//! labels fall back to a deterministic neutral gray rather than an
//! arbitrary palette pick.

/// Color assigned to status labels missing from the fixed table.
pub const DEFAULT_STATUS_COLOR: &str = "#7f8c8d";

/// Look up the display color for a status label.
pub fn status_color(status: &str) -> &'static str {
    match status {
        "Entregado" => "#2ecc71",
        "En desarrollo" => "#1abc9c",
        "Backlog" => "#f1c40f",
        "Para refinar" => "#f5d76e",
        "Escribiendo" => "#e67e22",
        "Para escribir" => "#e74c3c",
        "En Análisis" => "#9b59b6",
        "Cancelado" => "#95a5a6",
        "Error" => "#e74c3c",
        _ => DEFAULT_STATUS_COLOR,
    }
}
