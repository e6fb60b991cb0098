//! Row types for the `movies` table.

use serde::Serialize;

use razzie_core::types::DbId;

/// A persisted award record.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Movie {
    pub id: DbId,
    pub year: i32,
    pub title: String,
    pub studios: String,
    pub producers: String,
    pub winner: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

/// The projection the aggregator consumes: winning records only, just
/// the composite producers field and the win year.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WinnerRow {
    pub producers: String,
    pub year: i32,
}
