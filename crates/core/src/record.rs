//! Validation of raw movie-list rows and the header contract.
//!
//! The source format is a semicolon-delimited text file with one header
//! line, columns `year;title;studios;producers;winner`. Rows are
//! validated individually: a bad row is rejected and counted, never a
//! hard failure. A bad header aborts the whole ingest before any row is
//! read.

use serde::Serialize;

use crate::sanitize::{sanitize, sanitize_required};

/// Columns every source file must declare (extras are allowed).
pub const EXPECTED_COLUMNS: &[&str] = &["year", "title", "studios", "producers", "winner"];

/// Lowest acceptable award year.
pub const MIN_YEAR: i32 = 1900;

/// Highest acceptable award year for bulk ingestion.
///
/// Call sites that want a tighter policy (e.g. the current calendar
/// year) pass their own upper bound to [`validate_record`].
pub const MAX_YEAR: i32 = 2100;

/// The literal token marking a winning record.
pub const WINNER_TOKEN: &str = "yes";

/// One raw data row, fields as read from the source before validation.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    pub year: &'a str,
    pub title: &'a str,
    pub studios: &'a str,
    pub producers: &'a str,
    pub winner: &'a str,
}

/// A row that passed validation, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieRecord {
    pub year: i32,
    pub title: String,
    pub studios: String,
    pub producers: String,
    /// `None` when the source field is empty; a record is a winner iff
    /// this equals [`WINNER_TOKEN`].
    pub winner: Option<String>,
}

impl MovieRecord {
    pub fn is_winner(&self) -> bool {
        self.winner.as_deref() == Some(WINNER_TOKEN)
    }
}

/// Why a single row was rejected. Reported for counting and logging;
/// never fatal to the ingest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectionReason {
    /// `year` did not parse as an integer or fell outside the bounds.
    #[error("year out of range: {raw:?}")]
    YearOutOfRange { raw: String },
    /// A required field was empty after sanitization.
    #[error("required field is empty: {field}")]
    EmptyField { field: &'static str },
}

/// Validate one raw row against the schema and value-range rules.
///
/// Accepts iff `year` parses as an integer in `[MIN_YEAR, upper_bound]`
/// and `title`, `studios`, `producers` are non-empty after
/// sanitization. Pure function; the caller decides what to do with the
/// rejection.
pub fn validate_record(
    raw: RawRecord<'_>,
    upper_bound: i32,
) -> Result<MovieRecord, RejectionReason> {
    let year: i32 = raw
        .year
        .trim()
        .parse()
        .map_err(|_| RejectionReason::YearOutOfRange {
            raw: raw.year.to_string(),
        })?;
    if year < MIN_YEAR || year > upper_bound {
        return Err(RejectionReason::YearOutOfRange {
            raw: raw.year.to_string(),
        });
    }

    let title = sanitize_required(raw.title).ok_or(RejectionReason::EmptyField {
        field: "title",
    })?;
    let studios = sanitize_required(raw.studios).ok_or(RejectionReason::EmptyField {
        field: "studios",
    })?;
    let producers = sanitize_required(raw.producers).ok_or(RejectionReason::EmptyField {
        field: "producers",
    })?;

    // The winner flag is optional; an empty field means "not a winner".
    let winner = {
        let cleaned = sanitize(raw.winner);
        let trimmed = cleaned.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    };

    Ok(MovieRecord {
        year,
        title,
        studios,
        producers,
        winner,
    })
}

/// Check the declared header against [`EXPECTED_COLUMNS`].
///
/// Returns the missing column names on failure; any missing column is a
/// schema mismatch that aborts the whole ingest. Extra columns are
/// ignored.
pub fn validate_headers(headers: &[String]) -> Result<(), Vec<&'static str>> {
    let missing: Vec<&'static str> = EXPECTED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == col))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw<'a>(
        year: &'a str,
        title: &'a str,
        studios: &'a str,
        producers: &'a str,
        winner: &'a str,
    ) -> RawRecord<'a> {
        RawRecord {
            year,
            title,
            studios,
            producers,
            winner,
        }
    }

    // -- validate_record ----------------------------------------------------

    #[test]
    fn accepts_a_well_formed_winner_row() {
        let record = validate_record(
            raw("1985", "Rambo II", "Columbia Pictures", "Buzz Feitshans", "yes"),
            MAX_YEAR,
        )
        .unwrap();

        assert_eq!(record.year, 1985);
        assert_eq!(record.title, "Rambo II");
        assert_eq!(record.winner.as_deref(), Some("yes"));
        assert!(record.is_winner());
    }

    #[test]
    fn empty_winner_field_means_nominee() {
        let record = validate_record(
            raw("1990", "Ghosts Can't Do It", "Triumph Releasing", "Bo Derek", ""),
            MAX_YEAR,
        )
        .unwrap();

        assert_eq!(record.winner, None);
        assert!(!record.is_winner());
    }

    #[test]
    fn rejects_year_below_minimum() {
        let err = validate_record(raw("1899", "Old", "Studio", "Someone", ""), MAX_YEAR)
            .unwrap_err();
        assert_eq!(
            err,
            RejectionReason::YearOutOfRange {
                raw: "1899".to_string()
            }
        );
    }

    #[test]
    fn rejects_year_above_upper_bound() {
        assert!(validate_record(raw("2101", "Future", "Studio", "Someone", ""), MAX_YEAR).is_err());
        // Tighter bound used by ad-hoc pre-checks.
        assert!(validate_record(raw("2050", "Future", "Studio", "Someone", ""), 2024).is_err());
        assert!(validate_record(raw("2020", "Recent", "Studio", "Someone", ""), 2024).is_ok());
    }

    #[test]
    fn rejects_non_numeric_year() {
        let err = validate_record(raw("198O", "Typo", "Studio", "Someone", ""), MAX_YEAR)
            .unwrap_err();
        assert!(matches!(err, RejectionReason::YearOutOfRange { .. }));
    }

    #[test]
    fn rejects_empty_required_fields() {
        let cases: [(RawRecord<'_>, &str); 3] = [
            (raw("1980", "", "Studio", "Someone", ""), "title"),
            (raw("1980", "Title", "  ", "Someone", ""), "studios"),
            (raw("1980", "Title", "Studio", "$%^", ""), "producers"),
        ];
        for (record, field) in cases {
            assert_eq!(
                validate_record(record, MAX_YEAR).unwrap_err(),
                RejectionReason::EmptyField { field },
            );
        }
    }

    #[test]
    fn sanitizes_persisted_fields() {
        let record = validate_record(
            raw("1980", "Can't Stop <the> Music", "AFD;", "Allan Carr", "yes"),
            MAX_YEAR,
        )
        .unwrap();
        assert_eq!(record.title, "Can't Stop the Music");
        assert_eq!(record.studios, "AFD");
    }

    // -- validate_headers ---------------------------------------------------

    #[test]
    fn accepts_exact_header() {
        let headers: Vec<String> = ["year", "title", "studios", "producers", "winner"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(validate_headers(&headers).is_ok());
    }

    #[test]
    fn accepts_extra_columns() {
        let headers: Vec<String> = ["year", "title", "studios", "producers", "winner", "notes"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(validate_headers(&headers).is_ok());
    }

    #[test]
    fn reports_missing_columns() {
        let headers: Vec<String> = ["year", "title", "studios", "winner"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(validate_headers(&headers).unwrap_err(), vec!["producers"]);
    }
}
