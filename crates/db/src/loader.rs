//! Streaming CSV ingest pipeline.
//!
//! Reads a semicolon-delimited movie list row-by-row (bounded memory,
//! arbitrarily large sources), validates each row, and commits accepted
//! rows in batches of [`BATCH_SIZE`] inside a single transaction. The
//! transaction also truncates the previous content first, so the store
//! either fully switches to the new data set or keeps the old one --
//! never a mix.
//!
//! Row-level validation failures are counted and skipped; everything
//! else (bad header, unreadable source, storage errors) fails the whole
//! ingest with nothing committed.

use std::path::Path;

use csv_async::AsyncReaderBuilder;
use futures::StreamExt;
use serde::Serialize;
use tokio::fs::File;

use razzie_core::record::{validate_headers, validate_record, RawRecord};

use crate::repositories::MovieRepo;
use crate::DbPool;

/// Accepted rows buffered before a flush to the store.
pub const BATCH_SIZE: usize = 1000;

/// Outcome counters for one ingest run.
///
/// A row counts toward `total_rows` once read, toward `rejected_rows`
/// when it fails validation, and toward `inserted_rows` only after the
/// final commit succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestStats {
    pub total_rows: u64,
    pub inserted_rows: u64,
    pub rejected_rows: u64,
}

/// Fatal ingest failures. Row rejections are not errors; they are
/// counted in [`IngestStats`].
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The header is missing required columns. Nothing was committed.
    #[error("source header is missing required columns: {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    /// The source path could not be opened.
    #[error("source file not found: {0}")]
    SourceNotFound(String),

    /// The source could not be read.
    #[error("failed to read source: {0}")]
    Read(#[from] std::io::Error),

    /// The CSV stream was malformed beyond row-level recovery.
    #[error("failed to parse source: {0}")]
    Csv(#[from] csv_async::Error),

    /// The storage layer rejected a batch; the transaction was rolled
    /// back and the previous content is intact.
    #[error("storage failure during ingest: {0}")]
    Storage(sqlx::Error),

    /// The final commit failed; the previous content is intact.
    #[error("commit failure at end of ingest: {0}")]
    Commit(sqlx::Error),
}

/// Positions of the required columns within the declared header.
struct Columns {
    year: usize,
    title: usize,
    studios: usize,
    producers: usize,
    winner: usize,
}

impl Columns {
    fn locate(headers: &[String]) -> Result<Self, IngestError> {
        if let Err(missing) = validate_headers(headers) {
            return Err(IngestError::SchemaMismatch {
                missing: missing.iter().map(|s| s.to_string()).collect(),
            });
        }
        let index = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .expect("column presence was just validated")
        };
        Ok(Self {
            year: index("year"),
            title: index("title"),
            studios: index("studios"),
            producers: index("producers"),
            winner: index("winner"),
        })
    }
}

/// Replace the store's content with the validated rows of the given
/// CSV source.
///
/// `upper_bound` is the year acceptance ceiling; bulk ingestion uses
/// [`razzie_core::record::MAX_YEAR`], stricter call sites may pass the
/// current calendar year.
pub async fn load_csv(
    pool: &DbPool,
    path: impl AsRef<Path>,
    upper_bound: i32,
) -> Result<IngestStats, IngestError> {
    let path = path.as_ref();

    let file = File::open(path).await.map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            IngestError::SourceNotFound(path.display().to_string())
        } else {
            IngestError::Read(err)
        }
    })?;

    let mut reader = AsyncReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .create_reader(file);

    // Header first: a schema mismatch aborts before any row is read.
    let headers: Vec<String> = reader
        .headers()
        .await?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let columns = Columns::locate(&headers)?;
    tracing::info!(path = %path.display(), "CSV header validated");

    // One transaction covers truncate + every batch + commit.
    let mut tx = pool.begin().await.map_err(IngestError::Storage)?;
    MovieRepo::delete_all(&mut *tx)
        .await
        .map_err(IngestError::Storage)?;

    let mut total_rows: u64 = 0;
    let mut staged_rows: u64 = 0;
    let mut rejected_rows: u64 = 0;
    let mut batch = Vec::with_capacity(BATCH_SIZE);

    let mut records = reader.records();
    while let Some(record) = records.next().await {
        let record = record?;
        total_rows += 1;

        let field = |idx: usize| record.get(idx).unwrap_or("");
        let raw = RawRecord {
            year: field(columns.year),
            title: field(columns.title),
            studios: field(columns.studios),
            producers: field(columns.producers),
            winner: field(columns.winner),
        };

        match validate_record(raw, upper_bound) {
            Ok(movie) => {
                batch.push(movie);
                if batch.len() >= BATCH_SIZE {
                    MovieRepo::insert_batch(&mut *tx, &batch)
                        .await
                        .map_err(IngestError::Storage)?;
                    staged_rows += batch.len() as u64;
                    batch.clear();
                }
            }
            Err(reason) => {
                rejected_rows += 1;
                tracing::warn!(row = total_rows, %reason, "Rejected CSV row");
            }
        }
    }

    if !batch.is_empty() {
        MovieRepo::insert_batch(&mut *tx, &batch)
            .await
            .map_err(IngestError::Storage)?;
        staged_rows += batch.len() as u64;
    }

    tx.commit().await.map_err(IngestError::Commit)?;

    let stats = IngestStats {
        total_rows,
        inserted_rows: staged_rows,
        rejected_rows,
    };
    tracing::info!(
        total = stats.total_rows,
        inserted = stats.inserted_rows,
        rejected = stats.rejected_rows,
        "CSV ingest committed"
    );
    Ok(stats)
}
