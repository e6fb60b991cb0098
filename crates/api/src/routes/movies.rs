//! Upload and aggregation endpoints.
//!
//! `POST /upload` stages a multipart CSV to a temp file, replaces the
//! store's content with its validated rows, and reports the ingest
//! stats. `GET /producers/intervals` answers the min/max win-interval
//! query, served from the cache when the store hasn't changed.

use std::path::PathBuf;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use razzie_core::intervals::aggregate;
use razzie_core::record::MAX_YEAR;
use razzie_db::loader::{load_csv, IngestStats};
use razzie_db::repositories::MovieRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum accepted upload size (the full historical movie list is a
/// few hundred KB; 50 MB leaves generous headroom).
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// The multipart field name carrying the CSV file.
const FILE_FIELD: &str = "file";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/producers/intervals", get(producer_intervals))
        .route(
            "/upload",
            post(upload_csv).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}

// ---------------------------------------------------------------------------
// POST /upload
// ---------------------------------------------------------------------------

/// Receive a CSV upload and replace the store's content with it.
///
/// The file part is streamed to a staging path under the upload dir,
/// ingested, and always deleted afterwards -- the ingest pipeline only
/// reads; this handler owns the file lifecycle.
pub async fn upload_csv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let path = stage_upload(&state, multipart).await?;

    let result = ingest_and_invalidate(&state, &path).await;

    if let Err(err) = tokio::fs::remove_file(&path).await {
        tracing::warn!(path = %path.display(), error = %err, "Failed to remove staged upload");
    } else {
        tracing::info!(path = %path.display(), "Staged upload removed");
    }

    let stats = result?;
    Ok(Json(DataResponse { data: stats }))
}

/// Stream the `file` multipart field to a staging file, returning its path.
async fn stage_upload(state: &AppState, mut multipart: Multipart) -> AppResult<PathBuf> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(format!("Invalid multipart payload: {err}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        tokio::fs::create_dir_all(&state.config.upload_dir)
            .await
            .map_err(|err| AppError::InternalError(format!("Cannot create upload dir: {err}")))?;

        let path = state.config.upload_dir.join(format!("{}.csv", Uuid::new_v4()));
        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(|err| AppError::InternalError(format!("Cannot stage upload: {err}")))?;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|err| AppError::BadRequest(format!("Upload interrupted: {err}")))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|err| AppError::InternalError(format!("Cannot stage upload: {err}")))?;
        }
        file.flush()
            .await
            .map_err(|err| AppError::InternalError(format!("Cannot stage upload: {err}")))?;

        return Ok(path);
    }

    Err(AppError::BadRequest("No file provided".to_string()))
}

/// Run the ingest under the exclusive ingest lock and drop the cached
/// aggregation once the new content is committed.
async fn ingest_and_invalidate(state: &AppState, path: &PathBuf) -> AppResult<IngestStats> {
    let _guard = state.ingest_lock.lock().await;

    let stats = load_csv(&state.pool, path, MAX_YEAR).await?;
    state.cache.invalidate().await;

    Ok(stats)
}

// ---------------------------------------------------------------------------
// GET /producers/intervals
// ---------------------------------------------------------------------------

/// Return the producers with the smallest and largest gap between
/// consecutive wins. An empty aggregation (no producer with two or more
/// wins) maps to 404.
pub async fn producer_intervals(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    // The generation must be observed before the winners snapshot: an
    // ingest that commits in between bumps it, and set_if_current then
    // refuses to install the now-outdated result.
    let (cached, generation) = state.cache.read().await;
    if let Some(cached) = cached {
        tracing::debug!("Serving producer intervals from cache");
        return Ok(Json(DataResponse { data: cached }));
    }

    let winners = MovieRepo::winners(&state.pool).await?;
    let result = aggregate(winners.iter().map(|row| (row.producers.as_str(), row.year)));

    if result.is_empty() {
        return Err(AppError::NotFound("No award intervals found".to_string()));
    }

    if !state.cache.set_if_current(generation, result.clone()).await {
        tracing::debug!("Store replaced during aggregation, result not cached");
    }
    Ok(Json(DataResponse { data: result }))
}
