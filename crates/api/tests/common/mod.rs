//! Shared test harness: router construction and request helpers.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use razzie_api::config::ServerConfig;
use razzie_api::router::build_app_router;
use razzie_api::state::AppState;
use razzie_core::record::MovieRecord;
use razzie_db::repositories::MovieRepo;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        upload_dir: std::env::temp_dir().join("razzie-test-uploads"),
        // Tests control the store content themselves.
        seed_csv_path: "does-not-exist.csv".into(),
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool.
///
/// This mirrors the router construction in `main.rs` so integration
/// tests exercise the same middleware stack (CORS, request ID, timeout,
/// tracing, panic recovery) that production uses.
pub fn build_test_app(pool: SqlitePool) -> Router {
    build_test_app_with_state(pool).0
}

/// Like [`build_test_app`], but also hands back the shared state so a
/// test can observe the cache alongside the HTTP surface.
pub fn build_test_app_with_state(pool: SqlitePool) -> (Router, AppState) {
    let config = test_config();
    let state = AppState::new(pool, config.clone());
    (build_app_router(state.clone(), &config), state)
}

/// Issue a GET request against the in-process app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| panic!("response body is not JSON: {e}"))
}

/// Multipart boundary used by [`post_csv_upload`].
pub const BOUNDARY: &str = "x-test-boundary";

/// POST a CSV payload to `/api/v1/upload` as a `file` multipart part.
pub async fn post_csv_upload(app: Router, csv: &str) -> Response<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"movielist.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {csv}\r\n\
         --{BOUNDARY}--\r\n"
    );

    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Insert movie rows directly, bypassing the CSV pipeline.
pub async fn seed_movies(pool: &SqlitePool, rows: &[(i32, &str, Option<&str>)]) {
    let records: Vec<MovieRecord> = rows
        .iter()
        .map(|(year, producers, winner)| MovieRecord {
            year: *year,
            title: format!("Movie {year}"),
            studios: "Test Studio".to_string(),
            producers: producers.to_string(),
            winner: winner.map(str::to_string),
        })
        .collect();

    let mut conn = pool.acquire().await.unwrap();
    MovieRepo::insert_batch(&mut conn, &records).await.unwrap();
}

/// Assert a JSON error envelope with the given status and code.
pub async fn assert_error_response(response: Response<Body>, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code);
    assert!(json["error"].is_string());
}
