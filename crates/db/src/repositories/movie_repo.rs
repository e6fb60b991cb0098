//! Repository for the `movies` table.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use razzie_core::record::{MovieRecord, WINNER_TOKEN};

use crate::models::movie::{Movie, WinnerRow};

/// Column list for movies queries.
const COLUMNS: &str = "id, year, title, studios, producers, winner, created_at";

/// Provides the store operations the ingest pipeline and the
/// aggregation query need. Mutating operations take a transaction
/// connection so the loader can make truncate + reload atomic.
pub struct MovieRepo;

impl MovieRepo {
    /// Delete every movie row. Runs inside the ingest transaction so a
    /// failed reload never leaves the table half-truncated.
    pub async fn delete_all(conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movies").execute(conn).await?;
        Ok(result.rows_affected())
    }

    /// Insert a batch of validated records in one multi-row statement.
    pub async fn insert_batch(
        conn: &mut SqliteConnection,
        records: &[MovieRecord],
    ) -> Result<(), sqlx::Error> {
        if records.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO movies (year, title, studios, producers, winner) ");
        builder.push_values(records, |mut row, record| {
            row.push_bind(record.year)
                .push_bind(&record.title)
                .push_bind(&record.studios)
                .push_bind(&record.producers)
                .push_bind(&record.winner);
        });
        builder.build().execute(conn).await?;
        Ok(())
    }

    /// All winning records, ordered by producers then year.
    ///
    /// The ordering is part of the contract: it makes the downstream
    /// aggregation reproducible across runs.
    pub async fn winners(pool: &SqlitePool) -> Result<Vec<WinnerRow>, sqlx::Error> {
        sqlx::query_as::<_, WinnerRow>(
            "SELECT producers, year FROM movies
             WHERE winner = $1
             ORDER BY producers ASC, year ASC",
        )
        .bind(WINNER_TOKEN)
        .fetch_all(pool)
        .await
    }

    /// All rows, insertion order. Used by diagnostics and tests.
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies ORDER BY id ASC");
        sqlx::query_as::<_, Movie>(&query).fetch_all(pool).await
    }

    /// Number of persisted rows.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM movies")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
