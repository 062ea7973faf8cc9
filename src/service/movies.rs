use crate::db::{DatabaseGateway, DatabaseHandle, Operation};
use crate::error::{MoviesError, RemoteError, StorageError};
use crate::utils::logging::with_pretty_json_debug;
use movies_schema::{Movie, MovieCreateRequest, NewMovie};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::validate::validate_create;

/// Lower-cased fragments of database error text that suggest the `photo_url` column is
/// missing from the remote schema.
///
/// This is a guess driven by the wording of the remote service's messages, not a schema
/// check. Changing the list changes when the fallback insert fires.
pub const SCHEMA_MISMATCH_HINTS: [&str; 5] = [
    "column",
    "unknown",
    "invalid input",
    "does not exist",
    "undefined",
];

pub fn looks_like_missing_column(message: &str) -> bool {
    let lowered = message.to_lowercase();
    SCHEMA_MISMATCH_HINTS
        .iter()
        .any(|hint| lowered.contains(hint))
}

/// Read and write paths for the movies table.
#[derive(Clone)]
pub struct MovieService {
    gateway: Arc<DatabaseGateway>,
    table: Arc<str>,
}

impl MovieService {
    pub fn new(gateway: Arc<DatabaseGateway>, table: impl Into<Arc<str>>) -> Self {
        Self {
            gateway,
            table: table.into(),
        }
    }

    async fn handle(&self, event: &'static str) -> Result<DatabaseHandle, MoviesError> {
        self.gateway.get_handle().await.map_err(|e| {
            error!(event, error = %e, "Database gateway unavailable");
            MoviesError::from(e)
        })
    }

    /// Inserts `movie` and returns the first row echoed back, if any.
    async fn insert_first_row(
        &self,
        db: &DatabaseHandle,
        movie: &NewMovie,
    ) -> Result<Option<Value>, RemoteError> {
        let row = serde_json::to_value(movie)?;
        with_pretty_json_debug(&row, |pretty_row| {
            debug!(table = %self.table, row = %pretty_row, "Insert payload");
        });

        let rows = db.query(&self.table, Operation::Insert(row)).await?;
        Ok(rows.and_then(|rows| rows.into_iter().next()))
    }

    /// Validates and stores a new movie.
    ///
    /// When the service refuses the insert and the payload carried `photo_url`, the error
    /// text is checked against [`SCHEMA_MISMATCH_HINTS`]; on a match the insert is retried
    /// once without that column. No other failure is retried, in particular none that
    /// follows a success status, since the row may already be stored.
    pub async fn create_movie(&self, request: MovieCreateRequest) -> Result<Movie, MoviesError> {
        let movie = validate_create(request).inspect_err(|e| {
            warn!(
                event = "movies.create.validation_failed",
                reason = %e,
                "Rejected movie payload"
            );
        })?;

        let db = self.handle("movies.create.gateway_unavailable").await?;

        info!(
            event = "movies.create.insert_attempt",
            table = %self.table,
            has_photo_url = movie.has_photo_url(),
            "Inserting movie"
        );

        let first_row = match self.insert_first_row(&db, &movie).await {
            Ok(row) => {
                info!(event = "movies.create.insert_succeeded", table = %self.table);
                row
            }
            Err(e) => {
                let refused = e.is_refusal();
                let fallback =
                    movie.has_photo_url() && refused && looks_like_missing_column(&e.message());
                warn!(
                    event = "movies.create.insert_failed",
                    error = %e,
                    refused,
                    fallback,
                    "Movie insert failed"
                );
                if !fallback {
                    return Err(StorageError::CreateFailed.into());
                }

                info!(
                    event = "movies.create.fallback_attempt",
                    table = %self.table,
                    "Retrying insert without photo_url"
                );
                match self.insert_first_row(&db, &movie.without_photo_url()).await {
                    Ok(row) => {
                        info!(event = "movies.create.fallback_succeeded", table = %self.table);
                        row
                    }
                    Err(e) => {
                        error!(
                            event = "movies.create.fallback_failed",
                            error = %e,
                            "Insert without photo_url failed"
                        );
                        return Err(StorageError::CreateFailed.into());
                    }
                }
            }
        };

        let Some(row) = first_row else {
            error!(
                event = "movies.create.no_data",
                table = %self.table,
                "Insert succeeded but returned no rows"
            );
            return Err(StorageError::NoDataReturned.into());
        };

        serde_json::from_value::<Movie>(row).map_err(|e| {
            error!(
                event = "movies.create.decode_failed",
                error = %e,
                "Inserted row does not look like a movie"
            );
            StorageError::CreateFailed.into()
        })
    }

    /// Returns every stored movie. A missing payload is an empty list.
    pub async fn list_movies(&self) -> Result<Vec<Movie>, MoviesError> {
        let db = self.handle("movies.list.gateway_unavailable").await?;

        let rows = db
            .query(&self.table, Operation::SelectAll)
            .await
            .map_err(|e| {
                error!(
                    event = "movies.list.fetch_failed",
                    error = %e,
                    "Failed to fetch movies"
                );
                StorageError::FetchFailed
            })?;

        let Some(rows) = rows else {
            debug!(event = "movies.list.empty_payload", table = %self.table);
            return Ok(Vec::new());
        };

        rows.into_iter()
            .map(serde_json::from_value::<Movie>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                error!(
                    event = "movies.list.decode_failed",
                    error = %e,
                    "Stored row does not look like a movie"
                );
                StorageError::FetchFailed.into()
            })
    }
}
