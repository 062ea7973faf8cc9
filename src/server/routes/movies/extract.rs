use crate::error::MoviesError;
use crate::utils::logging::with_pretty_json_debug;
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use movies_schema::MovieCreateRequest;
use tracing::debug;

/// Decoded `POST /api/movies` body.
///
/// Decoding failures (bad JSON, wrong content type, wrong field types, unknown fields) become
/// `MoviesError::Validation` through `From<JsonRejection>`. Field rules are left to the write
/// path.
pub(crate) struct CreateMovieBody(pub(crate) MovieCreateRequest);

impl<S> FromRequest<S> for CreateMovieBody
where
    S: Send + Sync,
{
    type Rejection = MoviesError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<MovieCreateRequest>::from_request(req, &()).await?;

        with_pretty_json_debug(&body, |pretty_body| {
            debug!(body = %pretty_body, "[Movies] Extracted create request body");
        });

        Ok(CreateMovieBody(body))
    }
}
