use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use movies_schema::MessageBody;
use thiserror::Error as ThisError;

use super::{GatewayError, ValidationError};

/// Remote operation failed after any applicable fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum StorageError {
    #[error("no data returned")]
    NoDataReturned,

    #[error("failed to create movie")]
    CreateFailed,

    #[error("failed to fetch movies")]
    FetchFailed,
}

/// Error returned by the movie read/write paths and rendered by the HTTP layer.
#[derive(Debug, ThisError)]
pub enum MoviesError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl MoviesError {
    pub fn status(&self) -> StatusCode {
        match self {
            MoviesError::Validation(_) => StatusCode::BAD_REQUEST,
            MoviesError::Gateway(_) | MoviesError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for MoviesError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(
            event = "movies.request.rejected",
            debug_message = %rejection.body_text(),
            "Request body could not be decoded"
        );
        let message = match rejection {
            JsonRejection::JsonSyntaxError(_) => "invalid JSON".to_string(),
            JsonRejection::MissingJsonContentType(_) => {
                "expected `Content-Type: application/json`".to_string()
            }
            JsonRejection::BytesRejection(_) => "failed to read request body".to_string(),
            other => other.body_text(),
        };
        MoviesError::Validation(ValidationError::Malformed(message))
    }
}

impl IntoResponse for MoviesError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(MessageBody::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: MoviesError) -> (StatusCode, MessageBody) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let body = serde_json::from_slice(&bytes).expect("body was not a message object");
        (status, body)
    }

    #[tokio::test]
    async fn validation_errors_render_as_400() {
        let (status, body) = render(ValidationError::TitleRequired.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "title required");
    }

    #[tokio::test]
    async fn configuration_errors_name_missing_settings_only() {
        let err = GatewayError::Configuration {
            missing: vec!["SUPABASE_URL", "SUPABASE_SERVICE_KEY"],
        };
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body.message,
            "Missing required Supabase configuration: SUPABASE_URL, SUPABASE_SERVICE_KEY"
        );
    }

    #[tokio::test]
    async fn storage_errors_render_as_500() {
        let (status, body) = render(StorageError::FetchFailed.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "failed to fetch movies");
    }
}
