use reqwest::StatusCode;
use thiserror::Error as ThisError;

/// Failure reported by (or while talking to) the remote database service.
#[derive(Debug, ThisError)]
pub enum RemoteError {
    /// The service answered with a non-success status.
    #[error("Supabase rejected the request ({status}): {message}")]
    Rejected {
        status: StatusCode,
        code: Option<String>,
        message: String,
    },

    /// Transport-level failure before a response status arrived (DNS, connect, timeouts, etc).
    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response status arrived but its body could not be read.
    #[error("Unreadable response body ({status}): {source}")]
    Body {
        status: StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected response payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl RemoteError {
    /// Text of the failure as the service phrased it, used for error-text heuristics.
    pub fn message(&self) -> String {
        match self {
            RemoteError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the service refused the request or never answered it.
    ///
    /// False once a success status has been seen: the write may already be stored.
    pub fn is_refusal(&self) -> bool {
        match self {
            RemoteError::Rejected { .. } | RemoteError::Transport(_) => true,
            RemoteError::Body { status, .. } => !status.is_success(),
            RemoteError::Payload(_) | RemoteError::Url(_) => false,
        }
    }
}
