//! Error taxonomy of the client side.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`ClientError`] failures.
pub type ClientResult<T> = Result<T, ClientError>;

/// Message shown when the server gave nothing better to display.
pub const GENERIC_FAILURE_MESSAGE: &str = "Đã có lỗi xảy ra, vui lòng thử lại sau.";

/// Failures of a call to the minigame service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the connection dropped.
    #[error("failed to reach `{path}`")]
    Network {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server refused the request with a 4xx status.
    #[error("request to `{path}` rejected with status {status}")]
    Rejected {
        path: String,
        status: StatusCode,
        /// `error` field of the response body, when present.
        message: Option<String>,
    },
    /// No usable session, or the server did not accept the token.
    #[error("not signed in or session expired")]
    Unauthorized,
    /// 5xx responses and payloads that could not be decoded.
    #[error("unexpected response from `{path}`: {detail}")]
    Unexpected { path: String, detail: String },
    /// The owning view was closed before the response arrived.
    #[error("view closed before the response arrived")]
    Cancelled,
}

impl ClientError {
    /// Text to show in a toast: the server message for rejections, a generic fallback otherwise.
    pub fn toast_message(&self) -> String {
        match self {
            ClientError::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Status code of a rejection.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for a 409 rejection (number taken, ticket already held, cap reached).
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(StatusCode::CONFLICT)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}
