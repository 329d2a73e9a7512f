use axum::http::StatusCode;
use thiserror::Error;

/// Failure of a call to the mood API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401 from the API. The client has already evicted the token and
    /// published the expiry.
    #[error("authentication required")]
    Unauthorized,

    #[error("request rejected with {status}")]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("invalid API base url: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// The server's own message when it sent one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Error returned by the frontend itself.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for AppError {}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins_over_fallback() {
        let err = ApiError::Rejected {
            status: StatusCode::BAD_REQUEST,
            message: Some("Email already in use".into()),
        };
        assert_eq!(err.user_message("Registration failed"), "Email already in use");

        let err = ApiError::Rejected {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };
        assert_eq!(err.user_message("Registration failed"), "Registration failed");
        assert_eq!(
            ApiError::Decode("eof".into()).user_message("Analyze failed"),
            "Analyze failed"
        );
    }
}
