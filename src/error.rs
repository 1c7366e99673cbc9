use serde::{Deserialize, Serialize};

/// Failure of a call against the DevSpace REST backend.
///
/// Every variant is cheap to clone so results can be stored in signals and
/// shown by several views at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a usable HTTP response.
    #[error("network error: {0}")]
    Transport(String),
    /// The backend answered with a non-zero status code in the envelope.
    #[error("{msg} (code {code})")]
    Application { code: i32, msg: String },
    /// The session is missing or expired.
    #[error("not logged in")]
    NotAuthenticated,
    /// The envelope was a success but its payload was unusable.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    #[inline]
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, ApiError::NotAuthenticated)
    }

    /// Text suitable for a transient inline notice.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Application { msg, .. } if !msg.trim().is_empty() => msg.clone(),
            ApiError::Application { .. } => "Unknown error".into(),
            ApiError::Transport(msg) | ApiError::Decode(msg) => msg.clone(),
            ApiError::NotAuthenticated => "Please log in first".into(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::Transport(format!("invalid url: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_backend_text() {
        let err = ApiError::Application {
            code: 100_001,
            msg: "content too long".into(),
        };
        assert_eq!(err.user_message(), "content too long");

        let blank = ApiError::Application {
            code: 100_001,
            msg: "  ".into(),
        };
        assert_eq!(blank.user_message(), "Unknown error");
    }

    #[test]
    fn only_session_errors_are_not_authenticated() {
        assert!(ApiError::NotAuthenticated.is_not_authenticated());
        assert!(!ApiError::Transport("offline".into()).is_not_authenticated());
    }
}
