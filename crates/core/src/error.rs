use thiserror::Error;

/// Shown when the backend gave no usable explanation for a failure.
pub const DEFAULT_ERROR_MESSAGE: &str = "Failed to fetch results. Ensure backend is running.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("search endpoint returned {status}")]
    Server { status: u16, message: Option<String> },

    #[error("malformed response payload: {0}")]
    MalformedPayload(String),
}

impl ClientError {
    /// The `error` string the server put in its payload, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn user_message(&self) -> String {
        resolve_error_message(self.server_message())
    }
}

/// Picks the text for the error banner: a non-empty server message wins,
/// anything else falls back to [`DEFAULT_ERROR_MESSAGE`].
pub fn resolve_error_message(server_message: Option<&str>) -> String {
    match server_message {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => DEFAULT_ERROR_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_takes_precedence() {
        assert_eq!(
            resolve_error_message(Some("index unavailable")),
            "index unavailable"
        );
    }

    #[test]
    fn missing_or_blank_message_falls_back_to_default() {
        assert_eq!(resolve_error_message(None), DEFAULT_ERROR_MESSAGE);
        assert_eq!(resolve_error_message(Some("")), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn only_server_errors_carry_a_message() {
        let server = ClientError::Server {
            status: 503,
            message: Some("index unavailable".to_string()),
        };
        assert_eq!(server.user_message(), "index unavailable");

        let malformed = ClientError::MalformedPayload("expected `results`".to_string());
        assert_eq!(malformed.server_message(), None);
        assert_eq!(malformed.user_message(), DEFAULT_ERROR_MESSAGE);
    }
}
