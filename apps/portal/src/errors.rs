use thiserror::Error;

/// Client-level error type.
/// Every variant is terminal for the single user action that raised it; none of
/// them alter the role state of the session.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Form error: {0}")]
    Form(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type PortalResult<T> = Result<T, PortalError>;

impl PortalError {
    /// The text shown in the shared message area.
    ///
    /// Transport and server-reported failures are not distinguished for display.
    pub fn user_message(&self) -> String {
        match self {
            PortalError::Http(e) if e.is_timeout() => "The server did not respond in time".to_string(),
            PortalError::Http(e) if e.is_connect() => "Could not reach the placement server".to_string(),
            PortalError::Http(e) => e.to_string(),
            PortalError::Api { message, .. } => message.clone(),
            PortalError::NotFound(msg) => msg.clone(),
            PortalError::Parse(_) => "The server sent a response that could not be read".to_string(),
            PortalError::Form(msg) | PortalError::InvalidInput(msg) => msg.clone(),
        }
    }

    /// True when the failure was reported by the server rather than the transport.
    pub fn is_server_reported(&self) -> bool {
        matches!(self, PortalError::Api { .. } | PortalError::NotFound(_))
    }
}
