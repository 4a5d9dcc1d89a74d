use http::StatusCode;

use crate::ContentError;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Invalid comment: {0}")]
    Validation(#[from] ContentError),

    #[error("Not logged in")]
    Unauthenticated(Option<String>),

    #[error("Permission denied")]
    PermissionDenied(Option<String>),

    #[error("Not found")]
    NotFound(Option<String>),

    #[error("Server error {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Server {
        status: u16,
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(String),
}

impl Error {
    /// Builds the error for a non-success response
    pub fn from_response(status: StatusCode, body: &[u8]) -> Error {
        match status {
            StatusCode::UNAUTHORIZED => Error::Unauthenticated(parse_message(body)),
            StatusCode::FORBIDDEN => Error::PermissionDenied(parse_message(body)),
            StatusCode::NOT_FOUND => Error::NotFound(parse_message(body)),
            _ => Error::Server {
                status: status.as_u16(),
                message: parse_message(body),
            },
        }
    }

    /// Human-readable message provided by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Unauthenticated(message)
            | Error::PermissionDenied(message)
            | Error::NotFound(message)
            | Error::Server { message, .. } => message.as_deref(),
            Error::Validation(_) | Error::Network(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

fn parse_message(body: &[u8]) -> Option<String> {
    let data: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| data.get(key).and_then(|m| m.as_str()))
        .filter(|m| !m.trim().is_empty())
        .map(String::from)
}
