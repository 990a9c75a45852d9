use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("rejected by server ({status}): {body}")]
    Validation { status: StatusCode, body: String },

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed session file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification used by callers that only care about how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Auth,
    Validation,
    Local,
}

impl CatalogError {
    /// A refused save: field errors are validation, anything else is a status failure.
    pub fn rejected(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                CatalogError::Validation { status, body }
            }
            _ => CatalogError::Status { status, body },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Request(_) | CatalogError::Status { .. } => ErrorKind::Network,
            CatalogError::Auth(_) => ErrorKind::Auth,
            CatalogError::Validation { .. } => ErrorKind::Validation,
            CatalogError::Url(_) | CatalogError::Io(_) | CatalogError::Json(_) => ErrorKind::Local,
        }
    }
}
