use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
    #[error("failed to parse body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    File {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    /// HTTP status of an error response, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// One snapshot family that could not be loaded and was replaced by its
/// empty default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{family}: {message}")]
pub struct UpstreamError {
    pub family: &'static str,
    pub message: String,
}
