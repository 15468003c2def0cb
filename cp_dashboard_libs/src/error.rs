use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    MissingParameter(String),
    #[error("{0}")]
    NotFound(String),
    #[error("upstream unavailable: {message}")]
    UpstreamUnavailable { status: Option<u16>, message: String },
    #[error("invalid upstream response structure: {0}")]
    InvalidShape(String),
    #[error("{0}")]
    Configuration(String),
}

impl FetchError {
    pub fn unavailable(message: impl ToString) -> Self {
        FetchError::UpstreamUnavailable {
            status: None,
            message: message.to_string(),
        }
    }

    /// HTTP status code the error is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            FetchError::MissingParameter(_) => 400,
            FetchError::NotFound(_) => 404,
            FetchError::UpstreamUnavailable { .. } => 500,
            FetchError::InvalidShape(_) => 500,
            FetchError::Configuration(_) => 500,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::UpstreamUnavailable {
            status: err.status().map(|status| status.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::InvalidShape(err.to_string())
    }
}

impl From<validator::ValidationErrors> for FetchError {
    fn from(err: validator::ValidationErrors) -> Self {
        FetchError::InvalidShape(err.to_string().replace('\n', ", "))
    }
}
