use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username or email already exists")]
    DuplicateAccount,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotAuthenticated(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("{0}")]
    InvalidQuery(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    FetchFailed(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    StorageError(#[from] anyhow::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, FinderError>;
