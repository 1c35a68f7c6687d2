use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ImageError {
    #[error("network error fetching image: {0}")]
    Net(String),

    #[error("io error writing image: {0}")]
    Io(String),

    #[error("content type {found:?} is not in the allowed set {allowed:?}")]
    DisallowedContentType {
        found: Option<String>,
        allowed: Vec<String>,
    },

    #[error("response body of {actual} bytes exceeds the configured limit of {limit} bytes")]
    TooLarge { actual: u64, limit: u64 },

    #[error("download was cancelled")]
    Cancelled,
}

impl From<netclient::NetError> for ImageError {
    fn from(err: netclient::NetError) -> Self {
        ImageError::Net(err.to_string())
    }
}

impl From<std::io::Error> for ImageError {
    fn from(err: std::io::Error) -> Self {
        ImageError::Io(err.to_string())
    }
}

impl ImageError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ImageError::Net(_) | ImageError::Io(_))
    }
}
