use std::fmt;

/// Coarse classification of pipeline failures, used by the UI to pick a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    NetworkFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid input",
            ErrorKind::NotFound => "not found",
            ErrorKind::NetworkFailure => "network failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything that can go wrong between a typed location and a finished report.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Please enter a location")]
    InvalidInput,

    #[error("Location not found: {location}")]
    NotFound { location: String },

    #[error("Request to {endpoint} failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} responded with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to parse {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::InvalidInput => ErrorKind::InvalidInput,
            PipelineError::NotFound { .. } => ErrorKind::NotFound,
            PipelineError::Request { .. }
            | PipelineError::Status { .. }
            | PipelineError::Decode { .. } => ErrorKind::NetworkFailure,
        }
    }
}
