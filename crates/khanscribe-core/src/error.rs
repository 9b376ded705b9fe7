use thiserror::Error;

#[derive(Error, Debug)]
pub enum KhanscribeError {
    #[error("Request to {url} returned {status}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("Subject {subject} has {available} unused videos, {requested} requested")]
    ExhaustedPopulation {
        subject: String,
        requested: usize,
        available: usize,
    },

    #[error("Not a video slug: {slug}")]
    InvalidVideoSlug { slug: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, KhanscribeError>;
