use std::path::PathBuf;

use thiserror::Error;

/// Failure modes of the scrape and report pipelines.
#[derive(Debug, Error)]
pub enum Error {
    #[error("transport error fetching {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed with status {status}")]
    RequestFailed { url: String, status: u16 },

    #[error("still rate-limited on {url} after {attempts} attempts")]
    RateLimitExceeded { url: String, attempts: u32 },

    #[error("failed to decode {context}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("no listing id found in url {0}")]
    IdNotFound(String),

    #[error("io error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
