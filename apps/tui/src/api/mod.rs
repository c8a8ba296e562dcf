pub mod client;
pub mod models;

pub use client::{load_observations, ApiClient};

/// Errors from the backend API boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with an error payload (`{"error": …}`).
    #[error("{0}")]
    Rejected(String),

    #[error("unexpected status {status} from {endpoint}")]
    Status {
        endpoint: &'static str,
        status: u16,
    },

    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not read {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
