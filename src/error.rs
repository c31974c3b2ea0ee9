//! Error handling for the explorer core
//!
//! Library code returns [`ExplorerError`]; binaries wrap it in `anyhow` with context.

use thiserror::Error;

/// Main error type for the explorer core
#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("HTTP transport error on {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API error {status} on {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Request to {endpoint} timed out after {seconds}s")]
    Timeout { endpoint: String, seconds: u64 },

    #[error("Malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid API base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid value '{value}' for filter '{key}'")]
    InvalidFilter { key: String, value: String },

    #[error("Unknown filter key '{0}'")]
    UnknownFilterKey(String),

    #[error("Unknown location region '{0}'")]
    UnknownRegion(String),

    #[error("Option {id} for '{dimension}' is not in the loaded catalog")]
    UnknownOption { dimension: String, id: String },

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Unknown language code '{0}'")]
    UnknownLanguage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ExplorerError {
    /// True for failures raised while talking to the API
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ExplorerError::Transport { .. }
                | ExplorerError::Status { .. }
                | ExplorerError::Timeout { .. }
                | ExplorerError::Decode { .. }
        )
    }

    /// Short message suitable for an inline error banner
    pub fn user_message(&self) -> String {
        match self {
            ExplorerError::Transport { .. } | ExplorerError::Timeout { .. } => {
                "Unable to reach the data service. Please retry.".to_string()
            }
            ExplorerError::Status { status, .. } => {
                format!("The data service returned an error ({status}). Please retry.")
            }
            ExplorerError::Decode { .. } => {
                "The data service returned an unexpected response.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
