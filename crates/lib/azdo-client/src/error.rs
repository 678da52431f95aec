use thiserror::Error;

/// Failure to produce an access token from any configured credential source.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("credential source unavailable: {0}")]
    Unavailable(String),

    #[error("Azure CLI token request failed: {0}")]
    Cli(String),

    #[error("token endpoint request failed: {0}")]
    Endpoint(String),

    #[error("malformed token response: {0}")]
    Malformed(String),

    #[error("no credential source produced an Azure DevOps token: {0}")]
    ChainExhausted(String),
}

/// Failure of a single call against the Azure DevOps REST surface.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },

    #[error("{method} {url} returned HTTP {status}: {body}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },
}

impl ClientError {
    /// HTTP status of the failed call, when the service answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Encode(_) | Self::Transport { .. } => None,
        }
    }
}
