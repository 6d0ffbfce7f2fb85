use ayura_core::DashboardError;
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("not signed in")]
    NotAuthenticated,
    #[error("session expired or was revoked")]
    Unauthorized,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("failed to build HTTP client: {0}")]
    Build(reqwest::Error),
    #[error("request failed: {0}")]
    Network(reqwest::Error),
    #[error("could not assemble request: {0}")]
    Request(reqwest::Error),
    #[error("'{0}' is not a usable record id")]
    InvalidId(String),
    #[error("server responded {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("unexpected response body: {0}")]
    Decode(serde_json::Error),
    #[error("invalid endpoint path: {0}")]
    Url(#[from] url::ParseError),
    #[error("session storage error: {0}")]
    Session(#[from] DashboardError),
}

impl ClientError {
    /// Whether retrying the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(_) => true,
            ClientError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }

    /// Whether the user has to sign in (again) before retrying.
    pub fn needs_login(&self) -> bool {
        matches!(
            self,
            ClientError::NotAuthenticated | ClientError::Unauthorized
        )
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
