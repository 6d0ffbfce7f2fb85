#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid configuration value for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },
    #[error("invalid API base URL: {0}")]
    InvalidApiUrl(url::ParseError),

    #[error("failed to create session directory: {0}")]
    SessionDirCreation(std::io::Error),
    #[error("failed to read session file: {0}")]
    SessionRead(std::io::Error),
    #[error("failed to write session file: {0}")]
    SessionWrite(std::io::Error),
    #[error("failed to remove session file: {0}")]
    SessionRemove(std::io::Error),
    #[error("failed to serialize session: {0}")]
    SessionSerialization(serde_json::Error),
    #[error("failed to deserialize session: {0}")]
    SessionDeserialization(serde_json::Error),

    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },
    #[error("{field} is too long (max {max} characters)")]
    FieldTooLong { field: &'static str, max: usize },
    #[error("{field} must be a finite, non-negative amount")]
    InvalidAmount { field: &'static str },
    #[error("discounted price {discounted} exceeds price {price}")]
    DiscountAbovePrice { price: f64, discounted: f64 },
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),
}

pub type DashboardResult<T> = std::result::Result<T, DashboardError>;
