pub mod app_config;
pub mod payment;
pub mod session;

pub use app_config::{BookingRules, Config};
pub use payment::{PaymentMethod, PaymentStatus};
pub use session::{ProfileUpdate, Session, SessionManager, UserProfile};

use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid session token: {0}")]
    InvalidToken(String),
    #[error("Session expired at {0}")]
    SessionExpired(DateTime<Utc>),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid booking rules: {0}")]
    InvalidRules(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
