use teloxide::RequestError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SalesBotError {
    #[error("Storage error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] RequestError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheet sink error: {message}")]
    Sheet { message: String },

    #[error("Parser error: {message}")]
    Parser { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),
}

pub type Result<T> = std::result::Result<T, SalesBotError>;

impl SalesBotError {
    pub fn parser_error(message: impl Into<String>) -> Self {
        Self::Parser {
            message: message.into(),
        }
    }

    pub fn sheet_error(message: impl Into<String>) -> Self {
        Self::Sheet {
            message: message.into(),
        }
    }

    /// Transient faults worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SalesBotError::Telegram(_)
                | SalesBotError::Http(_)
                | SalesBotError::Sheet { .. }
                | SalesBotError::Io(_)
        )
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SalesBotError::Config(_) => ErrorSeverity::Critical,
            SalesBotError::Env(_) => ErrorSeverity::Critical,
            SalesBotError::Csv(_) => ErrorSeverity::High,
            SalesBotError::Telegram(_) => ErrorSeverity::Medium,
            SalesBotError::Http(_) => ErrorSeverity::Medium,
            SalesBotError::Sheet { .. } => ErrorSeverity::Medium,
            SalesBotError::Io(_) => ErrorSeverity::Medium,
            SalesBotError::Parser { .. } => ErrorSeverity::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Low => write!(f, "LOW"),
            ErrorSeverity::Medium => write!(f, "MEDIUM"),
            ErrorSeverity::High => write!(f, "HIGH"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
