// ================================================================
// File: budbot-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The listing could not be fetched (network failure or non-2xx status).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A single listing row did not have the expected shape.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The notification sink rejected the message or the subscriber is unreachable.
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// True for the error kinds a monitoring cycle recovers from on its own.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Http(_)
                | Error::Transport(_)
                | Error::Extraction(_)
                | Error::Dispatch(_)
        )
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Parse(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Parse(s.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Self {
        Error::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_kinds() {
        assert!(Error::Transport("503".into()).is_recoverable());
        assert!(Error::Dispatch("dm closed".into()).is_recoverable());
        assert!(!Error::Persistence("disk full".into()).is_recoverable());
        assert!(!Error::InvalidInput("blank keyword".into()).is_recoverable());
    }

    #[test]
    fn test_string_conversions_become_parse_errors() {
        let e: Error = "bad".into();
        assert!(matches!(e, Error::Parse(ref s) if s == "bad"));
        let e: Error = "x".parse::<u32>().unwrap_err().into();
        assert!(matches!(e, Error::Parse(_)));
    }
}
