//! Custom error types for the oracle

use thiserror::Error;

// Error codes are reported next to the risk bitmask, never inside it.
pub const API_FAIL: u16 = 200;
pub const INVALID_TOKEN: u16 = 201;
pub const LLM_FAIL: u16 = 202;
pub const GENERAL_FAIL: u16 = 255;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Invalid request: {field} - {reason}")]
    InvalidRequest {
        field: &'static str,
        reason: String,
    },

    #[error("Signal unavailable: {feed} - {message}")]
    SignalUnavailable {
        feed: &'static str,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    #[error("Classifier unavailable: {model} - {message}")]
    ClassifierUnavailable {
        model: String,
        message: String,
    },

    #[error("Malformed classifier response from {model}: {reason}")]
    MalformedClassifierResponse {
        model: String,
        reason: String,
    },

    #[error("Data parsing error: {context}")]
    DataParsing {
        context: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Signing failed: {message}")]
    Signing {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
    },
}

impl OracleError {
    pub fn signal(feed: &'static str, message: impl Into<String>, source: anyhow::Error) -> Self {
        OracleError::SignalUnavailable {
            feed,
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        OracleError::InvalidRequest {
            field,
            reason: reason.into(),
        }
    }

    /// Stable numeric code reported to callers in an `ErrorResponse`.
    pub fn error_code(&self) -> u16 {
        match self {
            OracleError::InvalidRequest { .. } => INVALID_TOKEN,
            OracleError::SignalUnavailable { .. } => API_FAIL,
            OracleError::ClassifierUnavailable { .. }
            | OracleError::MalformedClassifierResponse { .. } => LLM_FAIL,
            OracleError::DataParsing { .. }
            | OracleError::Signing { .. }
            | OracleError::Configuration { .. } => GENERAL_FAIL,
        }
    }
}

pub type OracleResult<T> = Result<T, OracleError>;
