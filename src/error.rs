use bigdecimal::ParseBigDecimalError as BIG_DECIMAL_ERROR;
use reqwest::Error as REQWEST_ERROR;
use serde_json::Error as JSON_ERROR;
use std::io::Error as IO_ERROR;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR;
use url::ParseError as URL_ERROR;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    URL(#[from] URL_ERROR),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("{0}")]
    BigDecimalError(#[from] BIG_DECIMAL_ERROR),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("{0}")]
    JsonError(#[from] JSON_ERROR),

    #[error("{0}")]
    ReqwestError(#[from] REQWEST_ERROR),

    #[error("Request to {url} failed with status {status}")]
    HttpStatus { status: u16, url: String },

    #[error("Parse message error: {0}")]
    ParseMessage(String),

    #[error("Decode datetime: {0}")]
    DecodeDateTimeError(String),

    #[error("Partial data: {0}")]
    PartialData(String),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),

    #[error("Invalid option {option}")]
    InvalidOption { option: String },

    #[error("{0}")]
    ViewFailed(String),
}

/// Coarse classification used when deciding how a failure surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Parse,
    PartialData,
    Other,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ReqwestError(e) if e.is_decode() => ErrorKind::Parse,
            Error::ReqwestError(_) | Error::HttpStatus { .. } => {
                ErrorKind::Transport
            },
            Error::JsonError(_)
            | Error::ParseMessage(_)
            | Error::DecodeDateTimeError(_)
            | Error::BigDecimalError(_) => ErrorKind::Parse,
            Error::PartialData(_) => ErrorKind::PartialData,
            _ => ErrorKind::Other,
        }
    }
}
