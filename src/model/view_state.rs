use tracing::{error, warn};

use crate::error::{Error, ErrorKind};

/// What a primary view shows: a loading indicator, its data, or an error
/// message.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState<T> {
    #[default]
    Loading,
    Ready(T),
    Error(String),
}

impl<T> ViewState<T> {
    /// Logs the cause of a failed fetch and keeps only the user-facing
    /// message. Unreachable or failing servers are logged as warnings,
    /// anything else as errors.
    pub fn from_result(result: Result<T, Error>, message: &str) -> Self {
        match result {
            Ok(data) => ViewState::Ready(data),
            Err(e) => {
                match e.kind() {
                    ErrorKind::Transport => warn!("{}: {}", message, e),
                    ErrorKind::Parse
                    | ErrorKind::PartialData
                    | ErrorKind::Other => error!("{}: {}", message, e),
                }
                ViewState::Error(message.to_owned())
            },
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }
}
