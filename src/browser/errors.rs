use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("no element matches {0:?}")]
    NotFound(String),

    #[error("element for {0:?} went stale")]
    StaleElement(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("browser protocol error: {0}")]
    Protocol(String),
}

impl BrowserError {
    pub fn should_retry(&self) -> bool {
        match self {
            // The session is unusable
            Self::Launch(_) => false,
            Self::Protocol(_) => false,

            // Page was not in the expected state yet
            Self::NotFound(_) => true,
            Self::StaleElement(_) => true,
            Self::Navigation { .. } => true,
            Self::Timeout(_) => true,
        }
    }
}
