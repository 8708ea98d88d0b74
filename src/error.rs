//! Error types for vkdl.
//!
//! Errors fall into a few groups that map onto the stages of a run:
//!
//! - [`Error::Authentication`] - the login flow failed; carries the [`AuthStage`]
//!   it failed in so the CLI can tell the user where things went wrong
//! - [`Error::Api`] - the method endpoint reported an error or answered with a
//!   payload of unknown shape
//! - [`Error::Http`] / [`Error::Status`] - transport failures and unexpected
//!   HTTP status codes
//! - [`Error::Filesystem`] - local write failures while saving a track
//! - [`Error::Config`] - missing or invalid configuration values
//!
//! Authentication and API errors abort a run. Download errors are recorded
//! per track in the [`DownloadReport`](crate::types::DownloadReport).

use std::{fmt, io, path::PathBuf};

use reqwest::StatusCode;
use thiserror::Error;

/// Step of the login flow an [`Error::Authentication`] originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    AuthorizationPage,
    FormScraping,
    FormSubmission,
    TokenExtraction,
}

impl fmt::Display for AuthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            AuthStage::AuthorizationPage => "authorization page fetch",
            AuthStage::FormScraping => "login form scraping",
            AuthStage::FormSubmission => "login form submission",
            AuthStage::TokenExtraction => "token extraction",
        };
        f.write_str(stage)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("authentication failed during {stage}: {message}")]
    Authentication { stage: AuthStage, message: String },

    #[error("API error: {message}")]
    Api { code: Option<i64>, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    Status { url: String, status: StatusCode },

    #[error("cannot write {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn auth(stage: AuthStage, message: impl Into<String>) -> Self {
        Error::Authentication {
            stage,
            message: message.into(),
        }
    }

    pub fn api(message: impl Into<String>) -> Self {
        Error::Api {
            code: None,
            message: message.into(),
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Filesystem {
            path: path.into(),
            source,
        }
    }
}
