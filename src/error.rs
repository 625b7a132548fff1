use reqwest::StatusCode;
use std::{fmt, io, path::PathBuf};
use thiserror::Error;

/// The request of the upload chain an error happened in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Login,
    CreateUpload,
    Upload,
    Confirm,
}
impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = match self {
            Step::Login => "login",
            Step::CreateUpload => "get upload url",
            Step::Upload => "upload file",
            Step::Confirm => "confirm upload",
        };
        write!(f, "{}", result)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to {step}: {source}")]
    Transport {
        step: Step,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to {step}: {status}")]
    Status { step: Step, status: StatusCode },
    #[error("Failed to {step}: unexpected response: {body}")]
    Decode {
        step: Step,
        #[source]
        source: serde_json::Error,
        body: String,
    },
    #[error("Failed to open file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Invalid configuration: {0}")]
    Config(#[from] envy::Error),
    #[error("Token is not a valid header value")]
    InvalidToken,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The step of the upload chain that failed, `None` for local errors.
    pub fn step(&self) -> Option<Step> {
        match self {
            Error::Transport { step, .. } | Error::Status { step, .. } | Error::Decode { step, .. } => {
                Some(*step)
            }
            Error::Io { .. } => Some(Step::Upload),
            Error::Client(_) | Error::Config(_) | Error::InvalidToken => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
