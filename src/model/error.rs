use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid quarter: {0} (must be Q1, Q2, Q3, or Q4)")]
    InvalidQuarter(String),

    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} rejected the credentials (status {status})")]
    Auth {
        service: &'static str,
        status: StatusCode,
    },

    #[error("{service} API error (status {status}): {body}")]
    UnexpectedStatus {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("decoding {service} response: {message}\nResponse preview: {preview}")]
    Decode {
        service: &'static str,
        message: String,
        preview: String,
    },

    #[error("{service} reported {total} results but only {returned} could be fetched")]
    IncompleteResult {
        service: &'static str,
        returned: usize,
        total: usize,
    },

    #[error("invalid config: {0}")]
    Config(String),

    #[error("associate '{0}' not found in config file")]
    UnknownAssociate(String),

    #[error("parsing config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

const PREVIEW_LEN: usize = 200;

impl Error {
    pub fn transport(service: &'static str, source: reqwest::Error) -> Self {
        Error::Transport { service, source }
    }

    /// Maps a non-success status to `Auth` or `UnexpectedStatus`.
    pub fn from_status(service: &'static str, status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Auth { service, status },
            _ => Error::UnexpectedStatus {
                service,
                status,
                body: preview(&body),
            },
        }
    }

    pub fn decode(service: &'static str, err: serde_json::Error, body: &str) -> Self {
        Error::Decode {
            service,
            message: err.to_string(),
            preview: preview(body),
        }
    }

    /// Per-associate errors are skipped; everything else aborts the run.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Error::Transport { .. }
                | Error::Auth { .. }
                | Error::UnexpectedStatus { .. }
                | Error::Decode { .. }
                | Error::IncompleteResult { .. }
        )
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > PREVIEW_LEN {
        let cut: String = body.chars().take(PREVIEW_LEN).collect();
        format!("{cut}...")
    } else {
        body.to_string()
    }
}
