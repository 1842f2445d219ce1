use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timeout")]
    Timeout,

    #[error("cancelled")]
    Cancelled,

    #[error("too many redirects")]
    RedirectLoop,

    #[error("http error {status}")]
    Http {
        status: reqwest::StatusCode,
        retriable: bool,
    },

    #[error("body too large ({0} bytes)")]
    BodyTooLarge(u64),

    #[error("unsupported content-type: {0}")]
    UnsupportedContentType(String),

    #[error("charset error: {0}")]
    Charset(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("unknown: {0}")]
    Unknown(String),
}

impl FetchError {
    /// Whether the runner should retry this fetch with backoff. Permanent
    /// failures (bad URL, oversized body, non-HTML content) drop the
    /// candidate immediately.
    pub fn should_retry(&self) -> bool {
        match self {
            Self::InvalidUrl(_)
            | Self::BodyTooLarge(_)
            | Self::UnsupportedContentType(_)
            | Self::Charset(_)
            | Self::Cancelled => false,
            Self::Http { retriable, .. } => *retriable,
            Self::Connect(_)
            | Self::Timeout
            | Self::RedirectLoop
            | Self::Io(_)
            | Self::Unknown(_) => true,
        }
    }

    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_redirect() {
            Self::RedirectLoop
        } else if let Some(status) = err.status() {
            Self::Http {
                status,
                retriable: status.is_server_error(),
            }
        } else if err.is_connect() || err.is_request() {
            Self::Connect(err.to_string())
        } else {
            Self::Unknown(err.to_string())
        }
    }
}
