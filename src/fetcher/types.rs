use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::{StatusCode, header::HeaderMap};
use url::Url;

/// A fetched page, immutable once built. Owned by the pipeline run that
/// fetched it and discarded after extraction and image gathering.
#[derive(Debug)]
pub struct FetchedPage {
    /// URL after redirects.
    pub url_final: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body_raw: Bytes,
    /// Body decoded to UTF-8.
    pub html: String,
    /// Label of the encoding the body was decoded from.
    pub charset: String,
    pub fetched_at: DateTime<Utc>,
}

impl FetchedPage {
    /// Host component of the final URL, if any. Used for per-host politeness.
    pub fn host(&self) -> Option<&str> {
        self.url_final.host_str()
    }
}
