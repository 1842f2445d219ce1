use crate::fetcher::{decode::decode_body, errors::FetchError, types::FetchedPage};
use chrono::Utc;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::instrument;
use url::Url;

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const USER_AGENT: &str = "newsclip/0.1 (+https://github.com/newsclip/newsclip)";

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .default_headers({
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                    .parse()
                    .unwrap(),
            );
            headers
        })
        .build()
        .expect("Failed to build HTTP client")
});

pub fn get_client() -> &'static Client {
    &HTTP_CLIENT
}

/// Fetch an HTML page and decode its body to UTF-8.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch(url: &Url) -> Result<FetchedPage, FetchError> {
    let response = HTTP_CLIENT
        .get(url.clone())
        .send()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    if let Some(content_length) = response.content_length()
        && content_length > MAX_BODY_SIZE
    {
        return Err(FetchError::BodyTooLarge(content_length));
    }

    let url_final = response.url().clone();
    let status = response.status();
    let headers = response.headers().clone();

    if !status.is_success() {
        return Err(FetchError::Http {
            status,
            retriable: status.is_server_error(),
        });
    }

    let content_type = headers
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or("text/html")
        .to_string();

    if !content_type.contains("text/html") && !content_type.contains("application/xhtml") {
        return Err(FetchError::UnsupportedContentType(content_type));
    }

    let body_raw = response
        .bytes()
        .await
        .map_err(|e| FetchError::Io(e.to_string()))?;

    // Content-Length may have been absent; enforce the cap on the real body.
    if body_raw.len() as u64 > MAX_BODY_SIZE {
        return Err(FetchError::BodyTooLarge(body_raw.len() as u64));
    }

    let (html, charset) = decode_body(&content_type, &body_raw)?;

    Ok(FetchedPage {
        url_final,
        status,
        headers,
        body_raw,
        html,
        charset,
        fetched_at: Utc::now(),
    })
}
