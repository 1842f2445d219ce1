//! HTTP-backed model capabilities.
//!
//! The models themselves live behind an inference endpoint; these clients
//! only speak its small JSON contract. The per-invocation timeout lives
//! here, on the client, so every call is independently bounded.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::summarizer::capability::{ImageCaptioner, SummarizeError, TextSummarizer};

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    text: &'a str,
    max_words: usize,
}

#[derive(Deserialize)]
struct SummarizeResponse {
    summary: String,
}

#[derive(Deserialize)]
struct CaptionResponse {
    caption: String,
}

fn build_client(timeout_secs: u64) -> Result<Client, SummarizeError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| SummarizeError::Model(e.to_string()))
}

fn map_send_error(err: reqwest::Error) -> SummarizeError {
    if err.is_timeout() {
        SummarizeError::Timeout
    } else {
        SummarizeError::Model(err.to_string())
    }
}

/// Text summarization over a JSON POST endpoint.
pub struct HttpSummarizer {
    endpoint: String,
    client: Client,
}

impl HttpSummarizer {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, SummarizeError> {
        Ok(Self {
            endpoint: endpoint.into(),
            client: build_client(timeout_secs)?,
        })
    }
}

#[async_trait]
impl TextSummarizer for HttpSummarizer {
    async fn summarize(&self, text: &str, max_words: usize) -> Result<String, SummarizeError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SummarizeRequest { text, max_words })
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            return Err(SummarizeError::Model(format!(
                "endpoint returned {}",
                response.status()
            )));
        }

        let body: SummarizeResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::Model(e.to_string()))?;
        Ok(body.summary)
    }
}

/// Image captioning over the same endpoint style; the image goes up as raw
/// JPEG bytes.
pub struct HttpCaptioner {
    endpoint: String,
    client: Client,
}

impl HttpCaptioner {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, SummarizeError> {
        Ok(Self {
            endpoint: endpoint.into(),
            client: build_client(timeout_secs)?,
        })
    }
}

#[async_trait]
impl ImageCaptioner for HttpCaptioner {
    async fn caption(&self, jpeg: &[u8]) -> Result<String, SummarizeError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
            .body(jpeg.to_vec())
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            return Err(SummarizeError::Model(format!(
                "endpoint returned {}",
                response.status()
            )));
        }

        let body: CaptionResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::Model(e.to_string()))?;
        Ok(body.caption)
    }
}
