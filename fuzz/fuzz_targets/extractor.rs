#![no_main]

use bytes::Bytes;
use chrono::Utc;
use libfuzzer_sys::fuzz_target;
use reqwest::{HeaderMap, StatusCode};
use url::Url;

use newsclip::extractor::ExtractionChain;
use newsclip::fetcher::types::FetchedPage;

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data).to_string();

    let page = FetchedPage {
        url_final: Url::parse("https://example.com").unwrap(),
        status: StatusCode::OK,
        headers: HeaderMap::new(),
        body_raw: Bytes::from(html.clone()),
        html,
        charset: "UTF-8".to_string(),
        fetched_at: Utc::now(),
    };

    // The chain should never panic regardless of input.
    let chain = ExtractionChain::standard(50);
    let _ = chain.extract(&page);
});
