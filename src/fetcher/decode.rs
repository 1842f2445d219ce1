//! Charset detection and decoding of fetched bodies.
//!
//! Detection order: Content-Type header, then `<meta>` declarations in the
//! first 4KB of the body, then a chardetng guess over the same window.

use crate::fetcher::errors::FetchError;
use encoding_rs::Encoding;
use regex::Regex;
use std::sync::LazyLock;

// Window of the body inspected for <meta> charset declarations.
const SNIFF_BYTES: usize = 4096;

static HEADER_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

/// Decode a response body to UTF-8, returning the text and the label of the
/// encoding it was decoded from.
pub fn decode_body(content_type: &str, body: &[u8]) -> Result<(String, String), FetchError> {
    let encoding = sniff_encoding(content_type, body);
    let (decoded, actual, had_errors) = encoding.decode(body);
    if had_errors {
        return Err(FetchError::Charset(format!(
            "body is not valid {}",
            actual.name()
        )));
    }
    Ok((decoded.into_owned(), actual.name().to_string()))
}

fn sniff_encoding(content_type: &str, body: &[u8]) -> &'static Encoding {
    if let Some(enc) = label_from(&HEADER_CHARSET, content_type) {
        return enc;
    }

    let window = &body[..body.len().min(SNIFF_BYTES)];
    let window_str = String::from_utf8_lossy(window);
    for re in [&*META_CHARSET, &*META_HTTP_EQUIV] {
        if let Some(enc) = label_from(re, &window_str) {
            return enc;
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(window, false);
    detector.guess(None, true)
}

fn label_from(re: &Regex, haystack: &str) -> Option<&'static Encoding> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .and_then(|label| Encoding::for_label(label.as_str().trim().as_bytes()))
}
