//! Download and normalization of the selected candidate.
//!
//! Every article image is persisted as a single JPEG regardless of what the
//! site serves. Failures here degrade the article to "no image"; they never
//! fail the article itself.

use std::io::Cursor;

use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::ImageConfig;
use crate::fetcher::client::get_client;

const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024; // 10MB

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("download failed: {0}")]
    Download(String),

    #[error("image too large ({0} bytes)")]
    TooLarge(u64),

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("image too small ({width}x{height})")]
    TooSmall { width: u32, height: u32 },

    #[error("jpeg encode failed: {0}")]
    Encode(String),
}

/// Fetch the image bytes, decode whatever format the site serves, enforce
/// the pixel floor, and re-encode as JPEG.
#[instrument(skip_all, fields(url = %url))]
pub async fn download_and_normalize(url: &Url, config: &ImageConfig) -> Result<Vec<u8>, ImageError> {
    let response = get_client()
        .get(url.clone())
        .send()
        .await
        .map_err(|e| ImageError::Download(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ImageError::Download(format!(
            "http status {}",
            response.status()
        )));
    }
    if let Some(len) = response.content_length()
        && len > MAX_IMAGE_BYTES
    {
        return Err(ImageError::TooLarge(len));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ImageError::Download(e.to_string()))?;
    if bytes.len() as u64 > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge(bytes.len() as u64));
    }

    normalize_to_jpeg(&bytes, config)
}

/// Decode and re-encode as JPEG. Split from the download so tests can feed
/// bytes directly.
pub fn normalize_to_jpeg(bytes: &[u8], config: &ImageConfig) -> Result<Vec<u8>, ImageError> {
    let decoded = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImageError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    let (width, height) = (decoded.width(), decoded.height());
    if width < config.min_width || height < config.min_height {
        return Err(ImageError::TooSmall { width, height });
    }

    // JPEG has no alpha channel; flatten before encoding.
    let rgb = image::DynamicImage::ImageRgb8(decoded.to_rgb8());
    let mut jpeg = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(jpeg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageConfig;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::new(width, height));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn normalizes_png_to_jpeg() {
        let config = ImageConfig::default();
        let jpeg = normalize_to_jpeg(&png_bytes(320, 240), &config).unwrap();
        let reread = image::ImageReader::new(Cursor::new(&jpeg))
            .with_guessed_format()
            .unwrap();
        assert_eq!(reread.format(), Some(image::ImageFormat::Jpeg));
    }

    #[test]
    fn rejects_undersized_after_decode() {
        let config = ImageConfig::default();
        let result = normalize_to_jpeg(&png_bytes(16, 16), &config);
        assert!(matches!(result, Err(ImageError::TooSmall { .. })));
    }

    #[test]
    fn rejects_garbage_bytes() {
        let config = ImageConfig::default();
        let result = normalize_to_jpeg(b"definitely not an image", &config);
        assert!(matches!(result, Err(ImageError::Decode(_))));
    }
}
