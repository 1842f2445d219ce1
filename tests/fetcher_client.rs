use newsclip::fetcher::{FetchError, fetch};
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn url(base: &str, p: &str) -> Url {
    Url::parse(&format!("{}{}", base, p)).unwrap()
}

#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(
                    "<html><head><title>Test</title></head><body>Hello World</body></html>"
                        .as_bytes(),
                )
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;

    let result = fetch(&url(&mock_server.uri(), "/test")).await.unwrap();

    assert!(result.status.is_success());
    assert!(result.html.contains("Hello World"));
    assert_eq!(result.charset, "UTF-8");
}

#[tokio::test]
async fn test_fetch_404_is_permanent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notfound"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = fetch(&url(&mock_server.uri(), "/notfound")).await;

    match result {
        Err(FetchError::Http { status, retriable }) => {
            assert_eq!(status.as_u16(), 404);
            assert!(!retriable);
        }
        _ => panic!("Expected HTTP 404 error"),
    }
}

#[tokio::test]
async fn test_fetch_500_is_retriable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let result = fetch(&url(&mock_server.uri(), "/error")).await;

    match result {
        Err(err @ FetchError::Http { status, .. }) => {
            assert_eq!(status.as_u16(), 500);
            assert!(err.should_retry());
        }
        _ => panic!("Expected HTTP 500 error"),
    }
}

#[tokio::test]
async fn test_fetch_follows_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/redirect"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/final"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes("<html><body>Final page</body></html>".as_bytes())
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let result = fetch(&url(&mock_server.uri(), "/redirect")).await.unwrap();

    assert!(result.status.is_success());
    assert!(result.html.contains("Final page"));
    assert!(result.url_final.as_str().ends_with("/final"));
}

#[tokio::test]
async fn test_fetch_gzip_body() {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let original =
        "<html><head><title>Compressed</title></head><body>This content is gzipped!</body></html>";

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(original.as_bytes()).unwrap();
    let compressed = encoder.finish().unwrap();

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gzipped"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(compressed)
                .insert_header("Content-Type", "text/html; charset=utf-8")
                .insert_header("Content-Encoding", "gzip"),
        )
        .mount(&mock_server)
        .await;

    let result = fetch(&url(&mock_server.uri(), "/gzipped")).await.unwrap();
    assert!(result.html.contains("This content is gzipped!"));
}

#[tokio::test]
async fn test_fetch_rejects_non_html() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"{}".to_vec())
                .insert_header("Content-Type", "application/json"),
        )
        .mount(&mock_server)
        .await;

    let result = fetch(&url(&mock_server.uri(), "/data.json")).await;
    assert!(matches!(
        result,
        Err(FetchError::UnsupportedContentType(_))
    ));
}

#[tokio::test]
async fn test_fetch_decodes_legacy_charset() {
    let mock_server = MockServer::start().await;

    // "Café" in windows-1252.
    let body = b"<html><head><title>Caf\xe9</title></head><body>ok</body></html>".to_vec();

    Mock::given(method("GET"))
        .and(path("/legacy"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body)
                .insert_header("Content-Type", "text/html; charset=windows-1252"),
        )
        .mount(&mock_server)
        .await;

    let result = fetch(&url(&mock_server.uri(), "/legacy")).await.unwrap();
    assert!(result.html.contains("Café"));
    assert_eq!(result.charset, "windows-1252");
}
