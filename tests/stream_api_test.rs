//! Integration tests for the video streaming route.
//!
//! The harness configures 4-byte chunks, so a handful of mocked ranged
//! responses exercise the whole relay.

mod common;

use common::TestHarness;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn range_mock(file_id: &str, range: &str, response: ResponseTemplate) -> Mock {
    Mock::given(method("GET"))
        .and(path(format!("/drive/v3/files/{file_id}")))
        .and(query_param("alt", "media"))
        .and(header("range", range))
        .respond_with(response)
}

#[tokio::test]
async fn streams_full_file_as_mp4() {
    let server = MockServer::start().await;
    range_mock(
        "vid1",
        "bytes=0-3",
        ResponseTemplate::new(206).set_body_bytes(b"abcd".to_vec()),
    )
    .mount(&server)
    .await;
    range_mock(
        "vid1",
        "bytes=4-7",
        ResponseTemplate::new(206).set_body_bytes(b"ef".to_vec()),
    )
    .mount(&server)
    .await;

    let (_h, addr) = TestHarness::with_server_and_drive(&server.uri()).await;

    let resp = reqwest::get(format!("http://{addr}/api/videos/vid1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get(reqwest::header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap(),
        "video/mp4"
    );

    let body = resp.bytes().await.unwrap();
    assert_eq!(&body[..], b"abcdef");
}

#[tokio::test]
async fn mid_stream_failure_truncates_body() {
    let server = MockServer::start().await;
    range_mock(
        "vid1",
        "bytes=0-3",
        ResponseTemplate::new(206).set_body_bytes(b"abcd".to_vec()),
    )
    .mount(&server)
    .await;
    range_mock(
        "vid1",
        "bytes=4-7",
        ResponseTemplate::new(206).set_body_bytes(b"efgh".to_vec()),
    )
    .mount(&server)
    .await;
    range_mock("vid1", "bytes=8-11", ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (_h, addr) = TestHarness::with_server_and_drive(&server.uri()).await;

    let resp = reqwest::get(format!("http://{addr}/api/videos/vid1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // The failed third fetch ends the body after two chunks; the request
    // itself still completes.
    let body = resp.bytes().await.unwrap();
    assert_eq!(&body[..], b"abcdefgh");
}

#[tokio::test]
async fn unreachable_drive_yields_empty_body() {
    let (_h, addr) = TestHarness::with_server().await;

    let resp = reqwest::get(format!("http://{addr}/api/videos/vid1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body = resp.bytes().await.unwrap();
    assert!(body.is_empty());
}
