//! Request-level tests of the route table
//!
//! Every test drives the real router through `oneshot` with files on disk in
//! a temporary directory.

mod common;

use axum::http::StatusCode;
use common::{Fixture, patterned};

#[tokio::test]
async fn test_range_response_is_exact_slice() {
    let data = patterned(10_000);
    let fixture = Fixture::new(&[("data.bin", data.as_slice())]);

    let response = fixture.get_range("/data.bin", "bytes=100-4999").await;

    assert_eq!(response.status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.header("content-range"), "bytes 100-4999/10000");
    assert_eq!(response.header("content-length"), "4900");
    assert_eq!(response.header("accept-ranges"), "bytes");
    assert_eq!(response.body, &data[100..5000]);
}

#[tokio::test]
async fn test_full_download_of_various_sizes() {
    // Empty, one byte, exactly one chunk and several chunks.
    for size in [0usize, 1, 1024, 3000] {
        let data = patterned(size);
        let fixture = Fixture::new(&[("blob.bin", data.as_slice())]);

        let response = fixture.get("/blob.bin").await;

        assert_eq!(response.status, StatusCode::OK, "size {size}");
        assert_eq!(response.header("content-length"), size.to_string());
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename=\"blob.bin\""
        );
        assert_eq!(response.body, data, "size {size}");
    }
}

#[tokio::test]
async fn test_full_download_content_type() {
    let fixture = Fixture::new(&[("notes.txt", &b"some notes"[..])]);

    let response = fixture.get("/notes.txt?download=true").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("content-type"), "text/plain");
    assert_eq!(response.text(), "some notes");
}

#[tokio::test]
async fn test_unknown_name_is_not_found() {
    let fixture = Fixture::new(&[("notes.txt", &b"x"[..])]);

    let response = fixture.get("/no%20such%20file.txt").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.text(), "Not Found");
}

#[tokio::test]
async fn test_undecodable_name_is_not_found() {
    let fixture = Fixture::new(&[("notes.txt", &b"x"[..])]);

    let response = fixture.get("/%FF%FE.txt").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.text(), "Not Found");
}

#[tokio::test]
async fn test_repeated_query_keys_are_tolerated() {
    let fixture = Fixture::new(&[("notes.txt", &b"some notes"[..])]);

    let missing = fixture.get("/missing.txt?raw=1&raw=2").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let notes = fixture
        .get_range("/notes.txt?download=true&download=false", "bytes=0-3")
        .await;
    assert_eq!(notes.status, StatusCode::OK);
    assert_eq!(notes.text(), "some notes");
}

#[tokio::test]
async fn test_percent_encoded_name_is_decoded() {
    let fixture = Fixture::new(&[("my notes.txt", &b"hello there"[..])]);

    let response = fixture.get("/my%20notes.txt").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "hello there");
}

#[tokio::test]
async fn test_upload_then_download() {
    let fixture = Fixture::new(&[]);

    let upload = fixture.upload("/upload?name=hello.txt", b"hello").await;
    assert_eq!(upload.status, StatusCode::OK);
    assert_eq!(upload.text(), "Success");
    assert_eq!(
        std::fs::read(fixture.upload_dir.join("hello.txt")).unwrap(),
        b"hello"
    );

    let download = fixture.get("/hello.txt").await;
    assert_eq!(download.status, StatusCode::OK);
    assert_eq!(download.header("content-length"), "5");
    assert_eq!(download.text(), "hello");

    let landing = fixture.get("/").await;
    assert!(landing.text().contains("hello.txt"));
}

#[tokio::test]
async fn test_upload_with_encoded_name() {
    let fixture = Fixture::new(&[]);

    let upload = fixture
        .upload("/upload?name=summer%20trip.jpg", b"jpeg bytes")
        .await;
    assert_eq!(upload.status, StatusCode::OK);

    let download = fixture.get("/summer%20trip.jpg").await;
    assert_eq!(download.status, StatusCode::OK);
    assert_eq!(download.header("content-type"), "image/jpeg");
}

#[tokio::test]
async fn test_upload_without_name_gets_timestamp_name() {
    let fixture = Fixture::new(&[]);

    let upload = fixture.upload("/upload", b"anonymous").await;
    assert_eq!(upload.status, StatusCode::OK);

    let files = fixture.state.registry.snapshot();
    assert_eq!(files.len(), 1);
    assert!(files[0].display_name.starts_with("upload-"));
}

#[tokio::test]
async fn test_upload_with_unusable_name_is_rejected() {
    let fixture = Fixture::new(&[]);

    let upload = fixture.upload("/upload?name=..", b"nope").await;

    assert_eq!(upload.status, StatusCode::BAD_REQUEST);
    assert!(fixture.state.registry.is_empty());
}

#[tokio::test]
async fn test_repeated_upload_name_keeps_first() {
    let fixture = Fixture::new(&[]);

    let upload = fixture
        .upload("/upload?name=a.txt&name=b.txt", b"first wins")
        .await;

    assert_eq!(upload.status, StatusCode::OK);
    assert_eq!(fixture.get("/a.txt").await.text(), "first wins");
    assert_eq!(fixture.get("/b.txt").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_write_failure_is_server_error() {
    let fixture = Fixture::new(&[]);
    std::fs::remove_dir_all(&fixture.upload_dir).unwrap();

    let upload = fixture.upload("/upload?name=x.txt", b"lost").await;

    assert_eq!(upload.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(upload.text(), "Upload failed");
    assert!(fixture.state.registry.is_empty());
}

#[tokio::test]
async fn test_reupload_replaces_entry() {
    let fixture = Fixture::new(&[]);

    fixture.upload("/upload?name=doc.txt", b"first").await;
    fixture.upload("/upload?name=doc.txt", b"second version").await;

    assert_eq!(fixture.state.registry.len(), 1);
    let download = fixture.get("/doc.txt").await;
    assert_eq!(download.text(), "second version");
    assert_eq!(download.header("content-length"), "14");
}

#[tokio::test]
async fn test_upload_colliding_with_shared_name_is_numbered() {
    let fixture = Fixture::new(&[("notes.txt", &b"original"[..])]);

    fixture.upload("/upload?name=notes.txt", b"uploaded").await;

    assert_eq!(fixture.get("/notes.txt").await.text(), "original");
    assert_eq!(fixture.get("/notes%20(2).txt").await.text(), "uploaded");
}

#[tokio::test]
async fn test_range_end_is_clamped_to_file() {
    let fixture = Fixture::new(&[("ten.bin", &b"0123456789"[..])]);

    let response = fixture.get_range("/ten.bin", "bytes=0-999999").await;

    assert_eq!(response.status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.header("content-range"), "bytes 0-9/10");
    assert_eq!(response.text(), "0123456789");
}

#[tokio::test]
async fn test_range_past_end_is_unsatisfiable() {
    let fixture = Fixture::new(&[("ten.bin", &b"0123456789"[..])]);

    let response = fixture.get_range("/ten.bin", "bytes=10-").await;

    assert_eq!(response.status, StatusCode::RANGE_NOT_SATISFIABLE);
    assert_eq!(response.header("content-range"), "bytes */10");
}

#[tokio::test]
async fn test_malformed_range_serves_whole_file() {
    let fixture = Fixture::new(&[("ten.bin", &b"0123456789"[..])]);

    let response = fixture.get_range("/ten.bin", "bytes=abc-").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "0123456789");
}

#[tokio::test]
async fn test_download_flag_overrides_range() {
    let fixture = Fixture::new(&[("ten.bin", &b"0123456789"[..])]);

    let response = fixture
        .get_range("/ten.bin?download=true", "bytes=2-4")
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "0123456789");
}

#[tokio::test]
async fn test_video_opens_player_unless_raw() {
    let clip = patterned(4096);
    let fixture = Fixture::new(&[("clip.mp4", clip.as_slice())]);

    let page = fixture.get("/clip.mp4").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.header("content-type").starts_with("text/html"));
    assert!(page.text().contains(r#"src="/clip.mp4?raw=true""#));

    let raw = fixture.get_range("/clip.mp4?raw=true", "bytes=0-3").await;
    assert_eq!(raw.status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(raw.header("content-type"), "video/mp4");
    assert_eq!(raw.body, &clip[0..4]);

    let download = fixture.get("/clip.mp4?download=true").await;
    assert_eq!(download.status, StatusCode::OK);
    assert_eq!(download.body, clip);
}

#[tokio::test]
async fn test_unsupported_methods_and_paths_are_not_found() {
    let fixture = Fixture::new(&[("notes.txt", &b"x"[..])]);

    for (method, uri) in [
        ("DELETE", "/notes.txt"),
        ("PUT", "/"),
        ("POST", "/notes.txt"),
        ("GET", "/nested/notes.txt"),
    ] {
        let response = fixture
            .send(
                axum::http::Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(response.text(), "Not Found");
    }
}

#[tokio::test]
async fn test_file_named_upload_is_downloadable() {
    let fixture = Fixture::new(&[("upload", &b"tricky name"[..])]);

    let response = fixture.get("/upload").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "tricky name");
}

#[tokio::test]
async fn test_landing_page_lists_shared_files() {
    let fixture = Fixture::new(&[("report.pdf", &b"%PDF"[..]), ("clip.mp4", &b""[..])]);

    let response = fixture.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    let page = response.text();
    assert!(page.contains("report.pdf"));
    assert!(page.contains(r#"href="/report.pdf?download=true""#));
    assert!(page.contains(r#"href="/clip.mp4">Watch"#));
    assert!(page.contains("http://192.168.1.20:3000"));
}

#[tokio::test]
async fn test_landing_page_without_files() {
    let fixture = Fixture::new(&[]);

    let response = fixture.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text().contains("No files shared yet"));
}
