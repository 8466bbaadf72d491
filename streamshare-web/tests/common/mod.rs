//! Shared fixtures for the HTTP integration tests

#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{HeaderMap, Request, StatusCode};
use streamshare_core::{ContentRegistry, FileDescriptor, ServerConfig, StreamShareConfig};
use streamshare_web::{AppState, SilentObserver, build_router};
use tempfile::TempDir;
use tower::ServiceExt;

/// Shared and upload directories plus the state serving them.
pub struct Fixture {
    pub state: AppState,
    pub shared_dir: PathBuf,
    pub upload_dir: PathBuf,
    _root: TempDir,
}

impl Fixture {
    /// Shares `files` (name, contents) from a fresh temporary directory.
    pub fn new(files: &[(&str, &[u8])]) -> Self {
        let root = TempDir::new().unwrap();
        let shared_dir = root.path().join("shared");
        let upload_dir = root.path().join("uploads");
        std::fs::create_dir_all(&shared_dir).unwrap();
        std::fs::create_dir_all(&upload_dir).unwrap();
        let shared_dir = shared_dir.canonicalize().unwrap();
        let upload_dir = upload_dir.canonicalize().unwrap();

        let descriptors = files
            .iter()
            .map(|(name, contents)| {
                let path = shared_dir.join(name);
                std::fs::write(&path, contents).unwrap();
                FileDescriptor::new(path, contents.len() as u64)
            })
            .collect();

        let config = StreamShareConfig::for_testing();
        let state = AppState::new(
            Arc::new(ContentRegistry::new(descriptors)),
            ServerConfig::new(3000, IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20))),
            &config.transfer,
            upload_dir.clone(),
            Arc::new(SilentObserver),
        );

        Self {
            state,
            shared_dir,
            upload_dir,
            _root: root,
        }
    }

    /// Router with a fake peer address, ready for `oneshot`.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
            .layer(MockConnectInfo(SocketAddr::from(([192, 168, 1, 50], 50000))))
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_range(&self, uri: &str, range: &str) -> TestResponse {
        self.send(
            Request::get(uri)
                .header("range", range)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn upload(&self, uri: &str, contents: &'static [u8]) -> TestResponse {
        self.send(
            Request::post(uri)
                .body(Body::from(contents))
                .unwrap(),
        )
        .await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .unwrap_or_else(|| panic!("missing header {name}"))
            .to_str()
            .unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Deterministic non-repeating-looking test data.
pub fn patterned(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
