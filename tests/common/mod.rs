#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use serde_json::Value;
use time::{Duration, OffsetDateTime};
use tower::ServiceExt;
use uuid::Uuid;

use reelcast::config::routes::RouteTable;
use reelcast::config::uploads::UploadPolicy;
use reelcast::domain::video::{NewVideo, Video};
use reelcast::http;
use reelcast::infra::identity::{Identity, IdentityResolver};
use reelcast::infra::media_sink::{MediaSink, StoreOptions, StoredObject};
use reelcast::infra::video_store::VideoStore;
use reelcast::AppState;

pub const USER_TOKEN: &str = "session-token-user-1";
pub const USER_ID: &str = "user_1";

// Small ceilings so oversize tests stay cheap: 1 MiB images, 2 MiB videos.
pub const TEST_IMAGE_MAX: u64 = 1024 * 1024;
pub const TEST_VIDEO_MAX: u64 = 2 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// In-memory media sink. Reports a fixed duration and half the input size as
/// the transcoded size, so tests can tell sink-reported values from
/// caller-declared ones.
#[derive(Default)]
pub struct FakeSink {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
    pub last_options: Mutex<Option<StoreOptions>>,
}

pub const FAKE_SINK_DURATION: f64 = 9.25;

#[axum::async_trait]
impl MediaSink for FakeSink {
    async fn store(&self, file: Bytes, options: StoreOptions) -> Result<StoredObject> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("sink rejected the upload"));
        }
        *self.last_options.lock().unwrap() = Some(options.clone());
        let public_id = format!("{}/{}", options.folder, Uuid::new_v4());
        Ok(StoredObject {
            url: format!("https://res.example.com/demo/{}", public_id),
            public_id,
            duration: Some(FAKE_SINK_DURATION),
            bytes: (file.len() / 2) as i64,
        })
    }

    fn image_delivery_url(&self, transformation: &str, public_id: &str) -> String {
        format!(
            "https://res.example.com/demo/image/upload/{}/{}",
            transformation, public_id
        )
    }
}

/// In-memory video store with the same ordering contract as the SQL one.
#[derive(Default)]
pub struct MemoryVideoStore {
    rows: Mutex<Vec<Video>>,
    seq: AtomicUsize,
    pub fail: AtomicBool,
}

#[axum::async_trait]
impl VideoStore for MemoryVideoStore {
    async fn insert(&self, video: NewVideo) -> Result<Video> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("metadata store unreachable"));
        }
        // Strictly increasing timestamps so ordering is deterministic.
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) as i64;
        let row = Video {
            id: Uuid::new_v4(),
            title: video.title,
            description: video.description,
            public_id: video.public_id,
            duration: video.duration,
            original_size: video.original_size,
            compressed_size: video.compressed_size,
            created_at: OffsetDateTime::now_utc() + Duration::milliseconds(seq),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list_all(&self) -> Result<Vec<Video>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("metadata store unreachable"));
        }
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

impl MemoryVideoStore {
    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

/// Resolver backed by a fixed token table; no live auth provider needed.
#[derive(Default)]
pub struct StaticResolver {
    sessions: HashMap<String, String>,
}

#[axum::async_trait]
impl IdentityResolver for StaticResolver {
    async fn resolve(&self, session_token: &str) -> Result<Option<Identity>> {
        Ok(self.sessions.get(session_token).map(|user_id| Identity {
            user_id: user_id.clone(),
        }))
    }
}

// ---------------------------------------------------------------------------
// TestApp
// ---------------------------------------------------------------------------

pub struct TestApp {
    router: Router,
    pub sink: Arc<FakeSink>,
    pub videos: Arc<MemoryVideoStore>,
}

pub fn app() -> TestApp {
    let sink = Arc::new(FakeSink::default());
    let videos = Arc::new(MemoryVideoStore::default());

    let mut resolver = StaticResolver::default();
    resolver
        .sessions
        .insert(USER_TOKEN.to_string(), USER_ID.to_string());

    let state = AppState {
        sink: sink.clone(),
        videos: videos.clone(),
        identity: Arc::new(resolver),
        policy: UploadPolicy::new(TEST_IMAGE_MAX, TEST_VIDEO_MAX),
        routes: RouteTable::standard(),
        media_folder: "reelcast".to_string(),
    };

    TestApp {
        router: http::router(state),
        sink,
        videos,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    body_bytes: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body_bytes).unwrap_or(Value::Null)
    }

    pub fn error_message(&self) -> String {
        self.json()["error"].as_str().unwrap_or("").to_string()
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            location,
            body_bytes,
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(Method::GET).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_multipart(
        &self,
        path: &str,
        form: MultipartBody,
        token: Option<&str>,
    ) -> TestResponse {
        let (content_type, body) = form.finish();
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, content_type);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }
}

// ---------------------------------------------------------------------------
// Multipart body builder
// ---------------------------------------------------------------------------

pub struct MultipartBody {
    boundary: String,
    buf: Vec<u8>,
}

impl Default for MultipartBody {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: format!("----reelcast-test-{}", Uuid::new_v4().simple()),
            buf: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                self.boundary, name, filename, content_type
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> (String, Vec<u8>) {
        self.buf
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.buf,
        )
    }
}

/// A valid video form at `size` bytes with all required fields present.
pub fn video_form(size: usize) -> MultipartBody {
    MultipartBody::new()
        .file("file", "clip.mp4", "video/mp4", &vec![0u8; size])
        .text("title", "Test clip")
        .text("description", "A test clip")
        .text("duration", "42.0")
        .text("originalSize", &size.to_string())
}
