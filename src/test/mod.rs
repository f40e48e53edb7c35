#![allow(dead_code)]

use actix_web::{
    body::BoxBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App,
};
use bytes::Bytes;
use futures_util::Stream;
use object_store::memory::InMemory;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::api::error;
use crate::modules::media::{
    model::{IncomingFile, UploadConfig},
    probe::{AspectCategory, Prober},
    service::{MediaBackends, UploadService},
    storage::{LocalStorage, MediaStorage, ObjectStorage},
    thumbnail_store::MemoryThumbnailStore,
    transcode::{processed_path, Transcoder},
};
use crate::modules::video::{
    model::InsertVideo, repository::VideoRepository, schema::VideoEntity, service::VideoService,
};
use crate::utils::Claims;

pub const TEST_SECRET: &str = "test-secret";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

pub fn bearer(user_id: &Uuid) -> (String, String) {
    let token = Claims::new(user_id, 3600).encode(TEST_SECRET.as_bytes()).unwrap();
    ("Authorization".to_string(), format!("Bearer {token}"))
}

pub type TestBody = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>>>>;

pub fn body(chunks: &[&[u8]]) -> TestBody {
    let chunks: Vec<Result<Bytes, std::io::Error>> =
        chunks.iter().map(|c| Ok(Bytes::copy_from_slice(c))).collect();
    Box::pin(futures_util::stream::iter(chunks))
}

pub fn incoming(media_type: &str, body: TestBody) -> IncomingFile<TestBody> {
    IncomingFile { media_type: media_type.to_string(), body }
}

pub fn no_file() -> std::future::Ready<Result<Option<IncomingFile<TestBody>>, error::SystemError>> {
    std::future::ready(Ok(None))
}

/// Single-part `multipart/form-data` body. Returns (content type header, body).
pub fn multipart_form(field: &str, media_type: &str, data: &[u8]) -> (String, Vec<u8>) {
    let boundary = "tubelyboundary7MA4YWxkTrZu0gW";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"upload\"\r\n\
             Content-Type: {media_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: Mutex<HashMap<Uuid, VideoEntity>>,
    updates: AtomicUsize,
    fail_updates: AtomicBool,
}

impl InMemoryVideoRepository {
    pub fn insert_video(&self, user_id: Uuid) -> VideoEntity {
        let now = chrono::Utc::now();
        let video = VideoEntity {
            id: Uuid::now_v7(),
            user_id,
            title: "test video".to_string(),
            description: String::new(),
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        };
        lock(&self.videos).insert(video.id, video.clone());
        video
    }

    pub fn get(&self, id: &Uuid) -> Option<VideoEntity> {
        lock(&self.videos).get(id).cloned()
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    /// Makes every later `update` fail as if the database were down.
    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<VideoEntity>, error::SystemError> {
        Ok(self.get(id))
    }

    async fn find_by_user(&self, user_id: &Uuid) -> Result<Vec<VideoEntity>, error::SystemError> {
        let mut videos: Vec<VideoEntity> =
            lock(&self.videos).values().filter(|v| v.user_id == *user_id).cloned().collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }

    async fn create(&self, video: &InsertVideo) -> Result<VideoEntity, error::SystemError> {
        let mut entity = self.insert_video(video.user_id);
        entity.title = video.title.clone();
        entity.description = video.description.clone();
        lock(&self.videos).insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, video: &VideoEntity) -> Result<VideoEntity, error::SystemError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(error::SystemError::InternalError("connection refused".into()));
        }
        let mut videos = lock(&self.videos);
        let stored = videos
            .get_mut(&video.id)
            .ok_or_else(|| error::SystemError::not_found("Video not found"))?;
        *stored = VideoEntity { updated_at: chrono::Utc::now(), ..video.clone() };
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(stored.clone())
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        Ok(lock(&self.videos).remove(id).is_some())
    }
}

pub struct FakeProber {
    result: Option<AspectCategory>,
    calls: AtomicUsize,
    last_path: Mutex<Option<PathBuf>>,
}

impl FakeProber {
    pub fn returning(category: AspectCategory) -> Self {
        Self { result: Some(category), calls: AtomicUsize::new(0), last_path: Mutex::new(None) }
    }

    pub fn failing() -> Self {
        Self { result: None, calls: AtomicUsize::new(0), last_path: Mutex::new(None) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_path(&self) -> Option<PathBuf> {
        lock(&self.last_path).clone()
    }
}

#[async_trait::async_trait]
impl Prober for FakeProber {
    async fn aspect_category(&self, path: &Path) -> Result<AspectCategory, error::SystemError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_path) = Some(path.to_path_buf());
        self.result
            .ok_or_else(|| error::SystemError::probe("Invalid data found when processing input"))
    }
}

/// Writes `faststart:` followed by the input to `<input>.processed`.
/// `failing()` errors without producing any output.
#[derive(Default)]
pub struct FakeTranscoder {
    fail: bool,
    calls: AtomicUsize,
}

impl FakeTranscoder {
    pub fn failing() -> Self {
        Self { fail: true, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Transcoder for FakeTranscoder {
    async fn fast_start(&self, input: &Path) -> Result<PathBuf, error::SystemError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut data = b"faststart:".to_vec();
        data.extend(tokio::fs::read(input).await?);
        let output = processed_path(input);
        if self.fail {
            return Err(error::SystemError::transcode("moov atom not found"));
        }
        tokio::fs::write(&output, data).await?;
        Ok(output)
    }
}

/// Keeps every write in memory; `failing()` rejects all writes.
pub struct RecordingStorage {
    base_url: Option<String>,
    writes: Mutex<Vec<(String, Bytes, String)>>,
}

impl RecordingStorage {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: Some(base_url.to_string()), writes: Mutex::new(Vec::new()) }
    }

    pub fn failing() -> Self {
        Self { base_url: None, writes: Mutex::new(Vec::new()) }
    }

    pub fn writes(&self) -> Vec<(String, Bytes, String)> {
        lock(&self.writes).clone()
    }
}

#[async_trait::async_trait]
impl MediaStorage for RecordingStorage {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        media_type: &str,
    ) -> Result<String, error::SystemError> {
        let base_url = self
            .base_url
            .as_ref()
            .ok_or_else(|| error::SystemError::storage("bucket unavailable"))?;
        lock(&self.writes).push((key.to_string(), data, media_type.to_string()));
        Ok(format!("{base_url}/{key}"))
    }
}

/// Services wired the way `main` wires them, with in-memory and temp-dir backends.
pub struct TestContext {
    pub repo: Arc<InMemoryVideoRepository>,
    pub assets: LocalStorage,
    pub videos: VideoService,
    pub uploads: UploadService,
    _assets_dir: tempfile::TempDir,
    _temp_dir: tempfile::TempDir,
}

pub fn context() -> TestContext {
    let assets_dir = tempfile::tempdir().unwrap();
    let temp_dir = tempfile::tempdir().unwrap();
    let repo = Arc::new(InMemoryVideoRepository::default());
    let assets = LocalStorage::new(assets_dir.path(), "http://localhost:8091/assets");
    let videos = VideoService::with_dependencies(repo.clone());

    let backends = MediaBackends {
        thumbnails: Arc::new(MemoryThumbnailStore::default()),
        thumbnail_storage: Arc::new(assets.clone()),
        video_storage: Arc::new(ObjectStorage::new(
            Arc::new(InMemory::new()),
            "https://cdn.example.com",
        )),
        prober: Arc::new(FakeProber::returning(AspectCategory::Landscape)),
        transcoder: Arc::new(FakeTranscoder::default()),
    };
    let uploads = UploadService::with_dependencies(
        videos.clone(),
        backends,
        UploadConfig::new(temp_dir.path()),
    );

    TestContext { repo, assets, videos, uploads, _assets_dir: assets_dir, _temp_dir: temp_dir }
}

pub fn app(
    ctx: &TestContext,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<BoxBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ctx.videos.clone()))
        .app_data(web::Data::new(ctx.uploads.clone()))
        .app_data(web::Data::new(ctx.assets.clone()))
        .configure(crate::configure_routes(TEST_SECRET.to_string()))
}
