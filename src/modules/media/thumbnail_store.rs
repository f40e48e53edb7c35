use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::modules::media::model::Thumbnail;

/// Latest thumbnail per video, as served by `GET /thumbnails/{id}`.
#[async_trait::async_trait]
pub trait ThumbnailStore: Send + Sync {
    async fn put(&self, video_id: Uuid, thumbnail: Thumbnail);
    async fn get(&self, video_id: &Uuid) -> Option<Thumbnail>;
}

/// Process-lifetime map without eviction. Readers share the lock, a writer
/// holds it exclusively, and the last write for a video wins.
#[derive(Default)]
pub struct MemoryThumbnailStore {
    entries: RwLock<HashMap<Uuid, Thumbnail>>,
}

#[async_trait::async_trait]
impl ThumbnailStore for MemoryThumbnailStore {
    async fn put(&self, video_id: Uuid, thumbnail: Thumbnail) {
        self.entries.write().await.insert(video_id, thumbnail);
    }

    async fn get(&self, video_id: &Uuid) -> Option<Thumbnail> {
        self.entries.read().await.get(video_id).cloned()
    }
}
