use uuid::Uuid;

use crate::{
    api::error,
    modules::video::{model::InsertVideo, schema::VideoEntity},
};

#[async_trait::async_trait]
pub trait VideoRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<VideoEntity>, error::SystemError>;

    /// Newest first.
    async fn find_by_user(&self, user_id: &Uuid) -> Result<Vec<VideoEntity>, error::SystemError>;

    async fn create(&self, video: &InsertVideo) -> Result<VideoEntity, error::SystemError>;

    /// Writes every mutable column of `video` back and returns the stored row.
    async fn update(&self, video: &VideoEntity) -> Result<VideoEntity, error::SystemError>;

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError>;
}
