use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::video::{
    model::{CreateVideoModel, InsertVideo},
    repository::VideoRepository,
    schema::VideoEntity,
};

#[derive(Clone)]
pub struct VideoService {
    repo: Arc<dyn VideoRepository + Send + Sync>,
}

impl VideoService {
    pub fn with_dependencies(repo: Arc<dyn VideoRepository + Send + Sync>) -> Self {
        info!("VideoService initialized with dependencies");
        VideoService { repo }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        video: CreateVideoModel,
    ) -> Result<VideoEntity, error::SystemError> {
        let new_video =
            InsertVideo { user_id, title: video.title, description: video.description };
        let video = self.repo.create(&new_video).await?;
        info!("Video {} created by {}", video.id, user_id);
        Ok(video)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<VideoEntity, error::SystemError> {
        self.repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Couldn't find video"))
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<VideoEntity>, error::SystemError> {
        self.repo.find_by_user(&user_id).await
    }

    /// Loads the record and checks that `user_id` owns it.
    pub async fn get_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<VideoEntity, error::SystemError> {
        let video = self.get_by_id(id).await?;
        if !video.is_owned_by(&user_id) {
            return Err(error::SystemError::forbidden("You don't own this video"));
        }
        Ok(video)
    }

    pub async fn save(&self, video: &VideoEntity) -> Result<VideoEntity, error::SystemError> {
        self.repo.update(video).await
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), error::SystemError> {
        self.get_owned(id, user_id).await?;
        if !self.repo.delete(&id).await? {
            return Err(error::SystemError::not_found("Couldn't find video"));
        }
        info!("Video {} deleted by {}", id, user_id);
        Ok(())
    }
}
