use uuid::Uuid;

use crate::{
    api::error,
    modules::video::{model::InsertVideo, repository::VideoRepository, schema::VideoEntity},
};

#[derive(Clone)]
pub struct VideoRepositoryPg {
    pool: sqlx::PgPool,
}

impl VideoRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl VideoRepository for VideoRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<VideoEntity>, error::SystemError> {
        let video = sqlx::query_as::<_, VideoEntity>("SELECT * FROM videos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(video)
    }

    async fn find_by_user(&self, user_id: &Uuid) -> Result<Vec<VideoEntity>, error::SystemError> {
        let videos = sqlx::query_as::<_, VideoEntity>(
            "SELECT * FROM videos WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(videos)
    }

    async fn create(&self, video: &InsertVideo) -> Result<VideoEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let video = sqlx::query_as::<_, VideoEntity>(
            r#"
            INSERT INTO videos (id, user_id, title, description)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(video.user_id)
        .bind(&video.title)
        .bind(&video.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(video)
    }

    async fn update(&self, video: &VideoEntity) -> Result<VideoEntity, error::SystemError> {
        let video = sqlx::query_as::<_, VideoEntity>(
            r#"
            UPDATE videos
            SET
                title         = $2,
                description   = $3,
                thumbnail_url = $4,
                video_url     = $5,
                updated_at    = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found("Video not found"))?;

        Ok(video)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }
}
