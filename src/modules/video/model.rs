use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct CreateVideoModel {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

pub struct InsertVideo {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
}
