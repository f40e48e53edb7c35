use actix_web::{delete, get, post, web, HttpRequest};
use uuid::Uuid;

use crate::api::{error, success};
use crate::middlewares::get_claims;
use crate::modules::video::{model, schema::VideoEntity, service::VideoService};
use crate::utils::ValidatedJson;

#[post("/videos")]
pub async fn create_video(
    video_service: web::Data<VideoService>,
    req: HttpRequest,
    video: ValidatedJson<model::CreateVideoModel>,
) -> Result<success::Success<VideoEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let video = video_service.create(user_id, video.0).await?;
    Ok(success::Success::created(Some(video)).message("Video created successfully"))
}

#[get("/videos")]
pub async fn list_videos(
    video_service: web::Data<VideoService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<VideoEntity>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let videos = video_service.list_for_user(user_id).await?;
    Ok(success::Success::ok(Some(videos)))
}

#[get("/videos/{id}")]
pub async fn get_video(
    video_service: web::Data<VideoService>,
    video_id: web::Path<Uuid>,
) -> Result<success::Success<VideoEntity>, error::Error> {
    let video = video_service.get_by_id(video_id.into_inner()).await?;
    Ok(success::Success::ok(Some(video)))
}

#[delete("/videos/{id}")]
pub async fn delete_video(
    video_service: web::Data<VideoService>,
    video_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    video_service.delete(video_id.into_inner(), user_id).await?;
    Ok(success::Success::no_content())
}
