use actix_multipart::{Field, Multipart};
use actix_web::{get, http::header, post, web, HttpRequest, HttpResponse};
use futures_util::TryStreamExt;
use uuid::Uuid;

use crate::api::{error, success};
use crate::constants::{THUMBNAIL_FIELD, VIDEO_FIELD};
use crate::middlewares::get_claims;
use crate::modules::media::{model::IncomingFile, service::UploadService, storage::LocalStorage};
use crate::modules::video::schema::VideoEntity;

/// Skips form fields until `name`; other fields are discarded unread.
async fn find_field(
    payload: &mut Multipart,
    name: &str,
) -> Result<Option<IncomingFile<Field>>, error::SystemError> {
    while let Some(field) = payload
        .try_next()
        .await
        .map_err(|e| error::SystemError::bad_request(format!("Unable to parse form: {e}")))?
    {
        let matches =
            field.content_disposition().and_then(|cd| cd.get_name()).is_some_and(|n| n == name);
        if !matches {
            continue;
        }

        let media_type =
            field.content_type().map(|m| m.essence_str().to_string()).unwrap_or_default();
        return Ok(Some(IncomingFile { media_type, body: field }));
    }
    Ok(None)
}

#[get("/thumbnails/{id}")]
pub async fn get_thumbnail(
    upload_service: web::Data<UploadService>,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse, error::Error> {
    let thumbnail = upload_service.get_thumbnail(video_id.into_inner()).await?;
    Ok(HttpResponse::Ok()
        .content_type(thumbnail.media_type)
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(thumbnail.data))
}

#[post("/thumbnails/{id}")]
pub async fn upload_thumbnail(
    upload_service: web::Data<UploadService>,
    video_id: web::Path<Uuid>,
    req: HttpRequest,
    mut payload: Multipart,
) -> Result<success::Success<VideoEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let video = upload_service
        .upload_thumbnail(video_id.into_inner(), user_id, find_field(&mut payload, THUMBNAIL_FIELD))
        .await?;
    Ok(success::Success::ok(Some(video)).message("Thumbnail uploaded successfully"))
}

#[post("/videos/{id}")]
pub async fn upload_video(
    upload_service: web::Data<UploadService>,
    video_id: web::Path<Uuid>,
    req: HttpRequest,
    mut payload: Multipart,
) -> Result<success::Success<VideoEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let video = upload_service
        .upload_video(video_id.into_inner(), user_id, find_field(&mut payload, VIDEO_FIELD))
        .await?;
    Ok(success::Success::ok(Some(video)).message("Video uploaded successfully"))
}

#[get("/assets/{filename}")]
pub async fn get_asset(
    assets: web::Data<LocalStorage>,
    filename: web::Path<String>,
) -> Result<HttpResponse, error::Error> {
    let filename = filename.into_inner();
    let data = assets.read(&filename).await?;
    let content_type = mime_guess::from_path(&filename).first_or_octet_stream();
    Ok(HttpResponse::Ok().content_type(content_type.to_string()).body(data))
}
