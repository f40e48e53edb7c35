use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use log::{info, warn};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::api::error;
use crate::modules::media::{
    model::{IncomingFile, Thumbnail, UploadConfig, UploadedFile},
    probe::Prober,
    storage::{thumbnail_key, video_key, MediaStorage},
    thumbnail_store::ThumbnailStore,
    transcode::Transcoder,
    validator::UploadPolicy,
};
use crate::modules::video::{schema::VideoEntity, service::VideoService};
use crate::utils::extension_for;

/// External collaborators of the upload pipeline.
#[derive(Clone)]
pub struct MediaBackends {
    pub thumbnails: Arc<dyn ThumbnailStore>,
    pub thumbnail_storage: Arc<dyn MediaStorage>,
    pub video_storage: Arc<dyn MediaStorage>,
    pub prober: Arc<dyn Prober>,
    pub transcoder: Arc<dyn Transcoder>,
}

#[derive(Clone)]
pub struct UploadService {
    videos: VideoService,
    backends: MediaBackends,
    config: UploadConfig,
}

fn unreadable(e: impl Display) -> error::SystemError {
    error::SystemError::bad_request(format!("Unable to read upload: {e}"))
}

/// Buffers the body, failing as soon as it grows past the ceiling.
async fn read_limited<S, E>(
    mut body: S,
    policy: &UploadPolicy,
) -> Result<Bytes, error::SystemError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    let mut buf = BytesMut::new();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(unreadable)?;
        policy.check_size((buf.len() + chunk.len()) as u64)?;
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

/// Streams the body into `file`, failing as soon as it grows past the ceiling.
async fn spool<S, E>(
    mut body: S,
    mut file: tokio::fs::File,
    policy: &UploadPolicy,
) -> Result<u64, error::SystemError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    let mut written: u64 = 0;
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(unreadable)?;
        written += chunk.len() as u64;
        policy.check_size(written)?;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(written)
}

fn remove_temp(path: TempPath) {
    let display = path.display().to_string();
    if let Err(e) = path.close() {
        warn!("Failed to remove temp file {}: {}", display, e);
    }
}

impl UploadService {
    pub fn with_dependencies(
        videos: VideoService,
        backends: MediaBackends,
        config: UploadConfig,
    ) -> Self {
        info!("UploadService initialized with dependencies");
        UploadService { videos, backends, config }
    }

    pub async fn get_thumbnail(&self, video_id: Uuid) -> Result<Thumbnail, error::SystemError> {
        let video = self.videos.get_by_id(video_id).await?;
        self.backends
            .thumbnails
            .get(&video.id)
            .await
            .ok_or_else(|| error::SystemError::not_found("Thumbnail not found"))
    }

    /// `file` is only awaited once the caller is known to own the video.
    pub async fn upload_thumbnail<F, S, E>(
        &self,
        video_id: Uuid,
        user_id: Uuid,
        file: F,
    ) -> Result<VideoEntity, error::SystemError>
    where
        F: Future<Output = Result<Option<IncomingFile<S>>, error::SystemError>>,
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: Display,
    {
        let mut video = self.videos.get_owned(video_id, user_id).await?;
        let policy = &self.config.thumbnail;

        let incoming =
            file.await?.ok_or_else(|| error::SystemError::bad_request("No file found in request"))?;
        policy.check_media_type(&incoming.media_type)?;
        let data = read_limited(incoming.body, policy).await?;
        let file = policy.validate(Some(UploadedFile { data, media_type: incoming.media_type }))?;

        let key = thumbnail_key(&file.media_type);
        let url =
            self.backends.thumbnail_storage.put(&key, file.data.clone(), &file.media_type).await?;

        video.thumbnail_url = Some(url);
        let video = self.videos.save(&video).await?;
        self.backends
            .thumbnails
            .put(video.id, Thumbnail { data: file.data, media_type: file.media_type })
            .await;
        info!("Thumbnail {} stored for video {}", key, video.id);
        Ok(video)
    }

    /// Spools, probes, fast-starts and uploads a video, then points the record
    /// at it. Temp files are removed on every exit path.
    pub async fn upload_video<F, S, E>(
        &self,
        video_id: Uuid,
        user_id: Uuid,
        file: F,
    ) -> Result<VideoEntity, error::SystemError>
    where
        F: Future<Output = Result<Option<IncomingFile<S>>, error::SystemError>>,
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: Display,
    {
        let mut video = self.videos.get_owned(video_id, user_id).await?;
        let policy = &self.config.video;

        let incoming =
            file.await?.ok_or_else(|| error::SystemError::bad_request("No file found in request"))?;
        policy.check_media_type(&incoming.media_type)?;
        let media_type = incoming.media_type;

        tokio::fs::create_dir_all(&self.config.temp_dir).await?;
        let prefix = format!("{}-", video.id);
        let suffix = format!(".{}", extension_for(&media_type));
        let (upload, upload_path) = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .tempfile_in(&self.config.temp_dir)?
            .into_parts();
        let size = spool(incoming.body, tokio::fs::File::from_std(upload), policy).await?;
        info!("Video {} spooled to {} ({} bytes)", video.id, upload_path.display(), size);

        let category = self.backends.prober.aspect_category(&upload_path).await?;
        let processed =
            TempPath::try_from_path(self.backends.transcoder.fast_start(&upload_path).await?)?;
        remove_temp(upload_path);

        let data = Bytes::from(tokio::fs::read(&processed).await?);
        let key = video_key(category, &media_type);
        let url = self.backends.video_storage.put(&key, data, &media_type).await?;
        remove_temp(processed);

        video.video_url = Some(url);
        let video = self.videos.save(&video).await?;
        info!("Video {} stored as {} ({})", video.id, key, category);
        Ok(video)
    }
}
