use bytes::Bytes;
use std::path::PathBuf;

use crate::constants::{
    MAX_THUMBNAIL_SIZE, MAX_VIDEO_SIZE, THUMBNAIL_MEDIA_TYPES, VIDEO_MEDIA_TYPES,
};
use crate::modules::media::validator::UploadPolicy;

/// A fully buffered upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Bytes,
    pub media_type: String,
}

/// An upload whose body has not been read yet. `body` is the raw multipart
/// field stream.
pub struct IncomingFile<S> {
    pub media_type: String,
    pub body: S,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub data: Bytes,
    pub media_type: String,
}

/// Upload pipeline configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub thumbnail: UploadPolicy,
    pub video: UploadPolicy,
    /// Where videos are spooled while probing and transcoding.
    pub temp_dir: PathBuf,
}

impl UploadConfig {
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            thumbnail: UploadPolicy::new(MAX_THUMBNAIL_SIZE, THUMBNAIL_MEDIA_TYPES),
            video: UploadPolicy::new(MAX_VIDEO_SIZE, VIDEO_MEDIA_TYPES),
            temp_dir: temp_dir.into(),
        }
    }
}
