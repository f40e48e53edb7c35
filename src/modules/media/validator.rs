use crate::api::error;
use crate::modules::media::model::UploadedFile;

/// Size ceiling and media type whitelist for one kind of asset.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_size: u64,
    pub allowed_media_types: &'static [&'static str],
}

impl UploadPolicy {
    pub fn new(max_size: u64, allowed_media_types: &'static [&'static str]) -> Self {
        Self { max_size, allowed_media_types }
    }

    pub fn check_media_type(&self, media_type: &str) -> Result<(), error::SystemError> {
        if !self.allowed_media_types.contains(&media_type) {
            return Err(error::SystemError::bad_request(format!(
                "File type '{}' is not allowed",
                media_type
            )));
        }
        Ok(())
    }

    pub fn check_size(&self, size: u64) -> Result<(), error::SystemError> {
        if size > self.max_size {
            return Err(error::SystemError::bad_request(format!(
                "File size exceeds maximum allowed size of {} bytes",
                self.max_size
            )));
        }
        Ok(())
    }

    /// Returns the file unchanged when it is present, within the ceiling and
    /// of an allowed type.
    pub fn validate(&self, file: Option<UploadedFile>) -> Result<UploadedFile, error::SystemError> {
        let file = file.ok_or_else(|| error::SystemError::bad_request("No file found in request"))?;
        self.check_size(file.data.len() as u64)?;
        self.check_media_type(&file.media_type)?;
        Ok(file)
    }
}
