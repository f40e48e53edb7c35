use bytes::Bytes;
use object_store::{
    path::Path as ObjectPath, Attribute, Attributes, ObjectStore, PutOptions, PutPayload,
};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::api::error;
use crate::modules::media::probe::AspectCategory;
use crate::utils::{extension_for, random_name};

/// Destination for processed assets.
#[async_trait::async_trait]
pub trait MediaStorage: Send + Sync {
    /// Writes `data` under `key` and returns the public URL.
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        media_type: &str,
    ) -> Result<String, error::SystemError>;
}

/// `<random>.<ext>`
pub fn thumbnail_key(media_type: &str) -> String {
    format!("{}.{}", random_name(), extension_for(media_type))
}

/// `<category>/<random>.<ext>`
pub fn video_key(category: AspectCategory, media_type: &str) -> String {
    format!("{}/{}.{}", category, random_name(), extension_for(media_type))
}

fn join_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}

/// Files under a directory that is also served at `base_url`.
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self { root: root.into(), base_url: base_url.into() }
    }

    /// Keys are relative paths made only of normal components.
    fn key_to_path(&self, key: &str) -> Option<PathBuf> {
        let relative = Path::new(key);
        let valid = !key.is_empty()
            && relative.components().all(|c| matches!(c, Component::Normal(_)));
        valid.then(|| self.root.join(relative))
    }

    pub async fn read(&self, key: &str) -> Result<Bytes, error::SystemError> {
        let path = self
            .key_to_path(key)
            .ok_or_else(|| error::SystemError::not_found("Asset not found"))?;

        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(error::SystemError::not_found("Asset not found"))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait::async_trait]
impl MediaStorage for LocalStorage {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        _media_type: &str,
    ) -> Result<String, error::SystemError> {
        let path = self
            .key_to_path(key)
            .ok_or_else(|| error::SystemError::storage(format!("Invalid storage key: {key}")))?;

        let write = async {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, &data).await
        };

        write.await.map_err(|e| {
            log::error!("Local write of {} failed: {}", path.display(), e);
            error::SystemError::storage(e.to_string())
        })?;

        log::info!("Stored {} ({} bytes) on disk", key, data.len());
        Ok(join_url(&self.base_url, key))
    }
}

/// Remote bucket fronted by a public distribution URL.
#[derive(Clone)]
pub struct ObjectStorage {
    store: Arc<dyn ObjectStore>,
    public_base_url: String,
}

impl ObjectStorage {
    pub fn new(store: Arc<dyn ObjectStore>, public_base_url: impl Into<String>) -> Self {
        Self { store, public_base_url: public_base_url.into() }
    }
}

#[async_trait::async_trait]
impl MediaStorage for ObjectStorage {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        media_type: &str,
    ) -> Result<String, error::SystemError> {
        let size = data.len();
        let location = ObjectPath::from(key);

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, media_type.to_string().into());
        let options = PutOptions { attributes, ..Default::default() };

        let start = std::time::Instant::now();
        self.store.put_opts(&location, PutPayload::from(data), options).await.map_err(|e| {
            log::error!("Object upload of {} ({} bytes) failed: {}", key, size, e);
            error::SystemError::storage(e.to_string())
        })?;

        log::info!(
            "Stored {} ({} bytes) in object store in {:.1}ms",
            key,
            size,
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(join_url(&self.public_base_url, key))
    }
}
