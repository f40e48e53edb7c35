use object_store::aws::AmazonS3Builder;
use object_store::ObjectStore;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;

use crate::{api::error, ENV};

pub async fn connect_database() -> Result<PgPool, error::SystemError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_slow_threshold(std::time::Duration::from_secs(3))
        .connect(&ENV.database_url)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| error::SystemError::InternalError(Box::new(e)))?;

    Ok(pool)
}

/// Credentials come from the standard `AWS_*` environment variables.
pub fn connect_object_store() -> Result<Arc<dyn ObjectStore>, error::SystemError> {
    let mut builder = AmazonS3Builder::from_env()
        .with_region(ENV.s3_region.clone())
        .with_bucket_name(ENV.s3_bucket.clone());

    if let Some(endpoint) = &ENV.s3_endpoint {
        builder = builder
            .with_endpoint(endpoint.clone())
            .with_allow_http(endpoint.starts_with("http://"));
    }

    let store = builder.build().map_err(|e| error::SystemError::storage(e.to_string()))?;
    Ok(Arc::new(store))
}
