use actix_cors::Cors;
use actix_web::{
    self,
    middleware::{from_fn, Logger},
    web, App, HttpServer,
};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::{connect_database, connect_object_store},
    middlewares::authentication,
    modules::{
        media::{
            model::UploadConfig,
            probe::FfprobeProber,
            service::{MediaBackends, UploadService},
            storage::{LocalStorage, ObjectStorage},
            thumbnail_store::MemoryThumbnailStore,
            transcode::FfmpegTranscoder,
        },
        video::{repository_pg::VideoRepositoryPg, service::VideoService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

/// Public routes first; everything else under `/api` requires a bearer token.
fn configure_routes(jwt_secret: String) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(health_check).configure(modules::media::route::assets_configure).service(
            web::scope("/api")
                .configure(modules::media::route::public_api_configure)
                .configure(modules::video::route::public_api_configure)
                .service(
                    web::scope("")
                        .wrap(from_fn(authentication(jwt_secret)))
                        .configure(modules::media::route::configure)
                        .configure(modules::video::route::configure),
                ),
        );
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool = connect_database().await.map_err(|e| {
        log::error!("{e}");
        std::io::Error::other("Database connection error")
    })?;

    let object_store = connect_object_store().map_err(|e| {
        log::error!("{e}");
        std::io::Error::other("Object store configuration error")
    })?;

    tokio::fs::create_dir_all(&ENV.assets_root).await?;
    let assets = LocalStorage::new(ENV.assets_root.clone(), ENV.assets_base_url.clone());

    let video_repo = VideoRepositoryPg::new(db_pool.clone());
    let video_service = VideoService::with_dependencies(Arc::new(video_repo));

    let backends = MediaBackends {
        thumbnails: Arc::new(MemoryThumbnailStore::default()),
        thumbnail_storage: Arc::new(assets.clone()),
        video_storage: Arc::new(ObjectStorage::new(object_store, ENV.s3_cf_distribution.clone())),
        prober: Arc::new(FfprobeProber::new(ENV.ffprobe_path.clone())),
        transcoder: Arc::new(FfmpegTranscoder::new(ENV.ffmpeg_path.clone())),
    };
    let upload_service = UploadService::with_dependencies(
        video_service.clone(),
        backends,
        UploadConfig::new(ENV.temp_dir.clone()),
    );

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&ENV.frontend_url)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(video_service.clone()))
            .app_data(web::Data::new(upload_service.clone()))
            .app_data(web::Data::new(assets.clone()))
            .configure(configure_routes(ENV.jwt_secret.clone()))
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
