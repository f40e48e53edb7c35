use std::path::PathBuf;

/// Thumbnails are buffered in memory, so the ceiling stays small.
pub const MAX_THUMBNAIL_SIZE: u64 = 10 << 20;
pub const MAX_VIDEO_SIZE: u64 = 1 << 30;

pub const THUMBNAIL_MEDIA_TYPES: &[&str] = &["image/jpeg", "image/png"];
pub const VIDEO_MEDIA_TYPES: &[&str] = &["video/mp4"];

pub const THUMBNAIL_FIELD: &str = "thumbnail";
pub const VIDEO_FIELD: &str = "video";

pub struct Env {
    pub jwt_secret: String,
    pub database_url: String,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
    pub assets_root: PathBuf,
    pub assets_base_url: String,
    pub temp_dir: PathBuf,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_cf_distribution: String,
    pub s3_endpoint: Option<String>,
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
}

fn required(key: &str) -> String {
    std::env::var(key)
        .unwrap_or_else(|_| panic!("{key} must be set in .env file or environment variable"))
}

impl Env {
    fn new() -> Self {
        let jwt_secret = required("JWT_SECRET");
        let database_url = required("DATABASE_URL");

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8091".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid u16 integer");

        let assets_root =
            PathBuf::from(std::env::var("ASSETS_ROOT").unwrap_or_else(|_| "./assets".to_string()));
        let assets_base_url = std::env::var("ASSETS_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}/assets"));
        let temp_dir =
            std::env::var("TEMP_DIR").map(PathBuf::from).unwrap_or_else(|_| std::env::temp_dir());

        let s3_bucket = required("S3_BUCKET");
        let s3_region = required("S3_REGION");
        let s3_cf_distribution = required("S3_CF_DISTRO");
        let s3_endpoint = std::env::var("S3_ENDPOINT").ok().filter(|v| !v.is_empty());

        let ffprobe_path = std::env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string());
        let ffmpeg_path = std::env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string());

        Env {
            jwt_secret,
            database_url,
            frontend_url,
            ip,
            port,
            assets_root,
            assets_base_url,
            temp_dir,
            s3_bucket,
            s3_region,
            s3_cf_distribution,
            s3_endpoint,
            ffprobe_path,
            ffmpeg_path,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
