use crate::modules::media::handle::*;
use actix_web::web::ServiceConfig;

pub fn public_api_configure(cfg: &mut ServiceConfig) {
    cfg.service(get_thumbnail);
}

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(upload_thumbnail).service(upload_video);
}

pub fn assets_configure(cfg: &mut ServiceConfig) {
    cfg.service(get_asset);
}
