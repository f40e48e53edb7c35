use crate::modules::video::handle::*;
use actix_web::web::ServiceConfig;

pub fn public_api_configure(cfg: &mut ServiceConfig) {
    cfg.service(get_video);
}

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(create_video).service(list_videos).service(delete_video);
}
