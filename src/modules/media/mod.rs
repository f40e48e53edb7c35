pub mod handle;
pub mod model;
pub mod probe;
pub mod route;
pub mod service;
pub mod storage;
pub mod thumbnail_store;
pub mod transcode;
pub mod validator;
