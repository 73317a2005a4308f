pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;

use std::sync::Arc;

use crate::config::routes::RouteTable;
use crate::config::uploads::UploadPolicy;
use crate::infra::{identity::IdentityResolver, media_sink::MediaSink, video_store::VideoStore};

#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn MediaSink>,
    pub videos: Arc<dyn VideoStore>,
    pub identity: Arc<dyn IdentityResolver>,
    pub policy: UploadPolicy,
    pub routes: RouteTable,
    pub media_folder: String,
}
