use std::sync::Arc;

use anyhow::Result;

use crate::domain::video::Video;
use crate::infra::video_store::VideoStore;

#[derive(Clone)]
pub struct GalleryService {
    videos: Arc<dyn VideoStore>,
}

impl GalleryService {
    pub fn new(videos: Arc<dyn VideoStore>) -> Self {
        Self { videos }
    }

    /// Every stored video, newest first. An empty gallery is not an error.
    pub async fn list_videos(&self) -> Result<Vec<Video>> {
        self.videos.list_all().await
    }
}
