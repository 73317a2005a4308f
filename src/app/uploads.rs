use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;

use crate::app::validation::{self, RawVideoMeta, ValidationError};
use crate::config::uploads::UploadPolicy;
use crate::domain::video::{NewVideo, Video};
use crate::infra::identity::Identity;
use crate::infra::media_sink::{MediaSink, ResourceKind, StoreOptions, StoredObject};
use crate::infra::video_store::VideoStore;

/// One file as pulled out of the multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Rejected(#[from] ValidationError),
    #[error("upload failed")]
    Sink(#[source] anyhow::Error),
    #[error("failed to save video metadata")]
    Metadata(#[source] anyhow::Error),
}

#[derive(Clone)]
pub struct UploadService {
    policy: UploadPolicy,
    sink: Arc<dyn MediaSink>,
    videos: Arc<dyn VideoStore>,
    folder_root: String,
}

impl UploadService {
    pub fn new(
        policy: UploadPolicy,
        sink: Arc<dyn MediaSink>,
        videos: Arc<dyn VideoStore>,
        folder_root: String,
    ) -> Self {
        Self {
            policy,
            sink,
            videos,
            folder_root,
        }
    }

    /// Image pipeline: validate, hand the bytes to the sink, return its
    /// descriptor. No metadata row is created for images.
    pub async fn upload_image(
        &self,
        file: Option<UploadedFile>,
    ) -> Result<StoredObject, UploadError> {
        let file = file.ok_or(ValidationError::MissingFile)?;
        validation::validate_image(
            &self.policy,
            file.content_type.as_deref(),
            file.bytes.len() as u64,
        )?;

        let options = StoreOptions {
            resource_kind: ResourceKind::Image,
            folder: format!("{}/image", self.folder_root),
            transformation: None,
        };
        self.sink
            .store(file.bytes, options)
            .await
            .map_err(UploadError::Sink)
    }

    /// Video pipeline: validate, store with transcode options, then index the
    /// result. Duration and compressed size on the row come from the sink's
    /// descriptor, not from the caller.
    ///
    /// A sink success followed by an insert failure leaves the stored object
    /// orphaned; the failure is logged and surfaced, nothing is rolled back.
    pub async fn upload_video(
        &self,
        user: &Identity,
        file: Option<UploadedFile>,
        meta: RawVideoMeta,
    ) -> Result<(StoredObject, Video), UploadError> {
        let file = file.ok_or(ValidationError::MissingFile)?;
        let meta = validation::validate_video(
            &self.policy,
            file.content_type.as_deref(),
            file.bytes.len() as u64,
            &meta,
        )?;

        let options = StoreOptions {
            resource_kind: ResourceKind::Video,
            folder: format!(
                "{}/video/{}",
                self.folder_root,
                sanitize_folder_segment(&user.user_id)
            ),
            transformation: Some("q_auto,f_mp4".to_string()),
        };
        let stored = self
            .sink
            .store(file.bytes, options)
            .await
            .map_err(UploadError::Sink)?;

        let video = self
            .videos
            .insert(NewVideo {
                title: meta.title,
                description: meta.description,
                public_id: stored.public_id.clone(),
                duration: stored.duration.unwrap_or(meta.duration),
                original_size: meta.original_size,
                compressed_size: stored.bytes,
            })
            .await
            .map_err(|err| {
                tracing::error!(
                    error = ?err,
                    public_id = %stored.public_id,
                    "metadata insert failed after sink store; stored object is orphaned"
                );
                UploadError::Metadata(err)
            })?;

        Ok((stored, video))
    }
}

fn sanitize_folder_segment(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}
