use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app::gallery::GalleryService;
use crate::app::social::{self, SocialFormat};
use crate::app::uploads::{UploadError, UploadService, UploadedFile};
use crate::app::validation::RawVideoMeta;
use crate::domain::video::Video;
use crate::http::{AppError, AuthUser};
use crate::AppState;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn not_found() -> AppError {
    AppError::not_found("not found")
}

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    pub public_id: String,
    pub url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoUploadResponse {
    pub public_id: String,
    pub url: String,
    pub video: Video,
}

/// Everything pulled out of one multipart upload form: the file part plus
/// any text fields.
#[derive(Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    title: Option<String>,
    description: Option<String>,
    duration: Option<String>,
    original_size: Option<String>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        tracing::debug!(error = ?err, "failed to read multipart field");
        AppError::bad_request("malformed multipart body")
    })? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "file" => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::bad_request("failed to read uploaded file"))?;
                form.file = Some(UploadedFile {
                    bytes,
                    content_type,
                });
            }
            other => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| AppError::bad_request("malformed multipart body"))?;
                match other {
                    "title" => form.title = Some(value),
                    "description" => form.description = Some(value),
                    "duration" => form.duration = Some(value),
                    "originalSize" => form.original_size = Some(value),
                    _ => {}
                }
            }
        }
    }

    Ok(form)
}

fn map_upload_error(err: UploadError) -> AppError {
    match err {
        UploadError::Rejected(reason) => AppError::bad_request(reason.to_string()),
        UploadError::Sink(source) => {
            tracing::error!(error = ?source, "media sink call failed");
            AppError::internal("upload failed")
        }
        UploadError::Metadata(source) => {
            tracing::error!(error = ?source, "metadata store call failed");
            AppError::internal("failed to save video metadata")
        }
    }
}

pub async fn upload_image(
    _auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ImageUploadResponse>, AppError> {
    let form = read_upload_form(multipart).await?;

    let service = UploadService::new(
        state.policy.clone(),
        state.sink.clone(),
        state.videos.clone(),
        state.media_folder.clone(),
    );
    let stored = service
        .upload_image(form.file)
        .await
        .map_err(map_upload_error)?;

    Ok(Json(ImageUploadResponse {
        public_id: stored.public_id,
        url: stored.url,
    }))
}

pub async fn upload_video(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<VideoUploadResponse>, AppError> {
    let form = read_upload_form(multipart).await?;
    let meta = RawVideoMeta {
        title: form.title,
        description: form.description,
        duration: form.duration,
        original_size: form.original_size,
    };

    let service = UploadService::new(
        state.policy.clone(),
        state.sink.clone(),
        state.videos.clone(),
        state.media_folder.clone(),
    );
    let (stored, video) = service
        .upload_video(&auth.identity, form.file, meta)
        .await
        .map_err(map_upload_error)?;

    Ok(Json(VideoUploadResponse {
        public_id: stored.public_id,
        url: stored.url,
        video,
    }))
}

// ---------------------------------------------------------------------------
// Gallery
// ---------------------------------------------------------------------------

pub async fn list_videos(State(state): State<AppState>) -> Result<Json<Vec<Video>>, AppError> {
    let service = GalleryService::new(state.videos.clone());
    let videos = service.list_videos().await.map_err(|err| {
        tracing::error!(error = ?err, "failed to list videos");
        AppError::internal("Failed to fetch videos")
    })?;
    Ok(Json(videos))
}

// ---------------------------------------------------------------------------
// Social-share image tool
// ---------------------------------------------------------------------------

pub async fn list_social_formats() -> Json<&'static [SocialFormat]> {
    Json(social::SOCIAL_FORMATS)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUrlQuery {
    pub public_id: String,
    pub format: String,
}

#[derive(Serialize)]
pub struct ImageUrlResponse {
    pub url: String,
}

pub async fn image_url(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ImageUrlQuery>,
) -> Result<Json<ImageUrlResponse>, AppError> {
    let format = social::find_format(&query.format)
        .ok_or_else(|| AppError::bad_request("unknown social format"))?;
    let transformation = social::fill_crop_transformation(format);
    let url = state
        .sink
        .image_delivery_url(&transformation, &query.public_id);
    Ok(Json(ImageUrlResponse { url }))
}
