use thiserror::Error;

use crate::config::uploads::UploadPolicy;

/// Why an upload request was turned away. Messages go to the caller verbatim
/// with a 400 status.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("No file provided")]
    MissingFile,
    #[error("Invalid file type. Only JPEG, PNG, GIF, and WebP are allowed.")]
    UnsupportedImageType,
    #[error("Invalid file type. Only MP4, WebM, and OGG are allowed.")]
    UnsupportedVideoType,
    #[error("File size exceeds {} limit.", format_mb(*.0))]
    TooLarge(u64),
    #[error("Missing required fields: title, description, duration, or originalSize")]
    MissingVideoFields,
    #[error("Invalid duration or originalSize format.")]
    InvalidNumericField,
}

/// Video metadata as it arrives from the multipart form, untrusted.
#[derive(Debug, Default, Clone)]
pub struct RawVideoMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub original_size: Option<String>,
}

/// Video metadata after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMeta {
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub original_size: i64,
}

pub fn validate_image(
    policy: &UploadPolicy,
    content_type: Option<&str>,
    size: u64,
) -> Result<(), ValidationError> {
    let content_type = content_type.ok_or(ValidationError::UnsupportedImageType)?;
    if !policy.allows_image_type(content_type) {
        return Err(ValidationError::UnsupportedImageType);
    }
    if size > policy.image_max_bytes {
        return Err(ValidationError::TooLarge(policy.image_max_bytes));
    }
    Ok(())
}

pub fn validate_video(
    policy: &UploadPolicy,
    content_type: Option<&str>,
    size: u64,
    meta: &RawVideoMeta,
) -> Result<VideoMeta, ValidationError> {
    let (title, description, duration, original_size) = match (
        non_empty(meta.title.as_deref()),
        non_empty(meta.description.as_deref()),
        non_empty(meta.duration.as_deref()),
        non_empty(meta.original_size.as_deref()),
    ) {
        (Some(t), Some(d), Some(dur), Some(size)) => (t, d, dur, size),
        _ => return Err(ValidationError::MissingVideoFields),
    };

    let content_type = content_type.ok_or(ValidationError::UnsupportedVideoType)?;
    if !policy.allows_video_type(content_type) {
        return Err(ValidationError::UnsupportedVideoType);
    }
    if size > policy.video_max_bytes {
        return Err(ValidationError::TooLarge(policy.video_max_bytes));
    }

    let duration: f64 = duration
        .parse()
        .map_err(|_| ValidationError::InvalidNumericField)?;
    let original_size: i64 = original_size
        .parse()
        .map_err(|_| ValidationError::InvalidNumericField)?;
    if !duration.is_finite() {
        return Err(ValidationError::InvalidNumericField);
    }

    Ok(VideoMeta {
        title: title.to_string(),
        description: description.to_string(),
        duration,
        original_size,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Ceiling rendered in MB for the rejection message. Configured ceilings
/// need not be MiB multiples, so keep a decimal when they are not.
fn format_mb(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{:.1}MB", bytes as f64 / MIB as f64)
    }
}
