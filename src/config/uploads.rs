/// Upload policy: MIME allow-lists and size ceilings, fixed at startup and
/// passed into the services that enforce them.
#[derive(Clone, Debug)]
pub struct UploadPolicy {
    pub image_types: Vec<String>,
    pub video_types: Vec<String>,
    pub image_max_bytes: u64,
    pub video_max_bytes: u64,
}

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];
const VIDEO_TYPES: &[&str] = &["video/mp4", "video/webm", "video/ogg"];

impl UploadPolicy {
    pub fn new(image_max_bytes: u64, video_max_bytes: u64) -> Self {
        Self {
            image_types: IMAGE_TYPES.iter().map(|t| t.to_string()).collect(),
            video_types: VIDEO_TYPES.iter().map(|t| t.to_string()).collect(),
            image_max_bytes,
            video_max_bytes,
        }
    }

    pub fn allows_image_type(&self, content_type: &str) -> bool {
        self.image_types.iter().any(|t| t == content_type)
    }

    pub fn allows_video_type(&self, content_type: &str) -> bool {
        self.video_types.iter().any(|t| t == content_type)
    }

    /// Ceiling for the whole multipart request body. Kept well above the
    /// per-file ceilings so oversize files reach the validator and get a
    /// 400 with a reason instead of a bare 413 from the body-limit layer.
    pub fn request_body_limit(&self) -> usize {
        (self.video_max_bytes as usize) * 2 + 1024 * 1024
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(10 * 1024 * 1024, 100 * 1024 * 1024)
    }
}
