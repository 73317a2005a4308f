use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Image,
    Video,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Video => "video",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub resource_kind: ResourceKind,
    pub folder: String,
    /// Transformation applied by the sink during storage, e.g. "q_auto,f_mp4".
    pub transformation: Option<String>,
}

/// Descriptor returned by the sink for a stored object. `duration` is only
/// reported for video resources; `bytes` is the size after any transcoding.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub public_id: String,
    pub url: String,
    pub duration: Option<f64>,
    pub bytes: i64,
}

/// External media storage/transcoding service. One store call per asset;
/// failures are terminal for the request, no retry happens at this layer.
#[axum::async_trait]
pub trait MediaSink: Send + Sync {
    async fn store(&self, file: Bytes, options: StoreOptions) -> Result<StoredObject>;

    /// Delivery URL for a stored image with an on-the-fly transformation.
    fn image_delivery_url(&self, transformation: &str, public_id: &str) -> String;
}

/// Production sink: the hosted media API's signed multipart upload endpoint.
#[derive(Clone)]
pub struct HttpMediaSink {
    client: reqwest::Client,
    upload_base: String,
    delivery_base: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

#[derive(Deserialize)]
struct SinkUploadResponse {
    public_id: String,
    secure_url: String,
    duration: Option<f64>,
    #[serde(default)]
    bytes: i64,
}

impl HttpMediaSink {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_base: config.media_upload_base.clone(),
            delivery_base: config.media_delivery_base.clone(),
            cloud_name: config.media_cloud_name.clone(),
            api_key: config.media_api_key.clone(),
            api_secret: config.media_api_secret.clone(),
        }
    }

    /// Upload-API request signature: params sorted by name, joined as a query
    /// string, secret appended, SHA-256 over the whole thing.
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
        sorted.sort_by_key(|(name, _)| *name);
        let joined = sorted
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(joined.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[axum::async_trait]
impl MediaSink for HttpMediaSink {
    async fn store(&self, file: Bytes, options: StoreOptions) -> Result<StoredObject> {
        let timestamp = OffsetDateTime::now_utc().unix_timestamp().to_string();

        let mut params: Vec<(&str, &str)> =
            vec![("folder", options.folder.as_str()), ("timestamp", &timestamp)];
        if let Some(ref transformation) = options.transformation {
            params.push(("transformation", transformation.as_str()));
        }
        let signature = self.sign(&params);

        let mut form = Form::new()
            .part("file", Part::bytes(file.to_vec()).file_name("upload"))
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
            .text("folder", options.folder.clone());
        if let Some(transformation) = options.transformation {
            form = form.text("transformation", transformation);
        }

        let url = format!(
            "{}/{}/{}/upload",
            self.upload_base,
            self.cloud_name,
            options.resource_kind.as_str()
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("media sink unreachable")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("media sink rejected upload: {} {}", status, body));
        }

        let body: SinkUploadResponse = response
            .json()
            .await
            .context("media sink returned malformed descriptor")?;

        Ok(StoredObject {
            public_id: body.public_id,
            url: body.secure_url,
            duration: body.duration,
            bytes: body.bytes,
        })
    }

    fn image_delivery_url(&self, transformation: &str, public_id: &str) -> String {
        format!(
            "{}/{}/image/upload/{}/{}",
            self.delivery_base, self.cloud_name, transformation, public_id
        )
    }
}
