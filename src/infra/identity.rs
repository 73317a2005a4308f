use anyhow::{anyhow, Context, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

/// Authenticated user reference resolved once per request. Absence means
/// the request is anonymous.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
}

/// Session lookup against the external auth provider, injected so request
/// handling stays testable without a live provider.
#[axum::async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, session_token: &str) -> Result<Option<Identity>>;
}

#[derive(Clone)]
pub struct HttpIdentityResolver {
    client: reqwest::Client,
    verify_url: String,
    secret_key: String,
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
struct VerifyResponse {
    user_id: String,
}

impl HttpIdentityResolver {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            verify_url: config.auth_verify_url.clone(),
            secret_key: config.auth_secret_key.clone(),
        }
    }
}

#[axum::async_trait]
impl IdentityResolver for HttpIdentityResolver {
    async fn resolve(&self, session_token: &str) -> Result<Option<Identity>> {
        let response = self
            .client
            .post(&self.verify_url)
            .bearer_auth(&self.secret_key)
            .json(&VerifyRequest {
                token: session_token,
            })
            .send()
            .await
            .context("auth provider unreachable")?;

        match response.status() {
            StatusCode::OK => {
                let body: VerifyResponse = response
                    .json()
                    .await
                    .context("auth provider returned malformed response")?;
                Ok(Some(Identity {
                    user_id: body.user_id,
                }))
            }
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => Ok(None),
            status => Err(anyhow!("auth provider returned {}", status)),
        }
    }
}
