use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::http::AppError;
use crate::infra::identity::Identity;
use crate::AppState;

/// Identity attached to the request by the access gate. Handlers that
/// require a signed-in user take this as an extractor; its absence is a
/// terminal 401 before any validation runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub identity: Identity,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Unauthorized"))?;
        Ok(AuthUser { identity })
    }
}
