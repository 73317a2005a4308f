use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::config::routes::RouteTable;
use crate::infra::identity::Identity;
use crate::AppState;

const SESSION_COOKIE: &str = "__session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    ToDashboard,
    ToSignIn,
}

/// Pure gate decision over (identity presence, path) and the static route
/// table. Signed-in users get bounced off public pages onto the dashboard;
/// anonymous users get bounced off anything that is not public.
pub fn decide(identity_present: bool, path: &str, routes: &RouteTable) -> GateDecision {
    if identity_present {
        if routes.is_public(path) && path != routes.dashboard_path {
            return GateDecision::ToDashboard;
        }
        return GateDecision::Allow;
    }

    if !routes.is_public(path) && !routes.is_public_api(path) {
        return GateDecision::ToSignIn;
    }
    if path.starts_with("/api") && !routes.is_public_api(path) {
        return GateDecision::ToSignIn;
    }
    GateDecision::Allow
}

/// Runs ahead of every route. Resolves the session once, applies the gate
/// decision, and attaches the identity to the request for handlers.
pub async fn access_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if is_static_asset(&path) {
        return next.run(request).await;
    }

    let identity = resolve_identity(&state, request.headers()).await;

    match decide(identity.is_some(), &path, &state.routes) {
        GateDecision::ToDashboard => {
            Redirect::temporary(&state.routes.dashboard_path).into_response()
        }
        GateDecision::ToSignIn => Redirect::temporary(&state.routes.sign_in_path).into_response(),
        GateDecision::Allow => {
            if let Some(identity) = identity {
                request.extensions_mut().insert(identity);
            }
            next.run(request).await
        }
    }
}

async fn resolve_identity(state: &AppState, headers: &HeaderMap) -> Option<Identity> {
    let token = session_token(headers)?;
    match state.identity.resolve(&token).await {
        Ok(identity) => identity,
        Err(err) => {
            // Treated as anonymous so public routes keep working when the
            // provider is down; protected routes then redirect to sign-in.
            tracing::warn!(error = ?err, "identity lookup failed");
            None
        }
    }
}

/// Session token from `Authorization: Bearer` or the session cookie.
fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        return Some(token.to_string());
    }

    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

fn is_static_asset(path: &str) -> bool {
    path.rsplit('/').next().is_some_and(|segment| segment.contains('.'))
}
