//! Request gate.
//!
//! Runs ahead of every route: resolves the caller's identity, reads the
//! authorization profile through the profile cache, and applies the route
//! policy. The profile lookup never waits on a cache write.

use crate::extractors::CurrentProfile;
use crate::policy::{decide, GateDecision};
use crate::responses::AppError;
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use carelink_core::{CarelinkError, ProfileId};
use carelink_security::TokenProviderInterface;
use carelink_service::ProfileCache;
use std::sync::Arc;
use tracing::debug;

/// Request gate state.
#[derive(Clone)]
pub struct GateState {
    pub token_provider: Arc<dyn TokenProviderInterface>,
    pub profile_cache: Arc<dyn ProfileCache>,
    pub cookie_name: Arc<str>,
}

impl GateState {
    pub fn new(
        token_provider: Arc<dyn TokenProviderInterface>,
        profile_cache: Arc<dyn ProfileCache>,
        cookie_name: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            token_provider,
            profile_cache,
            cookie_name: cookie_name.into(),
        }
    }

    /// Bearer header first, then the session cookie.
    fn identity(&self, request: &Request<Body>, jar: &CookieJar) -> Option<ProfileId> {
        let token = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::to_string)
            .or_else(|| jar.get(&self.cookie_name).map(|c| c.value().to_string()))?;

        match self.token_provider.validate_access_token(&token) {
            Ok(claims) => Some(claims.profile_id()),
            Err(e) => {
                debug!("Ignoring unusable session token: {}", e);
                None
            }
        }
    }
}

/// Gate middleware.
pub async fn gate_middleware(
    State(gate): State<GateState>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let profile = match gate.identity(&request, &jar) {
        Some(id) => gate.profile_cache.get_authorized_profile(&id).await,
        None => None,
    };

    let path = request.uri().path().to_string();
    match decide(&path, profile.as_ref()) {
        GateDecision::Continue => {
            if let Some(profile) = profile {
                request.extensions_mut().insert(CurrentProfile(profile));
            }
            next.run(request).await
        }
        GateDecision::Redirect(to) => {
            debug!("Gate redirecting {} to {}", path, to);
            Redirect::temporary(to).into_response()
        }
        GateDecision::Reject { status, reason } => {
            debug!("Gate refused {} with {}", path, status);
            let error = if status == StatusCode::UNAUTHORIZED {
                CarelinkError::unauthorized(reason)
            } else {
                CarelinkError::forbidden(reason)
            };
            AppError(error).into_response()
        }
    }
}
